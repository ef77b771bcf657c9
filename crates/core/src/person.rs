use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a persisted person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for PersonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Category of a contact, carried on the wire as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    Personal,
    Work,
    Other,
}

impl ContactType {
    /// Wire code used by the remote collection.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Personal => "P",
            Self::Work => "W",
            Self::Other => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(Self::Personal),
            "W" => Some(Self::Work),
            "O" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for ContactType {
    type Err = String;

    /// Accepts either the wire code or the human label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "personal" => Ok(Self::Personal),
            "w" | "work" => Ok(Self::Work),
            "o" | "other" => Ok(Self::Other),
            other => Err(format!("unknown contact type: {other}")),
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `Option<ContactType>` as `"P" | "W" | "O"`, with `""` (or `null`) meaning unset.
mod contact_type_code {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ContactType;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<ContactType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map_or("", ContactType::code))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ContactType>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(code) => ContactType::from_code(code)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unknown contact_type code {code:?}"))),
        }
    }
}

/// The editable attributes of a contact. A draft is exactly this, without an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, with = "contact_type_code")]
    pub contact_type: Option<ContactType>,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    #[must_use]
    pub fn with_contact_type(mut self, contact_type: ContactType) -> Self {
        self.contact_type = Some(contact_type);
        self
    }
}

/// A persisted contact record. Always carries the id the server assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Person {
    pub fn new(id: PersonId, fields: ContactFields) -> Self {
        Self { id, fields }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn email(&self) -> &str {
        &self.fields.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_deserializes_server_shape() {
        let person: Person = serde_json::from_value(json!({
            "id": 3,
            "name": "Ann",
            "email": "a@x.com",
            "phone_number": "555-0100",
            "contact_type": "W"
        }))
        .unwrap();
        assert_eq!(person.id, PersonId(3));
        assert_eq!(person.name(), "Ann");
        assert_eq!(person.fields.contact_type, Some(ContactType::Work));
    }

    #[test]
    fn test_unset_contact_type_accepts_empty_and_null() {
        let empty: ContactFields =
            serde_json::from_value(json!({"name": "A", "email": "", "contact_type": ""})).unwrap();
        let null: ContactFields =
            serde_json::from_value(json!({"name": "A", "email": "", "contact_type": null}))
                .unwrap();
        assert_eq!(empty.contact_type, None);
        assert_eq!(null.contact_type, None);
        assert_eq!(empty.phone_number, "");
    }

    #[test]
    fn test_unknown_contact_type_code_is_rejected() {
        let result: Result<ContactFields, _> =
            serde_json::from_value(json!({"name": "A", "email": "", "contact_type": "X"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = ContactFields::new("Bo", "b@x.com").with_contact_type(ContactType::Personal);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({"name": "Bo", "email": "b@x.com", "phone_number": "", "contact_type": "P"})
        );
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_unset_contact_type_serializes_as_empty_string() {
        let person = Person::new(PersonId(1), ContactFields::new("Ann", "a@x.com"));
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["contact_type"], json!(""));
    }

    #[test]
    fn test_contact_type_from_str() {
        assert_eq!("work".parse::<ContactType>().unwrap(), ContactType::Work);
        assert_eq!("P".parse::<ContactType>().unwrap(), ContactType::Personal);
        assert_eq!(" Other ".parse::<ContactType>().unwrap(), ContactType::Other);
        assert!("family".parse::<ContactType>().is_err());
    }

    #[test]
    fn test_person_id_from_str() {
        assert_eq!("42".parse::<PersonId>().unwrap(), PersonId(42));
        assert!("abc".parse::<PersonId>().is_err());
    }
}
