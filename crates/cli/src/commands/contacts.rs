use std::sync::Arc;

use anyhow::{anyhow, Result};
use rolodex_core::{ContactType, PersonId};
use rolodex_service::{Controller, ControllerConfig, ControllerError, DraftField};
use rolodex_transport::{HttpTransport, TransportConfig};

/// Field values given on the command line; `None` leaves the draft untouched.
#[derive(Debug, Default)]
pub(crate) struct FieldArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_type: Option<ContactType>,
    pub clear_contact_type: bool,
}

impl FieldArgs {
    fn into_changes(self) -> Vec<DraftField> {
        let mut changes = Vec::new();
        if let Some(name) = self.name {
            changes.push(DraftField::Name(name));
        }
        if let Some(email) = self.email {
            changes.push(DraftField::Email(email));
        }
        if let Some(phone) = self.phone {
            changes.push(DraftField::PhoneNumber(phone));
        }
        if self.clear_contact_type {
            changes.push(DraftField::ContactType(None));
        } else if let Some(contact_type) = self.contact_type {
            changes.push(DraftField::ContactType(Some(contact_type)));
        }
        changes
    }
}

/// Builds the controller against the configured server and runs the initial fetch.
async fn activate(api_url: Option<String>) -> Result<Controller> {
    let mut config = TransportConfig::from_env();
    if let Some(url) = api_url {
        config.base_url = url;
    }
    let transport = HttpTransport::new(&config)?;
    tracing::debug!(url = %transport.collection_url(), "Using person collection");
    let controller = Controller::new(Arc::new(transport), ControllerConfig::from_env());
    let loaded = controller.activate().await;
    finish(&controller, loaded)?;
    Ok(controller)
}

/// Shows queued notices, then turns a handler result into a CLI result.
fn finish<T>(controller: &Controller, result: Result<T, ControllerError>) -> Result<T> {
    for notice in controller.take_notices() {
        eprintln!("{}", notice.message);
    }
    result.map_err(|e| if e.is_transport() { anyhow!("request failed") } else { e.into() })
}

pub(crate) async fn run_list(api_url: Option<String>, search: Option<String>) -> Result<()> {
    let controller = activate(api_url).await?;
    if let Some(term) = search {
        controller.search(term);
    }
    println!("{}", serde_json::to_string_pretty(&controller.filtered())?);
    Ok(())
}

pub(crate) async fn run_add(api_url: Option<String>, fields: FieldArgs) -> Result<()> {
    let controller = activate(api_url).await?;
    controller.add_contact();
    for change in fields.into_changes() {
        controller.update_draft(change)?;
    }
    let saved = controller.save_edit().await;
    let outcome = finish(&controller, saved)?;
    println!("{}", serde_json::to_string_pretty(outcome.person())?);
    Ok(())
}

pub(crate) async fn run_edit(api_url: Option<String>, id: PersonId, fields: FieldArgs) -> Result<()> {
    let controller = activate(api_url).await?;
    controller.edit_contact(id)?;
    for change in fields.into_changes() {
        controller.update_draft(change)?;
    }
    let saved = controller.save_edit().await;
    let outcome = finish(&controller, saved)?;
    println!("{}", serde_json::to_string_pretty(outcome.person())?);
    Ok(())
}

pub(crate) async fn run_delete(api_url: Option<String>, id: PersonId) -> Result<()> {
    let controller = activate(api_url).await?;
    let deleted = controller.delete_contact(id).await;
    let outcome = finish(&controller, deleted)?;
    println!("{}", serde_json::json!({ "id": id, "outcome": outcome }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_args_only_emit_given_fields() {
        let args = FieldArgs { email: Some("a@x.com".to_owned()), ..FieldArgs::default() };
        assert_eq!(args.into_changes(), vec![DraftField::Email("a@x.com".to_owned())]);
    }

    #[test]
    fn test_clear_contact_type_wins() {
        let args = FieldArgs {
            contact_type: Some(ContactType::Work),
            clear_contact_type: true,
            ..FieldArgs::default()
        };
        assert_eq!(args.into_changes(), vec![DraftField::ContactType(None)]);
    }
}
