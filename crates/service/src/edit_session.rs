//! The single create-or-edit form.
//!
//! At most one draft exists at a time. Opening a session while another is
//! open discards the old draft. An edit draft is a copy of the stored record,
//! so typing never touches the collection until a save is confirmed.

use rolodex_core::{ContactFields, ContactType, Person, PersonId};
use serde::Serialize;

use crate::error::ControllerError;

/// Whether the open session will create a new record or replace an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Creating,
    Editing,
}

/// A single-field change typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Name(String),
    Email(String),
    PhoneNumber(String),
    ContactType(Option<ContactType>),
}

impl DraftField {
    fn apply_to(self, draft: &mut ContactFields) {
        match self {
            Self::Name(v) => draft.name = v,
            Self::Email(v) => draft.email = v,
            Self::PhoneNumber(v) => draft.phone_number = v,
            Self::ContactType(v) => draft.contact_type = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Closed,
    Creating { draft: ContactFields },
    Editing { id: PersonId, draft: ContactFields },
}

/// The transport call a save of the open session requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(ContactFields),
    Replace(Person),
}

/// What the rendering layer sees of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub mode: Option<SessionMode>,
    pub id: Option<PersonId>,
    pub draft: Option<ContactFields>,
}

/// State machine over `Closed`, `Creating` and `Editing`.
///
/// `generation` increases on every open and close, so a save that resolves
/// late can tell whether the session it started from is still the current one.
#[derive(Debug, Clone)]
pub struct EditSession {
    state: SessionState,
    generation: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: SessionState::Closed, generation: 0 }
    }

    /// Opens a blank creation draft. Returns the draft it discarded, if any.
    pub fn open_create(&mut self) -> Option<ContactFields> {
        self.reopen(SessionState::Creating { draft: ContactFields::default() })
    }

    /// Opens an edit draft copied from `person`. Returns the draft it discarded, if any.
    pub fn open_edit(&mut self, person: &Person) -> Option<ContactFields> {
        self.reopen(SessionState::Editing { id: person.id, draft: person.fields.clone() })
    }

    /// Changes one field of the open draft, leaving the others as they are.
    pub fn apply(&mut self, field: DraftField) -> Result<(), ControllerError> {
        match &mut self.state {
            SessionState::Closed => Err(ControllerError::NoActiveSession),
            SessionState::Creating { draft } | SessionState::Editing { draft, .. } => {
                field.apply_to(draft);
                Ok(())
            },
        }
    }

    /// Discards the draft. Returns it if a session was open.
    pub fn cancel(&mut self) -> Option<ContactFields> {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        let draft = match previous {
            SessionState::Closed => None,
            SessionState::Creating { draft } | SessionState::Editing { draft, .. } => Some(draft),
        };
        if draft.is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
        draft
    }

    /// Closes the session after a confirmed save, but only if it is still the
    /// one the save started from. Returns whether it closed.
    pub fn close_if_current(&mut self, generation: u64) -> bool {
        if self.generation != generation || !self.is_active() {
            return false;
        }
        self.cancel();
        true
    }

    /// The call needed to persist the open draft.
    #[must_use]
    pub fn save_request(&self) -> Option<SaveRequest> {
        match &self.state {
            SessionState::Closed => None,
            SessionState::Creating { draft } => Some(SaveRequest::Create(draft.clone())),
            SessionState::Editing { id, draft } => {
                Some(SaveRequest::Replace(Person::new(*id, draft.clone())))
            },
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, SessionState::Closed)
    }

    #[must_use]
    pub fn mode(&self) -> Option<SessionMode> {
        match self.state {
            SessionState::Closed => None,
            SessionState::Creating { .. } => Some(SessionMode::Creating),
            SessionState::Editing { .. } => Some(SessionMode::Editing),
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&ContactFields> {
        match &self.state {
            SessionState::Closed => None,
            SessionState::Creating { draft } | SessionState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Id of the record under edit, when editing.
    #[must_use]
    pub fn editing_id(&self) -> Option<PersonId> {
        match self.state {
            SessionState::Editing { id, .. } => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.is_active(),
            mode: self.mode(),
            id: self.editing_id(),
            draft: self.draft().cloned(),
        }
    }

    fn reopen(&mut self, next: SessionState) -> Option<ContactFields> {
        let discarded = self.cancel();
        self.state = next;
        self.generation = self.generation.wrapping_add(1);
        discarded
    }
}
