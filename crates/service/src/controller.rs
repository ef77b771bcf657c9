//! Composition root: wires user actions to transport calls and local state.
//!
//! Handlers take `&self` so several can be outstanding on one task. State sits
//! behind a synchronous mutex that is never held across an `.await`; every
//! local mutation happens after the transport call it depends on resolved.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rolodex_core::{env_parse_with_default, Person, PersonId, StoreError, REPLACE_POLICY_VAR};
use rolodex_transport::{PersonTransport, TransportError};
use serde::Serialize;

use crate::edit_session::{DraftField, EditSession, SaveRequest, SessionSnapshot};
use crate::error::ControllerError;
use crate::filter::filtered;
use crate::store::CollectionStore;

/// Which body the collection adopts after a confirmed replace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// The server's echoed record; the local draft when the server sends no body.
    #[default]
    PreferServer,
    /// Always the local draft.
    LocalDraft,
}

impl std::str::FromStr for ReplacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(Self::PreferServer),
            "draft" => Ok(Self::LocalDraft),
            other => Err(format!("unknown replace policy: {other}")),
        }
    }
}

impl std::fmt::Display for ReplacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PreferServer => "server",
            Self::LocalDraft => "draft",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    pub replace_policy: ReplacePolicy,
}

impl ControllerConfig {
    /// Reads `ROLODEX_REPLACE_POLICY`.
    #[must_use]
    pub fn from_env() -> Self {
        let replace_policy = env_parse_with_default(REPLACE_POLICY_VAR, ReplacePolicy::default());
        Self { replace_policy }
    }
}

/// Target of an outstanding transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingKey {
    /// The create call of a `Creating` session.
    Create,
    /// A replace or delete of this record.
    Record(PersonId),
}

impl std::fmt::Display for PendingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => f.write_str("new person"),
            Self::Record(id) => write!(f, "person {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
}

/// A non-fatal message for the user about a failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "person", rename_all = "lowercase")]
pub enum SaveOutcome {
    Created(Person),
    Updated(Person),
}

impl SaveOutcome {
    #[must_use]
    pub fn person(&self) -> &Person {
        match self {
            Self::Created(p) | Self::Updated(p) => p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    /// Not in the local collection; no call was made.
    AlreadyAbsent,
}

/// Everything the rendering layer displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub persons: Vec<Person>,
    pub search_term: String,
    pub session: SessionSnapshot,
    pub pending: usize,
}

#[derive(Debug, Default)]
struct ControllerState {
    store: CollectionStore,
    session: EditSession,
    search_term: String,
    in_flight: HashSet<PendingKey>,
    notices: Vec<Notice>,
}

pub struct Controller {
    transport: Arc<dyn PersonTransport>,
    config: ControllerConfig,
    state: Mutex<ControllerState>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Marks a key in flight until dropped, including when the handler future is dropped mid-call.
struct InFlight<'a> {
    controller: &'a Controller,
    key: PendingKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.controller.state().in_flight.remove(&self.key);
    }
}

impl Controller {
    #[must_use]
    pub fn new(transport: Arc<dyn PersonTransport>, config: ControllerConfig) -> Self {
        Self { transport, config, state: Mutex::new(ControllerState::default()) }
    }

    /// Initial fetch. On failure the collection keeps its current (empty) contents.
    pub async fn activate(&self) -> Result<usize, ControllerError> {
        let persons = match self.transport.list().await {
            Ok(persons) => persons,
            Err(e) => return Err(self.report("Error fetching persons", e)),
        };
        let mut state = self.state();
        state.store.load(persons);
        tracing::info!(count = state.store.len(), "Loaded persons");
        Ok(state.store.len())
    }

    pub fn search(&self, term: impl Into<String>) {
        self.state().search_term = term.into();
    }

    pub fn add_contact(&self) -> SessionSnapshot {
        let mut state = self.state();
        if let Some(discarded) = state.session.open_create() {
            tracing::debug!(name = %discarded.name, "Discarded unsaved draft");
        }
        state.session.snapshot()
    }

    pub fn edit_contact(&self, id: PersonId) -> Result<SessionSnapshot, ControllerError> {
        let mut state = self.state();
        let person = state.store.get(id).cloned().ok_or(ControllerError::UnknownRecord(id))?;
        if let Some(discarded) = state.session.open_edit(&person) {
            tracing::debug!(name = %discarded.name, "Discarded unsaved draft");
        }
        Ok(state.session.snapshot())
    }

    pub fn update_draft(&self, field: DraftField) -> Result<(), ControllerError> {
        self.state().session.apply(field)
    }

    pub fn cancel_edit(&self) {
        if self.state().session.cancel().is_some() {
            tracing::debug!("Edit session cancelled");
        }
    }

    /// Persists the open draft.
    ///
    /// On success the confirmed record is applied to the collection and the
    /// session closes, unless it was cancelled or replaced while the call was
    /// outstanding: then the result is still applied but the newer session is
    /// left alone. On failure the session keeps its draft.
    pub async fn save_edit(&self) -> Result<SaveOutcome, ControllerError> {
        let (request, generation) = {
            let state = self.state();
            let request = state.session.save_request().ok_or(ControllerError::NoActiveSession)?;
            (request, state.session.generation())
        };
        let key = match &request {
            SaveRequest::Create(_) => PendingKey::Create,
            SaveRequest::Replace(person) => PendingKey::Record(person.id),
        };
        let _in_flight = self.begin(key)?;

        match request {
            SaveRequest::Create(draft) => {
                let created = match self.transport.create(&draft).await {
                    Ok(person) => person,
                    Err(e) => return Err(self.report("Error saving person", e)),
                };
                let mut state = self.state();
                state.store.append(created.clone()).map_err(|e| self.inconsistent(e))?;
                Self::finish_session(&mut state, generation);
                tracing::info!(id = %created.id, name = %created.name(), "Created person");
                Ok(SaveOutcome::Created(created))
            },
            SaveRequest::Replace(person) => {
                let echoed = match self.transport.replace(&person).await {
                    Ok(echoed) => echoed,
                    Err(e) => return Err(self.report("Error saving person", e)),
                };
                let stored = self.adopt_replace(person.clone(), echoed);
                let mut state = self.state();
                state.store.replace(person.id, stored.clone()).map_err(|e| self.inconsistent(e))?;
                Self::finish_session(&mut state, generation);
                tracing::info!(id = %stored.id, name = %stored.name(), "Updated person");
                Ok(SaveOutcome::Updated(stored))
            },
        }
    }

    /// Deletes remotely, then locally. Idempotent from the caller's side.
    ///
    /// Any remote failure, a 404 included, is reported and leaves local state
    /// unchanged. An edit session open on the deleted record is closed.
    pub async fn delete_contact(&self, id: PersonId) -> Result<DeleteOutcome, ControllerError> {
        if !self.state().store.contains(id) {
            tracing::debug!(%id, "Delete of absent person ignored");
            return Ok(DeleteOutcome::AlreadyAbsent);
        }
        let _in_flight = self.begin(PendingKey::Record(id))?;

        if let Err(e) = self.transport.delete(id).await {
            return Err(self.report("Error deleting person", e));
        }

        let mut state = self.state();
        if state.session.editing_id() == Some(id) {
            state.session.cancel();
            tracing::debug!(%id, "Closed edit session of deleted person");
        }
        let removed = state.store.remove(id);
        drop(state);
        match removed {
            Ok(_) => tracing::info!(%id, "Deleted person"),
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(%id, "Person already removed locally");
            },
            Err(e) => return Err(self.inconsistent(e)),
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// The collection filtered by the current search term.
    #[must_use]
    pub fn filtered(&self) -> Vec<Person> {
        let state = self.state();
        filtered(&state.store, &state.search_term).cloned().collect()
    }

    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        self.state().session.snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.state();
        ViewSnapshot {
            persons: filtered(&state.store, &state.search_term).cloned().collect(),
            search_term: state.search_term.clone(),
            session: state.session.snapshot(),
            pending: state.in_flight.len(),
        }
    }

    /// Returns and clears the queued notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state().notices)
    }

    #[must_use]
    pub fn is_in_flight(&self, key: PendingKey) -> bool {
        self.state().in_flight.contains(&key)
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, key: PendingKey) -> Result<InFlight<'_>, ControllerError> {
        if !self.state().in_flight.insert(key) {
            tracing::debug!(%key, "Refusing concurrent request");
            return Err(ControllerError::Busy(key));
        }
        Ok(InFlight { controller: self, key })
    }

    fn adopt_replace(&self, draft: Person, echoed: Option<Person>) -> Person {
        match (self.config.replace_policy, echoed) {
            (ReplacePolicy::PreferServer, Some(echoed)) if echoed.id == draft.id => echoed,
            (ReplacePolicy::PreferServer, Some(echoed)) => {
                tracing::warn!(
                    expected = %draft.id,
                    got = %echoed.id,
                    "Server echoed a different id, keeping local draft"
                );
                draft
            },
            _ => draft,
        }
    }

    fn finish_session(state: &mut ControllerState, generation: u64) {
        if !state.session.close_if_current(generation) {
            tracing::debug!("Session changed while saving, leaving it open");
        }
    }

    fn report(&self, context: &str, err: TransportError) -> ControllerError {
        tracing::warn!(error = %err, "{context}");
        self.state()
            .notices
            .push(Notice { level: NoticeLevel::Error, message: format!("{context}: {err}") });
        ControllerError::Transport(err)
    }

    fn inconsistent(&self, err: StoreError) -> ControllerError {
        tracing::error!(error = %err, "Local collection diverged from server");
        ControllerError::Inconsistent(err)
    }
}
