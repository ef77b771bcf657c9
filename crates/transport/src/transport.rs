//! The request/response contract the controller consumes.

use async_trait::async_trait;
use rolodex_core::{ContactFields, Person, PersonId};

use crate::TransportError;

/// List, create, replace and delete against a person collection.
///
/// Implementations hold no record state of their own; every call reflects
/// the remote collection at the moment it resolves.
#[async_trait]
pub trait PersonTransport: Send + Sync {
    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<Person>, TransportError>;

    /// Create a record from a draft. The result carries the server-assigned id.
    async fn create(&self, draft: &ContactFields) -> Result<Person, TransportError>;

    /// Overwrite the record `person.id` with `person`. `None` when the server sends no body.
    async fn replace(&self, person: &Person) -> Result<Option<Person>, TransportError>;

    /// Delete the record with this id.
    async fn delete(&self, id: PersonId) -> Result<(), TransportError>;
}
