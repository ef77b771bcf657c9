//! Typed errors for mutations of the local person collection.
//!
//! These never describe remote failures. A `StoreError` means the local copy
//! and the remote protocol disagree about which records exist.

use thiserror::Error;

use crate::PersonId;

/// Local collection error: the mutation target is absent or collides.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No entry carries the targeted id.
    #[error("not found: person with id {id}")]
    NotFound { id: PersonId },

    /// An entry with this id is already present.
    #[error("duplicate: person with id {id} already exists")]
    DuplicateId { id: PersonId },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }

    /// The id the failed mutation targeted.
    pub fn id(&self) -> PersonId {
        match self {
            Self::NotFound { id } | Self::DuplicateId { id } => *id,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
