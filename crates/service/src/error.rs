//! Typed error enum for the controller.
//!
//! Separates reported remote failures from local inconsistencies so callers
//! can match on the failure mode instead of inspecting messages.

use rolodex_core::{PersonId, StoreError};
use rolodex_transport::TransportError;
use thiserror::Error;

use crate::controller::PendingKey;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// A transport call failed. Already reported as a notice; prior state kept.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// The local collection disagrees with what the protocol just confirmed.
    #[error("local collection out of sync: {0}")]
    Inconsistent(#[from] StoreError),

    /// A call for the same target is still outstanding; nothing was sent.
    #[error("a request for {0} is already in flight")]
    Busy(PendingKey),

    /// A draft operation was requested while no edit session is open.
    #[error("no edit session is open")]
    NoActiveSession,

    /// The requested record is not in the local collection.
    #[error("no person with id {0} in the collection")]
    UnknownRecord(PersonId),
}

impl ControllerError {
    /// Whether this is a reported, user-facing remote failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether this signals a logic fault rather than a user-recoverable condition.
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Self::Inconsistent(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }
}
