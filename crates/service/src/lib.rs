//! Controller layer for rolodex
//!
//! Keeps the local person collection, the search view and the single edit
//! session consistent with what the remote collection has confirmed.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod controller;
mod edit_session;
mod error;
mod filter;
mod store;


pub use controller::{
    Controller, ControllerConfig, DeleteOutcome, Notice, NoticeLevel, PendingKey, ReplacePolicy,
    SaveOutcome, ViewSnapshot,
};
pub use edit_session::{DraftField, EditSession, SaveRequest, SessionMode, SessionSnapshot};
pub use error::ControllerError;
pub use filter::filtered;
pub use store::CollectionStore;
