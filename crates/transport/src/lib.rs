//! Transport for the remote person collection
//!
//! Exposes the [`PersonTransport`] contract and its HTTP implementation.

mod client;
mod error;
mod transport;

#[cfg(test)]
mod client_tests;

pub use client::{HttpTransport, TransportConfig};
pub use error::TransportError;
pub use transport::PersonTransport;
