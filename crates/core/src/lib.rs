//! Core types for rolodex
//!
//! Record shapes, the local collection error taxonomy and environment
//! settings shared by the transport, service and CLI crates.

mod env_config;
mod error;
mod person;

pub use env_config::*;
pub use error::*;
pub use person::*;
