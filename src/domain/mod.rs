//! Domain layer for agentdeck
//!
//! Agent record models, change events, view criteria and the record store
//! port. Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
