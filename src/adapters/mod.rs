//! Record store adapters.
//!
//! - `memory`: process-local store used by tests, demos and `replay`
//! - `rest`: PostgREST/Supabase-compatible HTTP backend

pub mod change_feed;
pub mod memory;
pub mod rest;

pub use change_feed::ChangeFeed;
pub use memory::InMemoryRecordStore;
pub use rest::{RestRecordStore, RestStoreSettings};
