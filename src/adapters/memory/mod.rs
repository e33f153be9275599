//! In-memory record store.

pub mod record_store;

pub use record_store::InMemoryRecordStore;
