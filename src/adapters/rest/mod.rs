//! HTTP record store.

pub mod record_store;

pub use record_store::{RestRecordStore, RestStoreSettings};
