//! Port trait definitions (Hexagonal Architecture)
//!
//! - RecordStore: remote agent persistence and its change feed
//! - Subscription: scoped handle on that feed, released on drop
//!
//! Adapters under `crate::adapters` implement these so the list engine
//! stays independent of any particular backend.

pub mod record_store;
pub mod subscription;

pub use record_store::RecordStore;
pub use subscription::{FeedItem, Subscription, SubscriptionId};
