//! Agentdeck - client-side agent list kept in sync with a remote store
//!
//! Agentdeck loads agent profiles from a record store, keeps an in-memory
//! copy current from the store's change feed, and derives the filtered,
//! sorted list a screen displays.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): agent models, change events, view criteria
//!   and the `RecordStore` port
//! - **Service Layer** (`services`): change normalizer, merge engine, view
//!   projector and the `AgentListView` that ties them together
//! - **Adapters** (`adapters`): in-memory and REST record stores
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentdeck::{AgentListView, InMemoryRecordStore, NewAgent, ViewCriteria};
//!
//! # async fn demo() -> agentdeck::DomainResult<()> {
//! let store = Arc::new(InMemoryRecordStore::new());
//! let mut view = AgentListView::open(store, ViewCriteria::default()).await?;
//!
//! view.create(&NewAgent::new("Support Bot")).await?;
//! view.next_change().await;
//! assert_eq!(view.projection().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryRecordStore, RestRecordStore, RestStoreSettings};
pub use domain::models::{
    AgentCategory, AgentId, AgentPatch, AgentRecord, AgentStatus, AgentTemplate, CategoryFilter,
    ChangeEvent, Config, NewAgent, RawNotification, SortKey, StatusFilter, ViewCriteria,
};
pub use domain::ports::{FeedItem, RecordStore, Subscription, SubscriptionId};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{normalize, project, AgentListEngine, AgentListView, ApplyOutcome, MalformedEvent};
