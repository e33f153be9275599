//! Record store port.

use async_trait::async_trait;

use super::subscription::{Subscription, SubscriptionId};
use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentId, AgentPatch, AgentRecord, NewAgent};

/// Remote persistence for agent records plus its realtime change feed.
///
/// Implementations assign ids and timestamps and must refresh `updated_at`
/// on every successful update.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every agent, newest created first.
    async fn fetch_all(&self) -> DomainResult<Vec<AgentRecord>>;

    /// Fetch a single agent; `Ok(None)` when it does not exist.
    async fn fetch_by_id(&self, id: &AgentId) -> DomainResult<Option<AgentRecord>>;

    /// Create an agent and return the stored record.
    async fn create(&self, fields: &NewAgent) -> DomainResult<AgentRecord>;

    /// Apply the present fields of `patch`; `Ok(None)` when the id is unknown.
    async fn update(&self, id: &AgentId, patch: &AgentPatch) -> DomainResult<Option<AgentRecord>>;

    /// Delete an agent; `Ok(false)` when the backend refused or nothing was deleted.
    async fn delete(&self, id: &AgentId) -> DomainResult<bool>;

    /// Open a subscription to the change feed.
    fn subscribe(&self) -> DomainResult<Subscription>;

    /// Release a subscription by id. Releasing an unknown id is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);
}
