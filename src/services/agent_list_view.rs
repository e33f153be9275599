//! Agent list view: one merge engine, one subscription, one projection.
//!
//! A view is what a screen holds while it is visible. It seeds its engine
//! from a bulk fetch, keeps it current from the change feed, and exposes the
//! filtered/sorted projection. Dropping the view releases its subscription.
//!
//! Writes go straight to the record store and are never applied locally;
//! the collection only changes once the feed (or a reload) confirms them.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentId, AgentPatch, AgentRecord, CategoryFilter, ChangeEvent, NewAgent, SortKey,
    StatusFilter, ViewCriteria,
};
use crate::domain::ports::{FeedItem, RecordStore, Subscription, SubscriptionId};
use crate::services::change_normalizer::normalize_or_drop;
use crate::services::list_merge::{AgentListEngine, ApplyOutcome};
use crate::services::view_projector::project;

/// Live, filtered view over a record store's agent collection.
pub struct AgentListView<S: RecordStore + ?Sized> {
    store: Arc<S>,
    engine: AgentListEngine,
    criteria: ViewCriteria,
    projection: Arc<[AgentRecord]>,
    subscription: Option<Subscription>,
}

impl<S: RecordStore + ?Sized> AgentListView<S> {
    /// Create a detached, empty view.
    pub fn new(store: Arc<S>, criteria: ViewCriteria) -> Self {
        Self {
            store,
            engine: AgentListEngine::new(),
            criteria,
            projection: Arc::from(Vec::new()),
            subscription: None,
        }
    }

    /// Create a view, subscribe to the change feed and load the list.
    ///
    /// The subscription is opened before the fetch so that nothing committed
    /// in between is missed; replaying such an event over the fresh seed is
    /// harmless.
    pub async fn open(store: Arc<S>, criteria: ViewCriteria) -> DomainResult<Self> {
        let mut view = Self::new(store, criteria);
        view.attach()?;
        view.reload().await;
        Ok(view)
    }

    /// Re-fetch everything and replace the collection.
    ///
    /// A failed fetch is logged and leaves the view empty.
    pub async fn reload(&mut self) -> usize {
        let records = match self.store.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load agents, showing empty list");
                Vec::new()
            }
        };
        self.engine.seed(records);
        self.recompute();
        tracing::info!(count = self.engine.len(), "agent list loaded");
        self.engine.len()
    }

    /// Subscribe to the change feed unless already subscribed.
    pub fn attach(&mut self) -> DomainResult<SubscriptionId> {
        if let Some(subscription) = &self.subscription {
            return Ok(subscription.id());
        }
        let subscription = self.store.subscribe()?;
        let id = subscription.id();
        tracing::debug!(subscription = %id, "agent list view attached");
        self.subscription = Some(subscription);
        Ok(id)
    }

    /// Release the change feed subscription.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
    }

    pub const fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Wait for the next change that actually applies.
    ///
    /// Malformed notifications are skipped. A lagging feed triggers a full
    /// reload. Returns `None` once detached or when the feed closes.
    pub async fn next_change(&mut self) -> Option<ChangeEvent> {
        loop {
            let item = match self.subscription.as_mut() {
                Some(subscription) => subscription.recv().await,
                None => return None,
            };
            if let Some(event) = self.handle_feed_item(item).await {
                return Some(event);
            }
            if self.subscription.is_none() {
                return None;
            }
        }
    }

    /// Apply every notification already delivered, without waiting.
    ///
    /// Returns the number of change events applied.
    pub async fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let item = match self.subscription.as_mut().and_then(Subscription::try_recv) {
                Some(item) => item,
                None => return applied,
            };
            if self.handle_feed_item(item).await.is_some() {
                applied += 1;
            }
        }
    }

    async fn handle_feed_item(&mut self, item: FeedItem) -> Option<ChangeEvent> {
        match item {
            FeedItem::Notification(raw) => {
                let event = normalize_or_drop(&raw)?;
                self.apply_event(event.clone());
                Some(event)
            }
            FeedItem::Lagged(missed) => {
                tracing::warn!(missed, "change feed lagged, reloading agent list");
                self.reload().await;
                None
            }
            FeedItem::Closed => {
                tracing::info!("change feed closed");
                self.subscription = None;
                None
            }
        }
    }

    /// Apply a change event obtained elsewhere and refresh the projection.
    pub fn apply_event(&mut self, event: ChangeEvent) -> ApplyOutcome {
        tracing::debug!(kind = event.kind(), id = %event.agent_id(), "applying change");
        let outcome = self.engine.apply(event);
        if outcome != ApplyOutcome::Unchanged {
            self.recompute();
        }
        outcome
    }

    fn recompute(&mut self) {
        self.projection = Arc::from(project(self.engine.records(), &self.criteria));
    }

    /// Displayed list. A new `Arc` is handed out whenever it is recomputed.
    pub fn projection(&self) -> Arc<[AgentRecord]> {
        Arc::clone(&self.projection)
    }

    pub const fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    /// Canonical, unfiltered collection.
    pub const fn engine(&self) -> &AgentListEngine {
        &self.engine
    }

    pub fn set_criteria(&mut self, criteria: ViewCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.recompute();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.criteria.status_filter = filter;
        self.recompute();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.criteria.category_filter = filter;
        self.recompute();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.criteria.sort_key = key;
        self.recompute();
    }

    /// Look up a single agent in the store; failures read as absent.
    pub async fn find(&self, id: &AgentId) -> Option<AgentRecord> {
        match self.store.fetch_by_id(id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to load agent");
                None
            }
        }
    }

    pub async fn create(&self, fields: &NewAgent) -> DomainResult<AgentRecord> {
        fields.validate()?;
        self.store.create(fields).await.map_err(|e| {
            tracing::warn!(error = %e, name = %fields.name, "agent creation rejected");
            as_write_failure(e, DomainError::CreationFailed)
        })
    }

    pub async fn update(&self, id: &AgentId, patch: &AgentPatch) -> DomainResult<AgentRecord> {
        patch.validate()?;
        match self.store.update(id, patch).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(DomainError::AgentNotFound(id.clone())),
            Err(e) => {
                tracing::warn!(%id, error = %e, "agent update rejected");
                Err(as_write_failure(e, |reason| DomainError::UpdateFailed {
                    id: id.clone(),
                    reason,
                }))
            }
        }
    }

    pub async fn delete(&self, id: &AgentId) -> DomainResult<()> {
        match self.store.delete(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::DeleteFailed {
                id: id.clone(),
                reason: "nothing was deleted".to_string(),
            }),
            Err(e) => {
                tracing::warn!(%id, error = %e, "agent deletion rejected");
                Err(as_write_failure(e, |reason| DomainError::DeleteFailed {
                    id: id.clone(),
                    reason,
                }))
            }
        }
    }
}

/// Keep write failures as-is; wrap transport and other errors.
fn as_write_failure(err: DomainError, wrap: impl FnOnce(String) -> DomainError) -> DomainError {
    if err.is_write_failure() {
        err
    } else {
        wrap(err.to_string())
    }
}

impl<S: RecordStore + ?Sized> std::fmt::Debug for AgentListView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentListView")
            .field("records", &self.engine.len())
            .field("visible", &self.projection.len())
            .field("criteria", &self.criteria)
            .field("attached", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}
