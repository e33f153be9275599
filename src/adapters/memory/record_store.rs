//! Process-local record store.
//!
//! Behaves like the hosted backend: it assigns ids and timestamps, returns
//! rows newest-created first, and emits a raw notification for every
//! committed write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::adapters::change_feed::{ChangeFeed, DEFAULT_FEED_CAPACITY};
use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentId, AgentPatch, AgentRecord, NewAgent, RawNotification};
use crate::domain::ports::{RecordStore, Subscription, SubscriptionId};

#[derive(Debug)]
pub struct InMemoryRecordStore {
    /// Newest-created first.
    records: RwLock<Vec<AgentRecord>>,
    feed: Arc<ChangeFeed>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Store whose subscriptions buffer at most `capacity` notifications.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            feed: ChangeFeed::new(capacity),
        }
    }

    /// Pre-populate without emitting notifications.
    pub fn with_records(records: impl IntoIterator<Item = AgentRecord>) -> Self {
        let mut records: Vec<AgentRecord> = records.into_iter().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            records: RwLock::new(records),
            feed: ChangeFeed::new(DEFAULT_FEED_CAPACITY),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    /// Emit a notification as if the backend had produced it.
    ///
    /// Lets tests and replays feed arbitrary (even malformed) payloads.
    pub fn inject(&self, notification: RawNotification) {
        self.feed.publish(notification);
    }

    /// Close every live subscription.
    pub fn close_feed(&self) {
        self.feed.close();
    }

    fn to_row(record: &AgentRecord) -> DomainResult<Value> {
        Ok(serde_json::to_value(record)?)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `now`, nudged forward so it is strictly after `previous`.
fn later_than(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_all(&self) -> DomainResult<Vec<AgentRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn fetch_by_id(&self, id: &AgentId) -> DomainResult<Option<AgentRecord>> {
        Ok(self.records.read().await.iter().find(|r| &r.id == id).cloned())
    }

    async fn create(&self, fields: &NewAgent) -> DomainResult<AgentRecord> {
        fields.validate()?;

        let mut records = self.records.write().await;
        let created_at = records
            .first()
            .map_or_else(Utc::now, |newest| later_than(newest.created_at));
        let record = AgentRecord {
            id: AgentId::new(Uuid::new_v4().to_string()),
            name: fields.name.clone(),
            description: fields.description.clone(),
            context: fields.context.clone(),
            instructions: fields.instructions.clone(),
            knowledge: fields.knowledge.clone(),
            category: fields.category,
            status: fields.status,
            tags: fields.tags.clone(),
            icon: fields.icon.clone(),
            color: fields.color.clone(),
            created_at,
            updated_at: created_at,
        };
        let row = Self::to_row(&record)?;
        records.insert(0, record.clone());

        // Published under the write lock so feed order matches commit order
        self.feed.publish(RawNotification::insert(row));
        drop(records);

        tracing::debug!(id = %record.id, name = %record.name, "agent created");
        Ok(record)
    }

    async fn update(&self, id: &AgentId, patch: &AgentPatch) -> DomainResult<Option<AgentRecord>> {
        patch.validate()?;

        let mut records = self.records.write().await;
        let Some(existing) = records.iter_mut().find(|r| &r.id == id) else {
            return Ok(None);
        };
        patch.apply_to(existing);
        existing.updated_at = later_than(existing.updated_at);
        let record = existing.clone();
        let row = Self::to_row(&record)?;
        self.feed
            .publish(RawNotification::update(row, json!({ "id": id.as_str() })));
        drop(records);

        tracing::debug!(%id, "agent updated");
        Ok(Some(record))
    }

    async fn delete(&self, id: &AgentId) -> DomainResult<bool> {
        let mut records = self.records.write().await;
        let Some(index) = records.iter().position(|r| &r.id == id) else {
            return Ok(false);
        };
        records.remove(index);
        self.feed
            .publish(RawNotification::delete(json!({ "id": id.as_str() })));
        drop(records);

        tracing::debug!(%id, "agent deleted");
        Ok(true)
    }

    fn subscribe(&self) -> DomainResult<Subscription> {
        Ok(self.feed.subscribe())
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.feed.unsubscribe(id);
    }
}

impl From<Vec<AgentRecord>> for InMemoryRecordStore {
    fn from(records: Vec<AgentRecord>) -> Self {
        Self::with_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AgentStatus;
    use crate::domain::ports::FeedItem;

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = InMemoryRecordStore::new();
        let record = store.create(&NewAgent::new("Alpha")).await.unwrap();

        assert!(!record.id.as_str().is_empty());
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(
            store.fetch_by_id(&record.id).await.unwrap(),
            Some(record.clone())
        );
    }

    #[tokio::test]
    async fn test_fetch_all_is_newest_created_first() {
        let store = InMemoryRecordStore::new();
        store.create(&NewAgent::new("first")).await.unwrap();
        store.create(&NewAgent::new("second")).await.unwrap();

        let names: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_and_notifies() {
        let store = InMemoryRecordStore::new();
        let created = store.create(&NewAgent::new("Alpha")).await.unwrap();
        let mut subscription = store.subscribe().unwrap();

        let patch = AgentPatch {
            status: Some(Some(AgentStatus::Active)),
            ..Default::default()
        };
        let updated = store.update(&created.id, &patch).await.unwrap().unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.status, Some(AgentStatus::Active));
        match subscription.recv().await {
            FeedItem::Notification(n) => {
                assert_eq!(n.event_type, "UPDATE");
                assert_eq!(n.new.unwrap()["status"], "active");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_notify_in_commit_order() {
        let store = Arc::new(InMemoryRecordStore::new());
        let created = store.create(&NewAgent::new("v0")).await.unwrap();
        let mut subscription = store.subscribe().unwrap();

        let handles: Vec<_> = (1..=50)
            .map(|n| {
                let store = Arc::clone(&store);
                let id = created.id.clone();
                tokio::spawn(async move {
                    let patch = AgentPatch {
                        name: Some(format!("v{n}")),
                        ..Default::default()
                    };
                    store.update(&id, &patch).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let mut stamps = Vec::new();
        let mut last_name = None;
        while let Some(item) = subscription.try_recv() {
            let n = match item {
                FeedItem::Notification(n) => n,
                other => panic!("unexpected {other:?}"),
            };
            let row: AgentRecord = serde_json::from_value(n.new.unwrap()).unwrap();
            stamps.push(row.updated_at);
            last_name = Some(row.name);
        }

        assert_eq!(stamps.len(), 50);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        let stored = store.fetch_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(last_name, Some(stored.name));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = InMemoryRecordStore::new();
        let id = AgentId::from("nope");

        assert_eq!(store.update(&id, &AgentPatch::default()).await.unwrap(), None);
        assert!(!store.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_notifies_with_old_id() {
        let store = InMemoryRecordStore::new();
        let created = store.create(&NewAgent::new("Alpha")).await.unwrap();
        let mut subscription = store.subscribe().unwrap();

        assert!(store.delete(&created.id).await.unwrap());

        match subscription.recv().await {
            FeedItem::Notification(n) => {
                assert_eq!(n.event_type, "DELETE");
                assert_eq!(n.old.unwrap()["id"], created.id.as_str());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_with_records_is_silent() {
        let seeded = InMemoryRecordStore::new();
        let record = seeded.create(&NewAgent::new("Alpha")).await.unwrap();

        let store = InMemoryRecordStore::with_records(vec![record]);
        let mut subscription = store.subscribe().unwrap();

        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_by_id() {
        let store = InMemoryRecordStore::new();
        let mut subscription = store.subscribe().unwrap();
        assert_eq!(store.subscriber_count(), 1);

        store.unsubscribe(subscription.id());

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(subscription.recv().await, FeedItem::Closed);
    }
}
