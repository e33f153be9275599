//! Fan-out of raw notifications to live subscriptions.
//!
//! Every subscription gets its own bounded broadcast channel, so releasing
//! one (by id or by dropping the handle) closes exactly that receiver.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::broadcast;

use crate::domain::models::RawNotification;
use crate::domain::ports::{Subscription, SubscriptionId};

/// Default per-subscription buffer.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// Publisher side of a record store's change feed.
#[derive(Debug)]
pub struct ChangeFeed {
    capacity: usize,
    subscribers: Mutex<HashMap<SubscriptionId, broadcast::Sender<RawNotification>>>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(HashMap::new()),
        })
    }

    fn subscribers(&self) -> MutexGuard<'_, HashMap<SubscriptionId, broadcast::Sender<RawNotification>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new subscription. Only notifications published afterwards are
    /// delivered to it.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = SubscriptionId::new();
        let (sender, receiver) = broadcast::channel(self.capacity);
        self.subscribers().insert(id, sender);

        let feed: Weak<Self> = Arc::downgrade(self);
        Subscription::new(id, receiver, move |id| {
            if let Some(feed) = feed.upgrade() {
                feed.unsubscribe(id);
            }
        })
    }

    /// Stop delivering to `id`. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.subscribers().remove(&id).is_some() {
            tracing::debug!(subscription = %id, "change feed subscription removed");
        }
    }

    /// Deliver `notification` to every live subscription.
    pub fn publish(&self, notification: RawNotification) {
        let subscribers = self.subscribers();
        tracing::trace!(
            event_type = %notification.event_type,
            subscribers = subscribers.len(),
            "publishing change notification"
        );
        for sender in subscribers.values() {
            // A subscriber without a live receiver is cleaned up on release.
            let _ = sender.send(notification.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// Close every subscription.
    pub fn close(&self) {
        self.subscribers().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FeedItem;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let feed = ChangeFeed::new(8);
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        feed.publish(RawNotification::delete(json!({ "id": "a" })));

        assert!(matches!(first.recv().await, FeedItem::Notification(_)));
        assert!(matches!(second.recv().await, FeedItem::Notification(_)));
    }

    #[tokio::test]
    async fn test_unsubscribe_by_id_closes_that_receiver_only() {
        let feed = ChangeFeed::new(8);
        let mut gone = feed.subscribe();
        let mut kept = feed.subscribe();

        feed.unsubscribe(gone.id());
        feed.publish(RawNotification::delete(json!({ "id": "a" })));

        assert_eq!(gone.recv().await, FeedItem::Closed);
        assert!(matches!(kept.recv().await, FeedItem::Notification(_)));
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn test_dropping_handle_unsubscribes() {
        let feed = ChangeFeed::new(8);
        let subscription = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let feed = ChangeFeed::new(8);
        let _subscription = feed.subscribe();
        feed.unsubscribe(SubscriptionId::new());
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_close_ends_every_subscription() {
        let feed = ChangeFeed::new(8);
        let mut subscription = feed.subscribe();

        feed.close();

        assert_eq!(subscription.recv().await, FeedItem::Closed);
    }
}
