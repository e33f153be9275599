//! Scoped change-feed subscription handle.

use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::models::RawNotification;

/// Identifier of one live change-feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a subscription yielded when polled.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    /// Next notification in delivery order.
    Notification(RawNotification),
    /// The subscriber fell behind and this many notifications were lost.
    Lagged(u64),
    /// The store closed the feed; no further notifications will arrive.
    Closed,
}

type ReleaseHook = Box<dyn FnOnce(SubscriptionId) + Send + Sync>;

/// Live subscription to a record store's change feed.
///
/// Dropping the handle releases the subscription, so a view that owns one
/// stops receiving changes as soon as the view itself goes away.
pub struct Subscription {
    id: SubscriptionId,
    receiver: broadcast::Receiver<RawNotification>,
    release: Option<ReleaseHook>,
}

impl Subscription {
    /// Build a handle; `release` runs exactly once, on [`Self::release`] or drop.
    pub fn new(
        id: SubscriptionId,
        receiver: broadcast::Receiver<RawNotification>,
        release: impl FnOnce(SubscriptionId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next feed item.
    pub async fn recv(&mut self) -> FeedItem {
        match self.receiver.recv().await {
            Ok(notification) => FeedItem::Notification(notification),
            Err(broadcast::error::RecvError::Lagged(missed)) => FeedItem::Lagged(missed),
            Err(broadcast::error::RecvError::Closed) => FeedItem::Closed,
        }
    }

    /// Take an already-delivered item without waiting.
    ///
    /// Returns `None` when nothing is pending.
    pub fn try_recv(&mut self) -> Option<FeedItem> {
        match self.receiver.try_recv() {
            Ok(notification) => Some(FeedItem::Notification(notification)),
            Err(broadcast::error::TryRecvError::Lagged(missed)) => Some(FeedItem::Lagged(missed)),
            Err(broadcast::error::TryRecvError::Closed) => Some(FeedItem::Closed),
            Err(broadcast::error::TryRecvError::Empty) => None,
        }
    }

    /// Release the subscription now instead of at drop.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(subscription = %self.id, "releasing change feed subscription");
            release(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_subscription(
        sender: &broadcast::Sender<RawNotification>,
        releases: &Arc<AtomicUsize>,
    ) -> Subscription {
        let releases = Arc::clone(releases);
        Subscription::new(SubscriptionId::new(), sender.subscribe(), move |_| {
            releases.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_drop_releases_once() {
        let (sender, _) = broadcast::channel(8);
        let releases = Arc::new(AtomicUsize::new(0));

        let subscription = counting_subscription(&sender, &releases);
        drop(subscription);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_release_does_not_double_release() {
        let (sender, _) = broadcast::channel(8);
        let releases = Arc::new(AtomicUsize::new(0));

        let subscription = counting_subscription(&sender, &releases);
        subscription.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recv_in_delivery_order() {
        let (sender, _) = broadcast::channel(8);
        let releases = Arc::new(AtomicUsize::new(0));
        let mut subscription = counting_subscription(&sender, &releases);

        sender.send(RawNotification::insert(json!({ "id": "1" }))).unwrap();
        sender.send(RawNotification::delete(json!({ "id": "1" }))).unwrap();

        match subscription.recv().await {
            FeedItem::Notification(n) => assert_eq!(n.event_type, "INSERT"),
            other => panic!("unexpected {other:?}"),
        }
        match subscription.try_recv() {
            Some(FeedItem::Notification(n)) => assert_eq!(n.event_type, "DELETE"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lag_is_reported() {
        let (sender, _) = broadcast::channel(2);
        let releases = Arc::new(AtomicUsize::new(0));
        let mut subscription = counting_subscription(&sender, &releases);

        for i in 0..5 {
            sender
                .send(RawNotification::insert(json!({ "id": i.to_string() })))
                .unwrap();
        }

        assert_eq!(subscription.recv().await, FeedItem::Lagged(3));
    }

    #[tokio::test]
    async fn test_closed_feed() {
        let (sender, _) = broadcast::channel(2);
        let releases = Arc::new(AtomicUsize::new(0));
        let mut subscription = counting_subscription(&sender, &releases);

        drop(sender);
        assert_eq!(subscription.recv().await, FeedItem::Closed);
    }
}
