//! Sample fan-out to connected WebSocket subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use moodwire_common::{MoodwireError, SentimentSample};

/// One serialized sample, shared across subscriber queues.
pub type Frame = Arc<String>;

/// Registry of connected subscribers.
///
/// Membership is unbounded; each subscriber gets a bounded send queue
/// drained by its own socket task, so a slow client drops frames instead
/// of blocking the producer. A closed queue means the subscriber is gone
/// and is pruned on the next broadcast.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<Uuid, mpsc::Sender<Frame>>>,
    queue_depth: usize,
}

impl SubscriberRegistry {
    pub fn new(queue_depth: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            queue_depth,
        }
    }

    /// Admit a new subscriber. Returns its id and the receiving end of its
    /// sample queue.
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<Frame>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.queue_depth);
        self.subscribers.write().await.insert(id, tx);
        (id, rx)
    }

    /// Remove a subscriber. Removing an id that is not registered is a no-op.
    pub async fn unregister(&self, id: Uuid) {
        self.subscribers.write().await.remove(&id);
    }

    /// Current membership size.
    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Serialize the sample once and attempt delivery to every subscriber.
    ///
    /// A closed channel is terminal for that subscriber only: it is
    /// unregistered here. A full queue drops this frame for that subscriber
    /// with a warning. Other subscribers are never affected either way.
    pub async fn broadcast(&self, sample: &SentimentSample) {
        let frame: Frame = match serde_json::to_string(sample) {
            Ok(json) => Arc::new(json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize sample");
                return;
            }
        };

        let mut closed = Vec::new();
        {
            let subs = self.subscribers.read().await;
            for (id, tx) in subs.iter() {
                match tx.try_send(Arc::clone(&frame)) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(subscriber = %id, "Send queue full, dropping sample");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        closed.push(*id);
                    }
                }
            }
            debug!(
                recipients = subs.len() - closed.len(),
                "Broadcast sample"
            );
        }

        for id in closed {
            let err = MoodwireError::Delivery("subscriber channel closed".to_string());
            warn!(subscriber = %id, error = %err, "Unregistering subscriber");
            self.unregister(id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(score: f64) -> SentimentSample {
        SentimentSample::now(score)
    }

    #[tokio::test]
    async fn register_then_unregister_restores_membership() {
        let registry = SubscriberRegistry::new(8);
        assert_eq!(registry.count().await, 0);

        let (id, _rx) = registry.register().await;
        assert_eq!(registry.count().await, 1);

        registry.unregister(id).await;
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn unregister_absent_subscriber_is_noop() {
        let registry = SubscriberRegistry::new(8);
        let (id, _rx) = registry.register().await;

        registry.unregister(Uuid::new_v4()).await;
        assert_eq!(registry.count().await, 1);

        // Double unregister of a real id is also a no-op.
        registry.unregister(id).await;
        registry.unregister(id).await;
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let registry = SubscriberRegistry::new(8);
        let (_a, mut rx_a) = registry.register().await;
        let (_b, mut rx_b) = registry.register().await;

        registry.broadcast(&sample(0.55)).await;

        let frame_a = rx_a.try_recv().unwrap();
        let frame_b = rx_b.try_recv().unwrap();
        // Serialized once, shared by reference
        assert!(Arc::ptr_eq(&frame_a, &frame_b));

        let parsed: serde_json::Value = serde_json::from_str(&frame_a).unwrap();
        assert!((parsed["sentiment"].as_f64().unwrap() - 0.55).abs() < 1e-12);
        assert!(parsed["time"].is_string());
    }

    #[tokio::test]
    async fn broadcast_to_empty_registry_is_noop() {
        let registry = SubscriberRegistry::new(8);
        registry.broadcast(&sample(0.5)).await;
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn closed_subscriber_pruned_others_unaffected() {
        let registry = SubscriberRegistry::new(8);
        let (_gone, rx_gone) = registry.register().await;
        let (_live, mut rx_live) = registry.register().await;

        drop(rx_gone);
        registry.broadcast(&sample(0.4)).await;

        assert_eq!(registry.count().await, 1);
        assert!(rx_live.try_recv().is_ok());

        // The survivor keeps receiving on later broadcasts.
        registry.broadcast(&sample(0.6)).await;
        assert!(rx_live.try_recv().is_ok());
    }

    #[tokio::test]
    async fn full_queue_drops_frame_without_unregistering() {
        let registry = SubscriberRegistry::new(1);
        let (_id, mut rx) = registry.register().await;

        registry.broadcast(&sample(0.1)).await;
        registry.broadcast(&sample(0.2)).await; // queue full, dropped

        assert_eq!(registry.count().await, 1);
        let first: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert!((first["sentiment"].as_f64().unwrap() - 0.1).abs() < 1e-12);
        assert!(rx.try_recv().is_err());
    }
}
