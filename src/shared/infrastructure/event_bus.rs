use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 256;

/// A published event with its delivery metadata
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope<E> {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payload: E,
}

/// In-process broadcast channel that front-ends subscribe to
///
/// Cloning the bus shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus<E: Clone> {
    sender: broadcast::Sender<EventEnvelope<E>>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<E>> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns false when nobody is listening.
    pub fn publish(&self, payload: E) -> bool {
        let envelope = EventEnvelope {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            payload,
        };

        self.sender.send(envelope).is_ok()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
