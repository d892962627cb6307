//! Subscribers receive batches of events — a batch of one for unbuffered
//! emission, or the whole flushed buffer otherwise.

use async_trait::async_trait;
use wfk_kernel::event::Event;

#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn receive(&self, events: &[Event]);
}

/// A subscriber that records everything it receives, in arrival order.
/// Primarily useful in tests that assert on the ordering contract.
pub struct RecordingSubscriber {
    received: tokio::sync::Mutex<Vec<Event>>,
}

impl Default for RecordingSubscriber {
    fn default() -> Self {
        Self { received: tokio::sync::Mutex::new(Vec::new()) }
    }
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn received(&self) -> Vec<Event> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn receive(&self, events: &[Event]) {
        self.received.lock().await.extend_from_slice(events);
    }
}
