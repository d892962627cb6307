//! Streaming Manager (§4.7): runs every emitted event through the
//! transformer chain, then either publishes it immediately or buffers it
//! for a batched flush.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use wfk_kernel::event::{Event, EventEmitter};

use crate::subscriber::Subscriber;
use crate::transformer::Transformer;

struct Inner {
    transformers: Vec<Arc<dyn Transformer>>,
    buffer: Vec<Event>,
    /// Bumped every time the buffer is flushed (by size or by timer), so a
    /// stale timer can recognise its cycle already flushed and no-op.
    generation: u64,
}

struct Core {
    inner: Mutex<Inner>,
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,
    buffer_size: usize,
    flush_interval: Duration,
}

/// Cheaply cloneable handle to one streaming pipeline.
#[derive(Clone)]
pub struct StreamingManager {
    core: Arc<Core>,
}

impl StreamingManager {
    /// `buffer_size <= 1` disables buffering: every event is published the
    /// moment it clears the transformer chain.
    pub fn new(buffer_size: usize, flush_interval: Duration) -> Self {
        Self {
            core: Arc::new(Core {
                inner: Mutex::new(Inner { transformers: Vec::new(), buffer: Vec::new(), generation: 0 }),
                subscribers: RwLock::new(Vec::new()),
                buffer_size: buffer_size.max(1),
                flush_interval,
            }),
        }
    }

    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.core.subscribers.write().await.push(subscriber);
    }

    /// Ordered by insertion (§4.7 "transformer set is ordered by insertion").
    pub async fn add_transformer(&self, transformer: Arc<dyn Transformer>) {
        self.core.inner.lock().await.transformers.push(transformer);
    }

    /// Removal is by name; a no-op if no transformer carries it.
    pub async fn remove_transformer(&self, name: &str) {
        self.core.inner.lock().await.transformers.retain(|t| t.name() != name);
    }

    /// Applies the transformer chain, then buffers or publishes the
    /// resulting event. Holding the buffer lock across the whole call
    /// serialises concurrent `emit`s, which is what gives same-thread
    /// events their emission-order delivery guarantee (§4.7, property 8).
    pub async fn emit(&self, event: Event) {
        let mut current = event;
        let mut inner = self.core.inner.lock().await;

        for transformer in inner.transformers.clone() {
            if !transformer.filter(&current) {
                return;
            }
            match transformer.transform(current.clone()).await {
                Ok(next) => current = next,
                Err(error) => {
                    tracing::warn!(transformer = transformer.name(), %error, "transformer failed, forwarding event unchanged");
                }
            }
        }

        if self.core.buffer_size <= 1 {
            drop(inner);
            self.publish(vec![current]).await;
            return;
        }

        inner.buffer.push(current);
        if inner.buffer.len() == 1 {
            self.schedule_flush(inner.generation);
        }
        if inner.buffer.len() >= self.core.buffer_size {
            let batch = std::mem::take(&mut inner.buffer);
            inner.generation = inner.generation.wrapping_add(1);
            drop(inner);
            self.publish(batch).await;
        }
    }

    /// Forces an immediate flush and clears any pending timer for this
    /// cycle (§4.7 "on flush, the timer is cleared").
    pub async fn flush(&self) {
        let mut inner = self.core.inner.lock().await;
        if inner.buffer.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut inner.buffer);
        inner.generation = inner.generation.wrapping_add(1);
        drop(inner);
        self.publish(batch).await;
    }

    fn schedule_flush(&self, generation: u64) {
        let core = Arc::clone(&self.core);
        let interval = self.core.flush_interval;
        let manager = StreamingManager { core: Arc::clone(&core) };
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let batch = {
                let mut inner = core.inner.lock().await;
                if inner.generation != generation || inner.buffer.is_empty() {
                    None
                } else {
                    let batch = std::mem::take(&mut inner.buffer);
                    inner.generation = inner.generation.wrapping_add(1);
                    Some(batch)
                }
            };
            if let Some(batch) = batch {
                manager.publish(batch).await;
            }
        });
    }

    async fn publish(&self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }
        let subscribers = self.core.subscribers.read().await;
        for subscriber in subscribers.iter() {
            subscriber.receive(&events).await;
        }
    }
}

/// Lets a [`StreamingManager`] stand in wherever `wfk-kernel`'s
/// [`EventEmitter`] seam is expected (Planner, Worker Runner, Memory
/// Coordinator), so those components emit through the transformer/buffer
/// pipeline without depending on this crate's concrete types.
#[async_trait]
impl EventEmitter for StreamingManager {
    async fn emit(&self, event: Event) {
        StreamingManager::emit(self, event).await
    }
}
