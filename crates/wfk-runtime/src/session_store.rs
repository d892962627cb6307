//! A simple in-memory [`SessionStore`], useful for tests and as the
//! reference implementation; production embeddings plug in their own
//! (Redis, Postgres, ...) behind the same trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use wfk_kernel::error::KernelResult;
use wfk_kernel::session::{SessionState, SessionStore};

/// One append-only event-log entry, as described in §6 "per-session event
/// log with entries `{type, payload, timestamp}`".
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoggedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: serde_json::Value,
    pub timestamp: i64,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, SessionState>,
    events: HashMap<String, Vec<LoggedEvent>>,
}

/// Single-writer-per-session in-memory store (§5): a single mutex is
/// sufficient here because sessions are addressed by key and contention is
/// expected to be low; a production store would shard by `session_id`.
pub struct InMemorySessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner::default())) }
    }

    /// Test/debug helper: the full event log for a session.
    pub async fn events(&self, session_id: &str) -> Vec<LoggedEvent> {
        self.inner
            .lock()
            .await
            .events
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> KernelResult<Option<SessionState>> {
        Ok(self.inner.lock().await.sessions.get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, state: SessionState) -> KernelResult<()> {
        self.inner
            .lock()
            .await
            .sessions
            .insert(session_id.to_string(), state);
        Ok(())
    }

    async fn append_event(
        &self,
        session_id: &str,
        event_type: &str,
        payload: serde_json::Value,
    ) -> KernelResult<()> {
        self.inner
            .lock()
            .await
            .events
            .entry(session_id.to_string())
            .or_default()
            .push(LoggedEvent {
                event_type: event_type.to_string(),
                payload,
                timestamp: wfk_kernel::now_ms(),
            });
        Ok(())
    }
}
