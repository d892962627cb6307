//! Session state and the retrieval-context documents attached to it.
//!
//! The Memory Coordinator (in `wfk-runtime`) is the sole writer of
//! [`SessionState`] (§3 "Ownership"); this module only defines the shape and
//! the storage traits a coordinator is built against.

use crate::error::KernelResult;
use crate::plan::StepRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single retrieved context document, as returned by the RAG adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Persisted state for one `sessionId` (§3).
///
/// Upsert semantics per capability: re-running a capability overwrites its
/// [`StepRecord`] and bumps `last_updated`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub steps: Vec<StepRecord>,
    #[serde(default)]
    pub facts: Vec<String>,
    /// Unix-epoch milliseconds of the last write.
    pub last_updated: i64,
    #[serde(default)]
    pub reasoning: Option<serde_json::Value>,
}

impl SessionState {
    /// A fresh, never-persisted state, as returned on first `loadState`.
    pub fn fresh(now_ms: i64) -> Self {
        Self {
            steps: Vec::new(),
            facts: Vec::new(),
            last_updated: now_ms,
            reasoning: None,
        }
    }

    /// Upsert a step record by capability: overwrite in place if present,
    /// otherwise append. Returns the index written.
    pub fn upsert_step(&mut self, record: StepRecord) -> usize {
        if let Some(idx) = self
            .steps
            .iter()
            .position(|s| s.capability == record.capability)
        {
            self.steps[idx] = record;
            idx
        } else {
            self.steps.push(record);
            self.steps.len() - 1
        }
    }
}

/// Session-state persistence backend.
///
/// Single-writer per `sessionId` (§5): implementations must serialize
/// writes for the same session while allowing concurrent reads.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> KernelResult<Option<SessionState>>;
    async fn save(&self, session_id: &str, state: SessionState) -> KernelResult<()>;
    async fn append_event(&self, session_id: &str, event_type: &str, payload: serde_json::Value) -> KernelResult<()>;
}

/// Retrieval-augmented-generation backend.
///
/// Optional (§4.2): a Memory Coordinator built without one simply returns
/// empty context, silently. When present, retrieval failures are logged as
/// a warning and degrade to empty context rather than aborting the run.
#[async_trait]
pub trait RagStore: Send + Sync {
    async fn retrieve(&self, query: &str, limit: usize) -> KernelResult<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StepStatus;

    fn step(capability: &str, status: StepStatus) -> StepRecord {
        StepRecord {
            capability: capability.to_string(),
            worker_name: "w".into(),
            status,
            input: serde_json::json!({}),
            output: None,
            error: None,
            completed_at: None,
        }
    }

    #[test]
    fn upsert_appends_new_capability() {
        let mut s = SessionState::fresh(0);
        let idx = s.upsert_step(step("draft", StepStatus::Pending));
        assert_eq!(idx, 0);
        assert_eq!(s.steps.len(), 1);
    }

    #[test]
    fn upsert_overwrites_existing_capability() {
        let mut s = SessionState::fresh(0);
        s.upsert_step(step("draft", StepStatus::Pending));
        let idx = s.upsert_step(step("draft", StepStatus::Completed));
        assert_eq!(idx, 0);
        assert_eq!(s.steps.len(), 1);
        assert_eq!(s.steps[0].status, StepStatus::Completed);
    }
}
