//! Lifecycle events emitted to the Streaming Manager.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Well-known event `type` strings (§6). The field itself is a plain
/// string — workers and the phase kernel mint their own types (e.g.
/// `"plan-created"`, `"step-completed"`) alongside these.
pub mod event_type {
    pub const START: &str = "start";
    pub const NODE_START: &str = "node_start";
    pub const NODE_FINISH: &str = "node_finish";
    pub const TOKEN: &str = "token";
    pub const ERROR: &str = "error";
    pub const FINISH: &str = "finish";
    pub const PLAN_CREATED: &str = "plan-created";
    pub const STEP_COMPLETED: &str = "step-completed";
}

/// An append-only lifecycle event (§3, §6).
///
/// The timestamp is set by the emitting component at emission time, never
/// by a subscriber, and must be a strict ISO-8601 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: String,
    pub thread_id: String,
    pub data: Value,
}

impl Event {
    pub fn new(event_type: impl Into<String>, thread_id: impl Into<String>, data: Value, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            thread_id: thread_id.into(),
            data,
        }
    }
}

/// The sink every meaningful component transition emits through (§2 "Data
/// flow": "every meaningful transition emits an event through the
/// Streaming Manager"). Defined here, in the kernel, so the Planner,
/// Worker Runner and Memory Coordinator can depend on the interface
/// without the `wfk-runtime` crate pulling in `wfk-streaming`'s buffering
/// and transformer-chain implementation directly — the same seam pattern
/// as [`crate::session::SessionStore`] and [`crate::approval::ApprovalGate`].
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: Event);
}

/// A sink that discards every event, used where no Streaming Manager has
/// been wired up (e.g. in tests that don't assert on the event stream).
pub struct NullEventEmitter;

#[async_trait]
impl EventEmitter for NullEventEmitter {
    async fn emit(&self, _event: Event) {}
}

/// Shared handle to an [`EventEmitter`], as stored by components that emit
/// lifecycle events.
pub type EventEmitterHandle = Arc<dyn EventEmitter>;
