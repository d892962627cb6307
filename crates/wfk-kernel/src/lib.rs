//! Core data model, traits and error types for the workflow kernel.
//!
//! This crate defines *what* a goal, plan, worker, tool invocation, event,
//! evidence record and PRP state are, plus the trait seams other crates
//! implement against (`WorkerRegistry`, `SessionStore`, `RagStore`,
//! `ToolRouter`, `McpTransportClient`, `ApprovalGate`). It contains no
//! concrete runtime behaviour — that lives in `wfk-runtime`, `wfk-bridge`,
//! `wfk-phase` and `wfk-streaming`.

pub mod approval;
pub mod error;
pub mod evidence;
pub mod event;
pub mod goal;
pub mod plan;
pub mod prp;
pub mod registry;
pub mod session;
pub mod tool;
pub mod worker;

pub use approval::{ApprovalDecision, ApprovalGate, ApprovalRequest};
pub use error::{AggregateCauses, ClientCause, KernelError, KernelResult, TransportError};
pub use evidence::{Evidence, EvidenceKind};
pub use event::{Event, EventEmitter, EventEmitterHandle, NullEventEmitter};
pub use goal::{Goal, Strategy};
pub use plan::{AlternativePath, Plan, ReasoningTrace, StepRecord, StepStatus, Thought};
pub use prp::{Decision, DecisionKind, HistoryEntry, PRPState, PRPStateSnapshot, Phase, Verdict};
pub use registry::WorkerRegistry;
pub use session::{Document, RagStore, SessionState, SessionStore};
pub use tool::{
    estimate_tokens, McpTransportClient, ResultMetadata, ToolHandler, ToolInvocationRequest,
    ToolInvocationResult, ToolKind, ToolRouter, ToolRouterHandle,
};
pub use worker::{WorkerContext, WorkerDefinition, WorkerHandler, WorkerInput};

/// Current wall-clock time, in milliseconds since the Unix epoch.
///
/// Centralised here so every component stamps timestamps the same way; the
/// deterministic Phase Kernel mode (§4.5) substitutes a monotonic counter
/// instead of calling this.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current wall-clock time as a `chrono::DateTime<Utc>`, for ISO-8601
/// event timestamps (§3, §6).
pub fn now_utc() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
