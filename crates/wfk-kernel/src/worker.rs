//! Worker definitions and the handler trait workers implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::KernelResult;
use crate::goal::Goal;
use crate::session::{Document, SessionState};
use crate::tool::ToolRouterHandle;

/// The `{capability, input}` pair a worker is invoked with (§4.5 step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerInput {
    pub capability: String,
    pub input: Value,
}

/// Everything a worker's handler may read while executing a step: the tool
/// router (to invoke tools), the goal, the current session state, and the
/// documents retrieved for this run.
pub struct WorkerContext {
    pub tools: ToolRouterHandle,
    pub goal: Goal,
    pub memory: SessionState,
    pub context_documents: Vec<Document>,
}

/// A worker's executable behaviour.
///
/// Implementations are registered once under a [`WorkerDefinition`] and
/// invoked by the Worker Runner for every step bound to them.
#[async_trait]
pub trait WorkerHandler: Send + Sync {
    async fn handle(&self, input: WorkerInput, ctx: &WorkerContext) -> KernelResult<Value>;
}

/// A worker, as registered in the [`crate::worker::WorkerRegistry`] trait's
/// implementation (concrete registry lives in `wfk-runtime`).
///
/// `name` must be globally unique within a registry; `capabilities` must be
/// non-empty (§3).
#[derive(Clone)]
pub struct WorkerDefinition {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub handler: Arc<dyn WorkerHandler>,
}

impl WorkerDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capabilities: Vec<String>,
        handler: Arc<dyn WorkerHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capabilities,
            handler,
        }
    }
}

impl std::fmt::Debug for WorkerDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
