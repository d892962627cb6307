//! Tool invocation request/result shapes, the router trait workers see, and
//! the MCP transport-client trait the hub dispatches to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::KernelResult;

/// The kind of work a tool invocation performs (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Search,
    Codemod,
    Validation,
    Analysis,
}

/// A request to invoke a tool, either local or via the MCP hub (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub tool: String,
    pub input: Value,
    pub kind: ToolKind,
    #[serde(default)]
    pub context: Option<Value>,
}

/// Metadata attached to every [`ToolInvocationResult`], identifying which
/// transport and which named client served the request (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub transport: String,
    pub client: String,
}

/// The outcome of a tool invocation (§3). `tokens_used` is always >= 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub tool: String,
    pub result: Value,
    pub tokens_used: u64,
    pub metadata: ResultMetadata,
}

/// Estimate token usage as `ceil(len(json(payload))/4)`, clamped to >= 1.
///
/// Used whenever a transport does not report `tokensUsed` itself (§3, §9
/// "Open questions": this is a heuristic inherited from the source system).
pub fn estimate_tokens(payload: &Value) -> u64 {
    let len = serde_json::to_string(payload).map(|s| s.len()).unwrap_or(0);
    (len.div_ceil(4)).max(1) as u64
}

/// A locally registered tool handler (Tool Router step 1, §4.3).
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, request: &ToolInvocationRequest) -> KernelResult<Value>;
}

/// The interface workers invoke tools through. Concrete implementation
/// (local-handler-first, MCP-hub-fallback) lives in `wfk-bridge`.
#[async_trait]
pub trait ToolRouter: Send + Sync {
    async fn invoke(&self, request: ToolInvocationRequest) -> KernelResult<ToolInvocationResult>;
}

/// Shared handle to a [`ToolRouter`], as stored on [`crate::worker::WorkerContext`].
pub type ToolRouterHandle = Arc<dyn ToolRouter>;

/// A single transport-backed MCP client (stdio child or streaming-HTTP
/// endpoint). The hub tries each in configuration order (§4.3).
#[async_trait]
pub trait McpTransportClient: Send + Sync {
    /// The configured name, used in `metadata.client` and in aggregate
    /// failure messages.
    fn name(&self) -> &str;

    /// The transport kind string reported in `metadata.transport`
    /// (`"stdio"` or `"streamable-http"`).
    fn transport(&self) -> &'static str;

    async fn invoke(&self, request: &ToolInvocationRequest) -> KernelResult<ToolInvocationResult>;
}
