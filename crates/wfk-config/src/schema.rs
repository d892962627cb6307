//! Typed configuration shapes recognised by the kernel (§6).
//!
//! These are pure data: resolving a `handler-binding` or `gate` string to an
//! actual `Arc<dyn WorkerHandler>` / `Arc<dyn ApprovalGate>` is the embedding
//! application's job (it owns the binding registry), not this crate's.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One worker entry (§6 "Workers").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub capabilities: Vec<String>,
    /// Identifier the embedding application resolves to a `WorkerHandler`.
    pub handler: String,
}

/// `{session, rag?}` adapter bindings (§6 "Memory").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub session: String,
    #[serde(default)]
    pub rag: Option<String>,
}

/// Approval gate configuration (§6 "Approvals", optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalConfig {
    #[serde(default)]
    pub require: bool,
    #[serde(default)]
    pub gate: Option<String>,
}

/// One stdio-transport MCP server entry (§6 "MCP").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdioMcpConfig {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

/// One streaming-HTTP MCP endpoint entry (§6 "MCP"). `url` must be `https`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpMcpConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub stdio: Vec<StdioMcpConfig>,
    #[serde(default, rename = "streamableHttp")]
    pub streamable_http: Vec<HttpMcpConfig>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retries() -> u32 {
    3
}

/// Transport Bridge `options` (§6 "Bridge options").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeOptions {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default)]
    pub logging: bool,
    /// Per-invocation token ceiling enforced by the Tool Router (§2 "enforce
    /// token budget"). `None` leaves the router unbounded.
    #[serde(default)]
    pub token_budget: Option<u64>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            logging: false,
            token_budget: None,
        }
    }
}

/// The full recognised configuration surface (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    pub workers: Vec<WorkerConfig>,
    pub memory: Option<MemoryConfig>,
    #[serde(default)]
    pub approvals: ApprovalConfig,
    #[serde(default)]
    pub mcp: McpConfig,
    /// Local tool name -> handler binding identifier.
    #[serde(default)]
    pub tools: HashMap<String, String>,
    #[serde(default)]
    pub bridge: BridgeOptions,
}
