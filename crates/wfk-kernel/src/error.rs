//! Kernel-wide error type.
//!
//! Every component in the workflow kernel reports failures through
//! [`KernelError`]. Variants are matchable (not bag-of-strings) so callers
//! such as the worker runner can decide per-kind whether a failure is fatal
//! for the run or should be surfaced to a handler for retry.

use thiserror::Error;

/// Result alias used throughout the kernel crates.
pub type KernelResult<T> = Result<T, KernelError>;

/// Stable, matchable error kinds for the workflow kernel.
///
/// Per §7: each kind carries the data a caller needs to react (capability
/// name, per-client causes, ...) rather than a single opaque message.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Startup-time configuration was invalid. Fatal.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A worker name was registered twice.
    #[error("worker already registered: {0}")]
    DuplicateWorker(String),

    /// A goal named a capability with no worker bound to it.
    #[error("capability unassigned: {0}")]
    CapabilityUnassigned(String),

    /// A plan step named a capability no longer resolvable in the registry.
    #[error("no worker for capability: {0}")]
    NoWorkerForCapability(String),

    /// The approval gate denied a sensitive capability.
    #[error("approval denied for capability: {0}")]
    ApprovalDenied(String),

    /// The MCP hub has no configured clients at all.
    #[error("no MCP clients configured")]
    NoMcpClients,

    /// Every MCP client failed; causes are kept in configuration order.
    #[error("all {0} MCP clients failed: {1}")]
    AllMcpClientsFailed(usize, AggregateCauses),

    /// A transport-level failure (stdio exit code, HTTP status, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The transport bridge was already started.
    #[error("bridge already running")]
    AlreadyRunning,

    /// A session-state write was rejected by write policy.
    #[error("policy denied session write: {0}")]
    PolicyDenied(String),

    /// A validator produced an error verdict; evidence is still captured.
    #[error("validator failure: {0}")]
    ValidatorFailure(String),

    /// A payload did not match an expected size/shape.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// A tool invocation exceeded its token budget.
    #[error("token budget exceeded: used {used}, budget {budget}")]
    TokenBudgetExceeded { used: u64, budget: u64 },

    /// A deadline elapsed before the operation completed.
    #[error("operation timed out after {0}ms")]
    TimeoutExceeded(u64),

    /// Catch-all for adapter/IO failures that don't need a dedicated variant.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KernelError {
    /// Whether the core may retry the operation that produced this error.
    ///
    /// Per §4.3/§7, tool and transport errors are surfaced to the caller
    /// rather than retried inside the core — only the bridge's connect path
    /// retries. This predicate exists for that one call site.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            KernelError::Transport(_) | KernelError::TimeoutExceeded(_)
        )
    }
}

/// A single transport-layer failure, as produced by one stdio or HTTP client.
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("child process exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("http status {0}")]
    HttpStatus(u16),

    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A named cause collected while trying every MCP client in order.
#[derive(Debug, Clone)]
pub struct ClientCause {
    pub client: String,
    pub error: String,
}

/// Causes from every client the MCP hub tried, kept in configuration order,
/// displayed as a single aggregate message (§4.3 "aggregate error").
#[derive(Debug, Clone, Default)]
pub struct AggregateCauses(pub Vec<ClientCause>);

impl std::fmt::Display for AggregateCauses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|c| format!("{}: {}", c.client, c.error))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}
