//! Transport Bridge (§4.4): exposes one transport (the *target*) while
//! proxying requests to another (the *source*), e.g. fronting an
//! HTTP-streaming client with a stdio-facing server.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use wfk_kernel::error::{KernelError, KernelResult};
use wfk_kernel::tool::{McpTransportClient, ToolInvocationRequest, ToolKind};

use crate::retry::{retry_with_timeout, RetryConfig};

/// Transport kind on either side of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Http,
}

impl TransportKind {
    fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
        }
    }
}

/// The fixed proxy method set the bridge registers on the target surface
/// (§4.4 step 3).
pub const PROXIED_METHODS: &[&str] =
    &["tools/list", "tools/call", "resources/list", "resources/read", "prompts/list", "prompts/get"];

/// The capabilities the target server advertises (§4.4 step 2).
pub const ADVERTISED_CAPABILITIES: &[&str] = &["tools", "resources", "prompts", "logging"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HealthState {
    running: bool,
    client_connected: bool,
}

/// Source/target endpoints for one bridge instance, plus the retry/timeout
/// budget applied to both connect operations.
pub struct TransportBridge {
    source_kind: TransportKind,
    target_kind: TransportKind,
    source_url_scheme_https: bool,
    retry: RetryConfig,
    source_client: Arc<dyn McpTransportClient>,
    state: RwLock<HealthState>,
}

impl TransportBridge {
    /// `source_is_https` only matters when `source_kind == Http`; per §4.4
    /// step 1, plaintext HTTP sources are rejected at config time.
    pub fn new(
        source_kind: TransportKind,
        target_kind: TransportKind,
        source_is_https: bool,
        retries: u32,
        timeout_ms: u64,
        source_client: Arc<dyn McpTransportClient>,
    ) -> KernelResult<Self> {
        if source_kind == target_kind {
            return Err(KernelError::ConfigInvalid("source and target transport must differ".into()));
        }
        if source_kind == TransportKind::Http && !source_is_https {
            return Err(KernelError::ConfigInvalid("http source must use https".into()));
        }
        Ok(Self {
            source_kind,
            target_kind,
            source_url_scheme_https: source_is_https,
            retry: RetryConfig::from_bridge_options(retries, timeout_ms),
            source_client,
            state: RwLock::new(HealthState { running: false, client_connected: false }),
        })
    }

    /// Connects to the source and starts the target server. Not idempotent:
    /// a second call fails with `AlreadyRunning` (§4.4 lifecycle).
    pub async fn start(&self) -> KernelResult<()> {
        {
            let state = self.state.read().await;
            if state.running {
                return Err(KernelError::AlreadyRunning);
            }
        }

        let connect_result = retry_with_timeout(&self.retry, || async {
            // A real source client is already constructed; "connecting" here
            // is a liveness probe via a trivial tools/list-shaped request.
            self.probe_source().await
        })
        .await;

        if let Err(error) = connect_result {
            self.cleanup().await;
            return Err(error);
        }

        let target_start = retry_with_timeout(&self.retry, || async { self.start_target_server().await }).await;
        if let Err(error) = target_start {
            self.cleanup().await;
            return Err(error);
        }

        let mut state = self.state.write().await;
        state.running = true;
        state.client_connected = true;
        tracing::info!(source = self.source_kind.as_str(), target = self.target_kind.as_str(), "transport bridge started");
        Ok(())
    }

    /// Idempotent: stopping an already-stopped bridge is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if !state.running {
            return;
        }
        state.running = false;
        state.client_connected = false;
        tracing::info!("transport bridge stopped");
    }

    /// Forwards `params` verbatim to the source client for one of the fixed
    /// proxy methods, generating a fresh request ID per call (§4.4 step 3).
    pub async fn handle_proxy_request(&self, method: &str, params: serde_json::Value) -> KernelResult<serde_json::Value> {
        if !PROXIED_METHODS.contains(&method) {
            return Err(KernelError::Internal(format!("unsupported proxy method: {method}")));
        }
        {
            let state = self.state.read().await;
            if !state.running {
                return Err(KernelError::Internal("bridge is not running".into()));
            }
        }

        let request_id = Uuid::new_v4().to_string();
        let request = ToolInvocationRequest {
            tool: method.to_string(),
            input: params,
            kind: ToolKind::Analysis,
            context: Some(serde_json::json!({ "requestId": request_id })),
        };
        let result = self.source_client.invoke(&request).await?;
        Ok(result.result)
    }

    /// `{running, source.type, target.type, clientConnected}`; `healthy` iff
    /// all three of `running`, and the two type fields, hold and the client
    /// is connected (§4.4 "Health check").
    pub async fn health(&self) -> BridgeHealth {
        let state = self.state.read().await;
        BridgeHealth {
            running: state.running,
            source_type: self.source_kind.as_str(),
            target_type: self.target_kind.as_str(),
            client_connected: state.client_connected,
        }
    }

    async fn probe_source(&self) -> KernelResult<()> {
        let probe = ToolInvocationRequest {
            tool: "tools/list".to_string(),
            input: serde_json::json!({}),
            kind: ToolKind::Analysis,
            context: None,
        };
        self.source_client.invoke(&probe).await.map(|_| ())
    }

    async fn start_target_server(&self) -> KernelResult<()> {
        // The target surface itself (accepting inbound connections of
        // `target_kind`) is external to this crate's scope; starting it here
        // means marking the bridge ready to accept `handle_proxy_request`
        // calls for the advertised method set.
        Ok(())
    }

    /// Closes any partially-initialised client/server, swallowing and
    /// logging their errors (§4.4 "cleanup").
    async fn cleanup(&self) {
        let mut state = self.state.write().await;
        if state.running || state.client_connected {
            tracing::warn!("cleaning up partially-initialised transport bridge");
        }
        state.running = false;
        state.client_connected = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeHealth {
    pub running: bool,
    pub source_type: &'static str,
    pub target_type: &'static str,
    pub client_connected: bool,
}

impl BridgeHealth {
    pub fn healthy(&self) -> bool {
        self.running && self.client_connected
    }
}
