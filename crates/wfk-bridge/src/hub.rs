//! MCP Client Hub (§4.3): tries every configured [`McpTransportClient`] in
//! order, returning the first success. Aggregates causes from every client
//! when all fail (property 5, scenario S4 "failover").

use std::sync::Arc;

use wfk_kernel::error::{AggregateCauses, ClientCause, KernelError, KernelResult};
use wfk_kernel::tool::{McpTransportClient, ToolInvocationRequest, ToolInvocationResult};

pub struct McpClientHub {
    clients: Vec<Arc<dyn McpTransportClient>>,
}

impl McpClientHub {
    pub fn new(clients: Vec<Arc<dyn McpTransportClient>>) -> Self {
        Self { clients }
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Dispatch to clients in configuration order. Returns on the first
    /// success; if every client fails, returns [`KernelError::AllMcpClientsFailed`]
    /// with causes in the same order the clients were tried.
    pub async fn dispatch(&self, request: &ToolInvocationRequest) -> KernelResult<ToolInvocationResult> {
        if self.clients.is_empty() {
            return Err(KernelError::NoMcpClients);
        }

        let mut causes = Vec::with_capacity(self.clients.len());
        for client in &self.clients {
            match client.invoke(request).await {
                Ok(result) => {
                    if !causes.is_empty() {
                        tracing::warn!(client = %client.name(), failed_before = causes.len(), "mcp client recovered after failover");
                    }
                    return Ok(result);
                }
                Err(error) => {
                    tracing::warn!(client = %client.name(), %error, "mcp client failed, trying next");
                    causes.push(ClientCause { client: client.name().to_string(), error: error.to_string() });
                }
            }
        }

        Err(KernelError::AllMcpClientsFailed(causes.len(), AggregateCauses(causes)))
    }
}
