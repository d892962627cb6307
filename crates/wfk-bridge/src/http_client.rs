//! Streaming-HTTP MCP client: POSTs the tool invocation as JSON to a
//! configured endpoint with `Content-Type`, an `X-Tool` header, and any
//! config-provided headers (§4.3, §6 "Bridge wire protocol
//! (streamable-http)").

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use wfk_kernel::error::{KernelError, KernelResult, TransportError};
use wfk_kernel::tool::{McpTransportClient, ToolInvocationRequest, ToolInvocationResult};

use crate::stdio_client::extract_result;

/// Configuration for one streamable-HTTP MCP endpoint (§6 "MCP").
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    pub name: String,
    pub url: String,
    pub timeout_ms: u64,
    /// Extra headers sent with every request to this endpoint, e.g. an
    /// `Authorization` bearer token (§6 "config-provided headers").
    pub headers: HashMap<String, String>,
}

pub struct StreamingHttpMcpClient {
    config: HttpClientConfig,
    http: reqwest::Client,
}

impl StreamingHttpMcpClient {
    pub fn new(config: HttpClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }
}

#[async_trait]
impl McpTransportClient for StreamingHttpMcpClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn transport(&self) -> &'static str {
        "streamable-http"
    }

    async fn invoke(&self, request: &ToolInvocationRequest) -> KernelResult<ToolInvocationResult> {
        let body = serde_json::json!({
            "tool": request.tool,
            "input": request.input,
            "kind": request.kind,
        });

        let mut req = self.http.post(&self.config.url).header("X-Tool", &request.tool);
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        let response = req
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KernelError::Transport(TransportError::Timeout(self.config.timeout_ms))
                } else {
                    KernelError::Transport(TransportError::Io(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KernelError::Transport(TransportError::HttpStatus(status.as_u16())));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| KernelError::Transport(TransportError::Malformed(e.to_string())))?;

        Ok(extract_result(&self.config.name, "streamable-http", request, payload))
    }
}
