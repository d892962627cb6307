//! Stdio-transport MCP client: spawns a child process per invocation,
//! writes one newline-terminated JSON request, and reads its stdout until
//! exit (§4.3, §6 "Bridge wire protocol (stdio)").

use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use wfk_kernel::error::{KernelError, KernelResult, TransportError};
use wfk_kernel::tool::{estimate_tokens, McpTransportClient, ResultMetadata, ToolInvocationRequest, ToolInvocationResult};

/// Configuration for one stdio MCP server (§6 "MCP").
#[derive(Debug, Clone)]
pub struct StdioClientConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub cwd: Option<String>,
}

pub struct StdioMcpClient {
    config: StdioClientConfig,
}

impl StdioMcpClient {
    pub fn new(config: StdioClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl McpTransportClient for StdioMcpClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn transport(&self) -> &'static str {
        "stdio"
    }

    async fn invoke(&self, request: &ToolInvocationRequest) -> KernelResult<ToolInvocationResult> {
        let wire = serde_json::json!({
            "tool": request.tool,
            "input": request.input,
            "kind": request.kind,
        });
        let mut line = serde_json::to_string(&wire)
            .map_err(|e| KernelError::Transport(TransportError::Malformed(e.to_string())))?;
        line.push('\n');

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args);
        if let Some(cwd) = &self.config.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| KernelError::Transport(TransportError::Io(e.to_string())))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| KernelError::Transport(TransportError::Io("child has no stdin".into())))?;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| KernelError::Transport(TransportError::Io(e.to_string())))?;
        drop(stdin); // close stdin so the child sees EOF

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| KernelError::Transport(TransportError::Io(e.to_string())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(KernelError::Transport(TransportError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr,
            }));
        }

        let payload: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| KernelError::Transport(TransportError::Malformed(e.to_string())))?;

        Ok(extract_result(&self.config.name, "stdio", request, payload))
    }
}

/// Shared `result`/`tokensUsed` extraction rules for both transports
/// (§4.3: "takes `payload.result` if present else the entire payload;
/// `tokensUsed` from payload if numeric else the estimator").
pub(crate) fn extract_result(
    client_name: &str,
    transport: &'static str,
    request: &ToolInvocationRequest,
    payload: Value,
) -> ToolInvocationResult {
    let result = payload.get("result").cloned().unwrap_or_else(|| payload.clone());
    let tokens_used = payload
        .get("tokensUsed")
        .and_then(Value::as_u64)
        .unwrap_or_else(|| estimate_tokens(&payload));

    ToolInvocationResult {
        tool: request.tool.clone(),
        result,
        tokens_used,
        metadata: ResultMetadata { transport: transport.to_string(), client: client_name.to_string() },
    }
}
