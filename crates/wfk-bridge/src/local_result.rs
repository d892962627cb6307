//! Wraps a locally handled tool call in the same [`ToolInvocationResult`]
//! shape the MCP hub produces, so callers cannot tell which path served a
//! request except by inspecting `metadata.transport` (§4.3).

use wfk_kernel::tool::{estimate_tokens, ResultMetadata, ToolInvocationRequest, ToolInvocationResult};

pub(crate) fn wrap_local_result(request: &ToolInvocationRequest, value: serde_json::Value) -> ToolInvocationResult {
    let tokens_used = estimate_tokens(&value);
    ToolInvocationResult {
        tool: request.tool.clone(),
        result: value,
        tokens_used,
        metadata: ResultMetadata { transport: "local".to_string(), client: "local".to_string() },
    }
}
