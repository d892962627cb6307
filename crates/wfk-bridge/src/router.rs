//! Tool Router (§4.3): checks locally registered [`ToolHandler`]s first,
//! falling back to the [`McpClientHub`] when no local handler matches the
//! requested tool name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use wfk_kernel::error::{KernelError, KernelResult};
use wfk_kernel::tool::{ToolHandler, ToolInvocationRequest, ToolInvocationResult, ToolRouter};

use crate::hub::McpClientHub;
use crate::local_result::wrap_local_result;

pub struct BridgeToolRouter {
    local_handlers: HashMap<String, Arc<dyn ToolHandler>>,
    hub: McpClientHub,
    /// Per-invocation token ceiling (§2 "enforce token budget"). `None`
    /// leaves the router unbounded, matching `BridgeOptions::token_budget`.
    token_budget: Option<u64>,
}

impl BridgeToolRouter {
    pub fn new(local_handlers: HashMap<String, Arc<dyn ToolHandler>>, hub: McpClientHub) -> Self {
        Self { local_handlers, hub, token_budget: None }
    }

    /// Rejects any invocation whose result reports more than `budget`
    /// tokens used, with [`KernelError::TokenBudgetExceeded`].
    pub fn with_token_budget(mut self, budget: u64) -> Self {
        self.token_budget = Some(budget);
        self
    }
}

#[async_trait]
impl ToolRouter for BridgeToolRouter {
    async fn invoke(&self, request: ToolInvocationRequest) -> KernelResult<ToolInvocationResult> {
        let result = if let Some(handler) = self.local_handlers.get(&request.tool) {
            let value = handler.call(&request).await?;
            wrap_local_result(&request, value)
        } else {
            self.hub.dispatch(&request).await?
        };

        if let Some(budget) = self.token_budget {
            if result.tokens_used > budget {
                return Err(KernelError::TokenBudgetExceeded { used: result.tokens_used, budget });
            }
        }

        Ok(result)
    }
}
