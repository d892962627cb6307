//! Approval Gate — synchronous human/policy approval before sensitive
//! capabilities run (§4.5 step 1).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KernelResult;

/// What the Worker Runner asks the gate to decide on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub goal_id: String,
    pub capability: String,
    pub input: Value,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Denied,
}

/// A pluggable approval policy. The default, no-op gate always approves;
/// callers that configure `approvals.require = true` install a real one.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn decide(&self, request: &ApprovalRequest) -> KernelResult<ApprovalDecision>;
}

/// Always-approve gate, used when `approvals.require` is unset (§6).
pub struct AlwaysApprove;

#[async_trait]
impl ApprovalGate for AlwaysApprove {
    async fn decide(&self, _request: &ApprovalRequest) -> KernelResult<ApprovalDecision> {
        Ok(ApprovalDecision::Approved)
    }
}
