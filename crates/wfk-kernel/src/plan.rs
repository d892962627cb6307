//! Plan, step records and the planner's reasoning trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::goal::Goal;
use crate::session::Document;

/// Lifecycle of a single plan step. Transitions `Pending -> Completed` and
/// `Pending -> Failed` are monotonic (§3) — nothing moves a step backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Completed,
    Failed,
}

/// One step of a [`Plan`], bound to exactly one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub capability: String,
    pub worker_name: String,
    pub status: StepStatus,
    pub input: Value,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    /// Unix-epoch milliseconds; set when the step leaves `Pending`.
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl StepRecord {
    pub fn pending(capability: impl Into<String>, worker_name: impl Into<String>, input: Value) -> Self {
        Self {
            capability: capability.into(),
            worker_name: worker_name.into(),
            status: StepStatus::Pending,
            input,
            output: None,
            error: None,
            completed_at: None,
        }
    }

    pub fn complete(&mut self, output: Value, now_ms: i64) {
        self.status = StepStatus::Completed;
        self.output = Some(output);
        self.completed_at = Some(now_ms);
    }

    pub fn fail(&mut self, error: impl Into<String>, now_ms: i64) {
        self.status = StepStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(now_ms);
    }
}

/// A single branch of a chain- or tree-of-thought reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub capability: String,
    pub text: String,
}

/// An alternative step ordering considered by tree-of-thought planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativePath {
    pub order: Vec<String>,
    pub score: f64,
}

/// Structured record of how the planner decomposed the goal (§4.5, §9
/// "Reasoning trace").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningTrace {
    /// `"chain-of-thought"` or `"tree-of-thought"`.
    pub strategy: String,
    pub thoughts: Vec<Thought>,
    #[serde(default)]
    pub alternatives: Vec<AlternativePath>,
    #[serde(default)]
    pub vendor_weighting: Option<BTreeMap<String, f64>>,
}

/// An ordered sequence of steps bound to workers, plus the retrieved
/// context and reasoning trace that produced it (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub goal: Goal,
    pub steps: Vec<StepRecord>,
    pub retrieved_context: Vec<Document>,
    pub reasoning: ReasoningTrace,
}
