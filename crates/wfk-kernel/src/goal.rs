//! Goal — the immutable input to a planning/execution cycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The reasoning strategy a [`Goal`] asks the planner to use.
///
/// §4.5: `tree-of-thought` is also forced when the step count exceeds 3,
/// regardless of what the goal requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    ChainOfThought,
    TreeOfThought,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::ChainOfThought
    }
}

/// A high-level objective to decompose into capability-bound steps.
///
/// Immutable after construction (§3): nothing in the kernel mutates a
/// `Goal` in place — plans and session state are derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub session_id: String,
    pub objective: String,
    /// Ordered; this order is the canonical execution order (§3).
    pub required_capabilities: Vec<String>,
    #[serde(default)]
    pub input: serde_json::Map<String, Value>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl Goal {
    pub fn new(
        session_id: impl Into<String>,
        objective: impl Into<String>,
        required_capabilities: Vec<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            objective: objective.into(),
            required_capabilities,
            input: serde_json::Map::new(),
            strategy: Strategy::default(),
        }
    }

    /// `input.provider`, if present and a string — used by the planner to
    /// attach vendor weighting (§4.5).
    pub fn provider(&self) -> Option<&str> {
        self.input.get("provider").and_then(Value::as_str)
    }

    /// The retrieval query the Memory Coordinator uses for RAG lookup:
    /// `"{objective} {capabilities joined by space}"` (§4.2).
    pub fn retrieval_query(&self) -> String {
        format!(
            "{} {}",
            self.objective,
            self.required_capabilities.join(" ")
        )
    }
}
