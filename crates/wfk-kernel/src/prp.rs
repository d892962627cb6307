//! PRP (Plan-Refine-Promote) state, phases, and verdicts.
//!
//! The state machine that drives transitions between phases lives in
//! `wfk-phase`; this module only defines the shapes §3 and §4.5 describe.

use serde::{Deserialize, Serialize};

use crate::evidence::Evidence;
use std::collections::BTreeMap;

/// A phase of the PRP workflow (§4.5). `Completed` and `Recycled` are
/// terminal — no further transition is legal out of either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Strategy,
    Build,
    Evaluation,
    Completed,
    Recycled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Recycled)
    }
}

/// The pass/fail outcome of one phase's validators (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub blockers: Vec<String>,
    pub majors: Vec<String>,
    pub evidence: Vec<String>,
    pub timestamp: String,
}

impl Verdict {
    /// §4.6: `passed = (blockers == 0) && (len(majors) <= 3)`.
    pub fn compute(blockers: Vec<String>, majors: Vec<String>, evidence: Vec<String>, timestamp: impl Into<String>) -> Self {
        let passed = blockers.is_empty() && majors.len() <= 3;
        Self { passed, blockers, majors, evidence, timestamp: timestamp.into() }
    }
}

/// Final `promote | recycle` verdict attached to a completed PRP run
/// (§4.6, Glossary "Cerebrum decision").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision: DecisionKind,
    pub reasoning: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Promote,
    Recycle,
}

/// A snapshot of [`PRPState`] appended to the run's execution history on
/// every transition (§4.5 "append-only").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub phase: Phase,
    pub timestamp: String,
    pub state: PRPStateSnapshot,
}

/// A cheap, cloneable snapshot of [`PRPState`] for the history log, avoiding
/// repeated clones of the (potentially large) blueprint value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PRPStateSnapshot {
    pub run_id: String,
    pub phase: Phase,
    pub evidence_count: usize,
    pub validation_results: BTreeMap<String, Verdict>,
    pub cerebrum: Option<Decision>,
}

/// The full state of one PRP run (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PRPState {
    pub run_id: String,
    pub blueprint: serde_json::Value,
    pub phase: Phase,
    pub evidence: Vec<Evidence>,
    /// Keyed by phase name (`"strategy"`, `"build"`, `"evaluation"`).
    pub validation_results: BTreeMap<String, Verdict>,
    pub cerebrum: Option<Decision>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub execution_history: Vec<HistoryEntry>,
}

impl PRPState {
    pub fn new(run_id: impl Into<String>, blueprint: serde_json::Value) -> Self {
        Self {
            run_id: run_id.into(),
            blueprint,
            phase: Phase::Strategy,
            evidence: Vec::new(),
            validation_results: BTreeMap::new(),
            cerebrum: None,
            metadata: serde_json::Map::new(),
            execution_history: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> PRPStateSnapshot {
        PRPStateSnapshot {
            run_id: self.run_id.clone(),
            phase: self.phase,
            evidence_count: self.evidence.len(),
            validation_results: self.validation_results.clone(),
            cerebrum: self.cerebrum.clone(),
        }
    }
}
