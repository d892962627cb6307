//! Phase Kernel (§4.5): drives a [`PRPState`] through the fixed
//! `Strategy -> Build -> Evaluation -> Completed | Recycled` state machine,
//! appending a history snapshot on every transition.

use std::sync::Arc;

use wfk_kernel::evidence::Evidence;
use wfk_kernel::prp::{Decision, DecisionKind, HistoryEntry, Phase, PRPState, Verdict};

use crate::clock::{DeterministicClock, PhaseClock, SystemClock};
use crate::error::{PhaseError, PhaseResult};

pub struct PhaseKernel {
    state: PRPState,
    clock: Arc<dyn PhaseClock>,
}

impl PhaseKernel {
    /// A normal run: wall-clock timestamps, a random-looking `run_id` left
    /// to the caller (pass any unique string).
    pub fn new(run_id: impl Into<String>, blueprint: serde_json::Value) -> Self {
        Self { state: PRPState::new(run_id, blueprint), clock: Arc::new(SystemClock) }
    }

    /// A deterministic run (§4.5 "opt-in"): `run_id` is derived from a
    /// stable hash of `blueprint`, and timestamps come from a monotonic
    /// counter seeded at construction rather than the wall clock.
    pub fn new_deterministic(blueprint: serde_json::Value) -> Self {
        let run_id = crate::clock::stable_run_id(&blueprint);
        Self { state: PRPState::new(run_id, blueprint), clock: Arc::new(DeterministicClock::new()) }
    }

    pub fn state(&self) -> &PRPState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn push_evidence(&mut self, evidence: Evidence) {
        self.state.evidence.push(evidence);
    }

    /// Records `verdict` for the current phase and advances to the next
    /// phase per the §4.5 transition table. Appends a history snapshot
    /// either way.
    pub fn record_verdict(&mut self, verdict: Verdict) -> PhaseResult<Phase> {
        let current = self.state.phase;
        if current.is_terminal() {
            return Err(PhaseError::AlreadyTerminal(current));
        }

        let next = match current {
            Phase::Strategy => {
                if verdict.passed {
                    Phase::Build
                } else {
                    Phase::Recycled
                }
            }
            Phase::Build => {
                if verdict.blockers.is_empty() && verdict.majors.len() <= 3 {
                    Phase::Evaluation
                } else {
                    Phase::Recycled
                }
            }
            Phase::Evaluation => {
                if verdict.passed {
                    Phase::Completed
                } else {
                    Phase::Recycled
                }
            }
            Phase::Completed | Phase::Recycled => unreachable!("guarded above"),
        };

        self.state.validation_results.insert(phase_key(current), verdict);
        self.state.phase = next;
        self.append_history();
        Ok(next)
    }

    /// Attaches the final Cerebrum decision (§4.6). Only meaningful once the
    /// run has reached a terminal phase.
    pub fn attach_decision(&mut self, decision_kind: DecisionKind, reasoning: impl Into<String>, confidence: f64) {
        self.state.cerebrum = Some(Decision { decision: decision_kind, reasoning: reasoning.into(), confidence: confidence.clamp(0.0, 1.0) });
        self.append_history();
    }

    fn append_history(&mut self) {
        let timestamp = self.clock.now();
        let entry = HistoryEntry { phase: self.state.phase, timestamp, state: self.state.snapshot() };
        self.state.execution_history.push(entry);
    }
}

fn phase_key(phase: Phase) -> String {
    match phase {
        Phase::Strategy => "strategy",
        Phase::Build => "build",
        Phase::Evaluation => "evaluation",
        Phase::Completed => "completed",
        Phase::Recycled => "recycled",
    }
    .to_string()
}
