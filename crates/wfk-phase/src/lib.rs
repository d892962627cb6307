//! Phase Kernel (§4.5) and Evaluation Gates (§4.6): the PRP state machine
//! that drives a long-running review workflow through Strategy, Build, and
//! Evaluation phases, plus deterministic replay support.

pub mod clock;
pub mod error;
pub mod gates;
pub mod state;

pub use clock::{stable_run_id, DeterministicClock, PhaseClock, SystemClock};
pub use error::{PhaseError, PhaseResult};
pub use gates::{evaluate, BudgetEvidence, ReadinessEvidence, ReviewEvidence, TddEvidence};
pub use state::PhaseKernel;
