//! Phase Kernel error type, mirroring `wfk_kernel::error::KernelError`'s
//! shape at this crate's own boundary.

use thiserror::Error;
use wfk_kernel::prp::Phase;

pub type PhaseResult<T> = Result<T, PhaseError>;

#[derive(Debug, Error)]
pub enum PhaseError {
    /// A transition was attempted out of a terminal phase.
    #[error("phase {0:?} is terminal, no further transition is legal")]
    AlreadyTerminal(Phase),

    /// A transition was requested without first recording that phase's
    /// verdict.
    #[error("no verdict recorded for phase {0:?}")]
    MissingVerdict(Phase),

    /// Evaluation-gate evidence was incomplete or self-contradictory.
    #[error("invalid evaluation evidence: {0}")]
    InvalidEvidence(String),
}
