//! Evidence — immutable records attesting to a validator outcome.

use serde::{Deserialize, Serialize};

use crate::prp::Phase;

/// The kind of validator that produced an [`Evidence`] record (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Test,
    Analysis,
    Validation,
}

/// An append-only, immutable evidence record (§3 "Lifecycles": "once
/// appended, immutable"). Only Phase Kernel validators may append these
/// (§3 "Ownership").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub kind: EvidenceKind,
    pub source: String,
    /// Raw JSON payload, kept as a string per §3's `content (JSON string)`.
    pub content: String,
    pub timestamp: String,
    pub phase: Phase,
}
