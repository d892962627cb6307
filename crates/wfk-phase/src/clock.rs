//! Timestamp sources for PRP runs. A deterministic run replaces wall-clock
//! time with a monotonic counter so two runs over the same blueprint emit
//! bit-identical execution histories (§4.5).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{TimeZone, Utc};

pub trait PhaseClock: Send + Sync {
    fn now(&self) -> String;
}

/// Wall-clock timestamps, RFC3339 with millisecond precision.
#[derive(Debug, Default)]
pub struct SystemClock;

impl PhaseClock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

/// A fixed epoch plus a seconds-resolution counter, incremented once per
/// call. Seeding two kernels with the same blueprint and driving them
/// through the same sequence of gate evaluations produces identical
/// timestamps at every step.
#[derive(Debug, Default)]
pub struct DeterministicClock {
    counter: AtomicU64,
}

impl DeterministicClock {
    const EPOCH_SECONDS: i64 = 1_700_000_000; // fixed reference instant

    pub fn new() -> Self {
        Self { counter: AtomicU64::new(0) }
    }
}

impl PhaseClock for DeterministicClock {
    fn now(&self) -> String {
        let tick = self.counter.fetch_add(1, Ordering::SeqCst);
        let instant = Utc
            .timestamp_opt(Self::EPOCH_SECONDS + tick as i64, 0)
            .single()
            .expect("fixed epoch + tick is always in range");
        instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

/// `runId = "prp-deterministic-" + stable_hash(blueprint)` (§4.5).
pub fn stable_run_id(blueprint: &serde_json::Value) -> String {
    use sha2::{Digest, Sha256};
    let canonical = serde_json::to_vec(blueprint).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    format!("prp-deterministic-{}", hex::encode(digest))
}
