//! Worker Registry interface (§4.1).
//!
//! The kernel only holds the abstract interface; the concrete
//! insertion-ordered, capability-indexed implementation lives in
//! `wfk-runtime::registry`.

use async_trait::async_trait;

use crate::error::KernelResult;
use crate::worker::WorkerDefinition;

/// Index of workers by name and by capability.
///
/// Invariant (§4.1): after `register`, `get(def.name) == Some(def)` and for
/// each capability `c` in `def.capabilities`, `find_by_capability(c)` is
/// defined (possibly pointing at an earlier definition — first-registered
/// wins).
#[async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// Fails with [`crate::error::KernelError::DuplicateWorker`] if
    /// `def.name` is already indexed. Capabilities already bound to an
    /// earlier worker are silently left alone.
    async fn register(&self, def: WorkerDefinition) -> KernelResult<()>;

    async fn get(&self, name: &str) -> Option<WorkerDefinition>;

    async fn find_by_capability(&self, capability: &str) -> Option<WorkerDefinition>;

    /// In insertion order.
    async fn list(&self) -> Vec<WorkerDefinition>;
}
