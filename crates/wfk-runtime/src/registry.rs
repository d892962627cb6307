//! In-memory, insertion-ordered [`WorkerRegistry`] implementation (§4.1).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use wfk_kernel::error::{KernelError, KernelResult};
use wfk_kernel::registry::WorkerRegistry;
use wfk_kernel::worker::WorkerDefinition;

struct Inner {
    by_name: HashMap<String, WorkerDefinition>,
    /// Names in registration order, for `list()`.
    order: Vec<String>,
    /// capability -> worker name. First-registered wins and is never
    /// overwritten by a later registration of the same capability.
    by_capability: HashMap<String, String>,
}

/// Write-once-per-name registry (§5 "Shared-resource policy"): reads take a
/// read lock and never block on each other; `register` takes a write lock
/// only for the duration of the insert.
pub struct InMemoryWorkerRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryWorkerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                by_name: HashMap::new(),
                order: Vec::new(),
                by_capability: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryWorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkerRegistry for InMemoryWorkerRegistry {
    async fn register(&self, def: WorkerDefinition) -> KernelResult<()> {
        let mut inner = self.inner.write().await;
        if inner.by_name.contains_key(&def.name) {
            return Err(KernelError::DuplicateWorker(def.name.clone()));
        }

        for capability in &def.capabilities {
            inner
                .by_capability
                .entry(capability.clone())
                .or_insert_with(|| def.name.clone());
        }

        tracing::info!(worker = %def.name, capabilities = ?def.capabilities, "registered worker");
        inner.order.push(def.name.clone());
        inner.by_name.insert(def.name.clone(), def);
        Ok(())
    }

    async fn get(&self, name: &str) -> Option<WorkerDefinition> {
        self.inner.read().await.by_name.get(name).cloned()
    }

    async fn find_by_capability(&self, capability: &str) -> Option<WorkerDefinition> {
        let inner = self.inner.read().await;
        let name = inner.by_capability.get(capability)?;
        inner.by_name.get(name).cloned()
    }

    async fn list(&self) -> Vec<WorkerDefinition> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|name| inner.by_name.get(name).cloned())
            .collect()
    }
}
