//! Worker registry, memory coordinator, planner and worker runner — the
//! runtime half of the `wfk-kernel` trait seams (§4.1, §4.2, §4.5).

pub mod memory;
pub mod planner;
pub mod registry;
pub mod runner;
pub mod session_store;

pub use memory::MemoryCoordinator;
pub use planner::Planner;
pub use registry::InMemoryWorkerRegistry;
pub use runner::{ExecutionResult, WorkerRunner};
pub use session_store::InMemorySessionStore;
