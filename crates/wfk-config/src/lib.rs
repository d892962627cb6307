//! Typed configuration loading for the workflow kernel.
//!
//! This crate is a pure data/validation layer: it parses and validates
//! `KernelConfig`. Resolving the `handler`/`gate` binding identifiers to
//! live trait objects, and reading argv/env to find the config file in the
//! first place, are the embedding CLI's job — out of scope here per §1.

pub mod loader;
pub mod schema;

pub use loader::{detect_format, from_str, load_config, load_kernel_config, substitute_env_vars, validate, ConfigError, ConfigResult};
pub use schema::{
    ApprovalConfig, BridgeOptions, HttpMcpConfig, KernelConfig, McpConfig, MemoryConfig,
    StdioMcpConfig, WorkerConfig,
};
