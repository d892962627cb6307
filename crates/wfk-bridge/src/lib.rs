//! Tool Router, MCP Client Hub, and Transport Bridge (§4.3, §4.4) — the
//! crate that reaches outside the kernel to invoke tools over stdio and
//! streaming HTTP.

pub mod hub;
pub mod http_client;
mod local_result;
pub mod retry;
pub mod router;
pub mod stdio_client;
pub mod transport_bridge;

pub use hub::McpClientHub;
pub use http_client::{HttpClientConfig, StreamingHttpMcpClient};
pub use retry::{retry_with_timeout, RetryConfig, RetryPolicy};
pub use router::BridgeToolRouter;
pub use stdio_client::{StdioClientConfig, StdioMcpClient};
pub use transport_bridge::{BridgeHealth, TransportBridge, TransportKind};
