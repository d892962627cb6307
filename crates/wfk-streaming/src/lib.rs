//! Streaming Manager (§4.7): transformer chain, buffering, and subscriber
//! fan-out for lifecycle events.

pub mod manager;
pub mod subscriber;
pub mod transformer;

pub use manager::StreamingManager;
pub use subscriber::{RecordingSubscriber, Subscriber};
pub use transformer::{FnTransformer, Transformer};
