// src/bridge/mod.rs

//! Progress-streaming execution bridge.
//!
//! A blocking unit of work runs on tokio's blocking pool and pushes status
//! strings into an unbounded channel through a [`ProgressSender`]. The task
//! awaiting the bridge drains that channel into a [`ProgressSink`] with a
//! bounded-wait relay loop, and the relay is cancelled as soon as the work
//! reports completion.
//!
//! - [`progress`]: producer handle and the sink trait.
//! - [`handle`]: [`TaskHandle`], one per invocation.
//! - [`relay`]: the relay loop.
//! - [`runner`]: [`ProgressBridge`] itself.

pub mod handle;
pub mod progress;
pub mod relay;
pub mod runner;

pub use handle::TaskHandle;
pub use progress::{DiscardSink, ProgressSender, ProgressSink};
pub use relay::DEFAULT_POLL_INTERVAL;
pub use runner::{BridgeOptions, ProgressBridge};
