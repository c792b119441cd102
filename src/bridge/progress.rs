// src/bridge/progress.rs

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::trace;

/// Producer half of a bridge invocation's progress queue.
///
/// Handed to the blocking work. Sending never blocks and never fails from
/// the work's point of view: once the relay loop has been cancelled, further
/// messages are silently discarded.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<String>,
}

impl ProgressSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    pub fn send(&self, message: impl Into<String>) {
        let message = message.into();
        if self.tx.send(message).is_err() {
            trace!("progress receiver gone; message dropped");
        }
    }
}

/// Asynchronous consumer of progress messages.
///
/// Called from the task that awaits [`ProgressBridge::run`](super::ProgressBridge::run),
/// one message at a time; the next message is not delivered before the
/// previous call has completed. Errors are logged and otherwise ignored.
pub trait ProgressSink: Send {
    fn deliver(
        &mut self,
        message: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>>;
}

impl<F, Fut> ProgressSink for F
where
    F: FnMut(String) -> Fut + Send,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn deliver(
        &mut self,
        message: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(self(message))
    }
}

/// Sink that ignores every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ProgressSink for DiscardSink {
    fn deliver(
        &mut self,
        _message: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}
