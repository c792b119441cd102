// src/bridge/handle.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// One in-flight bridged operation.
///
/// Holds the token that stops the relay loop. Created when an invocation
/// starts and finished exactly once when it resolves; never reused.
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
    relay: CancellationToken,
    started: Instant,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            relay: CancellationToken::new(),
            started: Instant::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Token observed by the relay loop.
    pub fn relay_token(&self) -> CancellationToken {
        self.relay.clone()
    }

    /// Whether the invocation has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.relay.is_cancelled()
    }

    /// Stop the relay loop. Calling it again has no effect.
    pub fn finish(&self) {
        self.relay.cancel();
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}
