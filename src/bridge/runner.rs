// src/bridge/runner.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::handle::TaskHandle;
use crate::bridge::progress::{ProgressSender, ProgressSink};
use crate::bridge::relay::{relay_loop, DEFAULT_POLL_INTERVAL};
use crate::errors::{panic_message, BridgeError};

/// Tunables for a [`ProgressBridge`].
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Bounded wait of each relay-loop poll.
    pub poll_interval: Duration,
    /// Give up waiting for the work after this long. The work itself keeps
    /// running detached; its eventual result is discarded.
    pub timeout: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

/// Runs blocking work on a background thread while relaying its progress
/// messages to an async sink on the caller's task.
///
/// Each call to [`run`](Self::run) owns its own queue and [`TaskHandle`];
/// concurrent invocations share nothing.
#[derive(Debug, Clone, Default)]
pub struct ProgressBridge {
    options: BridgeOptions,
}

impl ProgressBridge {
    pub fn new(options: BridgeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Run `work` to completion, relaying its progress to `sink`.
    ///
    /// Resolves to the work's value, or to a [`BridgeError`] describing why
    /// there is none. Progress still queued when the work returns is dropped.
    pub async fn run<W, T, S>(&self, work: W, sink: S) -> Result<T, BridgeError>
    where
        W: FnOnce(ProgressSender) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
        S: ProgressSink,
    {
        self.run_with_cancel(work, sink, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but also resolves with
    /// [`BridgeError::Cancelled`] as soon as `cancel` fires.
    pub async fn run_with_cancel<W, T, S>(
        &self,
        work: W,
        mut sink: S,
        cancel: CancellationToken,
    ) -> Result<T, BridgeError>
    where
        W: FnOnce(ProgressSender) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
        S: ProgressSink,
    {
        let handle = TaskHandle::new();
        let task_id = handle.id();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let progress = ProgressSender::new(tx);

        debug!(task_id, "starting bridged work");
        let join = tokio::task::spawn_blocking(move || work(progress));

        let completion = wait_for_completion(join, self.options.timeout, cancel);
        tokio::pin!(completion);

        let relay = relay_loop(
            &mut rx,
            &mut sink,
            handle.relay_token(),
            self.options.poll_interval,
            task_id,
        );
        tokio::pin!(relay);

        let mut relay_done = false;
        let result = loop {
            tokio::select! {
                biased;
                result = &mut completion => break result,
                _ = &mut relay, if !relay_done => relay_done = true,
            }
        };
        handle.finish();

        match &result {
            Ok(_) => info!(task_id, elapsed = ?handle.elapsed(), "bridged work completed"),
            Err(err) => warn!(task_id, elapsed = ?handle.elapsed(), error = %err, "bridged work failed"),
        }
        result
    }
}

async fn wait_for_completion<T>(
    join: JoinHandle<anyhow::Result<T>>,
    timeout: Option<Duration>,
    cancel: CancellationToken,
) -> Result<T, BridgeError> {
    let deadline = async move {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        joined = join => match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(BridgeError::Work(format!("{err:#}"))),
            Err(join_err) if join_err.is_panic() => {
                Err(BridgeError::Panicked(panic_message(join_err.into_panic().as_ref())))
            }
            Err(_) => Err(BridgeError::Cancelled),
        },
        _ = deadline => Err(BridgeError::TimedOut(timeout.unwrap_or_default())),
        _ = cancel.cancelled() => Err(BridgeError::Cancelled),
    }
}
