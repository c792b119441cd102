// src/bridge/relay.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::bridge::progress::ProgressSink;

/// Default bounded wait between two polls of the progress queue.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drain `rx` into `sink` in FIFO order until cancelled or the producer is
/// gone. Returns the number of messages delivered.
///
/// Each poll waits at most `poll_interval`; a sink call is awaited to
/// completion before the next message is taken. Sink errors are swallowed.
pub async fn relay_loop<S>(
    rx: &mut mpsc::UnboundedReceiver<String>,
    sink: &mut S,
    cancel: CancellationToken,
    poll_interval: Duration,
    task_id: u64,
) -> usize
where
    S: ProgressSink + ?Sized,
{
    let mut delivered = 0;

    loop {
        let polled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            polled = timeout(poll_interval, rx.recv()) => polled,
        };

        match polled {
            Ok(Some(message)) => {
                trace!(task_id, %message, "relaying progress");
                if let Err(err) = sink.deliver(message).await {
                    debug!(task_id, error = %err, "progress sink failed; message dropped");
                }
                delivered += 1;
            }
            // Every sender dropped: the work has returned.
            Ok(None) => break,
            Err(_elapsed) => continue,
        }
    }

    debug!(task_id, delivered, "relay loop finished");
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn delivers_in_order_and_stops_when_producer_is_gone() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for m in ["a", "b", "c"] {
            tx.send(m.to_string()).unwrap();
        }
        drop(tx);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let mut sink = move |m: String| {
            let s = Arc::clone(&s);
            async move {
                s.lock().unwrap().push(m);
                Ok::<(), anyhow::Error>(())
            }
        };

        let n = relay_loop(&mut rx, &mut sink, CancellationToken::new(), DEFAULT_POLL_INTERVAL, 0).await;
        assert_eq!(n, 3);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn cancelled_token_stops_an_idle_loop() {
        let (_tx, mut rx) = mpsc::unbounded_channel::<String>();
        let cancel = CancellationToken::new();
        let mut sink = crate::bridge::progress::DiscardSink;

        let c = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            c.cancel();
        });

        let n = tokio::time::timeout(
            Duration::from_secs(2),
            relay_loop(&mut rx, &mut sink, cancel, Duration::from_millis(10), 0),
        )
        .await
        .expect("relay loop should stop after cancellation");
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn sink_errors_do_not_stop_relay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send("first".to_string()).unwrap();
        tx.send("second".to_string()).unwrap();
        drop(tx);

        let calls = Arc::new(Mutex::new(0usize));
        let c = Arc::clone(&calls);
        let mut sink = move |_m: String| {
            let c = Arc::clone(&c);
            async move {
                *c.lock().unwrap() += 1;
                Err::<(), _>(anyhow::anyhow!("display unavailable"))
            }
        };

        let n = relay_loop(&mut rx, &mut sink, CancellationToken::new(), DEFAULT_POLL_INTERVAL, 0).await;
        assert_eq!(n, 2);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
