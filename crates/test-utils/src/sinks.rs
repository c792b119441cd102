#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use cait::bridge::ProgressSink;

/// `ProgressSink` that records every delivered message.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records messages but reports every delivery as failed.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink mutex poisoned").clone()
    }
}

impl ProgressSink for RecordingSink {
    fn deliver(
        &mut self,
        message: String,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        self.messages
            .lock()
            .expect("sink mutex poisoned")
            .push(message);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                anyhow::bail!("sink unavailable");
            }
            Ok(())
        })
    }
}
