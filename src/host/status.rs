// src/host/status.rs

use std::fmt;

use crate::errors::BridgeError;

/// User-visible status of a tool run.
///
/// Rendered as a single line; a failed run is always distinguishable from a
/// successful one by its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Pending,
    Progress(String),
    Succeeded(String),
    Failed(String),
}

impl Status {
    /// Terminal status for a bridged result.
    pub fn from_result(result: &Result<String, BridgeError>) -> Self {
        match result {
            Ok(summary) => Self::Succeeded(summary.clone()),
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "🤔 Processing your request..."),
            Status::Progress(msg) => write!(f, "🔄 {msg}"),
            Status::Succeeded(msg) => write!(f, "✅ {msg}"),
            Status::Failed(msg) => write!(f, "❌ Error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn failure_is_tagged_as_error() {
        let status = Status::from_result(&Err(BridgeError::Work("ssh refused".into())));
        assert!(status.is_failure());
        assert_eq!(status.to_string(), "❌ Error: ssh refused");
    }

    #[test]
    fn timeout_mentions_duration() {
        let status = Status::from_result(&Err(BridgeError::TimedOut(Duration::from_secs(5))));
        assert_eq!(status.to_string(), "❌ Error: operation timed out after 5s");
    }

    #[test]
    fn success_and_progress_rendering() {
        assert_eq!(
            Status::from_result(&Ok("done".into())).to_string(),
            "✅ done"
        );
        assert_eq!(Status::Progress("step1".into()).to_string(), "🔄 step1");
    }
}
