// src/exec/command.rs

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::bridge::ProgressSender;

/// Keep at most this many trailing bytes of stderr in error messages.
const STDERR_TAIL: usize = 512;

/// A shell command run as blocking bridge work.
///
/// Stdout lines are relayed as progress (optionally filtered by a regex);
/// stderr is collected and reported if the command exits unsuccessfully.
#[derive(Debug, Clone)]
pub struct CommandWork {
    name: String,
    cmd: String,
    progress_filter: Option<Regex>,
}

impl CommandWork {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            progress_filter: None,
        }
    }

    /// Only relay stdout lines matching `filter`.
    pub fn with_progress_filter(mut self, filter: Regex) -> Self {
        self.progress_filter = Some(filter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute the command, blocking the current thread until it exits.
    pub fn run(self, progress: ProgressSender) -> Result<String> {
        progress.send(format!("Starting {}...", self.name));
        info!(tool = %self.name, cmd = %self.cmd, "starting tool process");

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning process for tool '{}'", self.name))?;

        // Drain stderr on its own thread so a chatty process cannot block on a full pipe.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(err) = stderr.read_to_end(&mut buf) {
                    debug!(error = %err, "failed to read tool stderr");
                }
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        if let Some(stdout) = child.stdout.take() {
            if let Err(err) = self.relay_stdout(stdout, &progress) {
                // Do not leave the process running or unreaped.
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        }

        let status = child
            .wait()
            .with_context(|| format!("waiting for process of tool '{}'", self.name))?;
        let stderr = stderr_reader
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        info!(
            tool = %self.name,
            exit_code = status.code().unwrap_or(-1),
            success = status.success(),
            "tool process exited"
        );

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let stderr = tail(stderr.trim(), STDERR_TAIL);
            if stderr.is_empty() {
                bail!("'{}' failed (exit code {code})", self.name);
            }
            bail!("'{}' failed (exit code {code}): {stderr}", self.name);
        }

        Ok(format!("Successfully ran {}", self.name))
    }

    /// Relay stdout line by line. Bytes that are not UTF-8 are replaced
    /// rather than ending the run.
    fn relay_stdout(&self, stdout: impl Read, progress: &ProgressSender) -> Result<()> {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("reading stdout of tool '{}'", self.name))?;
            if n == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            debug!(tool = %self.name, "stdout: {}", line);
            if line.is_empty() {
                continue;
            }
            if self.progress_filter.as_ref().is_none_or(|re| re.is_match(line)) {
                progress.send(line);
            }
        }
    }
}

fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
