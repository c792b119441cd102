// src/exec/mod.rs

//! Process execution layer.
//!
//! Tools are shell commands. [`command::CommandWork`] runs one as blocking
//! work inside the [`ProgressBridge`](crate::bridge::ProgressBridge),
//! turning its stdout into progress messages.

pub mod command;

pub use command::CommandWork;
