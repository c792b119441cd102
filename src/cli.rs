// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `cait`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cait",
    version,
    about = "Supervise reloadable tools and run them with live progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Cait.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Cait.toml", global = true)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CAIT_LOG` directives or `info` are used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch the configured paths and reconfigure tools when they change.
    Watch,

    /// Run a registered tool, streaming its progress.
    Run {
        /// Name of the tool (`[tool.<name>]` in the config).
        #[arg(value_name = "TOOL")]
        tool: String,
    },

    /// Parse + validate the config and print what would be watched and run.
    Check,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_takes_tool_name() {
        let args = CliArgs::try_parse_from(["cait", "--config", "x.toml", "run", "restart"])
            .expect("valid args");
        assert_eq!(args.config, "x.toml");
        match args.command {
            Command::Run { tool } => assert_eq!(tool, "restart"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_defaults_to_cait_toml() {
        let args = CliArgs::try_parse_from(["cait", "check"]).expect("valid args");
        assert_eq!(args.config, "Cait.toml");
        assert!(args.log_level.is_none());
    }
}
