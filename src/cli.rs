// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Build command used when `--command` is not given.
pub const DEFAULT_COMMAND: &str = "cargo build";

/// Command-line arguments for `buildwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buildwatch",
    version,
    about = "Re-run a build command whenever files in the current directory change.",
    long_about = None
)]
pub struct CliArgs {
    /// Shell command to run on startup, on every relevant change and on
    /// every line read from stdin.
    #[arg(short, long, value_name = "CMD", default_value = DEFAULT_COMMAND)]
    pub command: String,

    /// Ignore changes whose path contains this substring.
    ///
    /// May be given multiple times; entries are appended to the default
    /// ignore list.
    #[arg(short, long = "ignore", value_name = "SUBSTRING")]
    pub ignore: Vec<String>,

    /// Do not seed the ignore list with the built-in defaults
    /// (`.git`, `.hg`, `.svn`, `.cache`, `target/`).
    ///
    /// Defaults are plain substrings too: `.git` also hides `.gitignore`.
    #[arg(long)]
    pub no_default_ignore: bool,

    /// Never run two builds at the same time, even when a stdin trigger
    /// arrives while a change-triggered build is running.
    #[arg(long)]
    pub serialize_builds: bool,

    /// Also watch directories created after startup.
    #[arg(long)]
    pub watch_new_dirs: bool,

    /// Disable ANSI colors in status output.
    #[arg(long)]
    pub no_color: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration, but don't watch or build.
    #[arg(long)]
    pub dry_run: bool,
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
