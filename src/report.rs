// src/report.rs

//! User-facing status lines on stdout.
//!
//! Informational lines are dark grey, error output is plain. Colors are
//! cosmetic; with colors off the text is identical minus escape codes.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use is_terminal::IsTerminal;
use tracing::warn;

use crate::exec::BuildOutcome;

pub const WATCHING_NOTICE: &str = "Watching for changes...";
pub const SUCCESS_NOTICE: &str = "Build successful, no errors found.";
pub const FAILURE_LABEL: &str = "Errors found:";

/// Shared, cloneable writer for status lines.
///
/// Both trigger sources print through clones of the same reporter, and each
/// message is written under one lock so lines never interleave mid-message.
#[derive(Clone)]
pub struct Reporter {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    color: bool,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Reporter on the process stdout.
    ///
    /// Colors are used only if `color_requested`, stdout is a terminal and
    /// `NO_COLOR` is unset.
    pub fn stdout(color_requested: bool) -> Self {
        let color = color_requested
            && io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none();
        Self::with_writer(io::stdout(), color)
    }

    pub fn with_writer(writer: impl Write + Send + 'static, color: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
            color,
        }
    }

    pub fn watching(&self) {
        self.emit(&self.info(WATCHING_NOTICE));
    }

    pub fn change_detected(&self, path: &str) {
        self.emit(&self.info(&format!("Detected change in file: {path}")));
    }

    pub fn build_finished(&self, outcome: &BuildOutcome) {
        if outcome.success {
            self.emit(&self.info(SUCCESS_NOTICE));
            return;
        }

        let label = if self.color {
            FAILURE_LABEL.white().to_string()
        } else {
            FAILURE_LABEL.to_string()
        };
        let mut message = format!("{label}\n").into_bytes();
        message.extend_from_slice(&outcome.output);
        self.emit_bytes(&message);
    }

    fn info(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&self, line: &str) {
        self.emit_bytes(line.as_bytes());
    }

    /// Write `bytes` plus a trailing newline and flush.
    fn emit_bytes(&self, bytes: &[u8]) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let res = out
            .write_all(bytes)
            .and_then(|_| out.write_all(b"\n"))
            .and_then(|_| out.flush());
        if let Err(err) = res {
            warn!(error = %err, "failed to write status output");
        }
    }
}
