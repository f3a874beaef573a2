//! Error types for the asciidoc-shim library.
//!
//! Every failure is fatal for the conversion it belongs to: there is no
//! partial output to salvage when the external processor misbehaves. The
//! variants split along the stages of a call:
//!
//! * **Planning**: an unknown output mode (strict mode only) or an invalid
//!   [`crate::config::InvokerConfig`].
//! * **Loading**: the processor script could not be read. Nothing runs.
//! * **Executing**: the interpreter could not be started, or the processor
//!   itself exited with a failure status. These are surfaced as-is, without
//!   translation of the processor's own diagnostics (which it already wrote to
//!   stderr).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the asciidoc-shim library.
#[derive(Debug, Error)]
pub enum AsciiDocError {
    // ── Planning errors ───────────────────────────────────────────────────
    /// Output mode is not one of the known AsciiDoc backends/formats.
    ///
    /// Only returned when `strict_modes` is enabled; otherwise unknown
    /// strings are passed through to `a2x.py` as `-f<format>`.
    #[error(
        "Unknown output mode '{mode}'\n\
Expected one of: docbook45, xhtml11, html4, html5, slidy, wordpress, latex."
    )]
    UnknownMode { mode: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Loading errors ────────────────────────────────────────────────────
    /// The processor script could not be read.
    #[error(
        "Cannot read AsciiDoc processor '{path}': {source}\n\
Check that --asciidoc-home points at an AsciiDoc installation."
    )]
    ProcessorUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Execution errors ──────────────────────────────────────────────────
    /// The interpreter process could not be spawned or waited on.
    #[error("Failed to run interpreter '{interpreter}': {source}\nIs it installed and on PATH?")]
    InterpreterSpawn {
        interpreter: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The processor ran but exited unsuccessfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("{program} failed ({})", exit_description(.code))]
    ExecutionFailed { program: PathBuf, code: Option<i32> },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error, e.g. the staged source could not be written.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "terminated by signal".to_string(),
    }
}
