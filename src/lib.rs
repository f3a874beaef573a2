//! # asciidoc-shim
//!
//! Run the AsciiDoc toolchain (`asciidoc.py` and `a2x.py`) from Rust.
//!
//! The conversion itself belongs entirely to AsciiDoc. This crate decides
//! which of the two entry scripts handles a given output mode, builds the
//! argument vector that script expects, runs it in a freshly prepared
//! interpreter context, and reports how long it took.
//!
//! ## Flow
//!
//! ```text
//! (document, mode)
//!  │
//!  ├─ 1. Select   html5 → asciidoc.py, everything else → a2x.py
//!  ├─ 2. Args     html5/xhtml11 → -b<mode> -atoc2 -apygments, others → -f<mode>
//!  ├─ 3. Load     read the script source (unreadable → error, nothing runs)
//!  ├─ 4. Execute  interpreter with argv = [script, args…], __file__ = script
//!  └─ 5. Report   "Executed <command> in <secs>s"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use asciidoc_shim::{convert, InvokerConfig, OutputMode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InvokerConfig::builder()
//!         .asciidoc_home("/opt/asciidoc-8.6.7")
//!         .build()?;
//!     let result = convert("sample.asciidoc", OutputMode::Docbook45, &config)?;
//!     eprintln!("{}", result.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `asciidoc-shim` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod executor;
pub mod invoke;
pub mod mode;
pub mod observer;
pub mod selection;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{InvokerConfig, InvokerConfigBuilder};
pub use error::AsciiDocError;
pub use executor::{ExecutionContext, PythonExecutor, ScriptExecutor};
pub use invoke::{convert, ExecutionResult, Invoker};
pub use mode::{ArgumentStyle, ModePlan, OutputFormat, OutputMode, Processor};
pub use observer::{InvocationObserver, NoopObserver, Observer};
pub use selection::{plan, ConversionRequest, ProcessorSelection};
