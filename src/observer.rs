//! Observer trait for invocation events.
//!
//! Inject an [`Arc<dyn InvocationObserver>`] via
//! [`crate::config::InvokerConfigBuilder::observer`] to be told when the
//! external processor starts and how it finished. The CLI uses this to run a
//! spinner while AsciiDoc works; a build tool could forward the events to its
//! own logger instead.
//!
//! # Example
//!
//! ```rust
//! use asciidoc_shim::{ExecutionResult, InvocationObserver, InvokerConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     finished: AtomicUsize,
//! }
//!
//! impl InvocationObserver for CountingObserver {
//!     fn on_invocation_complete(&self, result: &ExecutionResult) {
//!         self.finished.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} took {:.3}s", result.command, result.elapsed_seconds);
//!     }
//! }
//!
//! let config = InvokerConfig::builder()
//!     .observer(Arc::new(CountingObserver { finished: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::AsciiDocError;
use crate::invoke::ExecutionResult;
use crate::selection::ProcessorSelection;
use std::sync::Arc;

/// Called by the invoker around each processor execution.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// config that carries them may be shared across threads.
pub trait InvocationObserver: Send + Sync {
    /// Called after the processor source was loaded, just before it runs.
    fn on_invocation_start(&self, selection: &ProcessorSelection) {
        let _ = selection;
    }

    /// Called when the processor finished successfully.
    fn on_invocation_complete(&self, result: &ExecutionResult) {
        let _ = result;
    }

    /// Called when loading or running the processor failed. The error is
    /// still returned to the caller afterwards.
    fn on_invocation_error(&self, error: &AsciiDocError) {
        let _ = error;
    }
}

/// An observer that ignores every event.
pub struct NoopObserver;

impl InvocationObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::InvokerConfig`].
pub type Observer = Arc<dyn InvocationObserver>;
