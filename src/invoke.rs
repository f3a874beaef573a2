//! Conversion entry points.
//!
//! A conversion runs through four steps, each of which either completes or
//! stops the call with an [`AsciiDocError`]:
//!
//! 1. **Select**: [`crate::selection::plan`] picks the processor and builds
//!    its arguments.
//! 2. **Load**: the processor's source text is read in full. An unreadable
//!    script fails the call here and nothing is executed.
//! 3. **Execute**: a fresh [`ExecutionContext`] is handed to the
//!    [`ScriptExecutor`] together with the source. Faults from the processor
//!    are returned unchanged.
//! 4. **Report**: elapsed wall-clock time is logged and returned.

use crate::config::InvokerConfig;
use crate::error::AsciiDocError;
use crate::executor::{ExecutionContext, PythonExecutor, ScriptExecutor};
use crate::mode::OutputFormat;
use crate::selection::{plan, ConversionRequest, ProcessorSelection};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// The command line that was run, for display.
    pub command: String,
    pub selection: ProcessorSelection,
    /// Wall-clock time spent inside the processor, in seconds.
    pub elapsed_seconds: f64,
    pub succeeded: bool,
}

impl ExecutionResult {
    pub fn new(selection: ProcessorSelection, elapsed_seconds: f64) -> Self {
        Self {
            command: selection.command_line(),
            selection,
            elapsed_seconds,
            succeeded: true,
        }
    }

    /// One-line status report, e.g. `Executed /opt/asciidoc/a2x.py -flatex doc.txt in 1.234s`.
    pub fn summary(&self) -> String {
        format!("Executed {} in {:.3}s", self.command, self.elapsed_seconds)
    }
}

/// Runs conversions with a fixed configuration and executor.
///
/// Holds no per-call state; every [`Invoker::convert`] builds its own
/// selection and execution context.
#[derive(Clone)]
pub struct Invoker {
    config: InvokerConfig,
    executor: Arc<dyn ScriptExecutor>,
}

impl Invoker {
    /// Invoker that runs scripts with the configured Python interpreter.
    pub fn new(config: InvokerConfig) -> Self {
        let executor = Arc::new(PythonExecutor::new(config.interpreter.clone()));
        Self { config, executor }
    }

    /// Invoker with a caller-supplied executor.
    pub fn with_executor(config: InvokerConfig, executor: Arc<dyn ScriptExecutor>) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Convert `document` into `format`.
    pub fn convert(
        &self,
        document: impl Into<String>,
        format: impl Into<OutputFormat>,
    ) -> Result<ExecutionResult, AsciiDocError> {
        self.run(&ConversionRequest::new(document).with_format(format))
    }

    /// Convert using a format string. Unknown strings are passed through as
    /// `-f<format>` unless `strict_modes` is set.
    pub fn convert_str(
        &self,
        document: impl Into<String>,
        format: &str,
    ) -> Result<ExecutionResult, AsciiDocError> {
        let format = if self.config.strict_modes {
            OutputFormat::parse_strict(format)?
        } else {
            OutputFormat::parse(format)
        };
        self.convert(document, format)
    }

    /// Run a prepared request.
    pub fn run(&self, request: &ConversionRequest) -> Result<ExecutionResult, AsciiDocError> {
        info!("Starting conversion: {} ({})", request.document, request.format);

        let selection = plan(request, &self.config)?;
        let result = self.execute(selection);
        if let (Err(e), Some(obs)) = (&result, &self.config.observer) {
            obs.on_invocation_error(e);
        }
        result
    }

    /// Select without executing.
    pub fn plan(&self, request: &ConversionRequest) -> Result<ProcessorSelection, AsciiDocError> {
        plan(request, &self.config)
    }

    fn execute(&self, selection: ProcessorSelection) -> Result<ExecutionResult, AsciiDocError> {
        let source = load_source(&selection.program_path)?;

        let context = ExecutionContext::new(&selection.program_path, &selection.arguments)
            .with_working_dir(self.config.working_dir.clone());
        debug!("Invocation argv: {:?}", context.argv);

        if let Some(obs) = &self.config.observer {
            obs.on_invocation_start(&selection);
        }

        let start = Instant::now();
        self.executor.execute(&context, &source)?;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        let result = ExecutionResult::new(selection, elapsed_seconds);
        info!("{}", result.summary());

        if let Some(obs) = &self.config.observer {
            obs.on_invocation_complete(&result);
        }
        Ok(result)
    }
}

/// Convert `document` into `format` with the Python interpreter from `config`.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`AsciiDocError::UnknownMode`]: raw format while `strict_modes` is set
/// - [`AsciiDocError::ProcessorUnreadable`]: the selected script cannot be read
/// - [`AsciiDocError::InterpreterSpawn`]: the interpreter could not be started
/// - [`AsciiDocError::ExecutionFailed`]: the processor exited unsuccessfully
pub fn convert(
    document: impl Into<String>,
    format: impl Into<OutputFormat>,
    config: &InvokerConfig,
) -> Result<ExecutionResult, AsciiDocError> {
    Invoker::new(config.clone()).convert(document, format)
}

/// Read the processor's full source as bytes. Decoding is left to the
/// interpreter, which honours the script's own coding declaration.
fn load_source(path: &Path) -> Result<Vec<u8>, AsciiDocError> {
    std::fs::read(path).map_err(|source| AsciiDocError::ProcessorUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{OutputMode, Processor};
    use std::path::PathBuf;

    fn selection() -> ProcessorSelection {
        ProcessorSelection {
            format: OutputMode::Docbook45.into(),
            processor: Processor::PostProcessor,
            program_path: PathBuf::from("/opt/asciidoc/a2x.py"),
            arguments: vec!["-fdocbook45".into(), "doc.txt".into()],
        }
    }

    #[test]
    fn result_summary_names_command_and_time() {
        let r = ExecutionResult::new(selection(), 1.5);
        assert!(r.succeeded);
        assert_eq!(r.command, "/opt/asciidoc/a2x.py -fdocbook45 doc.txt");
        assert_eq!(
            r.summary(),
            "Executed /opt/asciidoc/a2x.py -fdocbook45 doc.txt in 1.500s"
        );
    }

    #[test]
    fn result_serialises_to_json() {
        let r = ExecutionResult::new(selection(), 0.25);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["succeeded"], true);
        assert_eq!(v["selection"]["processor"], "post_processor");
        assert_eq!(v["selection"]["format"], "docbook45");
    }

    #[test]
    fn missing_script_is_unreadable() {
        let err = load_source(Path::new("/definitely/not/here/asciidoc.py")).unwrap_err();
        assert!(matches!(err, AsciiDocError::ProcessorUnreadable { .. }));
    }

    #[test]
    fn source_is_loaded_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asciidoc.py");
        let latin1 = b"# -*- coding: latin-1 -*-\n# caf\xE9\n".to_vec();
        std::fs::write(&path, &latin1).unwrap();

        assert_eq!(load_source(&path).unwrap(), latin1);
    }

    #[test]
    fn convert_str_is_strict_when_configured() {
        let config = InvokerConfig::builder().strict_modes(true).build().unwrap();
        let err = Invoker::new(config).convert_str("d.adoc", "pdf").unwrap_err();
        assert!(matches!(err, AsciiDocError::UnknownMode { .. }));
    }
}
