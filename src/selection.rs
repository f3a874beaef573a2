//! Turning a conversion request into a concrete processor invocation.
//!
//! [`plan`] is pure apart from resolving the script path against the current
//! directory: it never reads or runs anything, which is what makes the CLI's
//! `--dry-run` possible.

use crate::config::InvokerConfig;
use crate::error::AsciiDocError;
use crate::mode::{ArgumentStyle, OutputFormat, Processor};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Attributes every backend-style conversion gets: a level-2 table of
/// contents and pygments syntax highlighting.
const BACKEND_ATTRIBUTES: [&str; 2] = ["-atoc2", "-apygments"];

/// A single document to convert, and into what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Passed to the processor as-is; existence is not checked here.
    pub document: String,
    pub format: OutputFormat,
}

impl ConversionRequest {
    /// Request an `html5` conversion of `document`.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: impl Into<OutputFormat>) -> Self {
        self.format = format.into();
        self
    }
}

/// The processor chosen for a request and the arguments it will receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorSelection {
    pub format: OutputFormat,
    pub processor: Processor,
    /// Absolute path of the entry script.
    pub program_path: PathBuf,
    /// Arguments after the program path.
    pub arguments: Vec<String>,
}

impl ProcessorSelection {
    /// Full invocation vector: the program path followed by the arguments.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.program_path.as_os_str().to_os_string())
            .chain(self.arguments.iter().map(OsString::from))
            .collect()
    }

    /// Human-readable command line, for status output. Lossy for non-UTF-8
    /// paths; use [`Self::argv`] for the exact values.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program_path.display().to_string())
            .chain(self.arguments.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Select the processor for `request` and build its argument vector.
///
/// # Errors
/// - [`AsciiDocError::UnknownMode`] for a raw format when `strict_modes` is set
/// - [`AsciiDocError::ProcessorUnreadable`] if the script path cannot be made
///   absolute (empty path, or the current directory is gone)
pub fn plan(
    request: &ConversionRequest,
    config: &InvokerConfig,
) -> Result<ProcessorSelection, AsciiDocError> {
    if let OutputFormat::Raw(mode) = &request.format {
        if config.strict_modes {
            return Err(AsciiDocError::UnknownMode { mode: mode.clone() });
        }
    }

    let row = request.format.plan();
    let script = match row.processor {
        Processor::Renderer => config.renderer_path(),
        Processor::PostProcessor => config.post_processor_path(),
    };
    let program_path = absolute(&script)?;
    let arguments = build_arguments(
        row.style,
        request.format.as_str(),
        &request.document,
        &config.extra_attributes,
    );

    debug!(
        "Selected {:?} ({}) for '{}' as {}",
        row.processor,
        program_path.display(),
        request.document,
        request.format
    );

    Ok(ProcessorSelection {
        format: request.format.clone(),
        processor: row.processor,
        program_path,
        arguments,
    })
}

/// Build the arguments that follow the program path.
pub fn build_arguments(
    style: ArgumentStyle,
    mode: &str,
    document: &str,
    extra_attributes: &[String],
) -> Vec<String> {
    let mut args = Vec::with_capacity(4 + extra_attributes.len());
    match style {
        ArgumentStyle::Backend => {
            args.push(format!("-b{mode}"));
            args.extend(BACKEND_ATTRIBUTES.iter().map(|a| a.to_string()));
            args.extend(extra_attributes.iter().map(|a| format!("-a{a}")));
        }
        ArgumentStyle::Format => args.push(format!("-f{mode}")),
    }
    args.push(document.to_string());
    args
}

fn absolute(path: &Path) -> Result<PathBuf, AsciiDocError> {
    std::path::absolute(path).map_err(|source| AsciiDocError::ProcessorUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::OutputMode;

    fn config() -> InvokerConfig {
        InvokerConfig::builder()
            .asciidoc_home("/opt/asciidoc")
            .build()
            .unwrap()
    }

    #[test]
    fn default_request_is_html5_on_renderer() {
        let sel = plan(&ConversionRequest::new("sample.asciidoc"), &config()).unwrap();
        assert_eq!(sel.processor, Processor::Renderer);
        assert_eq!(sel.program_path, PathBuf::from("/opt/asciidoc/asciidoc.py"));
        assert_eq!(
            sel.arguments,
            vec!["-bhtml5", "-atoc2", "-apygments", "sample.asciidoc"]
        );
    }

    #[test]
    fn xhtml11_runs_post_processor_with_backend_flags() {
        let req = ConversionRequest::new("sample.asciidoc").with_format(OutputMode::Xhtml11);
        let sel = plan(&req, &config()).unwrap();
        assert_eq!(sel.processor, Processor::PostProcessor);
        assert_eq!(sel.program_path, PathBuf::from("/opt/asciidoc/a2x.py"));
        assert_eq!(
            sel.arguments,
            vec!["-bxhtml11", "-atoc2", "-apygments", "sample.asciidoc"]
        );
    }

    #[test]
    fn format_modes_get_exactly_f_flag_and_document() {
        for mode in OutputMode::ALL {
            if matches!(mode, OutputMode::Html5 | OutputMode::Xhtml11) {
                continue;
            }
            let req = ConversionRequest::new("doc.txt").with_format(mode);
            let sel = plan(&req, &config()).unwrap();
            assert_eq!(sel.processor, Processor::PostProcessor, "mode {mode}");
            assert_eq!(sel.arguments, vec![format!("-f{mode}"), "doc.txt".to_string()]);
        }
    }

    #[test]
    fn backend_modes_never_emit_f_flag() {
        for mode in [OutputMode::Html5, OutputMode::Xhtml11] {
            let req = ConversionRequest::new("doc.txt").with_format(mode);
            let sel = plan(&req, &config()).unwrap();
            assert!(sel.arguments.iter().all(|a| !a.starts_with("-f")));
        }
    }

    #[test]
    fn extra_attributes_follow_pygments_for_backend_modes_only() {
        let cfg = InvokerConfig::builder()
            .asciidoc_home("/opt/asciidoc")
            .attributes(["icons", "theme=default"])
            .build()
            .unwrap();

        let html = plan(&ConversionRequest::new("d.adoc"), &cfg).unwrap();
        assert_eq!(
            html.arguments,
            vec!["-bhtml5", "-atoc2", "-apygments", "-aicons", "-atheme=default", "d.adoc"]
        );

        let latex = plan(
            &ConversionRequest::new("d.adoc").with_format(OutputMode::Latex),
            &cfg,
        )
        .unwrap();
        assert_eq!(latex.arguments, vec!["-flatex", "d.adoc"]);
    }

    #[test]
    fn raw_format_passes_through_to_post_processor() {
        let req = ConversionRequest::new("d.adoc").with_format(OutputFormat::parse("pdf"));
        let sel = plan(&req, &config()).unwrap();
        assert_eq!(sel.processor, Processor::PostProcessor);
        assert_eq!(sel.arguments, vec!["-fpdf", "d.adoc"]);
    }

    #[test]
    fn strict_mode_rejects_raw_format() {
        let cfg = InvokerConfig::builder().strict_modes(true).build().unwrap();
        let req = ConversionRequest::new("d.adoc").with_format(OutputFormat::parse("pdf"));
        assert!(matches!(
            plan(&req, &cfg),
            Err(AsciiDocError::UnknownMode { .. })
        ));
    }

    #[test]
    fn relative_home_is_made_absolute() {
        let sel = plan(&ConversionRequest::new("d.adoc"), &InvokerConfig::default()).unwrap();
        assert!(sel.program_path.is_absolute());
        assert!(sel.program_path.ends_with("asciidoc-8.6.7/asciidoc.py"));
    }

    #[test]
    fn argv_starts_with_program_path() {
        let sel = plan(&ConversionRequest::new("d.adoc"), &config()).unwrap();
        let argv = sel.argv();
        assert_eq!(argv[0], "/opt/asciidoc/asciidoc.py");
        let tail: Vec<OsString> = sel.arguments.iter().map(OsString::from).collect();
        assert_eq!(&argv[1..], tail.as_slice());
        assert_eq!(
            sel.command_line(),
            "/opt/asciidoc/asciidoc.py -bhtml5 -atoc2 -apygments d.adoc"
        );
    }

    #[test]
    fn planning_is_idempotent() {
        let req = ConversionRequest::new("d.adoc").with_format(OutputMode::Slidy);
        assert_eq!(plan(&req, &config()).unwrap(), plan(&req, &config()).unwrap());
    }
}
