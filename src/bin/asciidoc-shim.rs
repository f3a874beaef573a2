//! CLI binary for asciidoc-shim.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `InvokerConfig` and prints the timing line.

use anyhow::{Context, Result};
use asciidoc_shim::{
    AsciiDocError, ConversionRequest, ExecutionResult, InvocationObserver, Invoker,
    InvokerConfig, Observer, OutputFormat, ProcessorSelection,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status for usage errors (`exit(-1)` as seen by the shell).
const USAGE_EXIT: u8 = 255;

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Shows a spinner while the processor runs. AsciiDoc writes its own
/// warnings to stderr, so the bar is cleared as soon as the run ends.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("AsciiDoc");
        Arc::new(Self { bar })
    }
}

impl InvocationObserver for CliObserver {
    fn on_invocation_start(&self, selection: &ProcessorSelection) {
        let script = selection
            .program_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(format!("{script} → {}", selection.format));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_invocation_complete(&self, _result: &ExecutionResult) {
        self.bar.finish_and_clear();
    }

    fn on_invocation_error(&self, _error: &AsciiDocError) {
        self.bar.finish_and_clear();
    }
}

/// Run asciidoc.py / a2x.py on a document.
#[derive(Parser, Debug)]
#[command(
    name = "asciidoc-shim",
    version,
    about = "Run the AsciiDoc toolchain (asciidoc.py / a2x.py) on a document",
    long_about = "Runs asciidoc.py for html5 output and a2x.py for every other mode \
(docbook45, xhtml11, html4, slidy, wordpress, latex), then reports how long it took.",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// AsciiDoc source document.
    document: Option<String>,

    /// Output mode: docbook45, xhtml11, html4, html5, slidy, wordpress, latex.
    #[arg(default_value = "html5")]
    mode: String,

    /// Directory containing asciidoc.py and a2x.py.
    #[arg(long, env = "ASCIIDOC_HOME", default_value = asciidoc_shim::config::DEFAULT_ASCIIDOC_HOME)]
    asciidoc_home: PathBuf,

    /// Python interpreter used to run the scripts.
    #[arg(long, env = "ASCIIDOC_SHIM_PYTHON", default_value = asciidoc_shim::config::DEFAULT_INTERPRETER)]
    python: PathBuf,

    /// Working directory for the processor.
    #[arg(long, env = "ASCIIDOC_SHIM_WORKDIR")]
    workdir: Option<PathBuf>,

    /// Extra document attribute for html5/xhtml11 (e.g. icons, theme=default).
    /// Repeat for several; the value is passed verbatim, commas included.
    #[arg(short = 'a', long = "attribute")]
    attribute: Vec<String>,

    /// Comma-separated list of extra attributes, appended after any `-a`.
    #[arg(long, env = "ASCIIDOC_SHIM_ATTRIBUTES", value_delimiter = ',')]
    attributes: Vec<String>,

    /// Reject output modes outside the known set.
    #[arg(long, env = "ASCIIDOC_SHIM_STRICT")]
    strict: bool,

    /// Print the command that would run, without running it.
    #[arg(long)]
    dry_run: bool,

    /// Print the selection / result as JSON.
    #[arg(long, env = "ASCIIDOC_SHIM_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "ASCIIDOC_SHIM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ASCIIDOC_SHIM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ASCIIDOC_SHIM_QUIET")]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(document) = cli.document.clone() else {
        eprintln!("Expecting a document to process");
        return Ok(ExitCode::from(USAGE_EXIT));
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs repeat what the spinner and the summary line
    // already say, so they are only shown when the spinner is off.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let observer: Option<Observer> = if show_progress {
        Some(CliObserver::new() as Observer)
    } else {
        None
    };
    let config = build_config(&cli, observer)?;

    let format = if config.strict_modes {
        OutputFormat::parse_strict(&cli.mode).context("Invalid output mode")?
    } else {
        OutputFormat::parse(&cli.mode)
    };
    let request = ConversionRequest::new(document).with_format(format);
    let invoker = Invoker::new(config);

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let selection = invoker.plan(&request).context("Failed to select processor")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&selection)
                    .context("Failed to serialise selection")?
            );
        } else {
            println!("{}", selection.command_line());
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let result = invoker.run(&request).context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        println!("{}", result.summary());
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `InvokerConfig`.
fn build_config(cli: &Cli, observer: Option<Observer>) -> Result<InvokerConfig> {
    let mut builder = InvokerConfig::builder()
        .asciidoc_home(&cli.asciidoc_home)
        .interpreter(&cli.python)
        .attributes(cli.attribute.iter().chain(&cli.attributes).cloned())
        .strict_modes(cli.strict);

    if let Some(ref dir) = cli.workdir {
        builder = builder.working_dir(dir);
    }
    if let Some(obs) = observer {
        builder = builder.observer(obs);
    }

    builder.build().context("Invalid configuration")
}
