//! Output modes and the decision table that maps them onto processors.
//!
//! AsciiDoc ships two entry scripts. `asciidoc.py` renders a backend
//! (`-b<backend>`) directly; `a2x.py` drives the toolchain for everything that
//! needs a post-processing step (`-f<format>`). Which script runs and how its
//! arguments are shaped are two separate decisions, and they do **not** line up:
//!
//! | Mode      | Processor             | Arguments                                |
//! |-----------|-----------------------|------------------------------------------|
//! | `html5`   | renderer (`asciidoc`) | `-bhtml5 -atoc2 -apygments <doc>`        |
//! | `xhtml11` | post-processor (`a2x`)| `-bxhtml11 -atoc2 -apygments <doc>`      |
//! | other     | post-processor (`a2x`)| `-f<mode> <doc>`                         |
//!
//! Both decisions live in [`OutputMode::plan`] so they cannot drift apart.

use crate::error::AsciiDocError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the output modes AsciiDoc understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Docbook45,
    Xhtml11,
    Html4,
    /// Default mode; the only one rendered by `asciidoc.py` itself.
    #[default]
    Html5,
    Slidy,
    Wordpress,
    Latex,
}

impl OutputMode {
    /// Every known mode, in declaration order.
    pub const ALL: [OutputMode; 7] = [
        OutputMode::Docbook45,
        OutputMode::Xhtml11,
        OutputMode::Html4,
        OutputMode::Html5,
        OutputMode::Slidy,
        OutputMode::Wordpress,
        OutputMode::Latex,
    ];

    /// The name passed to AsciiDoc (`-b<name>` / `-f<name>`).
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Docbook45 => "docbook45",
            OutputMode::Xhtml11 => "xhtml11",
            OutputMode::Html4 => "html4",
            OutputMode::Html5 => "html5",
            OutputMode::Slidy => "slidy",
            OutputMode::Wordpress => "wordpress",
            OutputMode::Latex => "latex",
        }
    }

    /// Look up which processor runs this mode and how its arguments are built.
    ///
    /// `xhtml11` is routed to the post-processor while still receiving
    /// backend-style arguments. Keep it that way unless the product owner says
    /// otherwise.
    pub fn plan(self) -> ModePlan {
        match self {
            OutputMode::Html5 => ModePlan {
                processor: Processor::Renderer,
                style: ArgumentStyle::Backend,
            },
            OutputMode::Xhtml11 => ModePlan {
                processor: Processor::PostProcessor,
                style: ArgumentStyle::Backend,
            },
            OutputMode::Docbook45
            | OutputMode::Html4
            | OutputMode::Slidy
            | OutputMode::Wordpress
            | OutputMode::Latex => ModePlan {
                processor: Processor::PostProcessor,
                style: ArgumentStyle::Format,
            },
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = AsciiDocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AsciiDocError::UnknownMode { mode: s.to_string() })
    }
}

/// The format requested for a conversion: a known mode, or a raw string that
/// is handed to `a2x.py` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OutputFormat {
    Mode(OutputMode),
    Raw(String),
}

impl OutputFormat {
    /// Parse leniently: anything that is not a known mode becomes [`OutputFormat::Raw`].
    pub fn parse(s: &str) -> Self {
        match s.parse::<OutputMode>() {
            Ok(mode) => OutputFormat::Mode(mode),
            Err(_) => OutputFormat::Raw(s.to_string()),
        }
    }

    /// Parse strictly: unknown strings are an [`AsciiDocError::UnknownMode`].
    pub fn parse_strict(s: &str) -> Result<Self, AsciiDocError> {
        s.parse::<OutputMode>().map(OutputFormat::Mode)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Mode(m) => m.as_str(),
            OutputFormat::Raw(s) => s,
        }
    }

    /// Raw formats always take the post-processor with `-f<format>`.
    pub fn plan(&self) -> ModePlan {
        match self {
            OutputFormat::Mode(m) => m.plan(),
            OutputFormat::Raw(_) => ModePlan {
                processor: Processor::PostProcessor,
                style: ArgumentStyle::Format,
            },
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Mode(OutputMode::default())
    }
}

impl From<OutputMode> for OutputFormat {
    fn from(mode: OutputMode) -> Self {
        OutputFormat::Mode(mode)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which AsciiDoc entry script handles a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Processor {
    /// `asciidoc.py`
    Renderer,
    /// `a2x.py`
    PostProcessor,
}

/// How the processor's argument vector is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStyle {
    /// `-b<mode> -atoc2 -apygments [-a<attr>...] <doc>`
    Backend,
    /// `-f<mode> <doc>`
    Format,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePlan {
    pub processor: Processor,
    pub style: ArgumentStyle,
}
