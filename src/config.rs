//! Configuration for invoking the AsciiDoc toolchain.
//!
//! Everything that varies between installations (where AsciiDoc lives, which
//! interpreter runs it, where it runs, extra document attributes) is held in
//! [`InvokerConfig`], built via its [`InvokerConfigBuilder`]. The config is
//! read-only during a conversion; the per-call interpreter state is built
//! fresh from it each time (see [`crate::executor::ExecutionContext`]).

use crate::error::AsciiDocError;
use crate::observer::{InvocationObserver, Observer};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Install directory used when none is configured.
pub const DEFAULT_ASCIIDOC_HOME: &str = "./asciidoc-8.6.7";

/// Entry script for the primary renderer.
pub const DEFAULT_RENDERER_SCRIPT: &str = "asciidoc.py";

/// Entry script for the post-processor.
pub const DEFAULT_POST_PROCESSOR_SCRIPT: &str = "a2x.py";

/// Interpreter used to run the scripts when none is configured.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Configuration for a conversion.
///
/// Built via [`InvokerConfig::builder()`] or using
/// [`InvokerConfig::default()`].
///
/// # Example
/// ```rust
/// use asciidoc_shim::InvokerConfig;
///
/// let config = InvokerConfig::builder()
///     .asciidoc_home("/opt/asciidoc")
///     .interpreter("python2")
///     .attribute("icons")
///     .build()
///     .unwrap();
/// assert_eq!(config.extra_attributes, vec!["icons".to_string()]);
/// ```
#[derive(Clone)]
pub struct InvokerConfig {
    /// Directory containing the AsciiDoc entry scripts. Default: `./asciidoc-8.6.7`.
    pub asciidoc_home: PathBuf,

    /// File name of the renderer script inside `asciidoc_home`. Default: `asciidoc.py`.
    pub renderer_script: String,

    /// File name of the post-processor script inside `asciidoc_home`. Default: `a2x.py`.
    pub post_processor_script: String,

    /// Interpreter program, resolved through `PATH` when not absolute. Default: `python`.
    pub interpreter: PathBuf,

    /// Working directory for the processor. `None` inherits the caller's.
    pub working_dir: Option<PathBuf>,

    /// Extra `-a<attr>` flags for backend-style modes (e.g. `icons`,
    /// `data-uri`, `theme=default`). Appended after `-apygments`.
    pub extra_attributes: Vec<String>,

    /// Reject output modes outside the known set instead of passing them
    /// through to `a2x.py` as `-f<format>`. Default: false.
    pub strict_modes: bool,

    /// Receives invocation events. Default: none.
    pub observer: Option<Observer>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            asciidoc_home: PathBuf::from(DEFAULT_ASCIIDOC_HOME),
            renderer_script: DEFAULT_RENDERER_SCRIPT.to_string(),
            post_processor_script: DEFAULT_POST_PROCESSOR_SCRIPT.to_string(),
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            working_dir: None,
            extra_attributes: Vec::new(),
            strict_modes: false,
            observer: None,
        }
    }
}

impl fmt::Debug for InvokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokerConfig")
            .field("asciidoc_home", &self.asciidoc_home)
            .field("renderer_script", &self.renderer_script)
            .field("post_processor_script", &self.post_processor_script)
            .field("interpreter", &self.interpreter)
            .field("working_dir", &self.working_dir)
            .field("extra_attributes", &self.extra_attributes)
            .field("strict_modes", &self.strict_modes)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn InvocationObserver>"),
            )
            .finish()
    }
}

impl InvokerConfig {
    /// Create a new builder for `InvokerConfig`.
    pub fn builder() -> InvokerConfigBuilder {
        InvokerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Path of the renderer script (not yet made absolute).
    pub fn renderer_path(&self) -> PathBuf {
        self.asciidoc_home.join(&self.renderer_script)
    }

    /// Path of the post-processor script (not yet made absolute).
    pub fn post_processor_path(&self) -> PathBuf {
        self.asciidoc_home.join(&self.post_processor_script)
    }
}

/// Builder for [`InvokerConfig`].
#[derive(Debug)]
pub struct InvokerConfigBuilder {
    config: InvokerConfig,
}

impl InvokerConfigBuilder {
    pub fn asciidoc_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.asciidoc_home = dir.into();
        self
    }

    pub fn renderer_script(mut self, name: impl Into<String>) -> Self {
        self.config.renderer_script = name.into();
        self
    }

    pub fn post_processor_script(mut self, name: impl Into<String>) -> Self {
        self.config.post_processor_script = name.into();
        self
    }

    pub fn interpreter(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.interpreter = program.into();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    /// Add one extra document attribute, without the `-a` prefix.
    pub fn attribute(mut self, attr: impl Into<String>) -> Self {
        self.config.extra_attributes.push(attr.into());
        self
    }

    pub fn attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_attributes
            .extend(attrs.into_iter().map(Into::into));
        self
    }

    pub fn strict_modes(mut self, v: bool) -> Self {
        self.config.strict_modes = v;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn InvocationObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<InvokerConfig, AsciiDocError> {
        let c = &self.config;
        validate_script_name("renderer script", &c.renderer_script)?;
        validate_script_name("post-processor script", &c.post_processor_script)?;
        if c.interpreter.as_os_str().is_empty() {
            return Err(AsciiDocError::InvalidConfig("interpreter must not be empty".into()));
        }
        for attr in &c.extra_attributes {
            if attr.is_empty() {
                return Err(AsciiDocError::InvalidConfig("attributes must not be empty".into()));
            }
            if attr.starts_with('-') {
                return Err(AsciiDocError::InvalidConfig(format!(
                    "attribute '{attr}' must be given without the leading '-a'"
                )));
            }
        }
        Ok(self.config)
    }
}

/// Script names are plain file names inside `asciidoc_home`.
fn validate_script_name(what: &str, name: &str) -> Result<(), AsciiDocError> {
    if name.is_empty() {
        return Err(AsciiDocError::InvalidConfig(format!("{what} must not be empty")));
    }
    if name.contains('\\') || Path::new(name).file_name() != Some(OsStr::new(name)) {
        return Err(AsciiDocError::InvalidConfig(format!(
            "{what} '{name}' must be a file name, not a path"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    #[test]
    fn defaults_match_bundled_install() {
        let c = InvokerConfig::default();
        assert_eq!(c.asciidoc_home, PathBuf::from("./asciidoc-8.6.7"));
        assert_eq!(c.renderer_path(), PathBuf::from("./asciidoc-8.6.7/asciidoc.py"));
        assert_eq!(c.post_processor_path(), PathBuf::from("./asciidoc-8.6.7/a2x.py"));
        assert_eq!(c.interpreter, PathBuf::from("python"));
        assert!(c.extra_attributes.is_empty());
        assert!(!c.strict_modes);
        assert!(c.working_dir.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = InvokerConfig::builder()
            .asciidoc_home("/opt/asciidoc")
            .interpreter("/usr/bin/python2")
            .working_dir("/tmp")
            .attribute("icons")
            .attributes(["data-uri", "theme=default"])
            .strict_modes(true)
            .observer(Arc::new(NoopObserver))
            .build()
            .unwrap();
        assert_eq!(c.renderer_path(), PathBuf::from("/opt/asciidoc/asciidoc.py"));
        assert_eq!(c.interpreter, PathBuf::from("/usr/bin/python2"));
        assert_eq!(c.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(c.extra_attributes, vec!["icons", "data-uri", "theme=default"]);
        assert!(c.strict_modes);
        assert!(c.observer.is_some());
    }

    #[test]
    fn rejects_script_paths() {
        let err = InvokerConfig::builder()
            .renderer_script("bin/asciidoc.py")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("file name"), "got: {err}");
    }

    #[test]
    fn rejects_empty_script() {
        assert!(InvokerConfig::builder()
            .post_processor_script("")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_empty_interpreter() {
        assert!(InvokerConfig::builder().interpreter("").build().is_err());
    }

    #[test]
    fn rejects_prefixed_attribute() {
        let err = InvokerConfig::builder()
            .attribute("-aicons")
            .build()
            .unwrap_err();
        assert!(matches!(err, AsciiDocError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_observer() {
        let c = InvokerConfig::builder()
            .observer(Arc::new(NoopObserver))
            .build()
            .unwrap();
        let s = format!("{c:?}");
        assert!(s.contains("<dyn InvocationObserver>"), "got: {s}");
    }
}
