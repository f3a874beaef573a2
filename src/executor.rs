//! Running a processor script inside an interpreter.
//!
//! The AsciiDoc scripts expect to be the main program: they read `sys.argv`,
//! locate their configuration files relative to `__file__`, and import
//! sibling modules. [`ExecutionContext`] carries exactly that state. It is
//! built fresh for every conversion and handed to a [`ScriptExecutor`], so
//! nothing about one run can leak into the next.
//!
//! [`PythonExecutor`] is the production executor. It stages the script source
//! in a temp file, starts the configured interpreter with a small bootstrap,
//! and lets the bootstrap install `sys.argv`, `sys.path` and `__file__` before
//! `exec`ing the source as `__main__`. Stdin, stdout and stderr are all
//! inherited: a document path of `-` reads the caller's stdin, and the
//! processor's diagnostics reach the user unchanged.

use crate::error::AsciiDocError;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Per-call interpreter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Invocation arguments; `argv[0]` is the program's own path.
    pub argv: Vec<OsString>,
    /// Value bound to `__file__` while the script runs.
    pub script_path: PathBuf,
    /// Directory the script runs in. `None` inherits the caller's.
    pub working_dir: Option<PathBuf>,
    /// Module search paths placed first on `sys.path`.
    pub search_paths: Vec<PathBuf>,
}

impl ExecutionContext {
    /// Context for running `script_path` with `arguments`.
    ///
    /// The script's directory becomes the first search path, mirroring what an
    /// interpreter does when it is started on a script file directly.
    pub fn new(script_path: impl Into<PathBuf>, arguments: &[String]) -> Self {
        let script_path = script_path.into();
        let argv = std::iter::once(script_path.as_os_str().to_os_string())
            .chain(arguments.iter().map(OsString::from))
            .collect();
        let search_paths = script_path
            .parent()
            .map(|p| vec![p.to_path_buf()])
            .unwrap_or_default();
        Self {
            argv,
            script_path,
            working_dir: None,
            search_paths,
        }
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }
}

/// Executes script source as a standalone program.
///
/// The source is raw bytes: the interpreter, not the caller, decides how it
/// is encoded. Implementations must block until the script finishes and
/// return an error for any fault raised inside it.
pub trait ScriptExecutor: Send + Sync {
    fn execute(&self, context: &ExecutionContext, source: &[u8]) -> Result<(), AsciiDocError>;
}

/// Bootstrap run with `python -c`. Expects the staged source file, `__file__`,
/// then the script argv as arguments; the search paths arrive via
/// [`SEARCH_PATH_ENV`].
const BOOTSTRAP: &str = r#"import os, sys
_staged = sys.argv[1]
_file = sys.argv[2]
sys.argv = sys.argv[3:]
_extra = [p for p in os.environ.pop('ASCIIDOC_SHIM_SEARCH_PATH', '').split(os.pathsep) if p]
sys.path[0:1] = _extra
with open(_staged, 'rb') as _f:
    _source = _f.read()
_globals = {'__name__': '__main__', '__file__': _file, '__builtins__': __builtins__}
exec(compile(_source, _file, 'exec'), _globals)
"#;

/// Environment variable used to hand search paths to [`BOOTSTRAP`].
const SEARCH_PATH_ENV: &str = "ASCIIDOC_SHIM_SEARCH_PATH";

/// Runs scripts with an external Python interpreter.
#[derive(Debug, Clone)]
pub struct PythonExecutor {
    interpreter: PathBuf,
}

impl PythonExecutor {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    fn command(
        &self,
        context: &ExecutionContext,
        staged_source: &Path,
    ) -> Result<Command, AsciiDocError> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-c")
            .arg(BOOTSTRAP)
            .arg(staged_source)
            .arg(&context.script_path)
            .args(&context.argv)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let search_path = std::env::join_paths(&context.search_paths)
            .map_err(|e| self.spawn_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        cmd.env(SEARCH_PATH_ENV, search_path);

        if let Some(dir) = &context.working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }

    fn spawn_error(&self, source: io::Error) -> AsciiDocError {
        AsciiDocError::InterpreterSpawn {
            interpreter: self.interpreter.clone(),
            source,
        }
    }
}

impl Default for PythonExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INTERPRETER)
    }
}

impl ScriptExecutor for PythonExecutor {
    fn execute(&self, context: &ExecutionContext, source: &[u8]) -> Result<(), AsciiDocError> {
        // Removed when `staged` drops, after the child has exited.
        let mut staged = tempfile::Builder::new()
            .prefix("asciidoc-shim-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| AsciiDocError::Internal(format!("tempfile: {e}")))?;
        staged
            .write_all(source)
            .and_then(|()| staged.flush())
            .map_err(|e| AsciiDocError::Internal(format!("tempfile write: {e}")))?;

        let mut cmd = self.command(context, staged.path())?;
        debug!(
            "Spawning {} for {}",
            self.interpreter.display(),
            context.script_path.display()
        );

        let status = cmd.status().map_err(|e| self.spawn_error(e))?;
        if status.success() {
            Ok(())
        } else {
            Err(AsciiDocError::ExecutionFailed {
                program: context.script_path.clone(),
                code: status.code(),
            })
        }
    }
}
