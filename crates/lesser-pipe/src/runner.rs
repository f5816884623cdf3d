//! Compiler invocation.
//!
//! The pipeline talks to the external LESS compiler through the
//! [`CompilerRunner`] trait. [`ShellCompiler`] is the real implementation;
//! [`MockCompiler`] scripts outcomes for consumer tests without spawning
//! processes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

/// Default bound on a single compiler invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PipeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compiler command is empty")]
    EmptyCommand,
    #[error("Failed to parse compiler command `{0}`: {1}")]
    BadCommand(String, #[source] shell_words::ParseError),
    #[error("Compiler `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Compiler output was not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Captured streams from one compiler invocation.
///
/// Diagnostics are data here, not errors: the pipeline's fail-open policy
/// decides what to do with a non-empty `stderr`. The exit status is not
/// inspected; LESS compilers report everything on their streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Compiled CSS, if the compiler produced any.
    pub stdout: String,
    /// Diagnostic text, if the compiler produced any.
    pub stderr: String,
}

impl CompilerOutput {
    /// Returns `true` if the compiler produced neither output nor diagnostics.
    pub fn is_silent(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// Abstraction over compiler invocation for testability.
pub trait CompilerRunner: Send + Sync {
    /// Returns `true` if the compiler executable can be found.
    fn is_available(&self) -> bool;

    /// Compiles the file at `input`, passing `include_paths` as the
    /// compiler's import search path when non-empty.
    fn run(&self, input: &Path, include_paths: &[PathBuf]) -> Result<CompilerOutput, PipeError>;
}

/// Real compiler runner spawning the configured executable.
///
/// The command string may carry flags (`"lessc --no-color"`); it is split
/// with shell quoting rules before spawning. Include paths are passed as a
/// single `--include-path=` option joined with the platform's path-list
/// separator, and the input file is always the final argument.
#[derive(Debug, Clone)]
pub struct ShellCompiler {
    command: String,
    timeout: Option<Duration>,
}

impl ShellCompiler {
    /// Creates a runner for the given compiler command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Sets the invocation timeout. `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn argv(&self) -> Result<Vec<String>, PipeError> {
        let parts = shell_words::split(&self.command)
            .map_err(|e| PipeError::BadCommand(self.command.clone(), e))?;
        if parts.is_empty() {
            return Err(PipeError::EmptyCommand);
        }
        Ok(parts)
    }
}

impl CompilerRunner for ShellCompiler {
    fn is_available(&self) -> bool {
        match self.argv() {
            Ok(parts) => which::which(&parts[0]).is_ok(),
            Err(_) => false,
        }
    }

    fn run(&self, input: &Path, include_paths: &[PathBuf]) -> Result<CompilerOutput, PipeError> {
        let parts = self.argv()?;
        let (program, args) = parts.split_first().unwrap();

        let mut cmd = Command::new(program);
        cmd.args(args);
        if !include_paths.is_empty() {
            let joined = std::env::join_paths(include_paths).map_err(std::io::Error::other)?;
            cmd.arg(format!("--include-path={}", joined.to_string_lossy()));
        }
        cmd.arg(input);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;

        match self.timeout {
            Some(duration) => {
                if child.wait_timeout(duration)?.is_none() {
                    child.kill()?;
                    child.wait()?;
                    return Err(PipeError::Timeout(self.command.clone(), duration));
                }
            }
            None => {
                child.wait()?;
            }
        }

        let mut stdout = Vec::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_end(&mut stdout)?;
        }
        let mut stderr = Vec::new();
        if let Some(mut err) = child.stderr.take() {
            err.read_to_end(&mut stderr)?;
        }

        Ok(CompilerOutput {
            stdout: String::from_utf8(stdout)?,
            stderr: String::from_utf8(stderr)?,
        })
    }
}

/// The outcome a [`MockCompiler`] is scripted to produce.
#[derive(Debug, Clone)]
pub enum MockCompile {
    /// Succeed with this CSS on stdout.
    Css(String),
    /// Produce only diagnostics on stderr.
    Diagnostics(String),
    /// Produce nothing on either stream.
    Silent,
    /// Succeed with the input file's content as the "compiled" output.
    Echo,
}

/// Scripted compiler for tests.
///
/// Records how many times it was invoked so tests can assert that cache
/// hits and up-to-date artifacts skip compilation.
#[derive(Debug, Clone)]
pub struct MockCompiler {
    result: MockCompile,
    calls: Arc<AtomicUsize>,
}

impl MockCompiler {
    /// A mock that succeeds with the given CSS.
    pub fn with_css(css: impl Into<String>) -> Self {
        Self::scripted(MockCompile::Css(css.into()))
    }

    /// A mock that writes only diagnostics.
    pub fn with_diagnostics(message: impl Into<String>) -> Self {
        Self::scripted(MockCompile::Diagnostics(message.into()))
    }

    /// A mock that produces nothing at all.
    pub fn silent() -> Self {
        Self::scripted(MockCompile::Silent)
    }

    /// A mock whose output is the input file's content.
    pub fn echoing() -> Self {
        Self::scripted(MockCompile::Echo)
    }

    /// A mock with an explicit scripted outcome.
    pub fn scripted(result: MockCompile) -> Self {
        Self {
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `run` was called, across all clones.
    pub fn invocations(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompilerRunner for MockCompiler {
    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, input: &Path, _include_paths: &[PathBuf]) -> Result<CompilerOutput, PipeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            MockCompile::Css(css) => Ok(CompilerOutput {
                stdout: css.clone(),
                stderr: String::new(),
            }),
            MockCompile::Diagnostics(message) => Ok(CompilerOutput {
                stdout: String::new(),
                stderr: message.clone(),
            }),
            MockCompile::Silent => Ok(CompilerOutput::default()),
            MockCompile::Echo => Ok(CompilerOutput {
                stdout: std::fs::read_to_string(input)?,
                stderr: String::new(),
            }),
        }
    }
}
