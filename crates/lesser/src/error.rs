//! Error types for the compile pipeline.

use std::io;

/// Errors that can occur while compiling a stylesheet.
///
/// These stay internal to the pipeline: the template surface converts every
/// one of them into a soft fallback (logical path, diagnostics text, or an
/// empty string) so page rendering never aborts over a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum LessError {
    /// The logical path did not resolve to a file under any search root.
    #[error("LESS source `{0}` not found by the static finder")]
    SourceNotFound(String),

    /// The compiler produced diagnostics and no output.
    #[error("Compiler failed: {diagnostics}")]
    CompilerFailed {
        /// Whatever the compiler wrote to its error stream.
        diagnostics: String,
    },

    /// The compiler produced neither output nor diagnostics.
    #[error("Compiler produced no output and no diagnostics")]
    CompilerSilent,

    /// Filesystem failure while reading sources or writing artifacts.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Process-level failure invoking the compiler.
    #[error(transparent)]
    Pipe(#[from] lesser_pipe::PipeError),
}
