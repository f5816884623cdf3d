//! External compiler process plumbing for the lesser pipeline.

pub mod runner;

pub use runner::{CompilerOutput, CompilerRunner, MockCompile, MockCompiler, PipeError, ShellCompiler};
