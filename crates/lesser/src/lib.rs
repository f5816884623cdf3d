//! # Lesser - LESS stylesheets for template-rendered pages
//!
//! Lesser compiles LESS to CSS by shelling out to an external compiler,
//! caches what it compiled, and fixes up relative `url(...)` references so
//! the output can be served from its artifact directory. It provides:
//!
//! - A MiniJinja function `less(path)` that resolves a static asset,
//!   compiles it when stale, and returns the URL of the compiled artifact
//! - A MiniJinja filter `inlineless` that compiles LESS blocks in place,
//!   with content-hash caching
//! - Mtime-keyed artifact names (`app-<hash>.css`) so freshness lives in
//!   the filename, plus garbage collection of stale siblings
//! - A fail-soft policy throughout: a broken stylesheet degrades to an
//!   unchanged link or visible diagnostics, never an aborted render
//!
//! This crate is not a LESS implementation. It never parses LESS; it runs
//! the compiler you point it at and manages the text and files that come
//! back.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use lesser::{DirFinder, LessConfig, StylesheetPipeline};
//!
//! let mut finder = DirFinder::new();
//! finder.add_root("./static")?;
//!
//! let config = LessConfig::default().executable("lessc");
//! let pipeline = Arc::new(StylesheetPipeline::new(config, Arc::new(finder)));
//!
//! let mut env = minijinja::Environment::new();
//! lesser::register_template_support(&mut env, pipeline);
//!
//! let html = env.render_str(
//!     r#"<link rel="stylesheet" href="{{ less('css/app.less') }}">"#,
//!     minijinja::context! {},
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Swapping the seams
//!
//! The pipeline talks to the outside world through three traits, each with
//! a default implementation: [`CompilerRunner`] (spawns the executable),
//! [`StaticFinder`] (maps logical paths to files), and [`TextCache`]
//! (stores compiled inline snippets). Tests and unusual deployments can
//! substitute any of them.

pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod hash;
pub mod inline;
pub mod pipeline;
pub mod stylesheet;
pub mod template;
pub mod urls;

pub use cache::{MemoryCache, TextCache};
pub use config::LessConfig;
pub use error::LessError;
pub use finder::{DirFinder, StaticFinder};
pub use inline::InlineCompiler;
pub use pipeline::StylesheetPipeline;
pub use stylesheet::StylesheetCompiler;
pub use template::register_template_support;
pub use urls::UrlRewriter;

// Re-exported so consumers configure runners without naming the pipe crate.
pub use lesser_pipe::{CompilerOutput, CompilerRunner, MockCompiler, PipeError, ShellCompiler};
