//! File-based stylesheet compilation.
//!
//! Artifacts are named `<stem>-<hashed-mtime>.css` under an output
//! subdirectory next to the source, so the filename itself encodes
//! freshness: touching the source yields a new name, and anything else
//! sharing the stem is stale. An artifact already present at the expected
//! path is current by construction and skips the compiler entirely.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use lesser_pipe::CompilerRunner;
use tracing::info;

use crate::config::LessConfig;
use crate::error::LessError;
use crate::finder::StaticFinder;
use crate::hash::hashed_mtime;
use crate::urls::UrlRewriter;

/// Compiles static LESS assets into URL-addressable CSS artifacts.
pub struct StylesheetCompiler {
    runner: Arc<dyn CompilerRunner>,
    finder: Arc<dyn StaticFinder>,
    output_dir: String,
    static_url: String,
    include_search_dirs: bool,
}

impl StylesheetCompiler {
    /// Creates a compiler over the given runner and finder.
    pub fn new(
        runner: Arc<dyn CompilerRunner>,
        finder: Arc<dyn StaticFinder>,
        config: &LessConfig,
    ) -> Self {
        Self {
            runner,
            finder,
            output_dir: config.output_dir.clone(),
            static_url: config.static_url.clone(),
            include_search_dirs: config.include_search_dirs,
        }
    }

    /// Compiles a logical asset path, returning the URL of the artifact.
    ///
    /// Compilation is skipped when an artifact with the current
    /// hashed-mtime name already exists. After a successful compile, URLs
    /// in the output are re-anchored and stale sibling artifacts removed.
    pub fn compile(&self, logical: &str) -> Result<String, LessError> {
        let source = self
            .finder
            .find(logical)
            .ok_or_else(|| LessError::SourceNotFound(logical.to_string()))?;

        let directory = source.parent().unwrap_or_else(|| Path::new(""));
        let output_directory = directory.join(&self.output_dir);

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let compiled_filename = format!("{}-{}.css", stem, hashed_mtime(&source)?);
        let output_path = output_directory.join(&compiled_filename);

        if !output_path.exists() {
            let include_paths = if self.include_search_dirs {
                self.finder.search_dirs()
            } else {
                Vec::new()
            };

            let output = self.runner.run(&source, &include_paths)?;
            let css = output.stdout.trim();
            if !css.is_empty() {
                fs::create_dir_all(&output_directory)?;
                let rewriter = UrlRewriter::new(&join_static_url(&self.static_url, logical));
                fs::write(&output_path, rewriter.rewrite(css))?;
                self.remove_stale(&output_directory, &stem, &compiled_filename)?;
            } else if !output.stderr.is_empty() {
                return Err(LessError::CompilerFailed {
                    diagnostics: output.stderr,
                });
            } else {
                return Err(LessError::CompilerSilent);
            }
        }

        Ok(artifact_url(logical, &self.output_dir, &compiled_filename))
    }

    /// Deletes artifacts sharing `stem` other than the one just written,
    /// keeping exactly one current artifact per base filename.
    fn remove_stale(&self, output_directory: &Path, stem: &str, keep: &str) -> Result<(), LessError> {
        let prefix = format!("{}-", stem);
        for entry in fs::read_dir(output_directory)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&prefix) && name.ends_with(".css") && name != keep {
                info!("Removing stale artifact {}", entry.path().display());
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

/// Joins the public static prefix and a logical path with exactly one slash.
fn join_static_url(static_url: &str, logical: &str) -> String {
    format!(
        "{}/{}",
        static_url.trim_end_matches('/'),
        logical.trim_start_matches('/')
    )
}

/// URL of a compiled artifact: logical dirname, output dir, filename.
fn artifact_url(logical: &str, output_dir: &str, filename: &str) -> String {
    match logical.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}/{}", dir, output_dir, filename),
        None => format!("{}/{}", output_dir, filename),
    }
}
