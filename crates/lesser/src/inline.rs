//! Inline snippet compilation.
//!
//! Template blocks hand over LESS text at render time; the snippet goes
//! through a temporary file into the external compiler, and the result
//! flows straight back into the page. With caching enabled, an unchanged
//! snippet never reaches the compiler twice while its cache entry lives.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use lesser_pipe::CompilerRunner;
use tracing::error;

use crate::cache::TextCache;
use crate::error::LessError;
use crate::hash::cache_key;

/// Compiles LESS snippets captured from template blocks.
pub struct InlineCompiler {
    runner: Arc<dyn CompilerRunner>,
    cache: Option<Arc<dyn TextCache>>,
    cache_ttl: Duration,
}

impl InlineCompiler {
    /// Creates a compiler without caching.
    pub fn new(runner: Arc<dyn CompilerRunner>, cache_ttl: Duration) -> Self {
        Self {
            runner,
            cache: None,
            cache_ttl,
        }
    }

    /// Enables caching of compiled snippets, keyed by a content hash of
    /// the uncompiled text.
    pub fn with_cache(mut self, cache: Arc<dyn TextCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Compiles a snippet, returning compiled CSS, the compiler's own
    /// diagnostics, or an empty string.
    ///
    /// Diagnostics deliberately flow into the page in place of output, so
    /// a broken snippet is visible where it was written. Invocation
    /// failures degrade to an empty string; rendering never aborts over a
    /// stylesheet.
    pub fn render(&self, source: &str) -> String {
        if let Some(cache) = &self.cache {
            let key = cache_key(source);
            if let Some(cached) = cache.get(&key) {
                return cached;
            }
            let output = self.compile(source);
            cache.set(&key, &output, self.cache_ttl);
            return output;
        }
        self.compile(source)
    }

    fn compile(&self, source: &str) -> String {
        match self.try_compile(source) {
            Ok(output) => output,
            Err(err) => {
                error!("inline LESS compilation failed: {err}");
                String::new()
            }
        }
    }

    fn try_compile(&self, source: &str) -> Result<String, LessError> {
        // The temp file lives exactly as long as the invocation; drop
        // removes it on every exit path.
        let mut file = tempfile::Builder::new().suffix(".less").tempfile()?;
        file.write_all(source.as_bytes())?;
        file.flush()?;

        let output = self.runner.run(file.path(), &[])?;
        if !output.stdout.is_empty() {
            Ok(output.stdout)
        } else if !output.stderr.is_empty() {
            Ok(output.stderr)
        } else {
            Ok(String::new())
        }
    }
}
