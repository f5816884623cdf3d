//! Pipeline assembly and the fail-soft boundary.

use std::sync::Arc;
use std::time::Duration;

use lesser_pipe::{CompilerRunner, ShellCompiler};
use tracing::error;

use crate::cache::{MemoryCache, TextCache};
use crate::config::LessConfig;
use crate::finder::StaticFinder;
use crate::inline::InlineCompiler;
use crate::stylesheet::StylesheetCompiler;

/// The assembled compile pipeline behind the template surface.
///
/// All failure-handling policy lives here, applied exactly once:
/// [`inline`](Self::inline) never fails, and
/// [`stylesheet_url`](Self::stylesheet_url) degrades to the logical path it
/// was given with the cause logged. The worst a stylesheet can do to a page
/// is a broken link or inlined diagnostics, never an aborted render.
pub struct StylesheetPipeline {
    inline: InlineCompiler,
    stylesheets: StylesheetCompiler,
}

impl StylesheetPipeline {
    /// Builds a pipeline that spawns the configured compiler executable.
    pub fn new(config: LessConfig, finder: Arc<dyn StaticFinder>) -> Self {
        let runner = ShellCompiler::new(config.executable.as_str())
            .timeout(config.timeout_secs.map(Duration::from_secs));
        Self::with_runner(config, finder, Arc::new(runner))
    }

    /// Builds a pipeline around an explicit runner.
    ///
    /// This is the test seam: pair it with a mock runner to exercise the
    /// pipeline without a compiler installed.
    pub fn with_runner(
        config: LessConfig,
        finder: Arc<dyn StaticFinder>,
        runner: Arc<dyn CompilerRunner>,
    ) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let mut inline = InlineCompiler::new(Arc::clone(&runner), ttl);
        if config.use_cache {
            inline = inline.with_cache(Arc::new(MemoryCache::new()));
        }
        let stylesheets = StylesheetCompiler::new(runner, finder, &config);
        Self {
            inline,
            stylesheets,
        }
    }

    /// Replaces the inline cache backend, e.g. with a store shared across
    /// processes. Only meaningful when caching is enabled in the config.
    pub fn with_text_cache(mut self, cache: Arc<dyn TextCache>) -> Self {
        self.inline = self.inline.with_cache(cache);
        self
    }

    /// Compiles an inline snippet. See [`InlineCompiler::render`].
    pub fn inline(&self, source: &str) -> String {
        self.inline.render(source)
    }

    /// Returns the URL of the compiled artifact for a logical asset path.
    ///
    /// On any failure the logical path comes back unchanged, so the page
    /// keeps a link to the uncompiled source instead of breaking.
    pub fn stylesheet_url(&self, logical: &str) -> String {
        match self.stylesheets.compile(logical) {
            Ok(url) => url,
            Err(err) => {
                error!("LESS stylesheet `{logical}` fell back to its source path: {err}");
                logical.to_string()
            }
        }
    }
}
