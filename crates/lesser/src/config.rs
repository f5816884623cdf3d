//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the compile pipeline.
///
/// Every option has a default; start from [`LessConfig::default`] and
/// override with the builder methods, or deserialize the struct from an
/// application's settings file (missing fields fall back to defaults).
///
/// # Example
///
/// ```rust
/// use lesser::LessConfig;
///
/// let config = LessConfig::default()
///     .executable("lessc --no-color")
///     .include_search_dirs(true);
/// assert!(config.use_cache);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LessConfig {
    /// Compiler command, optionally carrying flags (`"lessc --no-color"`).
    pub executable: String,

    /// Whether compiled inline snippets are cached by content hash.
    pub use_cache: bool,

    /// Expiry for cached inline snippets, in seconds.
    pub cache_ttl_secs: u64,

    /// Subdirectory, next to each source, that receives compiled artifacts.
    pub output_dir: String,

    /// Pass the finder's search roots to the compiler as its import path.
    pub include_search_dirs: bool,

    /// Public URL prefix the static files are served under.
    pub static_url: String,

    /// Bound on a single compiler invocation, in seconds. `None` waits
    /// indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for LessConfig {
    fn default() -> Self {
        Self {
            executable: "lessc".to_string(),
            use_cache: true,
            cache_ttl_secs: 60 * 60 * 24 * 30,
            output_dir: "less-cache".to_string(),
            include_search_dirs: false,
            static_url: "/static/".to_string(),
            timeout_secs: Some(30),
        }
    }
}

impl LessConfig {
    /// Sets the compiler command.
    pub fn executable(mut self, command: impl Into<String>) -> Self {
        self.executable = command.into();
        self
    }

    /// Enables or disables inline-snippet caching.
    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Sets the inline-cache expiry.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    /// Sets the artifact subdirectory name.
    pub fn output_dir(mut self, name: impl Into<String>) -> Self {
        self.output_dir = name.into();
        self
    }

    /// Controls whether finder search roots become compiler include paths.
    pub fn include_search_dirs(mut self, enabled: bool) -> Self {
        self.include_search_dirs = enabled;
        self
    }

    /// Sets the public static URL prefix.
    pub fn static_url(mut self, prefix: impl Into<String>) -> Self {
        self.static_url = prefix.into();
        self
    }

    /// Sets the compiler timeout. `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_secs = timeout.map(|t| t.as_secs());
        self
    }
}
