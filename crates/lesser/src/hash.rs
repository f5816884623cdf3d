//! Content and mtime digests.
//!
//! Two hashes drive cache invalidation: inline snippets are keyed by a
//! digest of their uncompiled text, and file artifacts carry a digest of
//! their source's modification time in the filename. Either input changing
//! produces a new key or filename, which is the entire invalidation story.

use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use xxhash_rust::xxh3::xxh3_64;

/// Namespace prefix for inline-snippet cache keys.
const KEY_PREFIX: &str = "less";

/// Fixed-width hex digest of arbitrary text.
pub fn hexdigest(text: &str) -> String {
    format!("{:016x}", xxh3_64(text.as_bytes()))
}

/// Cache key for an inline snippet, derived from its uncompiled text.
pub fn cache_key(source: &str) -> String {
    format!("{}.{}", KEY_PREFIX, hexdigest(source))
}

/// Hex digest of a file's modification time.
///
/// Sub-second precision is included, so any touch of the source yields a
/// new digest on filesystems that record it.
pub fn hashed_mtime(path: &Path) -> io::Result<String> {
    let modified = std::fs::metadata(path)?.modified()?;
    let stamp = modified
        .duration_since(UNIX_EPOCH)
        .map_err(io::Error::other)?;
    Ok(hexdigest(&format!(
        "{}.{}",
        stamp.as_secs(),
        stamp.subsec_nanos()
    )))
}
