//! Relative URL rewriting for compiled CSS.
//!
//! Compiled output is served from the artifact directory, not from where
//! the source lives, so relative `url(...)` references inside it would
//! dangle. The rewriter re-anchors them to the source's public location.
//! This is a pure text transform: no filesystem, no network, same input
//! always yields the same output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"url\(([^)]+)\)").unwrap());

/// Reference prefixes that are already location-independent.
const SKIP_PREFIXES: [&str; 4] = ["http://", "https://", "/", "data:"];

/// Rewrites `url(...)` references relative to a stylesheet's public URL.
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    source_dir: String,
}

impl UrlRewriter {
    /// Creates a rewriter anchored at the directory of `source_url`.
    ///
    /// `"/static/css/app.less"` anchors at `"/static/css/"`; a bare
    /// filename anchors at the site root.
    pub fn new(source_url: &str) -> Self {
        let mut source_dir = match source_url.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };
        if !source_dir.ends_with('/') {
            source_dir.push('/');
        }
        Self { source_dir }
    }

    /// Rewrites every `url(...)` reference in `css`.
    ///
    /// Absolute (`http://`, `https://`), root-relative (`/...`) and
    /// `data:` references pass through untouched apart from quote
    /// normalization; everything else is resolved against the source's
    /// directory. All processed references come back in single quotes.
    pub fn rewrite(&self, css: &str) -> String {
        URL_PATTERN
            .replace_all(css, |caps: &Captures| self.convert(&caps[1]))
            .into_owned()
    }

    fn convert(&self, reference: &str) -> String {
        let url = reference.trim_matches(|c| c == ' ' || c == '\'' || c == '"');
        if SKIP_PREFIXES.iter().any(|prefix| url.starts_with(prefix)) {
            return format!("url('{}')", url);
        }
        format!("url('{}')", join_url(&self.source_dir, url))
    }
}

/// Joins a relative reference onto a base directory, resolving `.` and
/// `..` segments. The base always carries a trailing slash; `..` never
/// climbs above the root.
fn join_url(base: &str, reference: &str) -> String {
    let absolute = base.starts_with('/');
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rewriter() -> UrlRewriter {
        UrlRewriter::new("/static/css/app.less")
    }

    #[test]
    fn test_relative_reference_is_anchored() {
        let css = rewriter().rewrite("a { background: url(foo.png); }");
        assert_eq!(css, "a { background: url('/static/css/foo.png'); }");
    }

    #[test]
    fn test_nested_relative_reference() {
        let css = rewriter().rewrite("a { background: url(img/icons/x.png); }");
        assert_eq!(css, "a { background: url('/static/css/img/icons/x.png'); }");
    }

    #[test]
    fn test_parent_segments_resolve() {
        let css = rewriter().rewrite("a { background: url(../img/x.png); }");
        assert_eq!(css, "a { background: url('/static/img/x.png'); }");
    }

    #[test]
    fn test_parent_segments_stop_at_root() {
        let css = rewriter().rewrite("a { background: url(../../../x.png); }");
        assert_eq!(css, "a { background: url('/x.png'); }");
    }

    #[test]
    fn test_absolute_http_is_untouched() {
        let css = rewriter().rewrite("a { background: url('http://cdn.example/y.png'); }");
        assert_eq!(css, "a { background: url('http://cdn.example/y.png'); }");
    }

    #[test]
    fn test_absolute_https_is_untouched() {
        let css = rewriter().rewrite(r#"a { background: url("https://cdn.example/y.png"); }"#);
        assert_eq!(css, "a { background: url('https://cdn.example/y.png'); }");
    }

    #[test]
    fn test_root_relative_is_untouched() {
        let css = rewriter().rewrite("a { background: url(/abs/y.png); }");
        assert_eq!(css, "a { background: url('/abs/y.png'); }");
    }

    #[test]
    fn test_data_uri_is_untouched() {
        let css = rewriter().rewrite("a { background: url(data:image/png;base64,AAA); }");
        assert_eq!(css, "a { background: url('data:image/png;base64,AAA'); }");
    }

    #[test]
    fn test_quotes_and_whitespace_are_stripped() {
        let css = rewriter().rewrite(r#"a { background: url( "foo.png" ); }"#);
        assert_eq!(css, "a { background: url('/static/css/foo.png'); }");
    }

    #[test]
    fn test_query_string_survives() {
        let css = rewriter().rewrite("a { background: url(foo.png?v=3); }");
        assert_eq!(css, "a { background: url('/static/css/foo.png?v=3'); }");
    }

    #[test]
    fn test_multiple_references_in_one_sheet() {
        let css = rewriter().rewrite(
            "a { background: url(a.png); }\nb { background: url(/b.png); }\nc { background: url(c.png); }",
        );
        assert_eq!(
            css,
            "a { background: url('/static/css/a.png'); }\nb { background: url('/b.png'); }\nc { background: url('/static/css/c.png'); }"
        );
    }

    #[test]
    fn test_bare_filename_source_anchors_at_root() {
        let css = UrlRewriter::new("app.less").rewrite("a { background: url(foo.png); }");
        assert_eq!(css, "a { background: url('/foo.png'); }");
    }

    #[test]
    fn test_relative_source_keeps_relative_anchor() {
        let css = UrlRewriter::new("static/css/app.less").rewrite("a { background: url(x.png); }");
        assert_eq!(css, "a { background: url('static/css/x.png'); }");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once = rewriter().rewrite("a { background: url(foo.png); } b { background: url(http://x/y.png); }");
        let twice = rewriter().rewrite(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_css_without_references_is_unchanged() {
        let css = "a { color: red; }";
        assert_eq!(rewriter().rewrite(css), css);
    }

    proptest! {
        #[test]
        fn prop_root_relative_references_never_move(path in "[a-z0-9][a-z0-9/._-]{0,40}") {
            let css = format!("a {{ background: url(/{}); }}", path);
            let rewritten = rewriter().rewrite(&css);
            let needle = format!("url('/{}')", path);
            prop_assert!(rewritten.contains(&needle));
        }

        #[test]
        fn prop_rewriting_is_pure(name in "[a-z]{1,12}", ext in "(png|gif|svg)") {
            let css = format!("a {{ background: url({}.{}); }}", name, ext);
            prop_assert_eq!(rewriter().rewrite(&css), rewriter().rewrite(&css));
        }
    }
}
