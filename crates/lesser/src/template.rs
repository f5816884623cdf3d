//! MiniJinja template surface.
//!
//! Registers the two entry points templates use:
//!
//! - `less(path)`: function returning the URL of the compiled artifact
//! - `inlineless`: filter compiling LESS text in place, usually wrapped
//!   around a block
//!
//! ```jinja
//! <link rel="stylesheet" href="{{ less('css/app.less') }}">
//! <style>
//! {% filter inlineless %}
//! @accent: #7700aa;
//! nav a { color: @accent; }
//! {% endfilter %}
//! </style>
//! ```

use std::sync::Arc;

use minijinja::Environment;

use crate::pipeline::StylesheetPipeline;

/// Registers the `less` function and `inlineless` filter on an environment.
pub fn register_template_support(
    env: &mut Environment<'static>,
    pipeline: Arc<StylesheetPipeline>,
) {
    let for_function = Arc::clone(&pipeline);
    env.add_function("less", move |path: String| -> String {
        for_function.stylesheet_url(&path)
    });

    env.add_filter("inlineless", move |source: String| -> String {
        pipeline.inline(&source)
    });
}
