//! Content generators for dynamic templates
//!
//! Every generator is a plain `fn(&Context) -> String`. Generators may look
//! at files in the project directory to pick a variant, but never write.

pub mod api_client;
pub mod ci;
pub mod docker;
pub mod editor;
pub mod hooks;

use crate::context::Context;

/// Directory for shared library code, `src/lib` when the project uses `src/`
pub(crate) fn lib_dir(ctx: &Context) -> &'static str {
    if ctx.has_src_dir() {
        "src/lib"
    } else {
        "lib"
    }
}
