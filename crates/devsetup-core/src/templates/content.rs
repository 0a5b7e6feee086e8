//! How a template file's bytes are produced

use crate::context::Context;
use crate::error::{Result, SetupError};
use include_dir::{include_dir, Dir};
use std::fmt;

/// Static template assets embedded at compile time
static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Content source for a template definition
#[derive(Clone, Copy)]
pub enum ContentSource {
    /// Verbatim copy of an embedded asset
    Static { asset: &'static str },
    /// Generated from the context; may probe the project directory read-only
    Dynamic { generate: fn(&Context) -> String },
}

impl ContentSource {
    pub fn asset(asset: &'static str) -> Self {
        ContentSource::Static { asset }
    }

    pub fn generated(generate: fn(&Context) -> String) -> Self {
        ContentSource::Dynamic { generate }
    }

    /// Produce the file content for this context
    pub fn render(&self, ctx: &Context) -> Result<String> {
        match self {
            ContentSource::Static { asset } => read_asset(asset).map(str::to_string),
            ContentSource::Dynamic { generate } => Ok(generate(ctx)),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Static { asset } => {
                f.debug_struct("Static").field("asset", asset).finish()
            }
            ContentSource::Dynamic { .. } => f.write_str("Dynamic"),
        }
    }
}

/// Look up an embedded asset by name
pub fn read_asset(name: &str) -> Result<&'static str> {
    ASSETS
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| SetupError::AssetNotFound {
            name: name.to_string(),
        })
}
