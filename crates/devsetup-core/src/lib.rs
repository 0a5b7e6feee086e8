//! devsetup core - template resolution and package.json patching
//!
//! This library adds tooling to an existing JavaScript project: a CI
//! workflow, a Dockerfile, a pre-commit hook, editor settings and an API
//! client. It is used by the `devsetup` binary but the layers below the
//! prompts have no terminal dependencies.
//!
//! # Architecture
//!
//! - **Detection** - package manager, framework and lint tooling, each tagged
//!   with whether it was inferred (`detect`)
//! - **Templates** - a declarative registry of template definitions, resolved
//!   against a [`Context`] into files, aggregated into dev dependencies and
//!   package.json changes, then written to disk (`templates`)
//! - **Patching** - additive package.json merge and the Next.js standalone
//!   output patch (`package_json`, `next_config`)
//! - **CLI/TUI Interface** - optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use devsetup_core::{detect, templates};
//!
//! let detection = detect::detect_with_overrides(dir, &Default::default())?;
//! let ctx = detection.into_context(dir);
//! let registry = templates::Registry::builtin();
//! let files = templates::resolve_files(&registry, &ctx);
//! let plan = templates::aggregate(&files, &ctx);
//! templates::materialize_all(&files, &ctx).await;
//! devsetup_core::package_json::patch_manifest(dir, &plan.manifest_mods).await?;
//! ```

pub mod context;
pub mod detect;
pub mod error;
pub mod generators;
pub mod install;
pub mod next_config;
pub mod package_json;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use context::{Context, Detected, Framework, PackageManager, Tooling};
pub use error::{Result, SetupError};
pub use templates::{aggregate, resolve, resolve_files, Registry, ResolvedFile, ResolvedGroup};

#[cfg(feature = "tui")]
pub use tui::run;
