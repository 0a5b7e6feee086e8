//! Template model, resolution and materialization
//!
//! This module provides:
//! - Declarative template definitions and groups (`definition`, `registry`)
//! - Static vs generated content (`content`)
//! - Resolution of the registry against a context (`resolver`)
//! - Dev dependency and package.json aggregation (`aggregate`)
//! - Writing resolved files to disk (`materialize`)

pub mod aggregate;
pub mod content;
pub mod definition;
pub mod materialize;
pub mod registry;
pub mod resolver;
pub mod value;

use crate::context::Context;
use colored::Colorize;

pub use aggregate::{aggregate, Aggregate, ResolvedManifestMods};
pub use content::ContentSource;
pub use definition::{ManifestMods, Proposal, TemplateDefinition, TemplateGroup};
pub use materialize::{materialize, materialize_all, MaterializeReport};
pub use registry::{Registry, HOOK_DIR};
pub use resolver::{resolve, resolve_files, ResolvedFile, ResolvedGroup};
pub use value::{Predicate, Value};

/// Print the resolved groups for a context without writing anything
pub fn print_groups(groups: &[ResolvedGroup<'_>], ctx: &Context) {
    println!(
        "{}",
        format!(
            "Templates for {} ({}, {})",
            ctx.framework, ctx.package_manager, ctx.tooling
        )
        .cyan()
        .bold()
    );
    println!();

    for group in groups {
        println!("  {} {}", group.label.bold(), format!("[{}]", group.id).dimmed());
        for file in &group.files {
            let marker = if file.exists(ctx) {
                "exists".yellow()
            } else {
                "new".green()
            };
            println!("    {} {} ({})", "->".blue(), file.target_path, marker);
        }
        let deps = group.dev_dependencies();
        if !deps.is_empty() {
            println!("    {} {}", "dev dependencies:".dimmed(), deps.join(", "));
        }
        println!();
    }
}
