//! husky pre-commit hook and lint-staged configuration

use crate::context::{Context, Tooling};
use serde_json::{json, Value};

pub fn pre_commit(ctx: &Context) -> String {
    format!("{}\n", ctx.package_manager.exec("lint-staged"))
}

/// The `lint-staged` block for package.json
pub fn lint_staged_config(ctx: &Context) -> Value {
    match ctx.tooling {
        Tooling::Biome => json!({
            "*.{js,jsx,ts,tsx,json,jsonc,css}": "biome check --write --no-errors-on-unmatched"
        }),
        Tooling::EslintPrettier => json!({
            "*.{js,jsx,ts,tsx}": ["eslint --fix", "prettier --write"],
            "*.{json,css,md}": "prettier --write"
        }),
    }
}
