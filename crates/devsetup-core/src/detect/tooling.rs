//! Lint/format tooling detection

use super::any_file_exists;
use crate::context::{Detected, Tooling};
use crate::package_json::dependency_names;
use serde_json::{Map, Value};
use std::path::Path;

const BIOME_CONFIGS: &[&str] = &["biome.json", "biome.jsonc"];

const ESLINT_CONFIGS: &[&str] = &[
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
    "eslint.config.ts",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".prettierrc",
    ".prettierrc.json",
    "prettier.config.js",
];

/// Detect Biome or ESLint + Prettier, defaulting to Biome
pub fn detect_tooling(dir: &Path, manifest: &Map<String, Value>) -> Detected<Tooling> {
    if any_file_exists(dir, BIOME_CONFIGS) {
        return Detected::found(Tooling::Biome);
    }
    if any_file_exists(dir, ESLINT_CONFIGS) {
        return Detected::found(Tooling::EslintPrettier);
    }

    let deps = dependency_names(manifest);
    if deps.contains(&"@biomejs/biome") {
        return Detected::found(Tooling::Biome);
    }
    if deps.iter().any(|d| *d == "eslint" || *d == "prettier") {
        return Detected::found(Tooling::EslintPrettier);
    }

    Detected::inferred(Tooling::Biome)
}
