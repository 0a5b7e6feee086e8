//! Package manager detection from lockfiles and package.json

use super::any_file_exists;
use crate::context::{Detected, PackageManager};
use serde_json::{Map, Value};
use std::path::Path;

/// Lockfiles in order of precedence
const LOCKFILES: &[(&[&str], PackageManager)] = &[
    (&["bun.lock", "bun.lockb"], PackageManager::Bun),
    (&["pnpm-lock.yaml"], PackageManager::Pnpm),
    (&["yarn.lock"], PackageManager::Yarn),
    (&["package-lock.json", "npm-shrinkwrap.json"], PackageManager::Npm),
];

/// Detect the project's package manager
///
/// Lockfiles win, then the `packageManager` field. Without either, the
/// manager that launched us (`npm_config_user_agent`) is used, and finally
/// npm. Both fallbacks are reported as inferred.
pub fn detect_package_manager(dir: &Path, manifest: &Map<String, Value>) -> Detected<PackageManager> {
    for (files, pm) in LOCKFILES {
        if any_file_exists(dir, files) {
            return Detected::found(*pm);
        }
    }

    if let Some(pm) = manifest
        .get("packageManager")
        .and_then(Value::as_str)
        .and_then(from_package_manager_field)
    {
        return Detected::found(pm);
    }

    if let Some(pm) = std::env::var("npm_config_user_agent")
        .ok()
        .as_deref()
        .and_then(from_user_agent)
    {
        return Detected::inferred(pm);
    }

    Detected::inferred(PackageManager::Npm)
}

/// Parse a corepack `packageManager` value such as `pnpm@9.1.0`
pub fn from_package_manager_field(value: &str) -> Option<PackageManager> {
    let name = value.split('@').next().unwrap_or(value);
    parse_name(name)
}

/// Parse the leading `<name>/<version>` token of `npm_config_user_agent`
pub fn from_user_agent(agent: &str) -> Option<PackageManager> {
    let first = agent.split_whitespace().next()?;
    let name = first.split('/').next()?;
    parse_name(name)
}

fn parse_name(name: &str) -> Option<PackageManager> {
    match name.trim() {
        "bun" => Some(PackageManager::Bun),
        "pnpm" => Some(PackageManager::Pnpm),
        "yarn" => Some(PackageManager::Yarn),
        "npm" => Some(PackageManager::Npm),
        _ => None,
    }
}
