//! Framework detection

use super::any_file_exists;
use crate::context::{Detected, Framework};
use crate::package_json::dependency_names;
use serde_json::{Map, Value};
use std::path::Path;

const NEXT_CONFIGS: &[&str] = &[
    "next.config.js",
    "next.config.mjs",
    "next.config.cjs",
    "next.config.ts",
];

const VITE_CONFIGS: &[&str] = &[
    "vite.config.js",
    "vite.config.mjs",
    "vite.config.ts",
    "vite.config.mts",
];

/// Detect Next.js or Vite + TanStack Router
///
/// Dependencies are checked before config files. Without evidence Next.js is
/// assumed and marked inferred.
pub fn detect_framework(dir: &Path, manifest: &Map<String, Value>) -> Detected<Framework> {
    let deps = dependency_names(manifest);

    if deps.contains(&"next") {
        return Detected::found(Framework::Nextjs);
    }
    if deps
        .iter()
        .any(|d| *d == "@tanstack/react-router" || *d == "vite")
    {
        return Detected::found(Framework::ViteTanstackRouter);
    }

    if any_file_exists(dir, NEXT_CONFIGS) {
        return Detected::found(Framework::Nextjs);
    }
    if any_file_exists(dir, VITE_CONFIGS) {
        return Detected::found(Framework::ViteTanstackRouter);
    }

    Detected::inferred(Framework::Nextjs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_json::parse_manifest;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(json: &str) -> Map<String, Value> {
        parse_manifest(Path::new("package.json"), json).unwrap()
    }

    #[test]
    fn test_next_dependency() {
        let temp = TempDir::new().unwrap();
        let m = manifest(r#"{"dependencies":{"next":"15.1.0","react":"19"}}"#);
        assert_eq!(
            detect_framework(temp.path(), &m),
            Detected::found(Framework::Nextjs)
        );
    }

    #[test]
    fn test_tanstack_router_dependency() {
        let temp = TempDir::new().unwrap();
        let m = manifest(r#"{"dependencies":{"@tanstack/react-router":"1"}}"#);
        assert_eq!(
            detect_framework(temp.path(), &m),
            Detected::found(Framework::ViteTanstackRouter)
        );
    }

    #[test]
    fn test_vite_config_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("vite.config.ts"), "").unwrap();
        assert_eq!(
            detect_framework(temp.path(), &manifest("{}")).value,
            Framework::ViteTanstackRouter
        );
    }

    #[test]
    fn test_fallback_is_inferred() {
        let temp = TempDir::new().unwrap();
        let detected = detect_framework(temp.path(), &manifest("{}"));
        assert!(detected.inferred);
        assert_eq!(detected.value, Framework::Nextjs);
    }
}
