//! Reading and additive patching of the target project's package.json
//!
//! The patcher only ever adds: a script is written when its name is absent
//! from `scripts`, a config block when its top-level key is absent. Values the
//! user already has are never touched, so running the tool twice leaves the
//! manifest unchanged the second time.

use crate::error::{Result, SetupError};
use crate::templates::aggregate::ResolvedManifestMods;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MANIFEST_FILE: &str = "package.json";

/// Outcome of a manifest patch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Human-readable descriptors, scripts first then config
    pub added: Vec<String>,
}

impl PatchReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

/// Fail early when the directory has no package.json
pub fn ensure_manifest(dir: &Path) -> Result<PathBuf> {
    let path = manifest_path(dir);
    if path.is_file() {
        Ok(path)
    } else {
        Err(SetupError::ManifestNotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// Parse package.json into a JSON object, preserving key order
pub fn parse_manifest(path: &Path, content: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content).map_err(|e| SetupError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SetupError::ManifestParse {
            path: path.to_path_buf(),
            message: "expected a JSON object at the top level".to_string(),
        }),
    }
}

/// Read package.json synchronously (used by detection probes)
pub fn read_manifest(dir: &Path) -> Result<Map<String, Value>> {
    let path = ensure_manifest(dir)?;
    let content = std::fs::read_to_string(&path)?;
    parse_manifest(&path, &content)
}

/// Names of all `dependencies` and `devDependencies`
pub fn dependency_names(manifest: &Map<String, Value>) -> Vec<&str> {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().map(String::as_str))
        .collect()
}

/// Apply the non-overwriting merge to an in-memory manifest
///
/// Returns the descriptors of what was added, in declaration order.
pub fn merge_mods(manifest: &mut Map<String, Value>, mods: &ResolvedManifestMods) -> Vec<String> {
    let mut added = Vec::new();

    if !mods.scripts.is_empty() {
        let scripts = manifest
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));

        // A non-object `scripts` is user data we can't merge into
        if let Value::Object(scripts) = scripts {
            for (name, command) in &mods.scripts {
                if !scripts.contains_key(name) {
                    scripts.insert(name.clone(), Value::String(command.clone()));
                    added.push(format!("{} script", name));
                }
            }
        } else {
            tracing::warn!("package.json `scripts` is not an object; skipping script additions");
        }
    }

    for (key, value) in &mods.config {
        if !manifest.contains_key(key) {
            manifest.insert(key.clone(), value.clone());
            added.push(format!("{} config", key));
        }
    }

    added
}

/// Indentation unit of an existing JSON document, two spaces when unknown
///
/// The first indented line holds a top-level key, so its leading
/// whitespace is exactly one level.
fn detect_indent(content: &str) -> &str {
    content
        .lines()
        .skip(1)
        .find_map(|line| {
            let rest = line.trim_start_matches([' ', '\t']);
            let indent = &line[..line.len() - rest.len()];
            (!indent.is_empty() && !rest.is_empty()).then_some(indent)
        })
        .unwrap_or("  ")
}

/// Serialize the manifest with the given indentation and a trailing newline
fn render_manifest(manifest: Map<String, Value>, indent: &str) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    Value::Object(manifest)
        .serialize(&mut ser)
        .map_err(|e| SetupError::Other(e.into()))?;

    let mut rendered = String::from_utf8(buf).map_err(|e| SetupError::Other(e.into()))?;
    rendered.push('\n');
    Ok(rendered)
}

/// Read, merge and write back package.json
///
/// The file is only rewritten when at least one key was added.
pub async fn patch_manifest(dir: &Path, mods: &ResolvedManifestMods) -> Result<PatchReport> {
    let path = ensure_manifest(dir)?;
    let content = fs::read_to_string(&path).await?;
    let mut manifest = parse_manifest(&path, &content)?;

    let added = merge_mods(&mut manifest, mods);
    if added.is_empty() {
        tracing::debug!("package.json already up to date");
        return Ok(PatchReport::default());
    }

    let serialized = render_manifest(manifest, detect_indent(&content))?;

    fs::write(&path, serialized)
        .await
        .map_err(|source| SetupError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(?added, "patched package.json");
    Ok(PatchReport { added })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, value: Value) {
        std::fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&value).unwrap(),
        )
        .unwrap();
    }

    fn read_back(dir: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap()).unwrap()
    }

    fn husky_mods() -> ResolvedManifestMods {
        ResolvedManifestMods {
            scripts: vec![("prepare".to_string(), "husky".to_string())],
            config: vec![("lint-staged".to_string(), json!({ "*": "biome check" }))],
        }
    }

    #[tokio::test]
    async fn test_patch_adds_scripts_then_config() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), json!({ "name": "x", "scripts": {} }));

        let report = patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        assert_eq!(report.added, vec!["prepare script", "lint-staged config"]);
        let manifest = read_back(temp.path());
        assert_eq!(manifest["scripts"]["prepare"], "husky");
        assert_eq!(manifest["lint-staged"], json!({ "*": "biome check" }));
    }

    #[tokio::test]
    async fn test_patch_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), json!({ "name": "x", "scripts": {} }));

        patch_manifest(temp.path(), &husky_mods()).await.unwrap();
        let after_first = std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();

        let report = patch_manifest(temp.path(), &husky_mods()).await.unwrap();
        let after_second = std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();

        assert!(report.is_empty());
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_patch_never_overwrites_existing_script() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            json!({ "name": "x", "scripts": { "prepare": "custom" } }),
        );

        let report = patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        assert_eq!(report.added, vec!["lint-staged config"]);
        assert_eq!(read_back(temp.path())["scripts"]["prepare"], "custom");
    }

    #[tokio::test]
    async fn test_patch_never_overwrites_existing_config_block() {
        let temp = TempDir::new().unwrap();
        write_manifest(
            temp.path(),
            json!({ "name": "x", "lint-staged": { "*.ts": "eslint" } }),
        );

        let report = patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        assert_eq!(report.added, vec!["prepare script"]);
        assert_eq!(
            read_back(temp.path())["lint-staged"],
            json!({ "*.ts": "eslint" })
        );
    }

    #[tokio::test]
    async fn test_patch_creates_scripts_map() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), json!({ "name": "x" }));

        let report = patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        assert_eq!(report.added.len(), 2);
        assert_eq!(read_back(temp.path())["scripts"]["prepare"], "husky");
    }

    #[tokio::test]
    async fn test_patch_keeps_tab_indentation() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            "{\n\t\"name\": \"x\",\n\t\"scripts\": {}\n}\n",
        )
        .unwrap();
        let mods = ResolvedManifestMods {
            scripts: vec![("prepare".to_string(), "husky".to_string())],
            config: Vec::new(),
        };

        patch_manifest(temp.path(), &mods).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap(),
            "{\n\t\"name\": \"x\",\n\t\"scripts\": {\n\t\t\"prepare\": \"husky\"\n\t}\n}\n"
        );
    }

    #[tokio::test]
    async fn test_patch_keeps_four_space_indentation() {
        let temp = TempDir::new().unwrap();
        let original = "{\n    \"name\": \"x\",\n    \"private\": true\n}\n";
        std::fs::write(temp.path().join(MANIFEST_FILE), original).unwrap();

        patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        let written = std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();
        assert!(written.starts_with("{\n    \"name\": \"x\",\n    \"private\": true,\n"));
        assert!(written.contains("\n    \"scripts\": {\n        \"prepare\": \"husky\"\n    },"));
    }

    #[test]
    fn test_detect_indent_defaults_to_two_spaces() {
        assert_eq!(detect_indent(r#"{"name":"x"}"#), "  ");
        assert_eq!(detect_indent("{\n\t\"a\": {\n\t\t\"b\": 1\n\t}\n}"), "\t");
        assert_eq!(detect_indent("{\n\n    \"a\": 1\n}"), "    ");
    }

    #[tokio::test]
    async fn test_patch_preserves_key_order() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"version":"1.0.0","name":"x","scripts":{"dev":"vite"}}"#,
        )
        .unwrap();

        patch_manifest(temp.path(), &husky_mods()).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap();
        let version = content.find("\"version\"").unwrap();
        let name = content.find("\"name\"").unwrap();
        let dev = content.find("\"dev\"").unwrap();
        let prepare = content.find("\"prepare\"").unwrap();
        assert!(version < name);
        assert!(dev < prepare);
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = patch_manifest(temp.path(), &husky_mods())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::ManifestNotFound { .. }));
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_fatal_and_untouched() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "{ not json").unwrap();

        let err = patch_manifest(temp.path(), &husky_mods())
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::ManifestParse { .. }));
        assert_eq!(
            std::fs::read_to_string(temp.path().join(MANIFEST_FILE)).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_non_object_manifest_rejected() {
        let err = parse_manifest(Path::new("package.json"), "[1, 2]").unwrap_err();
        assert!(matches!(err, SetupError::ManifestParse { .. }));
    }

    #[test]
    fn test_dependency_names_covers_both_sections() {
        let manifest = parse_manifest(
            Path::new("package.json"),
            r#"{"dependencies":{"next":"15"},"devDependencies":{"@biomejs/biome":"2"}}"#,
        )
        .unwrap();
        let names = dependency_names(&manifest);
        assert_eq!(names, vec!["next", "@biomejs/biome"]);
    }
}
