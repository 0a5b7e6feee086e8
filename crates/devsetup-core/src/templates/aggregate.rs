//! Dev dependency and package.json aggregation across selected files
//!
//! Definitions are visited in registry order no matter how the caller ordered
//! the selection. The first definition to propose a script or config key
//! owns it; later proposals for the same key are dropped.

use super::resolver::ResolvedFile;
use crate::context::Context;

/// Manifest changes after evaluation and deduplication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedManifestMods {
    pub scripts: Vec<(String, String)>,
    pub config: Vec<(String, serde_json::Value)>,
}

impl ResolvedManifestMods {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.config.is_empty()
    }
}

#[cfg(test)]
impl ResolvedManifestMods {
    pub(crate) fn script(&self, name: &str) -> Option<&str> {
        self.scripts
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn config_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.config
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

/// What a selection requires beyond writing its files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Unique dev dependency names, first-seen in registry order
    pub dependencies: Vec<String>,
    pub manifest_mods: ResolvedManifestMods,
}

pub fn aggregate(selected: &[ResolvedFile<'_>], ctx: &Context) -> Aggregate {
    let mut ordered: Vec<&ResolvedFile<'_>> = selected.iter().collect();
    ordered.sort_by_key(|file| file.ordinal);
    ordered.dedup_by_key(|file| file.ordinal);

    let mut result = Aggregate::default();

    for file in &ordered {
        for dep in &file.definition.dev_dependencies {
            if !result.dependencies.contains(dep) {
                result.dependencies.push(dep.clone());
            }
        }
    }

    for file in &ordered {
        for proposal in &file.definition.manifest_mods.scripts {
            if !proposal.applies(ctx) {
                continue;
            }
            let mods = &mut result.manifest_mods;
            if mods.scripts.iter().any(|(key, _)| key == &proposal.key) {
                tracing::debug!(script = %proposal.key, "script already proposed, keeping first");
                continue;
            }
            mods.scripts
                .push((proposal.key.clone(), proposal.value.resolve(ctx)));
        }
    }

    for file in &ordered {
        for proposal in &file.definition.manifest_mods.config {
            if !proposal.applies(ctx) {
                continue;
            }
            let mods = &mut result.manifest_mods;
            if mods.config.iter().any(|(key, _)| key == &proposal.key) {
                continue;
            }
            mods.config
                .push((proposal.key.clone(), proposal.value.resolve(ctx)));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Framework, PackageManager, Tooling};
    use crate::templates::content::ContentSource;
    use crate::templates::definition::{TemplateDefinition, TemplateGroup};
    use crate::templates::registry::Registry;
    use crate::templates::resolver::{resolve, resolve_files};
    use serde_json::json;

    fn ctx(framework: Framework) -> Context {
        Context::new(
            "/nonexistent/project",
            PackageManager::Pnpm,
            Tooling::Biome,
            framework,
        )
    }

    fn conflicting_registry() -> Registry {
        Registry::new(vec![
            TemplateGroup::new("first", "First").with(
                TemplateDefinition::new("a", "A", ContentSource::asset("a"))
                    .dev_dependencies(&["husky", "lint-staged"])
                    .script("check", "biome check .")
                    .config("lint-staged", json!({ "*": "first" })),
            ),
            TemplateGroup::new("second", "Second").with(
                TemplateDefinition::new("b", "B", ContentSource::asset("b"))
                    .dev_dependencies(&["lint-staged", "typescript"])
                    .script("check", "eslint .")
                    .script("lint", "eslint .")
                    .config("lint-staged", json!({ "*": "second" })),
            ),
        ])
    }

    #[test]
    fn test_first_registered_script_wins() {
        let registry = conflicting_registry();
        let ctx = ctx(Framework::Nextjs);
        let files = resolve_files(&registry, &ctx);

        let forward = aggregate(&files, &ctx);
        let reversed: Vec<_> = files.iter().rev().cloned().collect();
        let backward = aggregate(&reversed, &ctx);

        assert_eq!(forward.manifest_mods.script("check"), Some("biome check ."));
        assert_eq!(forward, backward);
        assert_eq!(
            forward.manifest_mods.config_value("lint-staged"),
            Some(&json!({ "*": "first" }))
        );
    }

    #[test]
    fn test_dependencies_deduplicated_in_registry_order() {
        let registry = conflicting_registry();
        let ctx = ctx(Framework::Nextjs);
        let mut files = resolve_files(&registry, &ctx);
        files.reverse();

        let result = aggregate(&files, &ctx);

        assert_eq!(
            result.dependencies,
            vec!["husky", "lint-staged", "typescript"]
        );
    }

    #[test]
    fn test_scripts_keep_declaration_order() {
        let registry = conflicting_registry();
        let ctx = ctx(Framework::Nextjs);
        let files = resolve_files(&registry, &ctx);

        let result = aggregate(&files, &ctx);
        let keys: Vec<&str> = result
            .manifest_mods
            .scripts
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["check", "lint"]);
    }

    #[test]
    fn test_unselected_files_contribute_nothing() {
        let registry = conflicting_registry();
        let ctx = ctx(Framework::Nextjs);
        let files = resolve_files(&registry, &ctx);

        let only_second = aggregate(&files[1..], &ctx);

        assert_eq!(only_second.manifest_mods.script("check"), Some("eslint ."));
        assert_eq!(only_second.dependencies, vec!["lint-staged", "typescript"]);
    }

    #[test]
    fn test_gated_script_only_for_matching_framework() {
        let registry = Registry::builtin();

        let next = ctx(Framework::Nextjs);
        let result = aggregate(&resolve_files(&registry, &next), &next);
        assert_eq!(result.manifest_mods.script("typecheck"), None);

        let vite = ctx(Framework::ViteTanstackRouter);
        let result = aggregate(&resolve_files(&registry, &vite), &vite);
        assert_eq!(result.manifest_mods.script("typecheck"), Some("tsc --noEmit"));
    }

    #[test]
    fn test_builtin_hooks_group() {
        let registry = Registry::builtin();
        let ctx = ctx(Framework::Nextjs);
        let groups = resolve(&registry, &ctx);
        let hooks = groups.iter().find(|g| g.id == "hooks").unwrap();

        let result = aggregate(&hooks.files, &ctx);

        assert_eq!(result.dependencies, vec!["husky", "lint-staged"]);
        assert_eq!(result.manifest_mods.script("prepare"), Some("husky"));
        assert!(result.manifest_mods.config_value("lint-staged").is_some());
    }

    #[test]
    fn test_empty_selection() {
        let result = aggregate(&[], &ctx(Framework::Nextjs));
        assert!(result.dependencies.is_empty());
        assert!(result.manifest_mods.is_empty());
    }
}
