//! Evaluates the registry against a context

use super::content::ContentSource;
use super::definition::TemplateDefinition;
use super::registry::{Registry, HOOK_DIR};
use crate::context::Context;
use std::path::PathBuf;

/// A definition evaluated against a specific context
#[derive(Debug, Clone)]
pub struct ResolvedFile<'r> {
    /// Project-relative, forward-slash path
    pub target_path: String,
    pub content: &'r ContentSource,
    pub definition: &'r TemplateDefinition,
    /// Position of the definition in the registry, across all groups
    pub ordinal: usize,
    pub group_id: &'static str,
}

impl ResolvedFile<'_> {
    pub fn label(&self) -> &'static str {
        self.definition.label
    }

    pub fn absolute_path(&self, ctx: &Context) -> PathBuf {
        ctx.working_dir().join(&self.target_path)
    }

    pub fn exists(&self, ctx: &Context) -> bool {
        self.absolute_path(ctx).exists()
    }

    /// Whether the file lives in the git hook directory
    pub fn is_hook(&self) -> bool {
        self.target_path
            .strip_prefix(HOOK_DIR)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// A selectable group with at least one resolved file
#[derive(Debug, Clone)]
pub struct ResolvedGroup<'r> {
    pub id: &'static str,
    pub label: &'static str,
    /// Comma-joined target paths
    pub hint: String,
    pub files: Vec<ResolvedFile<'r>>,
}

impl ResolvedGroup<'_> {
    /// Dev dependencies of the group's files, first-seen order
    pub fn dev_dependencies(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for file in &self.files {
            for dep in &file.definition.dev_dependencies {
                if !deps.contains(&dep.as_str()) {
                    deps.push(dep);
                }
            }
        }
        deps
    }
}

/// Resolve the registry into groups, dropping groups left without files
pub fn resolve<'r>(registry: &'r Registry, ctx: &Context) -> Vec<ResolvedGroup<'r>> {
    let mut groups = Vec::new();
    let mut ordinal = 0;

    for group in registry.groups() {
        let mut files = Vec::new();

        for definition in &group.definitions {
            let position = ordinal;
            ordinal += 1;

            if !definition.is_included(ctx) {
                tracing::debug!(label = definition.label, "template excluded for context");
                continue;
            }

            files.push(ResolvedFile {
                target_path: normalize_target(&definition.target_path.resolve(ctx)),
                content: &definition.content,
                definition,
                ordinal: position,
                group_id: group.id,
            });
        }

        if files.is_empty() {
            tracing::debug!(group = group.id, "group has no files for context, dropping");
            continue;
        }

        let hint = files
            .iter()
            .map(|f| f.target_path.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        groups.push(ResolvedGroup {
            id: group.id,
            label: group.label,
            hint,
            files,
        });
    }

    groups
}

/// Resolve the registry into a flat, registry-ordered file list
pub fn resolve_files<'r>(registry: &'r Registry, ctx: &Context) -> Vec<ResolvedFile<'r>> {
    resolve(registry, ctx)
        .into_iter()
        .flat_map(|group| group.files)
        .collect()
}

/// Forward slashes, no leading `./`
fn normalize_target(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Framework, PackageManager, Tooling};
    use crate::templates::definition::TemplateGroup;
    use crate::templates::value::Value;
    use tempfile::TempDir;

    fn ctx_in(dir: &std::path::Path, framework: Framework) -> Context {
        Context::new(dir, PackageManager::Npm, Tooling::Biome, framework)
    }

    fn paths(files: &[ResolvedFile<'_>]) -> Vec<String> {
        files.iter().map(|f| f.target_path.clone()).collect()
    }

    #[test]
    fn test_nginx_only_for_vite() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::builtin();

        let next = resolve_files(&registry, &ctx_in(temp.path(), Framework::Nextjs));
        assert!(!paths(&next).contains(&"nginx.conf".to_string()));

        let vite = resolve_files(
            &registry,
            &ctx_in(temp.path(), Framework::ViteTanstackRouter),
        );
        assert!(paths(&vite).contains(&"nginx.conf".to_string()));
    }

    #[test]
    fn test_api_client_path_follows_src_dir() {
        let registry = Registry::builtin();

        let without_src = TempDir::new().unwrap();
        let files = resolve_files(&registry, &ctx_in(without_src.path(), Framework::Nextjs));
        assert!(paths(&files).contains(&"lib/api-client.ts".to_string()));

        let with_src = TempDir::new().unwrap();
        std::fs::create_dir(with_src.path().join("src")).unwrap();
        let files = resolve_files(&registry, &ctx_in(with_src.path(), Framework::Nextjs));
        assert!(paths(&files).contains(&"src/lib/api-client.ts".to_string()));
        assert!(!paths(&files).contains(&"lib/api-client.ts".to_string()));
    }

    #[test]
    fn test_same_definition_resolves_differently() {
        let registry = Registry::new(vec![TemplateGroup::new("g", "G").with(
            TemplateDefinition::new(
                Value::Computed(|ctx| {
                    if ctx.has_src_dir() {
                        "src/x.ts".to_string()
                    } else {
                        "x.ts".to_string()
                    }
                }),
                "X",
                ContentSource::asset("x"),
            ),
        )]);

        let plain = TempDir::new().unwrap();
        let with_src = TempDir::new().unwrap();
        std::fs::create_dir(with_src.path().join("src")).unwrap();

        let a = resolve_files(&registry, &ctx_in(plain.path(), Framework::Nextjs));
        let b = resolve_files(&registry, &ctx_in(with_src.path(), Framework::Nextjs));
        assert_eq!(paths(&a), vec!["x.ts"]);
        assert_eq!(paths(&b), vec!["src/x.ts"]);
        assert!(std::ptr::eq(a[0].definition, b[0].definition));
    }

    #[test]
    fn test_registry_order_preserved() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::builtin();
        let groups = resolve(&registry, &ctx_in(temp.path(), Framework::Nextjs));

        let ids: Vec<&str> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["deploy", "hooks", "editor", "api-client"]);

        let ordinals: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.files.iter().map(|f| f.ordinal))
            .collect();
        let mut sorted = ordinals.clone();
        sorted.sort_unstable();
        assert_eq!(ordinals, sorted);
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let registry = Registry::new(vec![
            TemplateGroup::new("never", "Never").with(
                TemplateDefinition::new("a", "A", ContentSource::asset("a")).when(|_| false),
            ),
            TemplateGroup::new("always", "Always")
                .with(TemplateDefinition::new("b", "B", ContentSource::asset("b"))),
        ]);
        let temp = TempDir::new().unwrap();

        let groups = resolve(&registry, &ctx_in(temp.path(), Framework::Nextjs));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "always");
        assert_eq!(groups[0].files[0].ordinal, 1);
    }

    #[test]
    fn test_hint_joins_paths() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::builtin();
        let groups = resolve(&registry, &ctx_in(temp.path(), Framework::Nextjs));
        let deploy = groups.iter().find(|g| g.id == "deploy").unwrap();
        assert_eq!(
            deploy.hint,
            ".github/workflows/ci.yml, Dockerfile, .dockerignore"
        );
    }

    #[test]
    fn test_hook_detection() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::builtin();
        let files = resolve_files(&registry, &ctx_in(temp.path(), Framework::Nextjs));
        let hooks: Vec<&str> = files
            .iter()
            .filter(|f| f.is_hook())
            .map(|f| f.target_path.as_str())
            .collect();
        assert_eq!(hooks, vec![".husky/pre-commit"]);
    }

    #[test]
    fn test_group_dev_dependencies() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::builtin();
        let groups = resolve(&registry, &ctx_in(temp.path(), Framework::Nextjs));
        let hooks = groups.iter().find(|g| g.id == "hooks").unwrap();
        assert_eq!(hooks.dev_dependencies(), vec!["husky", "lint-staged"]);
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("./lib/x.ts"), "lib/x.ts");
        assert_eq!(normalize_target(".vscode\\settings.json"), ".vscode/settings.json");
        assert_eq!(normalize_target(".husky/pre-commit"), ".husky/pre-commit");
    }
}
