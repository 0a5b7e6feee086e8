//! The ordered registry of template groups
//!
//! Declaration order matters: it is the display order, the default selection
//! order, and the tie-break when two definitions propose the same
//! package.json key (the earlier one wins).

use super::content::ContentSource;
use super::definition::{TemplateDefinition, TemplateGroup};
use super::value::Value;
use crate::context::{Context, Framework};
use crate::generators::{api_client, ci, docker, editor, hooks};

/// Directory whose files must be executable after writing
pub const HOOK_DIR: &str = ".husky";

/// Ordered collection of template groups
#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: Vec<TemplateGroup>,
}

impl Registry {
    pub fn new(groups: Vec<TemplateGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[TemplateGroup] {
        &self.groups
    }

    pub fn group_ids(&self) -> Vec<&'static str> {
        self.groups.iter().map(|g| g.id).collect()
    }

    /// The templates shipped with devsetup
    pub fn builtin() -> Self {
        Self::new(vec![deployment(), pre_commit(), editor_settings(), api_client_group()])
    }
}

fn is_vite(ctx: &Context) -> bool {
    ctx.framework == Framework::ViteTanstackRouter
}

fn deployment() -> TemplateGroup {
    TemplateGroup::new("deploy", "Deployment + CI/CD")
        .with(
            TemplateDefinition::new(
                ".github/workflows/ci.yml",
                "CI workflow",
                ContentSource::generated(ci::workflow),
            )
            .computed_script("check", ci::check_script)
            .script_when("typecheck", "tsc --noEmit", is_vite),
        )
        .with(TemplateDefinition::new(
            "Dockerfile",
            "Dockerfile",
            ContentSource::generated(docker::dockerfile),
        ))
        .with(TemplateDefinition::new(
            ".dockerignore",
            "Docker ignore rules",
            ContentSource::asset("dockerignore"),
        ))
        .with(
            TemplateDefinition::new(
                "nginx.conf",
                "nginx config",
                ContentSource::asset("nginx.conf"),
            )
            .when(is_vite),
        )
}

fn pre_commit() -> TemplateGroup {
    TemplateGroup::new("hooks", "Pre-commit hook").with(
        TemplateDefinition::new(
            ".husky/pre-commit",
            "husky pre-commit hook",
            ContentSource::generated(hooks::pre_commit),
        )
        .dev_dependencies(&["husky", "lint-staged"])
        .script("prepare", "husky")
        .computed_script("check", ci::check_script)
        .computed_config("lint-staged", hooks::lint_staged_config),
    )
}

fn editor_settings() -> TemplateGroup {
    TemplateGroup::new("editor", "Editor settings")
        .with(TemplateDefinition::new(
            ".vscode/settings.json",
            "VS Code settings",
            ContentSource::generated(editor::settings),
        ))
        .with(TemplateDefinition::new(
            ".vscode/extensions.json",
            "VS Code extension recommendations",
            ContentSource::generated(editor::extensions),
        ))
}

fn api_client_group() -> TemplateGroup {
    TemplateGroup::new("api-client", "API client")
        .with(TemplateDefinition::new(
            Value::Computed(api_client::client_path),
            "API client",
            ContentSource::generated(api_client::client),
        ))
        .with(TemplateDefinition::new(
            Value::Computed(api_client::error_path),
            "API error type",
            ContentSource::asset("api-error.ts"),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PackageManager, Tooling};
    use crate::templates::content::read_asset;

    #[test]
    fn test_builtin_group_order() {
        assert_eq!(
            Registry::builtin().group_ids(),
            vec!["deploy", "hooks", "editor", "api-client"]
        );
    }

    #[test]
    fn test_builtin_static_assets_are_packaged() {
        for group in Registry::builtin().groups() {
            for def in &group.definitions {
                if let ContentSource::Static { asset } = def.content {
                    assert!(read_asset(asset).is_ok(), "missing asset {}", asset);
                }
            }
        }
    }

    #[test]
    fn test_builtin_dynamic_generators_produce_content() {
        let temp = tempfile::TempDir::new().unwrap();
        for framework in [Framework::Nextjs, Framework::ViteTanstackRouter] {
            for pm in [
                PackageManager::Bun,
                PackageManager::Pnpm,
                PackageManager::Yarn,
                PackageManager::Npm,
            ] {
                for tooling in [Tooling::Biome, Tooling::EslintPrettier] {
                    let ctx = Context::new(temp.path(), pm, tooling, framework);
                    for group in Registry::builtin().groups() {
                        for def in &group.definitions {
                            let content = def.content.render(&ctx).unwrap();
                            assert!(!content.is_empty(), "{} rendered empty", def.label);
                        }
                    }
                }
            }
        }
    }
}
