//! GitHub Actions workflow

use crate::context::{Context, Framework, PackageManager, Tooling};
use serde::Serialize;
use std::collections::BTreeMap;

const NODE_VERSION: &str = "22";

#[derive(Debug, Serialize)]
struct Workflow {
    name: &'static str,
    on: Triggers,
    jobs: Jobs,
}

#[derive(Debug, Serialize)]
struct Triggers {
    push: BranchFilter,
    pull_request: BranchFilter,
}

#[derive(Debug, Serialize)]
struct BranchFilter {
    branches: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Jobs {
    check: Job,
}

#[derive(Debug, Serialize)]
struct Job {
    #[serde(rename = "runs-on")]
    runs_on: &'static str,
    steps: Vec<Step>,
}

#[derive(Debug, Default, Serialize)]
struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with: Option<BTreeMap<&'static str, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<String>,
}

impl Step {
    fn uses(action: &'static str) -> Self {
        Self {
            uses: Some(action),
            ..Default::default()
        }
    }

    fn run(name: &str, command: impl Into<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            run: Some(command.into()),
            ..Default::default()
        }
    }

    fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.with
            .get_or_insert_with(BTreeMap::new)
            .insert(key, value.into());
        self
    }
}

/// The `check` script: lint and format verification without writing
pub fn check_script(ctx: &Context) -> String {
    match ctx.tooling {
        Tooling::Biome => "biome check .".to_string(),
        Tooling::EslintPrettier => "eslint . && prettier --check .".to_string(),
    }
}

fn setup_steps(pm: PackageManager) -> Vec<Step> {
    let setup_node = || Step::uses("actions/setup-node@v4").with("node-version", NODE_VERSION);

    match pm {
        PackageManager::Bun => vec![Step::uses("oven-sh/setup-bun@v2")],
        PackageManager::Pnpm => vec![
            Step::uses("pnpm/action-setup@v4"),
            setup_node().with("cache", "pnpm"),
        ],
        PackageManager::Yarn => vec![setup_node().with("cache", "yarn")],
        PackageManager::Npm => vec![setup_node().with("cache", "npm")],
    }
}

fn build_workflow(ctx: &Context) -> Workflow {
    let pm = ctx.package_manager;

    let mut steps = vec![Step::uses("actions/checkout@v4")];
    steps.extend(setup_steps(pm));
    steps.push(Step::run("Install dependencies", pm.frozen_install()));
    steps.push(Step::run("Lint", pm.run_script("check")));
    if ctx.framework == Framework::ViteTanstackRouter {
        steps.push(Step::run("Type check", pm.run_script("typecheck")));
    }
    steps.push(Step::run("Build", pm.run_script("build")));

    Workflow {
        name: "CI",
        on: Triggers {
            push: BranchFilter {
                branches: vec!["main"],
            },
            pull_request: BranchFilter {
                branches: vec!["main"],
            },
        },
        jobs: Jobs {
            check: Job {
                runs_on: "ubuntu-latest",
                steps,
            },
        },
    }
}

/// `.github/workflows/ci.yml`
pub fn workflow(ctx: &Context) -> String {
    let workflow = build_workflow(ctx);
    // Serializing plain structs of strings cannot fail
    let body = serde_yaml::to_string(&workflow).unwrap_or_default();
    format!("# Generated by devsetup\n{}", body)
}
