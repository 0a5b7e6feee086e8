//! Detected project facts shared by every resolution and generation step

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageManager {
    Bun,
    Pnpm,
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Bun => "bun",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Command prefix for running a package.json script (`npm run build`)
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Bun => format!("bun run {}", script),
            PackageManager::Pnpm => format!("pnpm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Npm => format!("npm run {}", script),
        }
    }

    /// Command for executing a locally installed binary (`npx lint-staged`)
    pub fn exec(&self, bin: &str) -> String {
        match self {
            PackageManager::Bun => format!("bunx {}", bin),
            PackageManager::Pnpm => format!("pnpm exec {}", bin),
            PackageManager::Yarn => format!("yarn {}", bin),
            PackageManager::Npm => format!("npx {}", bin),
        }
    }

    /// Reproducible install command used in CI and Docker builds
    pub fn frozen_install(&self) -> &'static str {
        match self {
            PackageManager::Bun => "bun install --frozen-lockfile",
            PackageManager::Pnpm => "pnpm install --frozen-lockfile",
            PackageManager::Yarn => "yarn install --frozen-lockfile",
            PackageManager::Npm => "npm ci",
        }
    }

    /// Arguments for adding dev dependencies (`npm install -D`)
    pub fn add_dev_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Bun => &["add", "-d"],
            PackageManager::Pnpm => &["add", "-D"],
            PackageManager::Yarn => &["add", "-D"],
            PackageManager::Npm => &["install", "-D"],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lint and format tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Tooling {
    Biome,
    EslintPrettier,
}

impl Tooling {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tooling::Biome => "Biome",
            Tooling::EslintPrettier => "ESLint + Prettier",
        }
    }
}

impl fmt::Display for Tooling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Web frameworks with dedicated templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Framework {
    /// Next.js, served by its own Node server
    #[value(name = "nextjs", alias = "next")]
    Nextjs,
    /// Vite SPA with TanStack Router, served as static files
    #[value(name = "vite", alias = "vite-tanstack-router")]
    ViteTanstackRouter,
}

impl Framework {
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Nextjs => "Next.js",
            Framework::ViteTanstackRouter => "Vite + TanStack Router",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A detection result tagged with whether it came from a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected<T> {
    pub value: T,
    /// True when no positive evidence was found and a default was used
    pub inferred: bool,
}

impl<T> Detected<T> {
    pub fn found(value: T) -> Self {
        Self {
            value,
            inferred: false,
        }
    }

    pub fn inferred(value: T) -> Self {
        Self {
            value,
            inferred: true,
        }
    }
}

/// Immutable facts about the target project for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub working_dir: PathBuf,
    pub package_manager: PackageManager,
    pub tooling: Tooling,
    pub framework: Framework,
}

impl Context {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        package_manager: PackageManager,
        tooling: Tooling,
        framework: Framework,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            package_manager,
            tooling,
            framework,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Whether a file or directory exists relative to the project root
    pub fn has_path(&self, relative: &str) -> bool {
        self.working_dir.join(relative).exists()
    }

    /// Whether the project keeps its sources under `src/`
    pub fn has_src_dir(&self) -> bool {
        self.working_dir.join("src").is_dir()
    }
}
