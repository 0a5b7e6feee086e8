//! Detection of package manager, framework and lint tooling
//!
//! Each detector returns a [`Detected`] value. When no evidence is found a
//! default is returned with `inferred` set, and the prompt flow surfaces it
//! as a warning.

pub mod framework;
pub mod package_manager;
pub mod tooling;

use crate::context::{Context, Detected, Framework, PackageManager, Tooling};
use crate::error::Result;
use crate::package_json;
use std::path::Path;

pub use framework::detect_framework;
pub use package_manager::detect_package_manager;
pub use tooling::detect_tooling;

/// Combined detection result for a project directory
#[derive(Debug, Clone)]
pub struct Detection {
    pub package_manager: Detected<PackageManager>,
    pub framework: Detected<Framework>,
    pub tooling: Detected<Tooling>,
}

impl Detection {
    pub fn into_context(self, working_dir: &Path) -> Context {
        Context::new(
            working_dir,
            self.package_manager.value,
            self.tooling.value,
            self.framework.value,
        )
    }

    /// Warnings for every value that fell back to a default
    pub fn inferred_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.package_manager.inferred {
            warnings.push(format!(
                "Could not detect a package manager, assuming {}",
                self.package_manager.value
            ));
        }
        if self.framework.inferred {
            warnings.push(format!(
                "Could not detect a framework, assuming {}",
                self.framework.value
            ));
        }
        if self.tooling.inferred {
            warnings.push(format!(
                "Could not detect lint tooling, assuming {}",
                self.tooling.value
            ));
        }
        warnings
    }
}

/// Values forced from the command line instead of detected
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub package_manager: Option<PackageManager>,
    pub framework: Option<Framework>,
    pub tooling: Option<Tooling>,
}

/// Run detection, skipping detectors for overridden values
///
/// Requires a readable package.json; a malformed one is an error.
pub fn detect_with_overrides(dir: &Path, overrides: &Overrides) -> Result<Detection> {
    let manifest = package_json::read_manifest(dir)?;
    let detection = Detection {
        package_manager: overrides
            .package_manager
            .map(Detected::found)
            .unwrap_or_else(|| detect_package_manager(dir, &manifest)),
        framework: overrides
            .framework
            .map(Detected::found)
            .unwrap_or_else(|| detect_framework(dir, &manifest)),
        tooling: overrides
            .tooling
            .map(Detected::found)
            .unwrap_or_else(|| detect_tooling(dir, &manifest)),
    };
    tracing::debug!(?detection, "detection finished");
    Ok(detection)
}

/// Whether any of the candidate files exists in the directory
pub(crate) fn any_file_exists(dir: &Path, candidates: &[&str]) -> bool {
    candidates.iter().any(|name| dir.join(name).exists())
}
