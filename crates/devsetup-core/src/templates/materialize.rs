//! Writing resolved files into the project

use super::resolver::ResolvedFile;
use crate::context::Context;
use crate::error::{Result, SetupError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Per-file outcome of writing a selection
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub written: Vec<String>,
    pub failed: Vec<(String, SetupError)>,
}

impl MaterializeReport {
    /// A missing asset means the tool itself is broken
    pub fn packaging_defect(&self) -> Option<&SetupError> {
        self.failed
            .iter()
            .map(|(_, err)| err)
            .find(|err| matches!(err, SetupError::AssetNotFound { .. }))
    }
}

/// Render and write a single file, creating parent directories
///
/// Existing files are overwritten; callers decide beforehand what to skip.
pub async fn materialize(file: &ResolvedFile<'_>, ctx: &Context) -> Result<PathBuf> {
    let content = file.content.render(ctx)?;
    let target_path = file.absolute_path(ctx);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| SetupError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    fs::write(&target_path, content)
        .await
        .map_err(|source| SetupError::Write {
            path: target_path.clone(),
            source,
        })?;

    if file.is_hook() {
        make_executable(&target_path).await;
    }

    tracing::debug!(path = %file.target_path, "wrote template file");
    Ok(target_path)
}

/// Write every file, continuing past individual failures
pub async fn materialize_all(files: &[ResolvedFile<'_>], ctx: &Context) -> MaterializeReport {
    let mut report = MaterializeReport::default();

    for file in files {
        match materialize(file, ctx).await {
            Ok(_) => report.written.push(file.target_path.clone()),
            Err(e) => {
                tracing::warn!(path = %file.target_path, error = %e, "failed to write file");
                report.failed.push((file.target_path.clone(), e));
            }
        }
    }

    report
}

#[cfg(unix)]
async fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    // Not every filesystem supports mode bits; the hook is still written
    if let Err(e) = fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await {
        tracing::debug!(path = %path.display(), error = %e, "could not mark hook executable");
    }
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) {}
