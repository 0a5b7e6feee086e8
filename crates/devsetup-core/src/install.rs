//! Dev dependency installation through the project's package manager
//!
//! Runs `<pm> add -D ...` in the project directory and streams its output.
//! Failures are returned as errors carrying the command to run by hand; the
//! caller downgrades them to a warning.

use crate::context::PackageManager;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for installation (5 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// The install command as a single shell line, for display
pub fn install_command(pm: PackageManager, packages: &[String]) -> String {
    let mut parts = vec![pm.display_name().to_string()];
    parts.extend(pm.add_dev_args().iter().map(|a| a.to_string()));
    parts.extend(packages.iter().cloned());
    parts.join(" ")
}

/// Install dev dependencies, streaming the package manager's output
pub async fn install_dev_dependencies(
    pm: PackageManager,
    packages: &[String],
    dir: &Path,
) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }

    let cmd = install_command(pm, packages);
    println!();
    println!("{} {}", "Running:".dimmed(), cmd.yellow());
    println!();

    let mut child = TokioCommand::new(pm.display_name())
        .args(pm.add_dev_args())
        .args(packages)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to start {}: {}\nRun manually: {}", pm, e, cmd))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("Failed to capture stderr"))?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    // Stream output until both pipes close
    let output_task = async {
        let mut stdout_open = true;
        let mut stderr_open = true;
        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => println!("  {}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }
    };

    if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
        let _ = child.kill().await;
        println!();
        anyhow::bail!(
            "Installation timed out after {} seconds.\n\
             Run manually: {}",
            INSTALL_TIMEOUT.as_secs(),
            cmd
        );
    }

    match timeout(Duration::from_secs(10), child.wait()).await {
        Ok(Ok(status)) => {
            println!();
            if status.success() {
                Ok(())
            } else {
                anyhow::bail!(
                    "{} exited with code {}\n\
                     Run manually: {}",
                    pm,
                    status.code().unwrap_or(-1),
                    cmd
                );
            }
        }
        Ok(Err(e)) => {
            anyhow::bail!("Failed to wait for {}: {}\nRun manually: {}", pm, e, cmd);
        }
        Err(_) => {
            let _ = child.kill().await;
            anyhow::bail!("{} did not exit. Run manually: {}", pm, cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages() -> Vec<String> {
        vec!["husky".to_string(), "lint-staged".to_string()]
    }

    #[test]
    fn test_install_command_per_package_manager() {
        assert_eq!(
            install_command(PackageManager::Npm, &packages()),
            "npm install -D husky lint-staged"
        );
        assert_eq!(
            install_command(PackageManager::Pnpm, &packages()),
            "pnpm add -D husky lint-staged"
        );
        assert_eq!(
            install_command(PackageManager::Yarn, &packages()),
            "yarn add -D husky lint-staged"
        );
        assert_eq!(
            install_command(PackageManager::Bun, &packages()),
            "bun add -d husky lint-staged"
        );
    }

    #[tokio::test]
    async fn test_nothing_to_install_is_a_no_op() {
        let temp = tempfile::TempDir::new().unwrap();
        install_dev_dependencies(PackageManager::Npm, &[], temp.path())
            .await
            .unwrap();
    }
}
