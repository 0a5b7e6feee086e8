//! Charm-style CLI prompts using cliclack

use crate::context::{Context, Framework, PackageManager, Tooling};
use crate::detect::{self, Overrides};
use crate::install;
use crate::next_config::{self, NextConfigOutcome};
use crate::package_json;
use crate::templates::{
    aggregate, materialize_all, resolve, Aggregate, Registry, ResolvedFile, ResolvedGroup,
};
use anyhow::{Context as _, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Arguments for the setup flow
#[derive(Debug, Clone, Default)]
pub struct SetupArgs {
    /// Project directory (defaults to the current directory)
    pub directory: Option<PathBuf>,

    pub package_manager: Option<PackageManager>,
    pub framework: Option<Framework>,
    pub tooling: Option<Tooling>,

    /// Group ids to set up without prompting
    pub groups: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    /// Overwrite existing files without asking
    pub force: bool,

    /// Don't run the package manager
    pub skip_install: bool,
}

impl SetupArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            package_manager: self.package_manager,
            framework: self.framework,
            tooling: self.tooling,
        }
    }
}

/// Map a prompt abort (Esc / Ctrl+C) to `None`
fn prompt<T>(result: io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn cancel() -> Result<()> {
    cliclack::outro_cancel("Setup cancelled.")?;
    Ok(())
}

/// Resolve the target directory from the arguments
pub fn project_dir(args: &SetupArgs) -> PathBuf {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    }
}

/// Detect the project and build the run's context
///
/// Fails when package.json is missing or malformed.
pub fn build_context(args: &SetupArgs) -> Result<(Context, Vec<String>)> {
    let dir = project_dir(args);
    package_json::ensure_manifest(&dir)?;
    let detection = detect::detect_with_overrides(&dir, &args.overrides())?;
    let warnings = detection.inferred_warnings();
    Ok((detection.into_context(&dir), warnings))
}

/// Run the setup flow with interactive prompts
pub async fn run(args: SetupArgs) -> Result<()> {
    cliclack::intro("devsetup")?;

    // Step 1: Detect (package.json is a hard precondition)
    let spinner = cliclack::spinner();
    spinner.start("Detecting project...");
    let (ctx, warnings) = match build_context(&args) {
        Ok(result) => result,
        Err(e) => {
            spinner.error("Detection failed");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "{} · {} · {}",
        ctx.framework, ctx.package_manager, ctx.tooling
    ));
    for warning in &warnings {
        cliclack::log::warning(warning)?;
    }

    // Step 2: Resolve and select groups
    let registry = Registry::builtin();
    warn_unknown_groups(&registry, &args)?;
    let groups = resolve(&registry, &ctx);
    let Some(selected) = select_groups(&groups, &args)? else {
        return cancel();
    };
    if selected.is_empty() {
        return cancel();
    }

    // Step 3: Decide about existing files
    let files: Vec<ResolvedFile<'_>> = selected
        .iter()
        .flat_map(|group| group.files.iter().cloned())
        .collect();
    let Some(files) = confirm_overwrites(files, &ctx, &args)? else {
        return cancel();
    };
    if files.is_empty() {
        cliclack::outro("Nothing to do.")?;
        return Ok(());
    }

    let plan = aggregate(&files, &ctx);

    // Step 4: Final confirmation; nothing is written before this
    print_summary(&files, &plan)?;
    if !args.yes {
        let confirmed = prompt(
            cliclack::confirm("Apply these changes?")
                .initial_value(true)
                .interact(),
        )?;
        if confirmed != Some(true) {
            return cancel();
        }
    }

    // Step 5: Next.js standalone output for the Docker image
    if needs_standalone(&files, &ctx) {
        ensure_standalone(&ctx).await?;
    }

    // Step 6: Write files and patch package.json
    write_files(&files, &ctx).await?;
    patch_manifest(&ctx, &plan).await?;

    // Step 7: Install dev dependencies
    install_dependencies(&ctx, &plan, &args).await?;

    cliclack::outro("Project setup complete!")?;
    Ok(())
}

fn warn_unknown_groups(registry: &Registry, args: &SetupArgs) -> Result<()> {
    let known = registry.group_ids();
    for id in args.groups.iter().flatten() {
        if !known.contains(&id.as_str()) {
            cliclack::log::warning(format!(
                "Unknown group: {} (available: {})",
                id,
                known.join(", ")
            ))?;
        }
    }
    Ok(())
}

fn select_groups<'a, 'r>(
    groups: &'a [ResolvedGroup<'r>],
    args: &SetupArgs,
) -> Result<Option<Vec<&'a ResolvedGroup<'r>>>> {
    if groups.is_empty() {
        cliclack::log::warning("No templates apply to this project")?;
        return Ok(Some(Vec::new()));
    }

    if let Some(ids) = &args.groups {
        let selected: Vec<_> = groups
            .iter()
            .filter(|g| ids.iter().any(|id| id.as_str() == g.id))
            .collect();
        let labels: Vec<&str> = selected.iter().map(|g| g.label).collect();
        cliclack::log::info(format!("Selected: {}", labels.join(", ")))?;
        return Ok(Some(selected));
    }

    if args.yes {
        return Ok(Some(groups.iter().collect()));
    }

    let mut multi = cliclack::multiselect("What would you like to set up?");
    for (idx, group) in groups.iter().enumerate() {
        multi = multi.item(idx, group.label, &group.hint);
    }
    let chosen: Option<Vec<usize>> = prompt(
        multi
            .initial_values((0..groups.len()).collect())
            .required(false)
            .interact(),
    )?;

    Ok(chosen.map(|indices| {
        groups
            .iter()
            .enumerate()
            .filter(|(idx, _)| indices.contains(idx))
            .map(|(_, group)| group)
            .collect()
    }))
}

/// Indices of files that already exist on disk
fn existing_files(files: &[ResolvedFile<'_>], ctx: &Context) -> Vec<usize> {
    files
        .iter()
        .enumerate()
        .filter(|(_, f)| f.exists(ctx))
        .map(|(idx, _)| idx)
        .collect()
}

/// Overwrite decision made by flags alone; `None` means ask
fn flag_overwrites(existing: &[usize], args: &SetupArgs) -> Option<Vec<usize>> {
    if args.force {
        Some(existing.to_vec())
    } else if args.yes {
        Some(Vec::new())
    } else {
        None
    }
}

/// Keep new files plus the existing files chosen for overwrite
fn keep_files<'r>(
    files: Vec<ResolvedFile<'r>>,
    existing: &[usize],
    overwrite: &[usize],
) -> Vec<ResolvedFile<'r>> {
    files
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !existing.contains(idx) || overwrite.contains(idx))
        .map(|(_, file)| file)
        .collect()
}

/// Drop files the user doesn't want overwritten
fn confirm_overwrites<'r>(
    files: Vec<ResolvedFile<'r>>,
    ctx: &Context,
    args: &SetupArgs,
) -> Result<Option<Vec<ResolvedFile<'r>>>> {
    let existing = existing_files(&files, ctx);
    if existing.is_empty() {
        return Ok(Some(files));
    }

    let overwrite = match flag_overwrites(&existing, args) {
        Some(overwrite) => {
            if overwrite.len() < existing.len() {
                cliclack::log::info(format!(
                    "Keeping {} existing file(s); pass --force to overwrite",
                    existing.len()
                ))?;
            }
            overwrite
        }
        None => {
            let mut multi = cliclack::multiselect("These files already exist. Overwrite?");
            for idx in &existing {
                multi = multi.item(*idx, &files[*idx].target_path, files[*idx].label());
            }
            match prompt(multi.required(false).interact())? {
                Some(chosen) => chosen,
                None => return Ok(None),
            }
        }
    };

    Ok(Some(keep_files(files, &existing, &overwrite)))
}

/// The Dockerfile copies the standalone server, so only it needs the patch
fn needs_standalone(files: &[ResolvedFile<'_>], ctx: &Context) -> bool {
    ctx.framework == Framework::Nextjs && files.iter().any(|f| f.target_path == "Dockerfile")
}

fn print_summary(files: &[ResolvedFile<'_>], plan: &Aggregate) -> Result<()> {
    let mut lines: Vec<String> = files
        .iter()
        .map(|f| format!("write   {}", f.target_path))
        .collect();
    for (name, command) in &plan.manifest_mods.scripts {
        lines.push(format!("script  {}: {}", name, command));
    }
    for (key, _) in &plan.manifest_mods.config {
        lines.push(format!("config  {}", key));
    }
    if !plan.dependencies.is_empty() {
        lines.push(format!("install {}", plan.dependencies.join(" ")));
    }
    cliclack::note("Planned changes", lines.join("\n"))?;
    Ok(())
}

async fn ensure_standalone(ctx: &Context) -> Result<()> {
    let relative = |path: &Path| {
        path.strip_prefix(ctx.working_dir())
            .unwrap_or(path)
            .display()
            .to_string()
    };

    let outcome = next_config::ensure_standalone_output(ctx.working_dir())
        .await
        .context("Failed to configure Next.js standalone output")?;
    match outcome {
        NextConfigOutcome::Created(path) => {
            cliclack::log::success(format!("Created {} with standalone output", relative(&path)))?
        }
        NextConfigOutcome::Updated(path) => {
            cliclack::log::success(format!("Enabled standalone output in {}", relative(&path)))?
        }
        NextConfigOutcome::AlreadyConfigured(path) => {
            cliclack::log::info(format!("{} already uses standalone output", relative(&path)))?
        }
        NextConfigOutcome::ManualRequired { path, reason } => cliclack::log::warning(format!(
            "Could not update {} ({}). Add `output: \"standalone\"` to your Next.js config so the Dockerfile can find the server build.",
            relative(&path),
            reason
        ))?,
    }
    Ok(())
}

async fn write_files(files: &[ResolvedFile<'_>], ctx: &Context) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Writing files...");

    let report = materialize_all(files, ctx).await;

    if report.failed.is_empty() {
        spinner.stop(format!("Wrote {} file(s)", report.written.len()));
    } else {
        spinner.error(format!(
            "Wrote {} file(s), {} failed",
            report.written.len(),
            report.failed.len()
        ));
        for (path, err) in &report.failed {
            cliclack::log::error(format!("{}: {}", path, err))?;
        }
    }

    if let Some(defect) = report.packaging_defect() {
        anyhow::bail!("{}", defect);
    }
    Ok(())
}

async fn patch_manifest(ctx: &Context, plan: &Aggregate) -> Result<()> {
    if plan.manifest_mods.is_empty() {
        return Ok(());
    }

    let report = package_json::patch_manifest(ctx.working_dir(), &plan.manifest_mods)
        .await
        .context("Failed to update package.json")?;
    if report.is_empty() {
        cliclack::log::info("package.json already up to date")?;
    } else {
        cliclack::log::success(format!(
            "Added to package.json: {}",
            report.added.join(", ")
        ))?;
    }
    Ok(())
}

async fn install_dependencies(ctx: &Context, plan: &Aggregate, args: &SetupArgs) -> Result<()> {
    if plan.dependencies.is_empty() {
        return Ok(());
    }

    let command = install::install_command(ctx.package_manager, &plan.dependencies);
    if args.skip_install {
        cliclack::log::info(format!("Skipped install. Run: {}", command))?;
        return Ok(());
    }

    cliclack::log::step(format!("Installing {}", plan.dependencies.join(", ")))?;
    match install::install_dev_dependencies(
        ctx.package_manager,
        &plan.dependencies,
        ctx.working_dir(),
    )
    .await
    {
        Ok(()) => cliclack::log::success("Dev dependencies installed")?,
        Err(e) => cliclack::log::warning(format!(
            "Dependency install failed: {}\nInstall them manually with: {}",
            e, command
        ))?,
    }
    Ok(())
}
