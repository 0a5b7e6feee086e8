//! devsetup - add CI, Docker, git hooks and editor settings to a JavaScript project

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use devsetup_core::templates::{print_groups, resolve, Registry};
use devsetup_core::tui::{build_context, SetupArgs};
use devsetup_core::{Framework, PackageManager, Tooling};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "devsetup")]
#[command(about = "Add CI, Docker, pre-commit hooks, editor settings and an API client to a JavaScript project")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub setup: CliSetupArgs,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which files would be generated for this project
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct CliSetupArgs {
    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Package manager to use instead of detecting it
    #[arg(long = "package-manager", value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Framework to use instead of detecting it
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,

    /// Lint tooling to use instead of detecting it
    #[arg(long, value_enum)]
    pub tooling: Option<Tooling>,

    /// Groups to set up (comma-separated: deploy,hooks,editor,api-client)
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,

    /// Don't install dev dependencies, print the command instead
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

impl From<CliSetupArgs> for SetupArgs {
    fn from(args: CliSetupArgs) -> Self {
        SetupArgs {
            directory: args.directory,
            package_manager: args.package_manager,
            framework: args.framework,
            tooling: args.tooling,
            groups: args.groups,
            yes: args.yes,
            force: args.force,
            skip_install: args.skip_install,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

/// Log level: `--debug`, then `RUST_LOG`, then warnings only
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("devsetup=debug,devsetup_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn list(args: ListArgs, overrides: CliSetupArgs) -> Result<()> {
    let mut setup: SetupArgs = overrides.into();
    if args.directory.is_some() {
        setup.directory = args.directory;
    }

    let (ctx, warnings) = build_context(&setup)?;
    for warning in warnings {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    let registry = Registry::builtin();
    print_groups(&resolve(&registry, &ctx), &ctx);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.debug);
    tracing::debug!(?args, "starting");

    match args.command {
        Some(Command::List(list_args)) => list(list_args, args.setup),
        None => {
            let result = devsetup_core::run(args.setup.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
