//! Orchestrator: runtime environment bootstrap, launcher, and project deployer.
//!
//! # Usage
//!
//! ```text
//! orchestrator [--root <dir>] setup [--python <interpreter>]
//! orchestrator [--root <dir>] launch [args...]
//! orchestrator [--root <dir>] deploy -p <project> | --all [--dry-run] [--json]
//! orchestrator [--root <dir>] list [--json]
//! orchestrator [--root <dir>] install-libs [--dry-run]
//! ```

mod commands;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    deploy::DeployArgs, install_libs::InstallLibsArgs, launch::LaunchArgs, list::ListArgs,
    setup::SetupArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orchestrator",
    version,
    about = "Prepare a Python runtime environment and deploy projects into it",
    long_about = None,
)]
struct Cli {
    /// Workspace root holding orchestrator.yaml, the env, repos/, libs/ and logs/.
    #[arg(long, global = true, env = "ORCHESTRATOR_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the runtime environment (if absent) and install its dependencies.
    Setup(SetupArgs),

    /// Run the entrypoint inside the runtime environment, forwarding all arguments.
    #[command(disable_help_flag = true)]
    Launch(LaunchArgs),

    /// Clone/update a project, install its shared libraries, run its setup commands.
    Deploy(DeployArgs),

    /// List configured projects and whether they are deployed.
    List(ListArgs),

    /// Install every shared library declared in orchestrator.yaml.
    InstallLibs(InstallLibsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = resolve_root(cli.root.as_deref())?;

    match cli.command {
        Commands::Launch(args) => {
            logging::init(&root, false);
            let code = args.run(&root)?;
            std::process::exit(code);
        }
        Commands::Setup(args) => {
            logging::init(&root, true);
            args.run(&root)
        }
        Commands::Deploy(args) => {
            logging::init(&root, true);
            args.run(&root)
        }
        Commands::List(args) => {
            logging::init(&root, false);
            args.run(&root)
        }
        Commands::InstallLibs(args) => {
            logging::init(&root, true);
            args.run(&root)
        }
    }
}

/// Absolute workspace root: `--root` / `ORCHESTRATOR_ROOT`, else the current directory.
fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(match explicit {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}
