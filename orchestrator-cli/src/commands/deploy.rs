//! `orchestrator deploy`: clone/update projects and install what they need.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use orchestrator_core::{config, ProjectName};
use orchestrator_deploy::{
    project::{self, DeployScope},
    CheckoutAction, DeployContext, DeployResult, DeploymentReport, LibraryOutcome,
};
use orchestrator_env::{CommandRunner, DryRunRunner, Platform, SystemRunner};

/// Arguments for `orchestrator deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Project name to deploy (omit when using `--all`).
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Deploy every configured project.
    #[arg(long, short = 'a', conflicts_with = "project")]
    pub all: bool,

    /// Show the commands that would run without running any of them.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

impl DeployArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let scope = if self.all {
            DeployScope::All
        } else {
            let name = self
                .project
                .clone()
                .context("provide a project name with -p or use --all")?;
            DeployScope::Project(ProjectName::from(name))
        };

        let cfg = config::load_at(root).context("failed to load orchestrator.yaml")?;

        let system = SystemRunner;
        let dry = DryRunRunner::new();
        let runner: &dyn CommandRunner = if self.dry_run { &dry } else { &system };
        let ctx = DeployContext::new(root, &cfg, Platform::detect(), runner);

        let results = project::run(&ctx, scope);
        if results.is_empty() {
            println!("No projects configured in orchestrator.yaml.");
            return Ok(());
        }

        if self.json {
            print_json(&results)?;
        } else {
            for (name, result) in &results {
                match result {
                    Ok(report) => print_report(report, self.dry_run),
                    Err(err) => println!("{} '{name}': {err}", "✗".red().bold()),
                }
            }
        }

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            bail!("{failed} of {} deployment(s) failed", results.len());
        }
        Ok(())
    }
}

fn print_json(results: &[DeployResult]) -> Result<()> {
    let payload: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, result)| match result {
            Ok(report) => serde_json::json!({ "project": name, "ok": true, "report": report }),
            Err(err) => serde_json::json!({ "project": name, "ok": false, "error": err.to_string() }),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize deploy JSON")?
    );
    Ok(())
}

fn print_report(report: &DeploymentReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let checkout = match report.checkout {
        CheckoutAction::Cloned => "cloned",
        CheckoutAction::Updated => "updated",
    };
    let mark = if report.is_clean() {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    println!(
        "{prefix}{mark} '{}' deployed ({checkout}, {} libraries)",
        report.project,
        report.libraries.len()
    );
    for library in &report.libraries {
        print_library(library);
    }
    for command in report.commands.iter().flatten() {
        let status = if command.success {
            "ok".green()
        } else {
            "failed".red()
        };
        println!("  >  {} [{status}]", command.line);
    }
}

/// One line per library outcome; shared with `install-libs`.
pub(crate) fn print_library(outcome: &LibraryOutcome) {
    match outcome {
        LibraryOutcome::Installed {
            name,
            path,
            warnings,
            ..
        } => {
            if warnings.is_empty() {
                println!("  {}  {name} ({})", "✓".green(), path.display());
            } else {
                println!("  {}  {name} ({})", "!".yellow(), path.display());
                for warning in warnings {
                    println!("       {warning}");
                }
            }
        }
        LibraryOutcome::CheckoutFailed { name, detail } => {
            println!("  {}  {name}: checkout failed ({detail})", "✗".red());
        }
        LibraryOutcome::Missing { name } => {
            println!("  {}  {name}: not declared under `dependencies`", "·".bright_black());
        }
    }
}
