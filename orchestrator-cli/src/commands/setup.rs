//! `orchestrator setup`: bootstrap the runtime environment.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use orchestrator_core::config;
use orchestrator_env::{bootstrap, DependencySource, Platform, SystemRunner};

/// Arguments for `orchestrator setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Base interpreter used to create the environment (overrides `settings.python`).
    #[arg(long, value_name = "INTERPRETER")]
    pub python: Option<String>,
}

impl SetupArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let mut settings = config::settings_at(root).context("failed to read orchestrator.yaml")?;
        if let Some(python) = self.python {
            settings.python = python;
        }

        let report = bootstrap(root, &settings, Platform::detect(), &SystemRunner)?;

        let verb = if report.created { "Created" } else { "Reused" };
        println!("✓ {verb} runtime environment at {}", report.env_dir.display());
        match report.installed_from {
            DependencySource::Manifest { path } => {
                println!("  Installed dependencies from {}", path.display())
            }
            DependencySource::Packages { packages } => {
                println!("  Installed packages: {}", packages.join(", "))
            }
            DependencySource::Nothing => println!("  No dependencies declared"),
        }
        Ok(())
    }
}
