//! `orchestrator install-libs`: install every declared shared library.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use orchestrator_core::config;
use orchestrator_deploy::{install_all_libraries, DeployContext};
use orchestrator_env::{CommandRunner, DryRunRunner, Platform, SystemRunner};

use super::deploy::print_library;

/// Arguments for `orchestrator install-libs`.
#[derive(Args, Debug)]
pub struct InstallLibsArgs {
    /// Show the commands that would run without running any of them.
    #[arg(long)]
    pub dry_run: bool,
}

impl InstallLibsArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let cfg = config::load_at(root).context("failed to load orchestrator.yaml")?;

        let system = SystemRunner;
        let dry = DryRunRunner::new();
        let runner: &dyn CommandRunner = if self.dry_run { &dry } else { &system };
        let ctx = DeployContext::new(root, &cfg, Platform::detect(), runner);

        let outcomes = install_all_libraries(&ctx).context("install-libs failed")?;

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        if outcomes.is_empty() {
            println!("{prefix}No dependencies to install.");
            return Ok(());
        }
        println!("{prefix}✓ {} libraries processed", outcomes.len());
        for outcome in &outcomes {
            print_library(outcome);
        }
        Ok(())
    }
}
