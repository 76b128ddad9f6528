//! `orchestrator list`: configured projects and their deployment state.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use orchestrator_core::config;
use orchestrator_deploy::{list_projects, ProjectStatus};

/// Arguments for `orchestrator list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListJson {
    projects: Vec<ProjectStatus>,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "project")]
    name: String,
    #[tabled(rename = "branch")]
    branch: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "libraries")]
    libraries: usize,
}

impl ListArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let cfg = config::load_at(root).context("failed to load orchestrator.yaml")?;
        let projects = list_projects(root, &cfg);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&ListJson { projects })
                    .context("failed to serialize project list JSON")?
            );
            return Ok(());
        }

        println!("\nConfigured Projects:");
        if projects.is_empty() {
            println!("  (none)");
            return Ok(());
        }

        let rows: Vec<ProjectRow> = projects
            .into_iter()
            .map(|p| ProjectRow {
                name: p.name.0,
                branch: p.branch,
                status: status_label(p.deployed),
                libraries: p.dependencies.len(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn status_label(deployed: bool) -> String {
    if deployed {
        "Deployed".green().to_string()
    } else {
        "Not Deployed".bright_black().to_string()
    }
}
