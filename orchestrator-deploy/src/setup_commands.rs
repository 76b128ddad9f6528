//! Per-project setup commands from `repos/<project>/repo_specific_packages.txt`.
//!
//! One shell line per line. Blank lines and lines starting with `#` (after
//! trimming) are ignored. Each line runs through the platform shell inside
//! the project directory with the runtime environment activated, so a bare
//! `pip install ...` lands in the env.

use std::path::Path;

use serde::Serialize;

use orchestrator_core::paths::PROJECT_COMMANDS_FILE;

use crate::context::DeployContext;
use crate::error::{io_err, DeployError};

/// Result of one setup line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub line: String,
    pub success: bool,
}

/// Extract runnable lines from a setup-commands file.
pub fn parse_setup_commands(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Run the project's setup commands, if it has any. `None` means no file.
///
/// A failing line, or one whose shell cannot start, is logged and recorded;
/// later lines still run.
pub fn run_setup_commands(
    ctx: &DeployContext<'_>,
    project_dir: &Path,
) -> Result<Option<Vec<CommandReport>>, DeployError> {
    let file = project_dir.join(PROJECT_COMMANDS_FILE);
    if !file.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&file).map_err(|e| io_err(&file, e))?;

    tracing::info!("Step 3: Running project-specific commands");
    let mut reports = Vec::new();
    for line in parse_setup_commands(&contents) {
        tracing::info!("> {line}");
        let spec = ctx
            .env
            .activate(ctx.env.platform().shell_command(&line))
            .current_dir(project_dir);
        let failure = ctx.run_reported(&spec);
        if let Some(status) = &failure {
            tracing::warn!(command = %line, %status, "setup command failed");
        }
        reports.push(CommandReport {
            line,
            success: failure.is_none(),
        });
    }
    Ok(Some(reports))
}
