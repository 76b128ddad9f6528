//! Project deployment.
//!
//! 1. Clone or update `repos/<project>`. Failure aborts the project.
//! 2. Install each listed shared library in order.
//! 3. Run `repo_specific_packages.txt`, if present.

use std::path::PathBuf;

use serde::Serialize;

use orchestrator_core::{paths::project_dir, ProjectName};

use crate::context::DeployContext;
use crate::error::{io_err, DeployError};
use crate::git::{clone_or_update, CheckoutAction};
use crate::library::{install_library, LibraryOutcome};
use crate::setup_commands::{run_setup_commands, CommandReport};

/// Everything that happened while deploying one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub project: ProjectName,
    pub path: PathBuf,
    pub checkout: CheckoutAction,
    pub libraries: Vec<LibraryOutcome>,
    /// `None` when the project has no setup-commands file.
    pub commands: Option<Vec<CommandReport>>,
}

impl DeploymentReport {
    /// `true` when every library installed cleanly and every command passed.
    pub fn is_clean(&self) -> bool {
        self.libraries.iter().all(LibraryOutcome::is_clean)
            && self
                .commands
                .iter()
                .flatten()
                .all(|c| c.success)
    }
}

/// Deploy a single project declared in the config.
pub fn deploy_project(
    ctx: &DeployContext<'_>,
    project: &ProjectName,
) -> Result<DeploymentReport, DeployError> {
    let spec = ctx
        .config
        .project(project)
        .ok_or_else(|| DeployError::UnknownProject {
            name: project.0.clone(),
        })?;
    ctx.require_env()?;

    tracing::info!("Starting deployment: {project}");

    let path = project_dir(&ctx.root, project);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    tracing::info!("Step 1: Cloning/updating project repository");
    let checkout = clone_or_update(ctx.runner, &project.0, &spec.url, &spec.branch, &path)?;

    let mut libraries = Vec::new();
    if !spec.dependencies.is_empty() {
        let total = spec.dependencies.len();
        tracing::info!("Step 2: Installing {total} dependencies");
        for (i, dep) in spec.dependencies.iter().enumerate() {
            tracing::info!("[{}/{total}]", i + 1);
            match ctx.config.dependency(dep) {
                Some(dep_spec) => libraries.push(install_library(ctx, dep, dep_spec)?),
                None => {
                    tracing::warn!(project = %project, dependency = %dep, "dependency not declared; skipping");
                    libraries.push(LibraryOutcome::Missing { name: dep.clone() });
                }
            }
        }
    }

    let commands = run_setup_commands(ctx, &path)?;

    tracing::info!("Deployment completed: {project}");
    Ok(DeploymentReport {
        project: project.clone(),
        path,
        checkout,
        libraries,
        commands,
    })
}

/// Which projects a deploy run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployScope {
    /// Every configured project, in declaration order.
    All,
    /// A single named project.
    Project(ProjectName),
}

/// Per-project result of a deploy run.
pub type DeployResult = (ProjectName, Result<DeploymentReport, DeployError>);

/// Deploy every project in `scope`. A failed project is logged and recorded;
/// the remaining projects still deploy.
pub fn run(ctx: &DeployContext<'_>, scope: DeployScope) -> Vec<DeployResult> {
    let projects = match scope {
        DeployScope::All => ctx.config.project_names(),
        DeployScope::Project(name) => vec![name],
    };

    projects
        .into_iter()
        .map(|project| {
            let result = deploy_project(ctx, &project);
            if let Err(err) = &result {
                tracing::error!(project = %project, error = %err, "deployment failed");
            }
            (project, result)
        })
        .collect()
}
