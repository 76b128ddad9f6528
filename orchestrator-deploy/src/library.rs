//! Shared library installation: checkout under `libs/`, then pip.
//!
//! 1. Create the parent of `libs/<path>`.
//! 2. Clone or update the checkout. A failure ends this library only.
//! 3. `pip install -r <lib>/requirements.txt` when `requirements: true` and
//!    the file exists.
//! 4. `pip install -e <lib>`.
//!
//! pip runs quietly; a failed pip step becomes a warning on the outcome,
//! even when the env interpreter cannot be started.

use std::path::PathBuf;

use serde::Serialize;

use orchestrator_core::{
    paths::{dependency_dir, LIB_REQUIREMENTS_FILE},
    DependencyName, DependencySpec,
};

use crate::context::DeployContext;
use crate::error::{io_err, DeployError};
use crate::git::{clone_or_update, CheckoutAction};

/// Outcome of installing one shared library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LibraryOutcome {
    /// Checked out and handed to pip. `warnings` lists pip steps that failed.
    Installed {
        name: DependencyName,
        path: PathBuf,
        checkout: CheckoutAction,
        warnings: Vec<String>,
    },
    /// Clone or pull failed; nothing was installed.
    CheckoutFailed { name: DependencyName, detail: String },
    /// Named by a project but absent from the `dependencies` table.
    Missing { name: DependencyName },
}

impl LibraryOutcome {
    pub fn name(&self) -> &DependencyName {
        match self {
            LibraryOutcome::Installed { name, .. }
            | LibraryOutcome::CheckoutFailed { name, .. }
            | LibraryOutcome::Missing { name } => name,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, LibraryOutcome::Installed { warnings, .. } if warnings.is_empty())
    }
}

/// Install one library. Only filesystem errors are `Err`; git and pip
/// failures, including commands that cannot start, are reported in the outcome.
pub fn install_library(
    ctx: &DeployContext<'_>,
    name: &DependencyName,
    spec: &DependencySpec,
) -> Result<LibraryOutcome, DeployError> {
    let lib_dir = dependency_dir(&ctx.root, spec);
    if let Some(parent) = lib_dir.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    tracing::info!("Processing dependency: {name}");

    let checkout = match clone_or_update(ctx.runner, &name.0, &spec.url, &spec.branch, &lib_dir) {
        Ok(action) => action,
        Err(DeployError::Git { detail, .. }) => {
            tracing::warn!(dependency = %name, %detail, "checkout failed; skipping install");
            return Ok(LibraryOutcome::CheckoutFailed {
                name: name.clone(),
                detail,
            });
        }
        Err(DeployError::Env(err)) => {
            let detail = err.to_string();
            tracing::warn!(dependency = %name, %detail, "checkout failed; skipping install");
            return Ok(LibraryOutcome::CheckoutFailed {
                name: name.clone(),
                detail,
            });
        }
        Err(err) => return Err(err),
    };

    let mut warnings = Vec::new();

    let requirements = lib_dir.join(LIB_REQUIREMENTS_FILE);
    if spec.requirements && requirements.is_file() {
        tracing::info!("Installing requirements for {name}...");
        let pip = ctx.env.pip(["install", "-r"]).arg(&requirements).quiet();
        if let Some(failure) = ctx.run_reported(&pip) {
            let msg = format!("requirements install failed: {failure}");
            tracing::warn!(dependency = %name, "{msg}");
            warnings.push(msg);
        }
    }

    tracing::info!("Installing {name} in editable mode...");
    let pip = ctx.env.pip(["install", "-e"]).arg(&lib_dir).quiet();
    if let Some(failure) = ctx.run_reported(&pip) {
        let msg = format!("editable install failed: {failure}");
        tracing::warn!(dependency = %name, "{msg}");
        warnings.push(msg);
    } else {
        tracing::info!("{name} installed");
    }

    Ok(LibraryOutcome::Installed {
        name: name.clone(),
        path: lib_dir,
        checkout,
        warnings,
    })
}

/// Install every declared library, in declaration order.
pub fn install_all_libraries(ctx: &DeployContext<'_>) -> Result<Vec<LibraryOutcome>, DeployError> {
    ctx.require_env()?;

    tracing::info!("Installing all libraries");
    if ctx.config.dependencies.is_empty() {
        tracing::info!("No dependencies to install");
        return Ok(Vec::new());
    }

    let mut outcomes = Vec::with_capacity(ctx.config.dependencies.len());
    for (name, spec) in &ctx.config.dependencies {
        outcomes.push(install_library(ctx, &DependencyName::from(name.as_str()), spec)?);
    }

    tracing::info!("All libraries installed");
    Ok(outcomes)
}
