//! Bootstrap: create the runtime environment and install its dependencies.
//!
//! 1. `<python> -m venv <env>` unless `<env>` already exists.
//! 2. `<env python> -m pip install --upgrade pip`.
//! 3. `pip install -r <manifest>` when the manifest exists, else
//!    `pip install <packages...>` (skipped when the list is empty).
//!
//! Any failing step aborts the run with [`EnvError::BootstrapFailure`].

use std::fmt;
use std::path::{Path, PathBuf};

use orchestrator_core::Settings;
use serde::Serialize;

use crate::error::EnvError;
use crate::layout::RuntimeEnv;
use crate::platform::Platform;
use crate::runner::{CommandRunner, CommandSpec};

/// The step a bootstrap failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStep {
    CreateEnvironment,
    UpgradeInstaller,
    InstallDependencies,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapStep::CreateEnvironment => write!(f, "create the runtime environment"),
            BootstrapStep::UpgradeInstaller => write!(f, "upgrade pip"),
            BootstrapStep::InstallDependencies => write!(f, "install dependencies"),
        }
    }
}

/// Where the installed dependencies came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencySource {
    Manifest { path: PathBuf },
    Packages { packages: Vec<String> },
    Nothing,
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub env_dir: PathBuf,
    /// `false` when an existing environment was reused.
    pub created: bool,
    pub installed_from: DependencySource,
}

/// Prepare the runtime environment under `root`.
///
/// Idempotent: an existing environment directory is reused, never recreated.
pub fn bootstrap(
    root: &Path,
    settings: &Settings,
    platform: Platform,
    runner: &dyn CommandRunner,
) -> Result<BootstrapReport, EnvError> {
    let env = RuntimeEnv::new(root, settings, platform);

    let created = if env.exists() {
        tracing::info!(env = %env.dir().display(), "runtime environment already exists");
        false
    } else {
        tracing::info!(env = %env.dir().display(), "creating runtime environment");
        let create = CommandSpec::new(&settings.python)
            .args(["-m", "venv"])
            .arg(env.dir())
            .current_dir(root);
        run_step(runner, BootstrapStep::CreateEnvironment, &create)?;
        true
    };

    tracing::info!("upgrading pip");
    run_step(
        runner,
        BootstrapStep::UpgradeInstaller,
        &env.pip(["install", "--upgrade", "pip"]),
    )?;

    let manifest = root.join(&settings.requirements);
    let installed_from = if manifest.is_file() {
        tracing::info!(manifest = %manifest.display(), "installing dependencies from manifest");
        let install = env.pip(["install", "-r"]).arg(&manifest).current_dir(root);
        run_step(runner, BootstrapStep::InstallDependencies, &install)?;
        DependencySource::Manifest { path: manifest }
    } else if !settings.packages.is_empty() {
        tracing::info!(packages = ?settings.packages, "installing dependencies");
        let install = env.pip(["install"]).args(&settings.packages).current_dir(root);
        run_step(runner, BootstrapStep::InstallDependencies, &install)?;
        DependencySource::Packages {
            packages: settings.packages.clone(),
        }
    } else {
        tracing::info!("no dependencies declared");
        DependencySource::Nothing
    };

    Ok(BootstrapReport {
        env_dir: env.dir().to_path_buf(),
        created,
        installed_from,
    })
}

fn run_step(
    runner: &dyn CommandRunner,
    step: BootstrapStep,
    spec: &CommandSpec,
) -> Result<(), EnvError> {
    let outcome = runner
        .run(spec)
        .map_err(|err| EnvError::BootstrapFailure {
            step,
            detail: err.to_string(),
        })?;
    if outcome.success() {
        return Ok(());
    }
    Err(EnvError::BootstrapFailure {
        step,
        detail: format!("`{spec}` failed with {}", outcome.describe_failure()),
    })
}
