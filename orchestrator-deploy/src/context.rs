//! Everything a deployment needs, borrowed once.

use std::path::{Path, PathBuf};

use orchestrator_core::Config;
use orchestrator_env::{CommandRunner, CommandSpec, Platform, RuntimeEnv};

use crate::error::DeployError;

pub struct DeployContext<'a> {
    pub root: PathBuf,
    pub config: &'a Config,
    pub env: RuntimeEnv,
    pub runner: &'a dyn CommandRunner,
}

impl<'a> DeployContext<'a> {
    pub fn new(
        root: &Path,
        config: &'a Config,
        platform: Platform,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            env: RuntimeEnv::new(root, &config.settings, platform),
            runner,
        }
    }

    /// pip runs from inside the runtime environment, so it must exist.
    pub fn require_env(&self) -> Result<(), DeployError> {
        self.env.require().map_err(DeployError::from)
    }

    /// Run a step whose failure is reported rather than fatal.
    ///
    /// Returns a description of the failure, or `None` on success. A command
    /// that cannot be started at all counts as failed.
    pub fn run_reported(&self, spec: &CommandSpec) -> Option<String> {
        match self.runner.run(spec) {
            Ok(outcome) if outcome.success() => None,
            Ok(outcome) => Some(outcome.describe_failure()),
            Err(err) => Some(err.to_string()),
        }
    }
}
