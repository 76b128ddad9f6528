//! `orchestrator launch [args...]`: hand off to the entrypoint inside the env.

use std::ffi::OsString;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use orchestrator_core::config;
use orchestrator_env::{launch, Platform, SystemRunner};

/// Everything after `launch` goes to the downstream program untouched.
///
/// One exception: `--root` is global, so a `--root <dir>` directly after
/// `launch` is taken by the wrapper. Put it before `launch` or use
/// `ORCHESTRATOR_ROOT`.
#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Arguments forwarded verbatim (e.g. `-p <project>`, `-a`, `-l`, `--install-libs`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

impl LaunchArgs {
    /// Returns the downstream exit code.
    pub fn run(self, root: &Path) -> Result<i32> {
        let settings = config::settings_at(root).context("failed to read orchestrator.yaml")?;
        let code = launch(root, &settings, Platform::detect(), &self.args, &SystemRunner)?;
        Ok(code)
    }
}
