//! Launcher: hand execution to a program inside the runtime environment.
//!
//! Two states only. With no environment directory the launcher fails with
//! [`EnvError::EnvironmentMissing`] and never starts the downstream program.
//! With one, it runs `<env python> <entrypoint> <args...>` and returns the
//! child's exit code. Arguments are forwarded untouched.

use std::ffi::OsString;
use std::path::Path;

use orchestrator_core::Settings;

use crate::error::EnvError;
use crate::layout::RuntimeEnv;
use crate::platform::Platform;
use crate::runner::{CommandRunner, CommandSpec};

/// Build the downstream command without running it.
pub fn prepare_launch(
    root: &Path,
    settings: &Settings,
    platform: Platform,
    args: &[OsString],
) -> Result<CommandSpec, EnvError> {
    let env = RuntimeEnv::new(root, settings, platform);
    env.require()?;

    let spec = CommandSpec::new(env.python())
        .arg(root.join(&settings.entrypoint))
        .args(args);

    Ok(match platform {
        Platform::Windows => spec,
        Platform::Posix => env.activate(spec),
    })
}

/// Run the downstream program and return its exit code.
pub fn launch(
    root: &Path,
    settings: &Settings,
    platform: Platform,
    args: &[OsString],
    runner: &dyn CommandRunner,
) -> Result<i32, EnvError> {
    let spec = prepare_launch(root, settings, platform, args)?;
    tracing::debug!(command = %spec, "launching downstream program");
    let outcome = runner.run(&spec)?;
    Ok(outcome.exit_code())
}
