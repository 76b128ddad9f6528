//! Where the runtime environment lives and what is inside it.
//!
//! ```text
//! posix:    <env>/bin/python       activation: VIRTUAL_ENV + PATH
//! windows:  <env>\Scripts\python.exe
//! ```

use std::path::{Path, PathBuf};

use orchestrator_core::Settings;

use crate::error::EnvError;
use crate::platform::Platform;
use crate::runner::CommandSpec;

/// A runtime environment directory under a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    dir: PathBuf,
    platform: Platform,
}

impl RuntimeEnv {
    pub fn new(root: &Path, settings: &Settings, platform: Platform) -> Self {
        Self {
            dir: root.join(&settings.env_dir),
            platform,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The only piece of state the launcher looks at.
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Fail with [`EnvError::EnvironmentMissing`] unless the directory exists.
    pub fn require(&self) -> Result<(), EnvError> {
        if self.exists() {
            Ok(())
        } else {
            Err(EnvError::EnvironmentMissing {
                env_dir: self.dir.clone(),
            })
        }
    }

    /// Directory holding the interpreter and console scripts.
    pub fn bin_dir(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => self.dir.join("Scripts"),
            Platform::Posix => self.dir.join("bin"),
        }
    }

    pub fn python(&self) -> PathBuf {
        match self.platform {
            Platform::Windows => self.bin_dir().join("python.exe"),
            Platform::Posix => self.bin_dir().join("python"),
        }
    }

    /// `<env python> -m pip <args...>`
    pub fn pip<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        CommandSpec::new(self.python()).args(["-m", "pip"]).args(args)
    }

    /// Apply what `activate` would do to a child process: set `VIRTUAL_ENV`,
    /// put the env's bin directory first on `PATH`, and drop `PYTHONHOME`.
    pub fn activate(&self, spec: CommandSpec) -> CommandSpec {
        let spec = spec
            .env("VIRTUAL_ENV", &self.dir)
            .env_remove("PYTHONHOME");

        let current = std::env::var_os("PATH").unwrap_or_default();
        let entries =
            std::iter::once(self.bin_dir()).chain(std::env::split_paths(&current));
        match std::env::join_paths(entries) {
            Ok(path) => spec.env("PATH", path),
            Err(err) => {
                tracing::warn!(error = %err, "could not extend PATH; leaving it unchanged");
                spec
            }
        }
    }
}
