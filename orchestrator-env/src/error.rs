//! Error types for orchestrator-env.

use std::path::PathBuf;

use thiserror::Error;

use crate::bootstrap::BootstrapStep;

/// All errors that can arise from preparing or entering the runtime environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The launcher (or anything needing the env) ran before bootstrap.
    #[error("runtime environment not found at {env_dir}; run `orchestrator setup` first")]
    EnvironmentMissing { env_dir: PathBuf },

    /// Environment creation or dependency installation failed.
    #[error("bootstrap failed while trying to {step}: {detail}")]
    BootstrapFailure { step: BootstrapStep, detail: String },

    /// A child process could not be started at all.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
