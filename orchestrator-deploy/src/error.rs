//! Error types for orchestrator-deploy.

use std::path::PathBuf;

use thiserror::Error;

use orchestrator_env::EnvError;

/// All errors that can arise from deploying projects or libraries.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The requested project is not declared in `orchestrator.yaml`.
    #[error("project '{name}' not found in config")]
    UnknownProject { name: String },

    /// `git clone` or `git pull` exited non-zero.
    #[error("git {action} failed for '{name}': {detail}")]
    Git {
        name: String,
        action: &'static str,
        detail: String,
    },

    /// An error from the runtime environment or process runner.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`DeployError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
