//! Clone-or-update for project and library checkouts.

use std::path::Path;

use serde::Serialize;

use orchestrator_env::{CommandRunner, CommandSpec};

use crate::error::DeployError;

/// What happened to a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutAction {
    /// Directory was absent; `git clone -b <branch> <url> <dir>`.
    Cloned,
    /// Directory existed; `git pull origin <branch>` inside it.
    Updated,
}

/// Clone `url` at `branch` into `target`, or pull `branch` if `target` exists.
///
/// The presence of `target` is the only signal; it is not checked for being
/// a git repository. Git output goes straight to the terminal.
pub fn clone_or_update(
    runner: &dyn CommandRunner,
    name: &str,
    url: &str,
    branch: &str,
    target: &Path,
) -> Result<CheckoutAction, DeployError> {
    let (action, spec) = if target.exists() {
        tracing::info!("Updating {name} from {branch}...");
        (
            CheckoutAction::Updated,
            CommandSpec::new("git")
                .args(["pull", "origin", branch])
                .current_dir(target),
        )
    } else {
        tracing::info!("Cloning {name} from {url}...");
        (
            CheckoutAction::Cloned,
            CommandSpec::new("git")
                .args(["clone", "-b", branch, url])
                .arg(target),
        )
    };

    let outcome = runner.run(&spec)?;
    if !outcome.success() {
        return Err(DeployError::Git {
            name: name.to_string(),
            action: match action {
                CheckoutAction::Cloned => "clone",
                CheckoutAction::Updated => "pull",
            },
            detail: outcome.describe_failure(),
        });
    }

    match action {
        CheckoutAction::Cloned => tracing::info!("{name} cloned"),
        CheckoutAction::Updated => tracing::info!("{name} updated"),
    }
    Ok(action)
}
