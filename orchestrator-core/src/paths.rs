//! Workspace layout.
//!
//! ```text
//! <root>/
//!   orchestrator.yaml
//!   repos/<project>/
//!   libs/<dependency path>/
//!   logs/orchestrator_YYYYMMDD.log
//! ```
//!
//! Every helper is pure: no I/O, the caller creates directories as needed.

use std::path::{Path, PathBuf};

use crate::types::{DependencySpec, ProjectName};

pub const CONFIG_FILE: &str = "orchestrator.yaml";
pub const REPOS_DIR: &str = "repos";
pub const LIBS_DIR: &str = "libs";
pub const LOGS_DIR: &str = "logs";
pub const PROJECT_COMMANDS_FILE: &str = "repo_specific_packages.txt";
pub const LIB_REQUIREMENTS_FILE: &str = "requirements.txt";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn repos_dir(root: &Path) -> PathBuf {
    root.join(REPOS_DIR)
}

pub fn project_dir(root: &Path, project: &ProjectName) -> PathBuf {
    repos_dir(root).join(&project.0)
}

pub fn libs_dir(root: &Path) -> PathBuf {
    root.join(LIBS_DIR)
}

pub fn dependency_dir(root: &Path, dependency: &DependencySpec) -> PathBuf {
    libs_dir(root).join(&dependency.path)
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join(LOGS_DIR)
}

/// `<root>/logs/orchestrator_<stamp>.log`, where `stamp` is `YYYYMMDD`.
pub fn daily_log_path(root: &Path, stamp: &str) -> PathBuf {
    logs_dir(root).join(format!("orchestrator_{stamp}.log"))
}
