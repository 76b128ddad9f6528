//! Domain types for `orchestrator.yaml`.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Maps are `IndexMap` so projects and dependencies keep declaration order.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Branch used when a project or dependency does not name one.
pub const DEFAULT_BRANCH: &str = "main";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a deployable project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed name for a shared library entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyName(pub String);

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DependencyName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DependencyName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// Runtime-environment settings. Every field is optional in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Environment directory, relative to the workspace root.
    pub env_dir: PathBuf,
    /// Base interpreter used to create the environment.
    pub python: String,
    /// Downstream program handed to the environment's interpreter by `launch`.
    pub entrypoint: PathBuf,
    /// Dependency manifest consumed by bootstrap when present.
    pub requirements: PathBuf,
    /// Fallback package list when the manifest is absent.
    pub packages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_dir: PathBuf::from("venv"),
            python: "python3".to_string(),
            entrypoint: PathBuf::from("orchestrator.py"),
            requirements: PathBuf::from("requirements.txt"),
            packages: vec!["pyyaml".to_string()],
        }
    }
}

/// A git-hosted project deployed under `repos/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyName>,
}

/// A shared library cloned under `libs/<path>` and pip-installed in editable mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Checkout location relative to `libs/`.
    pub path: PathBuf,
    /// Install `<path>/requirements.txt` before the editable install.
    #[serde(default)]
    pub requirements: bool,
}

/// Root of `orchestrator.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub projects: IndexMap<String, ProjectSpec>,
    #[serde(default)]
    pub dependencies: IndexMap<String, DependencySpec>,
}

impl Config {
    pub fn project(&self, name: &ProjectName) -> Option<&ProjectSpec> {
        self.projects.get(&name.0)
    }

    pub fn dependency(&self, name: &DependencyName) -> Option<&DependencySpec> {
        self.dependencies.get(&name.0)
    }

    /// Project names in declaration order.
    pub fn project_names(&self) -> Vec<ProjectName> {
        self.projects.keys().map(|k| ProjectName::from(k.as_str())).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
