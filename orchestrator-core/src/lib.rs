//! Orchestrator core library: domain types, `orchestrator.yaml` loading,
//! workspace layout, errors.
//!
//! - [`types`]: newtypes and config structs
//! - [`error`]: [`ConfigError`]
//! - [`config`]: load / parse
//! - [`paths`]: where things live under a workspace root

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use error::ConfigError;
pub use types::{
    Config, DependencyName, DependencySpec, ProjectName, ProjectSpec, Settings, DEFAULT_BRANCH,
};
