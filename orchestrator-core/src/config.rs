//! Loading `orchestrator.yaml`.
//!
//! - `load_at(root)`: the full config; a missing file is an error
//! - `settings_at(root)`: for commands that work without a config
//!   (`setup`, `launch`) and only need [`Settings`]

use std::path::Path;

use crate::error::ConfigError;
use crate::paths::config_path;
use crate::types::{Config, Settings};

/// Parse a config document. `path` is only used for error context.
pub fn parse(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    // An empty file deserializes to YAML null, not a mapping.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `<root>/orchestrator.yaml`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(root: &Path) -> Result<Config, ConfigError> {
    let path = config_path(root);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse(&contents, &path)
}

/// Settings from `<root>/orchestrator.yaml`, or defaults when the file is absent.
///
/// A present-but-broken file is still an error.
pub fn settings_at(root: &Path) -> Result<Settings, ConfigError> {
    match load_at(root) {
        Ok(config) => Ok(config.settings),
        Err(ConfigError::NotFound { .. }) => Ok(Settings::default()),
        Err(err) => Err(err),
    }
}
