//! Host platform detection.
//!
//! Windows sets `OS=Windows_NT` for every process; nothing else does. That
//! variable alone decides which path convention the runtime env uses.

use std::fmt;

use serde::Serialize;

use crate::runner::CommandSpec;

/// Environment variable identifying the host OS.
pub const OS_VAR: &str = "OS";

/// Path and shell conventions of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// `Scripts\python.exe`, `cmd /C`, interpreter invoked directly.
    Windows,
    /// `bin/python`, `sh -c`, interpreter invoked after activation.
    Posix,
}

impl Platform {
    /// Pure form of [`Platform::detect`].
    pub fn from_os_var(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("Windows_NT") => Platform::Windows,
            _ => Platform::Posix,
        }
    }

    /// Detect the platform from the process environment.
    pub fn detect() -> Self {
        let value = std::env::var(OS_VAR).ok();
        Self::from_os_var(value.as_deref())
    }

    /// Run one line through the platform shell.
    pub fn shell_command(self, line: &str) -> CommandSpec {
        match self {
            Platform::Windows => CommandSpec::new("cmd").args(["/C", line]),
            Platform::Posix => CommandSpec::new("sh").args(["-c", line]),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Posix => write!(f, "posix"),
        }
    }
}
