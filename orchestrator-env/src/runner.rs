//! Process execution seam.
//!
//! [`CommandSpec`] describes a child process without running it;
//! a [`CommandRunner`] decides what "running" means.

use std::cell::RefCell;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::EnvError;

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// A child process to run: program, argv, working directory, env changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    env_remove: Vec<OsString>,
    quiet: bool,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            env_remove: Vec::new(),
            quiet: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Self {
        self.env_remove.push(key.as_ref().to_os_string());
        self
    }

    /// Capture stdout/stderr instead of inheriting the terminal.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Value this spec sets for `key`, if any (last write wins).
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    pub fn removes_env(&self, key: &str) -> bool {
        self.env_remove.iter().any(|k| k == key)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn program_str(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    pub fn arg_strs(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for key in &self.env_remove {
            cmd.env_remove(key);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CommandOutcome
// ---------------------------------------------------------------------------

/// How a child process ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured output; empty unless the command was quiet.
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to propagate; a signal-terminated child maps to 1.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }

    /// One-line failure description for error messages.
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{status}: {stderr}")
        }
    }
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// Runs a [`CommandSpec`] to completion.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, EnvError>;
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, EnvError> {
        tracing::debug!(command = %spec, "spawning");
        let mut cmd = spec.to_command();
        let spawn_err = |source| EnvError::Spawn {
            program: spec.program_str(),
            source,
        };

        if spec.is_quiet() {
            let output = cmd.stdin(Stdio::null()).output().map_err(spawn_err)?;
            Ok(CommandOutcome {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = cmd.status().map_err(spawn_err)?;
            Ok(CommandOutcome {
                code: status.code(),
                ..CommandOutcome::default()
            })
        }
    }
}

/// Logs and records each command instead of running it; always succeeds.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    commands: RefCell<Vec<CommandSpec>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command seen so far, in order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, EnvError> {
        tracing::info!("[dry-run] would run: {spec}");
        self.commands.borrow_mut().push(spec.clone());
        Ok(CommandOutcome::from_code(0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("git").args(["pull", "origin", "main"]);
        assert_eq!(spec.to_string(), "git pull origin main");
    }

    #[test]
    fn env_value_last_write_wins() {
        let spec = CommandSpec::new("x").env("A", "1").env("A", "2");
        assert_eq!(spec.env_value("A"), Some(OsStr::new("2")));
        assert_eq!(spec.env_value("B"), None);
    }

    #[test]
    fn outcome_exit_code_maps_signal_to_one() {
        let killed = CommandOutcome {
            code: None,
            ..CommandOutcome::default()
        };
        assert_eq!(killed.exit_code(), 1);
        assert!(!killed.success());
        assert_eq!(CommandOutcome::from_code(7).exit_code(), 7);
    }

    #[test]
    fn describe_failure_includes_stderr() {
        let outcome = CommandOutcome {
            code: Some(2),
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(outcome.describe_failure(), "exit status 2: boom");
    }

    #[test]
    fn dry_run_records_without_running() {
        let runner = DryRunRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary").arg("--flag");
        let outcome = runner.run(&spec).expect("dry run");
        assert!(outcome.success());
        assert_eq!(runner.commands(), vec![spec]);
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let spec = CommandSpec::new("definitely-not-a-real-binary-4f1c").quiet();
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, EnvError::Spawn { .. }), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_quiet_output_and_code() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .quiet();
        let outcome = SystemRunner.run(&spec).expect("run");
        assert_eq!(outcome.code, Some(3));
        assert_eq!(outcome.stdout.trim(), "out");
        assert_eq!(outcome.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_applies_env_and_cwd() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf '%s|%s' \"$ORCH_TEST_VAR\" \"$(pwd)\""])
            .current_dir(dir.path())
            .env("ORCH_TEST_VAR", "hello")
            .quiet();
        let outcome = SystemRunner.run(&spec).expect("run");
        let (var, cwd) = outcome.stdout.split_once('|').expect("separator");
        assert_eq!(var, "hello");
        let expected = dir.path().canonicalize().expect("canonicalize");
        assert_eq!(
            std::path::Path::new(cwd).canonicalize().expect("canonicalize cwd"),
            expected
        );
    }
}
