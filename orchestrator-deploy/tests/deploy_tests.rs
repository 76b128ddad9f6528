//! Deployment flow tests against a scripted command runner.
//!
//! The fake runner records every command. `git clone` creates the target
//! directory and drops in any fixture files registered for it, so later
//! steps see a realistic checkout.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use orchestrator_core::{config, Config, DependencyName, ProjectName};
use orchestrator_deploy::{
    deploy_project, install_all_libraries, project, CheckoutAction, DeployContext, DeployError,
    DeployScope, LibraryOutcome,
};
use orchestrator_env::{CommandOutcome, CommandRunner, CommandSpec, DryRunRunner, EnvError, Platform};
use tempfile::TempDir;

const CONFIG: &str = r#"
projects:
  web:
    url: https://git.example.com/web.git
    branch: develop
    dependencies: [core-lib, ghost-lib, util-lib]
  api:
    url: https://git.example.com/api.git
dependencies:
  core-lib:
    url: https://git.example.com/core-lib.git
    path: shared/core-lib
    requirements: true
  util-lib:
    url: https://git.example.com/util-lib.git
    path: util-lib
"#;

#[derive(Default)]
struct ScriptedRunner {
    seen: RefCell<Vec<CommandSpec>>,
    /// target dir name -> files written into it on clone
    fixtures: HashMap<String, Vec<(&'static str, &'static str)>>,
    /// any command whose display contains one of these exits 1
    failures: Vec<&'static str>,
    /// any command whose display contains one of these cannot be started
    unstartable: Vec<&'static str>,
}

impl ScriptedRunner {
    fn with_fixture(mut self, dir_name: &str, file: &'static str, contents: &'static str) -> Self {
        self.fixtures
            .entry(dir_name.to_string())
            .or_default()
            .push((file, contents));
        self
    }

    fn failing(mut self, needle: &'static str) -> Self {
        self.failures.push(needle);
        self
    }

    fn unstartable(mut self, needle: &'static str) -> Self {
        self.unstartable.push(needle);
        self
    }

    fn lines(&self) -> Vec<String> {
        self.seen.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, EnvError> {
        self.seen.borrow_mut().push(spec.clone());
        let line = spec.to_string();
        if self.unstartable.iter().any(|f| line.contains(f)) {
            return Err(EnvError::Spawn {
                program: spec.program_str(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        if self.failures.iter().any(|f| line.contains(f)) {
            return Ok(CommandOutcome::from_code(1));
        }
        let args = spec.arg_strs();
        if spec.program_str() == "git" && args.first().map(String::as_str) == Some("clone") {
            let target = PathBuf::from(args.last().expect("clone target"));
            fs::create_dir_all(&target).expect("create checkout");
            let key = target
                .file_name()
                .expect("name")
                .to_string_lossy()
                .into_owned();
            for (file, contents) in self.fixtures.get(&key).into_iter().flatten() {
                fs::write(target.join(file), contents).expect("write fixture");
            }
        }
        Ok(CommandOutcome::from_code(0))
    }
}

fn workspace() -> (TempDir, Config) {
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("orchestrator.yaml"), CONFIG).expect("write config");
    fs::create_dir_all(root.path().join("venv")).expect("env dir");
    let cfg = config::load_at(root.path()).expect("load config");
    (root, cfg)
}

fn python(root: &Path) -> String {
    root.join("venv/bin/python").display().to_string()
}

#[test]
fn fresh_deploy_runs_all_three_steps_in_order() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default()
        .with_fixture("core-lib", "requirements.txt", "requests\n")
        .with_fixture("web", "repo_specific_packages.txt", "# extras\npip install rich\n\nmake assets\n");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");

    assert_eq!(report.checkout, CheckoutAction::Cloned);
    assert_eq!(report.path, root.path().join("repos/web"));
    assert!(!report.is_clean(), "ghost-lib is missing, so the report is not clean");

    let r = root.path();
    let core = r.join("libs/shared/core-lib");
    let util = r.join("libs/util-lib");
    let py = python(r);
    assert_eq!(
        runner.lines(),
        vec![
            format!("git clone -b develop https://git.example.com/web.git {}", r.join("repos/web").display()),
            format!("git clone -b main https://git.example.com/core-lib.git {}", core.display()),
            format!("{py} -m pip install -r {}", core.join("requirements.txt").display()),
            format!("{py} -m pip install -e {}", core.display()),
            format!("git clone -b main https://git.example.com/util-lib.git {}", util.display()),
            format!("{py} -m pip install -e {}", util.display()),
            "sh -c pip install rich".to_string(),
            "sh -c make assets".to_string(),
        ]
    );

    let names: Vec<&str> = report.libraries.iter().map(|l| l.name().0.as_str()).collect();
    assert_eq!(names, vec!["core-lib", "ghost-lib", "util-lib"]);
    assert!(matches!(report.libraries[1], LibraryOutcome::Missing { .. }));

    let commands = report.commands.expect("setup commands ran");
    assert_eq!(commands.len(), 2);
    assert!(commands.iter().all(|c| c.success));
}

#[test]
fn pip_runs_quietly_and_setup_commands_are_activated() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default().with_fixture("web", "repo_specific_packages.txt", "pip install rich\n");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);
    deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");

    let seen = runner.seen.borrow();
    for spec in seen.iter().filter(|s| s.arg_strs().iter().any(|a| a == "pip") && s.program_str() != "sh") {
        assert!(spec.is_quiet(), "pip should be quiet: {spec}");
    }
    let shell = seen.iter().find(|s| s.program_str() == "sh").expect("shell command");
    assert_eq!(shell.cwd(), Some(root.path().join("repos/web").as_path()));
    assert_eq!(
        shell.env_value("VIRTUAL_ENV"),
        Some(root.path().join("venv").as_os_str())
    );
}

#[test]
fn existing_checkout_is_pulled_not_cloned() {
    let (root, cfg) = workspace();
    fs::create_dir_all(root.path().join("repos/api")).expect("existing checkout");
    let runner = ScriptedRunner::default();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("api")).expect("deploy");

    assert_eq!(report.checkout, CheckoutAction::Updated);
    assert!(report.libraries.is_empty());
    assert!(report.commands.is_none());
    assert!(report.is_clean());
    assert_eq!(runner.lines(), vec!["git pull origin main".to_string()]);
}

#[test]
fn failed_project_clone_aborts_before_libraries() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default().failing("web.git");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let err = deploy_project(&ctx, &ProjectName::from("web")).unwrap_err();
    assert!(matches!(err, DeployError::Git { action: "clone", .. }), "got: {err}");
    assert_eq!(runner.lines().len(), 1, "nothing runs after a failed clone");
}

#[test]
fn failed_library_checkout_does_not_stop_deploy() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default().failing("core-lib.git");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");
    assert!(matches!(report.libraries[0], LibraryOutcome::CheckoutFailed { .. }));
    assert!(matches!(report.libraries[2], LibraryOutcome::Installed { .. }));
    assert!(
        runner.lines().iter().all(|l| !l.contains("install -e") || !l.contains("core-lib")),
        "failed library must not be pip-installed"
    );
}

#[test]
fn failed_pip_and_setup_line_become_warnings() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default()
        .with_fixture("web", "repo_specific_packages.txt", "false\ntrue\n")
        .failing("install -e")
        .failing("sh -c false");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");
    match &report.libraries[2] {
        LibraryOutcome::Installed { warnings, .. } => {
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("editable install failed"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let commands = report.commands.as_ref().expect("commands");
    assert_eq!(
        commands.iter().map(|c| c.success).collect::<Vec<_>>(),
        vec![false, true]
    );
    assert!(!report.is_clean());
}

#[test]
fn unstartable_interpreter_and_shell_do_not_abort_deploy() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default()
        .with_fixture("core-lib", "requirements.txt", "requests\n")
        .with_fixture("web", "repo_specific_packages.txt", "make assets\ntrue\n")
        .unstartable("-m pip")
        .unstartable("sh -c make");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");

    let warnings: Vec<usize> = report
        .libraries
        .iter()
        .filter_map(|lib| match lib {
            LibraryOutcome::Installed { warnings, .. } => {
                assert!(
                    warnings.iter().all(|w| w.contains("failed to start")),
                    "{warnings:?}"
                );
                Some(warnings.len())
            }
            _ => None,
        })
        .collect();
    assert_eq!(warnings, vec![2, 1], "core-lib: -r and -e, util-lib: -e");

    let commands = report.commands.as_ref().expect("setup commands still ran");
    assert_eq!(
        commands.iter().map(|c| c.success).collect::<Vec<_>>(),
        vec![false, true]
    );
    assert!(!report.is_clean());
}

#[test]
fn unstartable_git_marks_library_checkout_failed() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default().unstartable("core-lib.git");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("deploy");
    assert!(matches!(report.libraries[0], LibraryOutcome::CheckoutFailed { .. }));
    assert!(matches!(report.libraries[2], LibraryOutcome::Installed { .. }));
}

#[test]
fn unknown_project_is_reported() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);
    let err = deploy_project(&ctx, &ProjectName::from("nope")).unwrap_err();
    assert!(matches!(err, DeployError::UnknownProject { .. }));
    assert_eq!(err.to_string(), "project 'nope' not found in config");
    assert!(runner.lines().is_empty());
}

#[test]
fn deploy_requires_runtime_environment() {
    let (root, cfg) = workspace();
    fs::remove_dir_all(root.path().join("venv")).expect("remove env");
    let runner = ScriptedRunner::default();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);
    let err = deploy_project(&ctx, &ProjectName::from("api")).unwrap_err();
    assert!(matches!(err, DeployError::Env(EnvError::EnvironmentMissing { .. })));
    assert!(runner.lines().is_empty());
}

#[test]
fn deploy_all_continues_past_failures_in_config_order() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default().failing("web.git");
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let results = project::run(&ctx, DeployScope::All);
    let names: Vec<&str> = results.iter().map(|(p, _)| p.0.as_str()).collect();
    assert_eq!(names, vec!["web", "api"]);
    assert!(results[0].1.is_err());
    assert!(results[1].1.is_ok());
}

#[test]
fn install_all_libraries_in_declaration_order() {
    let (root, cfg) = workspace();
    let runner = ScriptedRunner::default();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let outcomes = install_all_libraries(&ctx).expect("install-libs");
    let names: Vec<DependencyName> = outcomes.iter().map(|o| o.name().clone()).collect();
    assert_eq!(
        names,
        vec![DependencyName::from("core-lib"), DependencyName::from("util-lib")]
    );
    assert!(outcomes.iter().all(LibraryOutcome::is_clean));
    assert!(root.path().join("libs/shared").is_dir(), "parent of nested lib path is created");
}

#[test]
fn install_all_with_no_dependencies_is_a_noop() {
    let root = TempDir::new().expect("root");
    fs::create_dir_all(root.path().join("venv")).expect("env dir");
    let cfg = Config::default();
    let runner = ScriptedRunner::default();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);
    assert!(install_all_libraries(&ctx).expect("install-libs").is_empty());
    assert!(runner.lines().is_empty());
}

#[test]
fn dry_run_checks_out_nothing() {
    let (root, cfg) = workspace();
    let runner = DryRunRunner::new();
    let ctx = DeployContext::new(root.path(), &cfg, Platform::Posix, &runner);

    let report = deploy_project(&ctx, &ProjectName::from("web")).expect("dry-run deploy");
    assert_eq!(report.checkout, CheckoutAction::Cloned);
    assert!(!root.path().join("repos/web").exists());
    assert_eq!(runner.commands().len(), 5);
}
