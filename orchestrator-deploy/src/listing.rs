//! Configured projects and whether each has a checkout under `repos/`.

use std::path::Path;

use serde::Serialize;

use orchestrator_core::{paths::project_dir, Config, DependencyName, ProjectName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    pub name: ProjectName,
    pub branch: String,
    pub url: String,
    /// `repos/<name>` exists.
    pub deployed: bool,
    pub dependencies: Vec<DependencyName>,
}

/// Status of every configured project, in declaration order.
pub fn list_projects(root: &Path, config: &Config) -> Vec<ProjectStatus> {
    config
        .projects
        .iter()
        .map(|(name, spec)| {
            let name = ProjectName::from(name.as_str());
            ProjectStatus {
                deployed: project_dir(root, &name).exists(),
                name,
                branch: spec.branch.clone(),
                url: spec.url.clone(),
                dependencies: spec.dependencies.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn deployed_reflects_checkout_presence() {
        let root = TempDir::new().expect("root");
        let config: Config = serde_yaml::from_str(
            "projects:\n  web:\n    url: u1\n    branch: dev\n  api:\n    url: u2\n",
        )
        .expect("config");
        std::fs::create_dir_all(root.path().join("repos/api")).expect("mkdir");

        let statuses = list_projects(root.path(), &config);
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, ProjectName::from("web"));
        assert_eq!(statuses[0].branch, "dev");
        assert!(!statuses[0].deployed);
        assert_eq!(statuses[1].name, ProjectName::from("api"));
        assert_eq!(statuses[1].branch, "main");
        assert!(statuses[1].deployed);
    }

    #[test]
    fn empty_config_lists_nothing() {
        let root = TempDir::new().expect("root");
        assert!(list_projects(root.path(), &Config::default()).is_empty());
    }
}
