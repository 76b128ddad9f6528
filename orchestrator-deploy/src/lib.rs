//! # orchestrator-deploy
//!
//! Project deployment on top of the runtime environment.
//!
//! Call [`deploy_project`] for one project or [`project::run`] with a
//! [`DeployScope`] for several; [`install_all_libraries`] installs every shared
//! library; [`list_projects`] reports what is checked out.

pub mod context;
pub mod error;
pub mod git;
pub mod library;
pub mod listing;
pub mod project;
pub mod setup_commands;

pub use context::DeployContext;
pub use error::DeployError;
pub use git::CheckoutAction;
pub use library::{install_all_libraries, install_library, LibraryOutcome};
pub use listing::{list_projects, ProjectStatus};
pub use project::{deploy_project, DeployResult, DeployScope, DeploymentReport};
pub use setup_commands::CommandReport;
