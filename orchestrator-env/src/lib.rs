//! # orchestrator-env
//!
//! The isolated Python runtime environment: where it lives on each platform,
//! how to create it ([`bootstrap`]), and how to hand execution to a program
//! inside it ([`launch`]).
//!
//! Every external process goes through a [`CommandRunner`], so callers can
//! swap in [`DryRunRunner`] or a test double.

pub mod bootstrap;
pub mod error;
pub mod launcher;
pub mod layout;
pub mod platform;
pub mod runner;

pub use bootstrap::{bootstrap, BootstrapReport, BootstrapStep, DependencySource};
pub use error::EnvError;
pub use launcher::{launch, prepare_launch};
pub use layout::RuntimeEnv;
pub use platform::Platform;
pub use runner::{CommandOutcome, CommandRunner, CommandSpec, DryRunRunner, SystemRunner};
