pub mod deploy;
pub mod install_libs;
pub mod launch;
pub mod list;
pub mod setup;
