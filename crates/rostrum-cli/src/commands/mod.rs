//! Subcommands of the `rostrum` binary

pub mod debate;
pub mod experiments;
pub mod files;
pub mod playground;
pub mod session;
