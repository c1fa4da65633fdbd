//! PNS3 CLI library.
//!
//! Command-line front end for the PNS3 bound engine: scenario loading,
//! configuration management, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod scenario;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use scenario::Scenario;
