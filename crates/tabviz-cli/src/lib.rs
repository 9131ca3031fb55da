//! Tabviz CLI library.
//!
//! Configuration, collaborator wiring, output formatting and the HTTP
//! surface behind the `tabviz` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod runtime;
pub mod server;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
