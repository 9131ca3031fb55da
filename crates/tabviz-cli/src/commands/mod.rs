//! Command implementations.

pub mod analyze;
pub mod config;
pub mod exchange;
pub mod ingest;
pub mod serve;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::exchange::{execute_export, execute_import};
pub use self::ingest::execute_ingest;
pub use self::serve::execute_serve;
