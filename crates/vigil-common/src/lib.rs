//! Vigil Common - configuration loading and logging setup

pub mod config;
pub mod logging;

pub use config::{Config, DiskStorageConfig, LoggingConfig, MailConfig, ReportingConfig};
pub use logging::{init_logging, LogFormat};
