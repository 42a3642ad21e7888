//! Configuration loading for the vigil monitor
//!
//! The configuration file is YAML. The `checks` section is kept as a raw
//! mapping (kind config key -> declaration in any accepted shorthand) and
//! handed to the normalizer; the remaining sections are typed here.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use vigil_core::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Check declarations, by kind config key
    #[serde(default)]
    pub checks: Mapping,

    /// Resource wiring for the monitor binary
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reporting settings
    #[serde(default)]
    pub reporting: ReportingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Configuration(format!("failed to parse config: {}", e)))
    }

    /// Merge with environment variables (VIGIL_ prefix)
    pub fn merge_env(mut self) -> Self {
        if let Ok(val) = std::env::var("VIGIL_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("VIGIL_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = std::env::var("VIGIL_MAIL_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.reporting.mail.enabled = enabled;
            }
        }
        self
    }
}

/// Resource wiring for the binary: named disk-backed storages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub storage: BTreeMap<String, DiskStorageConfig>,
}

/// One disk-backed storage resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskStorageConfig {
    /// Directory the storage operates in
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Reporting configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportingConfig {
    #[serde(default)]
    pub mail: MailConfig,
}

/// Mail reporting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Requires a registered mail transport when enabled
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub recipients: Vec<String>,

    /// Suppress mails for batches without failures
    #[serde(default = "default_true")]
    pub only_failures: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recipients: Vec::new(),
            only_failures: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
            checks:
              storage: [uploads]
              receiver: true

            resources:
              storage:
                uploads: { root: /var/data/uploads }

            logging:
              level: debug
              format: json

            reporting:
              mail:
                enabled: true
                recipients: [ops@example.com]
        "#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.checks.len(), 2);
        assert_eq!(
            config.resources.storage["uploads"].root,
            PathBuf::from("/var/data/uploads")
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(config.reporting.mail.enabled);
        assert!(config.reporting.mail.only_failures);
        assert_eq!(config.reporting.mail.recipients, vec!["ops@example.com"]);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("checks: {}").unwrap();
        assert!(config.checks.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.reporting.mail.enabled);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"logging: { level: warn }").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "warn");

        let err = Config::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let err = Config::from_yaml("logging: [not, a, mapping]").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
