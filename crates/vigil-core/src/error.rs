//! Error types for the vigil engine
//!
//! Every variant here is a build-time failure: configuration mistakes,
//! missing integrations, and unresolved resource references abort the build
//! before any check runs. Run-time probe failures are never errors; they are
//! represented as [`crate::Outcome`] values.

use thiserror::Error;

/// Result type alias using the vigil Error
pub type Result<T> = std::result::Result<T, Error>;

/// Vigil error types
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid configuration for check kind '{kind}': {message}")]
    InvalidCheckConfig { kind: String, message: String },

    #[error(
        "ambiguous declaration for check kind '{kind}': the wildcard entry \
         cannot be combined with named resource entries"
    )]
    AmbiguousWildcard { kind: String },

    #[error("duplicate check id '{id}' in suite '{suite}'")]
    DuplicateId { id: String, suite: String },

    #[error("unknown check kind '{0}'")]
    UnknownCheckKind(String),

    #[error("check kind '{0}' does not support wildcard declarations")]
    WildcardUnsupported(String),

    // === Integration Errors ===
    #[error("could not determine any {kind}; {hint}")]
    MissingIntegration { kind: String, hint: String },

    #[error("unknown {kind} '{name}'")]
    UnknownResource { kind: String, name: String },

    // === IO / Serialization Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get an error code for logging/metrics
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::InvalidCheckConfig { .. } => "INVALID_CHECK_CONFIG",
            Error::AmbiguousWildcard { .. } => "AMBIGUOUS_WILDCARD",
            Error::DuplicateId { .. } => "DUPLICATE_ID",
            Error::UnknownCheckKind(_) => "UNKNOWN_CHECK_KIND",
            Error::WildcardUnsupported(_) => "WILDCARD_UNSUPPORTED",
            Error::MissingIntegration { .. } => "MISSING_INTEGRATION",
            Error::UnknownResource { .. } => "UNKNOWN_RESOURCE",
            Error::Io(_) => "IO_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Other(_) => "OTHER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateId {
            id: String::from("default"),
            suite: String::from("default"),
        };
        assert_eq!(
            err.to_string(),
            "duplicate check id 'default' in suite 'default'"
        );

        let err = Error::MissingIntegration {
            kind: String::from("storages"),
            hint: String::from("is the storage integration installed/enabled?"),
        };
        assert_eq!(
            err.to_string(),
            "could not determine any storages; is the storage integration installed/enabled?"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::UnknownCheckKind(String::from("nope")).code(),
            "UNKNOWN_CHECK_KIND"
        );
        assert_eq!(
            Error::Configuration(String::from("bad")).code(),
            "CONFIG_ERROR"
        );
    }
}
