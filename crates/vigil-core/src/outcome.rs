//! Outcome of a single check execution

use serde::{Deserialize, Serialize};

/// Status of a completed check execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The probe completed and the resource is healthy
    Success,
    /// The probe completed and the resource is unhealthy
    Failure,
    /// The probe does not apply to this resource; not a failure
    Skip,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Skip => "skip",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable result value produced by one check execution.
///
/// Equality is structural (status + message), so a cached outcome compares
/// equal to the execution that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    status: Status,
    message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            message: message.into(),
        }
    }

    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            status: Status::Skip,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == Status::Failure
    }

    pub fn is_skip(&self) -> bool {
        self.status == Status::Skip
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let outcome = Outcome::failure("failed operations: read");
        assert_eq!(outcome.status(), Status::Failure);
        assert_eq!(outcome.message(), "failed operations: read");
        assert!(outcome.is_failure());
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Outcome::success("ok"), Outcome::success("ok"));
        assert_ne!(Outcome::success("ok"), Outcome::failure("ok"));
        assert_ne!(Outcome::skip("a"), Outcome::skip("b"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::skip("not applicable").to_string(), "skip: not applicable");
    }
}
