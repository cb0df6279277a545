//! Structured diagnostics raised while validating a change of time scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`ScaleValidationEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValidationSeverity {
    /// A rule was checked and satisfied.
    Pass,
    /// Diagnostic detail, such as an incomplete aggregation window.
    Debug,
    /// Informational note that does not affect the outcome.
    Info,
    /// Suspicious but tolerated input.
    Warn,
    /// A rule was violated; the rescaling request fails.
    Error,
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pass => "PASS",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One outcome of a time scale validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleValidationEvent {
    /// How severe the outcome is.
    pub severity: ValidationSeverity,
    /// Human-readable description.
    pub message: String,
}

impl ScaleValidationEvent {
    /// Create an event with an explicit severity.
    pub fn new(severity: ValidationSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// A satisfied rule.
    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Pass, message)
    }

    /// A diagnostic detail.
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Debug, message)
    }

    /// An informational note.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Info, message)
    }

    /// A tolerated problem.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warn, message)
    }

    /// A violated rule.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, message)
    }

    /// Returns true for `Error` severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ScaleValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}
