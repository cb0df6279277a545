use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{ScaleValidationEvent, ValidationSeverity};

/// Unified error type for the evalign workspace.
///
/// This wraps argument validation errors, broken value invariants, pairing and
/// rescaling failures, and incomplete pooling declarations.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalignError {
    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A value would violate one of its invariants (duplicate valid time, reversed bounds, etc.).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Two series or pools cannot be paired.
    #[error("pairing failed: {0}")]
    Pairing(String),

    /// One or more time scale validation rules failed while rescaling.
    #[error("rescaling failed: {message}")]
    Rescaling {
        /// Human-readable summary of the failure.
        message: String,
        /// Every validation event raised while checking the request, errors included.
        events: Vec<ScaleValidationEvent>,
    },

    /// A pooling declaration is incomplete.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
}

impl EvalignError {
    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build an `InvalidState` error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Helper: build a `Pairing` error.
    pub fn pairing(msg: impl Into<String>) -> Self {
        Self::Pairing(msg.into())
    }

    /// Helper: build a `MissingConfiguration` error.
    pub fn missing_configuration(msg: impl Into<String>) -> Self {
        Self::MissingConfiguration(msg.into())
    }

    /// Helper: build a `Rescaling` error from the full validation log.
    #[must_use]
    pub fn rescaling(message: impl Into<String>, events: Vec<ScaleValidationEvent>) -> Self {
        Self::Rescaling {
            message: message.into(),
            events,
        }
    }

    /// Validation events attached to a rescaling failure, empty for every other kind.
    #[must_use]
    pub fn validation_events(&self) -> &[ScaleValidationEvent] {
        match self {
            Self::Rescaling { events, .. } => events,
            _ => &[],
        }
    }

    /// Number of `Error` severity events attached to a rescaling failure.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.validation_events()
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .count()
    }
}
