//! evalign-types
//!
//! Shared value types used across the evalign workspace.
//!
//! - `scale`: time scales, their functions and month-day season bookends.
//! - `window`: validated time windows with sentinel bounds.
//! - `config`: pooling declarations and pipeline configuration.
//! - `validation`: structured time scale validation events.
//! - `error`: the unified `EvalignError`.
#![warn(missing_docs)]

/// Pooling declarations and pipeline configuration.
pub mod config;
/// Unified error type.
pub mod error;
/// Reference time kinds.
pub mod reference;
/// Time scales and month-days.
pub mod scale;
/// Serde adapters for durations.
pub mod serde_millis;
/// Time scale validation events.
pub mod validation;
/// Time windows.
pub mod window;

pub use config::{
    EvalignConfig, LeadTimeInterval, MatchMode, PairingStrategy, PoolingDeclaration, Season,
    TimeInterval, TimePools, TimeWindowAggregation,
};
pub use error::EvalignError;
pub use reference::ReferenceTimeType;
pub use scale::{INSTANTANEOUS_THRESHOLD, MonthDay, TimeScale, TimeScaleFunction};
pub use validation::{ScaleValidationEvent, ValidationSeverity};
pub use window::{TimeWindow, TimeWindowBuilder};
