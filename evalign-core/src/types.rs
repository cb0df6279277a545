//! Re-export of the shared value types from `evalign-types`.
// Downstream crates can depend on `evalign-core` only.

pub use evalign_types::{EvalignError, ReferenceTimeType};
pub use evalign_types::{
    EvalignConfig, LeadTimeInterval, MatchMode, PairingStrategy, PoolingDeclaration, Season,
    TimeInterval, TimePools, TimeWindowAggregation,
};
pub use evalign_types::{INSTANTANEOUS_THRESHOLD, MonthDay, TimeScale, TimeScaleFunction};
pub use evalign_types::{ScaleValidationEvent, ValidationSeverity};
pub use evalign_types::{TimeWindow, TimeWindowBuilder};
