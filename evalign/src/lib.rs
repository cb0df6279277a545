//! Evalign aligns observed and forecast time series in time and groups them
//! into pools for forecast verification.
//!
//! Overview
//! - Generates the time windows of an evaluation from a pooling declaration.
//! - Rescales sources to a common time scale before pairing.
//! - Pairs observed values with forecast values at shared valid times.
//! - Optionally cross-pairs a baseline so that it covers the same reference and valid times.
//! - Generates persistence baselines from observations with [`PersistenceGenerator`].
//! - Slices paired series into one pool per time window.
//!
//! Key behaviors and trade-offs
//! - Pairing strategy:
//!   - `Exact`: refuses to pair series on different time scales; safest default.
//!   - `Crisp`: pairs on valid time alone, leaving time scale checks to the caller.
//! - Rescaling: values are formed at the regular sequence of valid times shared
//!   by both sides, so rescaled observations and forecasts always line up.
//!   Downscaling is refused. A window holding a single event or unevenly spaced
//!   events yields no value and is reported as a debug validation event.
//! - Cross-pairing: `Exact` keeps only baseline series issued at the main issue
//!   times; `Near` takes the nearest unused baseline series. Either way the
//!   matched series are trimmed to common valid times, which can shrink pools.
//! - Seasons: month-day bookends are resolved in the configured time zone,
//!   which defaults to UTC.
//!
//! Examples
//! Pooling forecasts by lead time:
//! ```rust,ignore
//! use chrono::TimeDelta;
//! use evalign::{Evalign, LeadTimeInterval, PoolingDeclaration, TimePools, TimeScale, TimeScaleFunction};
//!
//! let evalign = Evalign::builder()
//!     .pooling(PoolingDeclaration {
//!         lead_times: Some(LeadTimeInterval::new(TimeDelta::zero(), TimeDelta::hours(24))),
//!         lead_time_pools: Some(TimePools::new(TimeDelta::hours(6))),
//!         ..PoolingDeclaration::default()
//!     })
//!     .desired_time_scale(TimeScale::new(TimeDelta::hours(6), TimeScaleFunction::Mean)?)
//!     .build()?;
//!
//! for report in evalign.pools(&observed, &forecasts, Some(baseline.as_slice()))? {
//!     println!("{}: {} pairs", report.window, report.pool.main_event_count());
//! }
//! ```
//!
//! See `evalign/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
/// Rescaling, pairing and pooling steps of the pipeline.
pub mod pipeline;

pub use core::{Evalign, EvalignBuilder};
pub use pipeline::{PairedSources, PoolReport};

// Re-export core types for convenience
pub use evalign_core::{
    CrossPairs,
    Ensemble,
    EvalignConfig,
    EvalignError,
    Event,
    LeadTimeInterval,
    MatchMode,
    MonthDay,
    Pair,
    PairingStrategy,
    PersistenceGenerator,
    PoolingDeclaration,
    Pool,
    ReferenceTimeType,
    RescaledSeries,
    ScaleValidationEvent,
    Season,
    TimeInterval,
    TimePools,
    TimeScale,
    TimeScaleFunction,
    TimeSeries,
    TimeSeriesMetadata,
    TimeWindow,
    ValidationSeverity,
};
