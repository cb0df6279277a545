//! evalign-core
//!
//! Event model and temporal alignment operations for forecast verification.
//!
//! - `model`: events, time series, ensembles, pairs and pools.
//! - `timeseries`: pairing, cross-pairing, upscaling, persistence, slicing and seasons.
//! - `window`: time window generation from pooling declarations and window set algebra.
//! - `types`: re-exports of the shared value types from `evalign-types`.
//!
//! Every operation is pure: inputs are borrowed and never mutated, and results
//! are new values. Enable the `tracing` feature to emit spans and debug events
//! from the pairing, rescaling and window generation paths.
//!
#![warn(missing_docs)]

/// Immutable value types.
pub mod model;
/// Operations over time series.
pub mod timeseries;
pub mod types;
/// Time window generation and algebra.
pub mod window;

pub use model::{
    CrossPairs, Ensemble, Event, Pair, Pool, TimeSeries, TimeSeriesBuilder, TimeSeriesMetadata,
};
pub use timeseries::infer::{first_time_step, regular_sequence_of_intersecting_times, timesteps};
pub use timeseries::merge::consolidate;
pub use timeseries::{
    ExactTimePairer, PersistenceGenerator, RescaledSeries, TimeSeriesCrossPairer,
    TimeSeriesPairer, TimeSeriesUpscaler, Upscaler,
};
pub use types::*;
pub use window::{one_big_window, time_windows};
