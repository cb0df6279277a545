//! Immutable value types: events, series, ensembles, pairs and pools.

/// Single timestamped values.
pub mod event;
/// Ensemble member values.
pub mod ensemble;
/// Pairs, cross-pairs and pools.
pub mod pairs;
/// Time series and their metadata.
pub mod series;

pub use ensemble::Ensemble;
pub use event::Event;
pub use pairs::{CrossPairs, Pair, Pool};
pub use series::{TimeSeries, TimeSeriesBuilder, TimeSeriesMetadata};
