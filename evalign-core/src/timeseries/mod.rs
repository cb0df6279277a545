//! Operations over time series: pairing, cross-pairing, rescaling and slicing.

/// Cross-pairing of main and baseline pools.
pub mod cross_pair;
/// Time step inference and regular sequences.
pub mod infer;
/// Consolidation of series that share metadata.
pub mod merge;
/// Left/right pairing on valid time.
pub mod pair;
/// Persistence baselines from observations.
pub mod persistence;
/// Month-day seasons.
pub mod season;
/// Filters, transforms and ensemble decomposition.
pub mod slice;
/// Upscaling to coarser time scales.
pub mod upscale;
/// Missing values and sentinel-safe arithmetic.
pub mod util;

pub use cross_pair::TimeSeriesCrossPairer;
pub use infer::{first_time_step, regular_sequence_of_intersecting_times, timesteps};
pub use merge::consolidate;
pub use pair::{ExactTimePairer, TimeSeriesPairer};
pub use persistence::PersistenceGenerator;
pub use upscale::{
    RescaledSeries, TimeSeriesUpscaler, Upscaler, is_change_of_scale_required, validate_rescaling,
};
