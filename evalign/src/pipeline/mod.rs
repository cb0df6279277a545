pub mod pairs;
pub mod pools;
pub mod rescale;

use evalign_core::{Pair, Pool, ScaleValidationEvent, TimeSeries, TimeWindow};

/// Paired series with every validation event raised while rescaling the sources.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSources<L, R> {
    /// One paired series per right-hand source series that shares the left feature.
    pub pairs: Vec<TimeSeries<Pair<L, R>>>,
    /// Rescaling validation events, in source order.
    pub events: Vec<ScaleValidationEvent>,
}

impl<L, R> PairedSources<L, R> {
    /// Total number of paired events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.pairs.iter().map(TimeSeries::len).sum()
    }
}

/// One evaluation pool and the diagnostics raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolReport<L, R> {
    /// Window that selected the pool.
    pub window: TimeWindow,
    /// Main pairs, optional baseline pairs and the climatological sample.
    pub pool: Pool<Pair<L, R>>,
    /// Rescaling validation events for the main and baseline sources.
    pub events: Vec<ScaleValidationEvent>,
}

impl<L, R> PoolReport<L, R> {
    /// Returns true when the main partition holds no paired events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.main_event_count() == 0
    }
}
