use serde::{Deserialize, Serialize};

use evalign_types::TimeWindow;

use super::series::TimeSeries;

/// Left and right values observed at the same valid time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair<L, R> {
    /// Left value, usually the observation.
    pub left: L,
    /// Right value, usually the forecast.
    pub right: R,
}

impl<L, R> Pair<L, R> {
    /// Create a pair.
    pub const fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

/// Index-aligned main and baseline series produced by cross-pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossPairs<L, R> {
    /// Main series, in input order.
    pub main: Vec<TimeSeries<L>>,
    /// Baseline series; `baseline[i]` was matched to `main[i]`.
    pub baseline: Vec<TimeSeries<R>>,
}

impl<L, R> CrossPairs<L, R> {
    /// Number of matched series pairs.
    pub fn len(&self) -> usize {
        self.main.len()
    }

    /// Returns true when nothing was matched.
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

/// Series grouped for evaluation within one time window.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<T> {
    /// Main series.
    pub main: Vec<TimeSeries<T>>,
    /// Baseline series, if a baseline is evaluated.
    pub baseline: Option<Vec<TimeSeries<T>>>,
    /// Climatological sample associated with the pool.
    pub climatology: Option<Vec<f64>>,
    /// Window that selected the pool.
    pub window: Option<TimeWindow>,
}

impl<T> Pool<T> {
    /// A pool with main series only.
    pub const fn new(main: Vec<TimeSeries<T>>) -> Self {
        Self {
            main,
            baseline: None,
            climatology: None,
            window: None,
        }
    }

    /// Total number of events across main series.
    pub fn main_event_count(&self) -> usize {
        self.main.iter().map(TimeSeries::len).sum()
    }
}
