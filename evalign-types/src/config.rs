//! Configuration types shared by the window generator, pairers and the pool pipeline.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::scale::{MonthDay, TimeScale};
use crate::window::TimeWindow;

/// How baseline series are matched to main series when cross-pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MatchMode {
    /// Pick the candidate whose reference times are closest.
    #[default]
    Near,
    /// Require identical reference times for a common reference time type.
    Exact,
}

/// Strategy used when pairing one left series with one right series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PairingStrategy {
    /// Require identical time scales on both sides.
    #[default]
    Exact,
    /// Pair on valid times without comparing time scales.
    Crisp,
}

/// How a set of time windows collapses into a single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimeWindowAggregation {
    /// Outer bounding box.
    #[default]
    Maximum,
    /// Narrowest common box.
    Minimum,
    /// Mean of each bound.
    Average,
}

/// Datetime interval for the reference time or valid time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Earliest datetime, if bounded.
    #[serde(default)]
    pub minimum: Option<DateTime<Utc>>,
    /// Latest datetime, if bounded.
    #[serde(default)]
    pub maximum: Option<DateTime<Utc>>,
}

impl TimeInterval {
    /// A closed interval.
    #[must_use]
    pub const fn new(minimum: DateTime<Utc>, maximum: DateTime<Utc>) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }
}

/// Lead duration interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadTimeInterval {
    /// Shortest lead duration, if bounded.
    #[serde(default, with = "crate::serde_millis::option")]
    pub minimum: Option<TimeDelta>,
    /// Longest lead duration, if bounded.
    #[serde(default, with = "crate::serde_millis::option")]
    pub maximum: Option<TimeDelta>,
}

impl LeadTimeInterval {
    /// A closed interval.
    #[must_use]
    pub const fn new(minimum: TimeDelta, maximum: TimeDelta) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }
}

/// Sequence of pools along one axis: windows of width `period` every `frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePools {
    /// Width of each window.
    #[serde(with = "crate::serde_millis")]
    pub period: TimeDelta,
    /// Step between successive window starts; defaults to the period.
    #[serde(default, with = "crate::serde_millis::option")]
    pub frequency: Option<TimeDelta>,
}

impl TimePools {
    /// Contiguous pools with the frequency equal to the period.
    #[must_use]
    pub const fn new(period: TimeDelta) -> Self {
        Self {
            period,
            frequency: None,
        }
    }

    /// Pools with an explicit frequency.
    #[must_use]
    pub const fn with_frequency(period: TimeDelta, frequency: TimeDelta) -> Self {
        Self {
            period,
            frequency: Some(frequency),
        }
    }

    /// The frequency, falling back to the period.
    #[must_use]
    pub fn effective_frequency(&self) -> TimeDelta {
        self.frequency.unwrap_or(self.period)
    }
}

/// Declarative pooling specification consumed by the window generator.
///
/// Each axis is independent; an axis with pools needs a complete interval.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolingDeclaration {
    /// Lead duration interval.
    #[serde(default)]
    pub lead_times: Option<LeadTimeInterval>,
    /// Pools along the lead duration axis.
    #[serde(default)]
    pub lead_time_pools: Option<TimePools>,
    /// Reference time interval.
    #[serde(default)]
    pub reference_dates: Option<TimeInterval>,
    /// Pools along the reference time axis.
    #[serde(default)]
    pub reference_date_pools: Option<TimePools>,
    /// Valid time interval.
    #[serde(default)]
    pub valid_dates: Option<TimeInterval>,
    /// Pools along the valid time axis.
    #[serde(default)]
    pub valid_date_pools: Option<TimePools>,
    /// Extra windows added verbatim to the generated set.
    #[serde(default)]
    pub time_pools: Vec<TimeWindow>,
}

impl PoolingDeclaration {
    /// Returns true when no axis declares pools and no explicit windows are listed.
    #[must_use]
    pub const fn has_no_pools(&self) -> bool {
        self.lead_time_pools.is_none()
            && self.reference_date_pools.is_none()
            && self.valid_date_pools.is_none()
            && self.time_pools.is_empty()
    }
}

/// Recurring season restricting which events enter an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// First day of the season.
    pub start: MonthDay,
    /// Last day of the season.
    pub end: MonthDay,
    /// Apply the season to reference times rather than valid times.
    #[serde(default)]
    pub on_reference_times: bool,
}

/// Global configuration for the `Evalign` pool pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvalignConfig {
    /// Pool generation.
    #[serde(default)]
    pub pooling: PoolingDeclaration,
    /// Time scale every source is rescaled to before pairing, if any.
    #[serde(default)]
    pub desired_time_scale: Option<TimeScale>,
    /// Step between rescaled values; defaults to the desired period.
    #[serde(default, with = "crate::serde_millis::option")]
    pub rescale_frequency: Option<TimeDelta>,
    /// Left/right pairing strategy.
    #[serde(default)]
    pub pairing: PairingStrategy,
    /// Main/baseline cross-pairing mode; `None` leaves the baseline uncross-paired.
    #[serde(default)]
    pub cross_pair: Option<MatchMode>,
    /// Optional season applied before pooling.
    #[serde(default)]
    pub season: Option<Season>,
}
