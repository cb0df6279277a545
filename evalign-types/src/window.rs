//! Time windows: bounds over reference time, valid time and lead duration.
//!
//! Containment is lower-exclusive and upper-inclusive on every axis, so
//! adjacent windows produced by the generator never share an event. An axis
//! whose both ends are the sentinel bounds contains everything.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::EvalignError;

/// Sentinel for an unbounded earliest time.
pub const EARLIEST_TIME: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;
/// Sentinel for an unbounded latest time.
pub const LATEST_TIME: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;
/// Sentinel for an unbounded earliest lead duration.
pub const EARLIEST_LEAD: TimeDelta = TimeDelta::MIN;
/// Sentinel for an unbounded latest lead duration.
pub const LATEST_LEAD: TimeDelta = TimeDelta::MAX;

/// A bound filter over reference time, valid time and lead duration.
///
/// Ordered by earliest then latest reference time, then valid time, then lead duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeWindowRepr", into = "TimeWindowRepr")]
pub struct TimeWindow {
    earliest_reference_time: DateTime<Utc>,
    latest_reference_time: DateTime<Utc>,
    earliest_valid_time: DateTime<Utc>,
    latest_valid_time: DateTime<Utc>,
    earliest_lead_duration: TimeDelta,
    latest_lead_duration: TimeDelta,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl TimeWindow {
    /// A window that is unbounded on every axis.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            earliest_reference_time: EARLIEST_TIME,
            latest_reference_time: LATEST_TIME,
            earliest_valid_time: EARLIEST_TIME,
            latest_valid_time: LATEST_TIME,
            earliest_lead_duration: EARLIEST_LEAD,
            latest_lead_duration: LATEST_LEAD,
        }
    }

    /// Start building a window; axes left unset are unbounded.
    #[must_use]
    pub fn builder() -> TimeWindowBuilder {
        TimeWindowBuilder::new()
    }

    /// A builder seeded with this window's bounds.
    #[must_use]
    pub const fn to_builder(&self) -> TimeWindowBuilder {
        TimeWindowBuilder { window: *self }
    }

    /// Earliest reference time (exclusive).
    #[must_use]
    pub const fn earliest_reference_time(&self) -> DateTime<Utc> {
        self.earliest_reference_time
    }

    /// Latest reference time (inclusive).
    #[must_use]
    pub const fn latest_reference_time(&self) -> DateTime<Utc> {
        self.latest_reference_time
    }

    /// Earliest valid time (exclusive).
    #[must_use]
    pub const fn earliest_valid_time(&self) -> DateTime<Utc> {
        self.earliest_valid_time
    }

    /// Latest valid time (inclusive).
    #[must_use]
    pub const fn latest_valid_time(&self) -> DateTime<Utc> {
        self.latest_valid_time
    }

    /// Earliest lead duration (exclusive).
    #[must_use]
    pub const fn earliest_lead_duration(&self) -> TimeDelta {
        self.earliest_lead_duration
    }

    /// Latest lead duration (inclusive).
    #[must_use]
    pub const fn latest_lead_duration(&self) -> TimeDelta {
        self.latest_lead_duration
    }

    /// Both reference time bounds are sentinels.
    #[must_use]
    pub fn has_unbounded_reference_times(&self) -> bool {
        self.earliest_reference_time == EARLIEST_TIME && self.latest_reference_time == LATEST_TIME
    }

    /// Both valid time bounds are sentinels.
    #[must_use]
    pub fn has_unbounded_valid_times(&self) -> bool {
        self.earliest_valid_time == EARLIEST_TIME && self.latest_valid_time == LATEST_TIME
    }

    /// Both lead duration bounds are sentinels.
    #[must_use]
    pub fn has_unbounded_lead_durations(&self) -> bool {
        self.earliest_lead_duration == EARLIEST_LEAD && self.latest_lead_duration == LATEST_LEAD
    }

    /// Whether a reference time falls in `(earliest, latest]`.
    #[must_use]
    pub fn contains_reference_time(&self, t: DateTime<Utc>) -> bool {
        self.has_unbounded_reference_times()
            || (t > self.earliest_reference_time && t <= self.latest_reference_time)
    }

    /// Whether a valid time falls in `(earliest, latest]`.
    #[must_use]
    pub fn contains_valid_time(&self, t: DateTime<Utc>) -> bool {
        self.has_unbounded_valid_times()
            || (t > self.earliest_valid_time && t <= self.latest_valid_time)
    }

    /// Whether a lead duration falls in `(earliest, latest]`.
    #[must_use]
    pub fn contains_lead_duration(&self, lead: TimeDelta) -> bool {
        self.has_unbounded_lead_durations()
            || (lead > self.earliest_lead_duration && lead <= self.latest_lead_duration)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn time(t: DateTime<Utc>) -> String {
            if t == EARLIEST_TIME || t == LATEST_TIME {
                "unbounded".to_string()
            } else {
                t.to_rfc3339()
            }
        }
        fn lead(d: TimeDelta) -> String {
            if d == EARLIEST_LEAD || d == LATEST_LEAD {
                "unbounded".to_string()
            } else {
                d.to_string()
            }
        }
        write!(
            f,
            "[reference ({}, {}], valid ({}, {}], lead ({}, {}]]",
            time(self.earliest_reference_time),
            time(self.latest_reference_time),
            time(self.earliest_valid_time),
            time(self.latest_valid_time),
            lead(self.earliest_lead_duration),
            lead(self.latest_lead_duration),
        )
    }
}

/// Builder for a validated [`TimeWindow`].
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowBuilder {
    window: TimeWindow,
}

impl Default for TimeWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeWindowBuilder {
    /// A builder whose axes are all unbounded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window: TimeWindow::unbounded(),
        }
    }

    /// Set the reference time bounds.
    #[must_use]
    pub const fn reference_times(mut self, earliest: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        self.window.earliest_reference_time = earliest;
        self.window.latest_reference_time = latest;
        self
    }

    /// Set the valid time bounds.
    #[must_use]
    pub const fn valid_times(mut self, earliest: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        self.window.earliest_valid_time = earliest;
        self.window.latest_valid_time = latest;
        self
    }

    /// Set the lead duration bounds.
    #[must_use]
    pub const fn lead_durations(mut self, earliest: TimeDelta, latest: TimeDelta) -> Self {
        self.window.earliest_lead_duration = earliest;
        self.window.latest_lead_duration = latest;
        self
    }

    /// Set the earliest valid time only.
    #[must_use]
    pub const fn earliest_valid_time(mut self, t: DateTime<Utc>) -> Self {
        self.window.earliest_valid_time = t;
        self
    }

    /// Set the earliest lead duration only.
    #[must_use]
    pub const fn earliest_lead_duration(mut self, d: TimeDelta) -> Self {
        self.window.earliest_lead_duration = d;
        self
    }

    /// Validate and build the window.
    ///
    /// # Errors
    /// Returns `InvalidState` when any axis has its latest bound before its earliest bound.
    pub fn build(self) -> Result<TimeWindow, EvalignError> {
        let w = self.window;
        if w.latest_reference_time < w.earliest_reference_time {
            return Err(EvalignError::invalid_state(format!(
                "latest reference time {} precedes earliest reference time {}",
                w.latest_reference_time, w.earliest_reference_time
            )));
        }
        if w.latest_valid_time < w.earliest_valid_time {
            return Err(EvalignError::invalid_state(format!(
                "latest valid time {} precedes earliest valid time {}",
                w.latest_valid_time, w.earliest_valid_time
            )));
        }
        if w.latest_lead_duration < w.earliest_lead_duration {
            return Err(EvalignError::invalid_state(format!(
                "latest lead duration {} precedes earliest lead duration {}",
                w.latest_lead_duration, w.earliest_lead_duration
            )));
        }
        Ok(w)
    }
}

/// Wire form: unbounded ends are `null`, lead durations are milliseconds.
#[derive(Serialize, Deserialize)]
struct TimeWindowRepr {
    #[serde(default)]
    earliest_reference_time: Option<DateTime<Utc>>,
    #[serde(default)]
    latest_reference_time: Option<DateTime<Utc>>,
    #[serde(default)]
    earliest_valid_time: Option<DateTime<Utc>>,
    #[serde(default)]
    latest_valid_time: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::serde_millis::option")]
    earliest_lead_ms: Option<TimeDelta>,
    #[serde(default, with = "crate::serde_millis::option")]
    latest_lead_ms: Option<TimeDelta>,
}

impl TryFrom<TimeWindowRepr> for TimeWindow {
    type Error = EvalignError;

    fn try_from(r: TimeWindowRepr) -> Result<Self, Self::Error> {
        TimeWindowBuilder::new()
            .reference_times(
                r.earliest_reference_time.unwrap_or(EARLIEST_TIME),
                r.latest_reference_time.unwrap_or(LATEST_TIME),
            )
            .valid_times(
                r.earliest_valid_time.unwrap_or(EARLIEST_TIME),
                r.latest_valid_time.unwrap_or(LATEST_TIME),
            )
            .lead_durations(
                r.earliest_lead_ms.unwrap_or(EARLIEST_LEAD),
                r.latest_lead_ms.unwrap_or(LATEST_LEAD),
            )
            .build()
    }
}

impl From<TimeWindow> for TimeWindowRepr {
    fn from(w: TimeWindow) -> Self {
        let time = |t: DateTime<Utc>, sentinel: DateTime<Utc>| (t != sentinel).then_some(t);
        let lead = |d: TimeDelta, sentinel: TimeDelta| (d != sentinel).then_some(d);
        Self {
            earliest_reference_time: time(w.earliest_reference_time, EARLIEST_TIME),
            latest_reference_time: time(w.latest_reference_time, LATEST_TIME),
            earliest_valid_time: time(w.earliest_valid_time, EARLIEST_TIME),
            latest_valid_time: time(w.latest_valid_time, LATEST_TIME),
            earliest_lead_ms: lead(w.earliest_lead_duration, EARLIEST_LEAD),
            latest_lead_ms: lead(w.latest_lead_duration, LATEST_LEAD),
        }
    }
}
