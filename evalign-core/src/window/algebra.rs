//! Set algebra over time windows.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::{EvalignError, TimeScale, TimeWindow, TimeWindowAggregation};

use crate::timeseries::util::{saturating_sub, saturating_sub_delta};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Outer bounding box of `windows` on every axis.
///
/// # Errors
/// Returns `InvalidArg` when `windows` is empty.
pub fn union<'a, I>(windows: I) -> Result<TimeWindow, EvalignError>
where
    I: IntoIterator<Item = &'a TimeWindow>,
{
    let mut iter = windows.into_iter();
    let Some(first) = iter.next() else {
        return Err(EvalignError::invalid_arg("cannot form the union of no time windows"));
    };
    let mut b = Bounds::of(first);
    for w in iter {
        b.earliest_reference = b.earliest_reference.min(w.earliest_reference_time());
        b.latest_reference = b.latest_reference.max(w.latest_reference_time());
        b.earliest_valid = b.earliest_valid.min(w.earliest_valid_time());
        b.latest_valid = b.latest_valid.max(w.latest_valid_time());
        b.earliest_lead = b.earliest_lead.min(w.earliest_lead_duration());
        b.latest_lead = b.latest_lead.max(w.latest_lead_duration());
    }
    b.build()
}

/// Whether two windows overlap on every axis.
///
/// Bounds are compared inclusively, so windows that touch at a shared bound
/// intersect and every window intersects itself, degenerate ones included.
/// An axis that is unbounded in either window matches anything.
#[must_use]
pub fn intersects(a: &TimeWindow, b: &TimeWindow) -> bool {
    if a == b {
        return true;
    }
    let reference = a.has_unbounded_reference_times()
        || b.has_unbounded_reference_times()
        || overlaps(
            (a.earliest_reference_time(), a.latest_reference_time()),
            (b.earliest_reference_time(), b.latest_reference_time()),
        );
    let valid = a.has_unbounded_valid_times()
        || b.has_unbounded_valid_times()
        || overlaps(
            (a.earliest_valid_time(), a.latest_valid_time()),
            (b.earliest_valid_time(), b.latest_valid_time()),
        );
    let lead = a.has_unbounded_lead_durations()
        || b.has_unbounded_lead_durations()
        || overlaps(
            (a.earliest_lead_duration(), a.latest_lead_duration()),
            (b.earliest_lead_duration(), b.latest_lead_duration()),
        );
    reference && valid && lead
}

/// Every window of `a` or `b` that intersects some window of the other set.
#[must_use]
pub fn intersection(a: &BTreeSet<TimeWindow>, b: &BTreeSet<TimeWindow>) -> BTreeSet<TimeWindow> {
    let mut out = BTreeSet::new();
    for x in a {
        for y in b {
            if intersects(x, y) {
                out.insert(*x);
                out.insert(*y);
            }
        }
    }
    out
}

/// Collapse `windows` into one window.
///
/// `Maximum` is the [`union`]. `Minimum` takes the latest earliest bound and the
/// earliest latest bound per axis; an axis without a common overlap collapses
/// to a degenerate window at its lower bound. `Average` is the mean of each
/// bound across all windows.
///
/// # Errors
/// Returns `InvalidArg` when `windows` is empty.
pub fn aggregate(
    windows: &BTreeSet<TimeWindow>,
    method: TimeWindowAggregation,
) -> Result<TimeWindow, EvalignError> {
    let Some(first) = windows.first() else {
        return Err(EvalignError::invalid_arg("cannot aggregate no time windows"));
    };
    match method {
        TimeWindowAggregation::Maximum => union(windows),
        TimeWindowAggregation::Minimum => {
            let mut b = Bounds::of(first);
            for w in windows {
                b.earliest_reference = b.earliest_reference.max(w.earliest_reference_time());
                b.latest_reference = b.latest_reference.min(w.latest_reference_time());
                b.earliest_valid = b.earliest_valid.max(w.earliest_valid_time());
                b.latest_valid = b.latest_valid.min(w.latest_valid_time());
                b.earliest_lead = b.earliest_lead.max(w.earliest_lead_duration());
                b.latest_lead = b.latest_lead.min(w.latest_lead_duration());
            }
            b.latest_reference = b.latest_reference.max(b.earliest_reference);
            b.latest_valid = b.latest_valid.max(b.earliest_valid);
            b.latest_lead = b.latest_lead.max(b.earliest_lead);
            b.build()
        }
        TimeWindowAggregation::Average => average(windows),
        other => Err(EvalignError::invalid_arg(format!(
            "unsupported time window aggregation {other:?}"
        ))),
    }
}

/// Widen a bounded window so enough data is selected to form values at `scale`.
///
/// The earliest lead duration and the earliest valid time are each lowered by
/// the period of `scale` when they are bounded. Instantaneous scales and
/// scales without a period leave the window unchanged.
///
/// # Errors
/// Returns `InvalidState` when the adjusted bounds do not form a valid window.
pub fn adjust_for_time_scale(
    window: &TimeWindow,
    scale: TimeScale,
) -> Result<TimeWindow, EvalignError> {
    let Some(period) = scale.period().filter(|_| !scale.is_instantaneous()) else {
        return Ok(*window);
    };
    let mut builder = window.to_builder();
    if !window.has_unbounded_lead_durations() {
        builder = builder.earliest_lead_duration(saturating_sub_delta(
            window.earliest_lead_duration(),
            period,
        ));
    }
    if !window.has_unbounded_valid_times() {
        builder = builder.earliest_valid_time(saturating_sub(window.earliest_valid_time(), period));
    }
    builder.build()
}

fn overlaps<T: Ord>(a: (T, T), b: (T, T)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

struct Bounds {
    earliest_reference: DateTime<Utc>,
    latest_reference: DateTime<Utc>,
    earliest_valid: DateTime<Utc>,
    latest_valid: DateTime<Utc>,
    earliest_lead: TimeDelta,
    latest_lead: TimeDelta,
}

impl Bounds {
    const fn of(w: &TimeWindow) -> Self {
        Self {
            earliest_reference: w.earliest_reference_time(),
            latest_reference: w.latest_reference_time(),
            earliest_valid: w.earliest_valid_time(),
            latest_valid: w.latest_valid_time(),
            earliest_lead: w.earliest_lead_duration(),
            latest_lead: w.latest_lead_duration(),
        }
    }

    fn build(self) -> Result<TimeWindow, EvalignError> {
        TimeWindow::builder()
            .reference_times(self.earliest_reference, self.latest_reference)
            .valid_times(self.earliest_valid, self.latest_valid)
            .lead_durations(self.earliest_lead, self.latest_lead)
            .build()
    }
}

fn average(windows: &BTreeSet<TimeWindow>) -> Result<TimeWindow, EvalignError> {
    #[allow(clippy::cast_possible_wrap)]
    let n = windows.len() as i128;
    let mean_time = |f: fn(&TimeWindow) -> DateTime<Utc>| -> Result<DateTime<Utc>, EvalignError> {
        let total: i128 = windows.iter().map(|w| time_nanos(f(w))).sum();
        nanos_to_time(total / n)
    };
    let mean_lead = |f: fn(&TimeWindow) -> TimeDelta| -> Result<TimeDelta, EvalignError> {
        let total: i128 = windows.iter().map(|w| lead_nanos(f(w))).sum();
        nanos_to_lead(total / n)
    };
    Bounds {
        earliest_reference: mean_time(TimeWindow::earliest_reference_time)?,
        latest_reference: mean_time(TimeWindow::latest_reference_time)?,
        earliest_valid: mean_time(TimeWindow::earliest_valid_time)?,
        latest_valid: mean_time(TimeWindow::latest_valid_time)?,
        earliest_lead: mean_lead(TimeWindow::earliest_lead_duration)?,
        latest_lead: mean_lead(TimeWindow::latest_lead_duration)?,
    }
    .build()
}

fn time_nanos(t: DateTime<Utc>) -> i128 {
    i128::from(t.timestamp()) * NANOS_PER_SECOND + i128::from(t.timestamp_subsec_nanos())
}

fn lead_nanos(d: TimeDelta) -> i128 {
    i128::from(d.num_seconds()) * NANOS_PER_SECOND + i128::from(d.subsec_nanos())
}

fn split_nanos(nanos: i128) -> Option<(i64, u32)> {
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
    Some((secs, subsec))
}

fn nanos_to_time(nanos: i128) -> Result<DateTime<Utc>, EvalignError> {
    split_nanos(nanos)
        .and_then(|(s, n)| DateTime::from_timestamp(s, n))
        .ok_or_else(|| EvalignError::invalid_state(format!("mean time of {nanos}ns is out of range")))
}

fn nanos_to_lead(nanos: i128) -> Result<TimeDelta, EvalignError> {
    split_nanos(nanos)
        .and_then(|(s, n)| TimeDelta::new(s, n))
        .ok_or_else(|| {
            EvalignError::invalid_state(format!("mean lead duration of {nanos}ns is out of range"))
        })
}
