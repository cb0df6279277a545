//! Time steps of a series and the valid times two series share.
//!
//! - `timesteps`: every distinct gap between consecutive valid times.
//! - `first_time_step`: the gap that opens a series.
//! - `regular_sequence_of_intersecting_times`: shared valid times thinned to
//!   the ends of a desired time scale.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::{TimeScale, TimeWindow};

use crate::model::TimeSeries;
use crate::timeseries::util::saturating_sub;

/// Gap between the first two valid times of `series`.
///
/// Upscaling steps back by this gap from the first valid time so that the
/// first window, which excludes its lower bound, still holds the first event.
///
/// ```
/// use chrono::{DateTime, TimeDelta};
/// use evalign_core::{Event, TimeSeries, TimeSeriesMetadata, first_time_step};
///
/// let at = |h: i64| DateTime::from_timestamp(h * 3600, 0).unwrap();
/// let series = TimeSeries::new(
///     TimeSeriesMetadata::default(),
///     [0, 6, 7, 8].map(|h| Event::new(at(h), 1.0)),
/// )?;
/// assert_eq!(first_time_step(&series), Some(TimeDelta::hours(6)));
/// # Ok::<(), evalign_core::EvalignError>(())
/// ```
#[must_use]
pub fn first_time_step<V>(series: &TimeSeries<V>) -> Option<TimeDelta> {
    let mut times = series.valid_times();
    let first = times.next()?;
    times.next().map(|second| second - first)
}

/// Distinct gaps between consecutive valid times.
#[must_use]
pub fn timesteps<V>(series: &TimeSeries<V>) -> BTreeSet<TimeDelta> {
    series
        .valid_times()
        .zip(series.valid_times().skip(1))
        .map(|(a, b)| b - a)
        .collect()
}

/// Valid times shared by both series, thinned to a regular sequence at the desired time scale.
///
/// - A desired scale bounded by month-days yields the empty set.
/// - Two series that both carry reference times, and whose reference times differ, yield the empty set.
/// - Without thinning (no desired scale, or either side already at the desired scale) the plain
///   intersection is returned.
/// - Otherwise the shared times are snipped to `window` and thinned to times spaced by
///   `frequency` (default: the desired period), counted from the first reference time or,
///   absent one, from the first shared time less one period.
#[must_use]
pub fn regular_sequence_of_intersecting_times<L, R>(
    left: &TimeSeries<L>,
    right: &TimeSeries<R>,
    window: &TimeWindow,
    desired: Option<TimeScale>,
    frequency: Option<TimeDelta>,
) -> BTreeSet<DateTime<Utc>> {
    if desired.is_some_and(|d| d.has_month_days()) {
        #[cfg(feature = "tracing")]
        tracing::debug!("desired time scale has month-day bookends; no intersecting times");
        return BTreeSet::new();
    }

    if !left.reference_times().is_empty()
        && !right.reference_times().is_empty()
        && left.reference_times() != right.reference_times()
    {
        #[cfg(feature = "tracing")]
        tracing::debug!("series carry unequal reference times; no intersecting times");
        return BTreeSet::new();
    }

    let right_times: BTreeSet<DateTime<Utc>> = right.valid_times().collect();
    let intersecting: BTreeSet<DateTime<Utc>> = left
        .valid_times()
        .filter(|t| right_times.contains(t))
        .collect();

    let Some((desired, period)) = desired.and_then(|d| d.period().map(|p| (d, p))) else {
        return intersecting;
    };
    let upscale_left = left.time_scale() != Some(desired);
    let upscale_right = right.time_scale() != Some(desired);
    if intersecting.is_empty() || !upscale_left || !upscale_right {
        return intersecting;
    }

    let frequency = frequency.unwrap_or(period);
    let reference_time = left
        .reference_times()
        .values()
        .chain(right.reference_times().values())
        .next()
        .copied();
    let origin = match (reference_time, intersecting.first()) {
        (Some(r), _) => r,
        (None, Some(first)) => saturating_sub(*first, period),
        (None, None) => return intersecting,
    };

    let snipped: Vec<DateTime<Utc>> = intersecting
        .into_iter()
        .filter(|t| window.contains_valid_time(*t))
        .filter(|t| match reference_time {
            Some(r) if !window.has_unbounded_lead_durations() => {
                window.contains_lead_duration(*t - r)
            }
            _ => true,
        })
        .collect();

    regular_sequence(&snipped, origin, period, frequency)
}

fn regular_sequence(
    times: &[DateTime<Utc>],
    origin: DateTime<Utc>,
    period: TimeDelta,
    frequency: TimeDelta,
) -> BTreeSet<DateTime<Utc>> {
    if times.len() < 2 || frequency <= TimeDelta::zero() {
        return times.iter().copied().collect();
    }
    let first = times[0];
    let last = times[times.len() - 1];

    let start = if first < origin {
        first
    } else {
        let mut next = origin.checked_add_signed(period);
        let mut found = None;
        while let Some(t) = next
            && t <= last
        {
            if times.binary_search(&t).is_ok() {
                found = Some(t);
                break;
            }
            next = t.checked_add_signed(frequency);
        }
        found.unwrap_or(first)
    };

    let mut out = BTreeSet::new();
    let mut next = Some(start);
    while let Some(t) = next
        && t <= last
    {
        if times.binary_search(&t).is_ok() {
            out.insert(t);
        }
        next = t.checked_add_signed(frequency);
    }
    out
}
