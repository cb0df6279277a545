//! Pure filters and transforms over series and pools.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::{EvalignError, ReferenceTimeType, TimeScale, TimeWindow};

use crate::model::{Ensemble, Event, Pair, Pool, TimeSeries};
use crate::timeseries::util::{MISSING, ensure_uniform_member_count, saturating_add, saturating_sub};

/// Keep the events inside `window`.
///
/// Reference times outside the window are removed from the result metadata.
/// When the series had reference times and none survive, the result is empty.
/// Surviving events lie inside the valid time bounds and, for every surviving
/// reference time, inside the lead duration bounds.
#[must_use]
pub fn filter<V: Clone>(series: &TimeSeries<V>, window: &TimeWindow) -> TimeSeries<V> {
    let (retained, narrowed) = retain_reference_times(series, window);
    narrowed.retain(|e| {
        window.contains_valid_time(e.valid_time())
            && retained
                .values()
                .all(|r| window.contains_lead_duration(e.valid_time() - *r))
    })
}

/// Trim a series to `window`, applying lead durations to the `T0` reference time only.
///
/// Reference and valid times are filtered as in [`filter`]. Lead durations are
/// checked only when the series keeps a `T0` reference time and the window
/// bounds its lead durations.
#[must_use]
pub fn snip_to_window<V: Clone>(series: &TimeSeries<V>, window: &TimeWindow) -> TimeSeries<V> {
    let (retained, narrowed) = retain_reference_times(series, window);
    let issued = retained
        .get(&ReferenceTimeType::T0)
        .copied()
        .filter(|_| !window.has_unbounded_lead_durations());
    narrowed.retain(|e| {
        window.contains_valid_time(e.valid_time())
            && issued.is_none_or(|r| window.contains_lead_duration(e.valid_time() - r))
    })
}

/// The reference times inside `window` and the series relabelled with them.
///
/// The series is emptied when it had reference times and none survive.
fn retain_reference_times<V: Clone>(
    series: &TimeSeries<V>,
    window: &TimeWindow,
) -> (BTreeMap<ReferenceTimeType, DateTime<Utc>>, TimeSeries<V>) {
    let retained: BTreeMap<ReferenceTimeType, DateTime<Utc>> = series
        .reference_times()
        .iter()
        .filter(|(_, t)| window.contains_reference_time(**t))
        .map(|(k, t)| (*k, *t))
        .collect();
    let metadata = series
        .metadata()
        .clone()
        .with_reference_times(retained.clone());
    let narrowed = if !series.reference_times().is_empty() && retained.is_empty() {
        TimeSeries::empty(metadata)
    } else {
        series.clone().with_metadata(metadata)
    };
    (retained, narrowed)
}

/// Declare the time scale of a series, keeping its events.
///
/// A series without a time scale takes `scale`. A series with one may only
/// have its function replaced: the existing scale with the function of `scale`
/// must equal `scale`, or both must be instantaneous.
///
/// # Errors
/// Returns `InvalidArg` when `scale` is inconsistent with the existing time scale.
pub fn augment_with_time_scale<V: Clone>(
    series: &TimeSeries<V>,
    scale: TimeScale,
) -> Result<TimeSeries<V>, EvalignError> {
    if let Some(existing) = series.time_scale() {
        let candidate = existing.with_function(scale.function());
        let consistent =
            candidate == scale || (candidate.is_instantaneous() && scale.is_instantaneous());
        if !consistent {
            return Err(EvalignError::invalid_arg(format!(
                "cannot declare the time scale {scale} for a series whose time scale is {existing}"
            )));
        }
    }
    let metadata = series.metadata().clone().with_time_scale(Some(scale));
    Ok(series.clone().with_metadata(metadata))
}

/// Half-way point between two times on the UTC timeline.
///
/// Saturates at the sentinel bounds.
#[must_use]
pub fn mid_point_between_times(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> DateTime<Utc> {
    saturating_add(earliest, (latest - earliest) / 2)
}

/// Keep the events accepted by `keep`.
#[must_use]
pub fn filter_by_event<V: Clone>(
    series: &TimeSeries<V>,
    keep: impl Fn(&Event<V>) -> bool,
) -> TimeSeries<V> {
    series.clone().retain(keep)
}

/// Keep the events whose value is accepted by `keep`.
#[must_use]
pub fn filter_values<V: Clone>(series: &TimeSeries<V>, keep: impl Fn(&V) -> bool) -> TimeSeries<V> {
    series.clone().retain(|e| keep(e.value()))
}

/// Map every value, keeping timestamps and metadata.
#[must_use]
pub fn transform<V, U>(series: &TimeSeries<V>, f: impl Fn(&V) -> U) -> TimeSeries<U> {
    series.map_ref(f)
}

/// Predicate on the left side of a pair.
pub fn on_left<L, R>(f: impl Fn(&L) -> bool) -> impl Fn(&Pair<L, R>) -> bool {
    move |p| f(&p.left)
}

/// Predicate on the right side of a pair.
pub fn on_right<L, R>(f: impl Fn(&R) -> bool) -> impl Fn(&Pair<L, R>) -> bool {
    move |p| f(&p.right)
}

/// Predicate that both sides of a pair must satisfy.
pub fn on_left_and_right<T>(f: impl Fn(&T) -> bool) -> impl Fn(&Pair<T, T>) -> bool {
    move |p| f(&p.left) && f(&p.right)
}

/// Drop events failing `keep` from every main and baseline series, and climatology
/// values failing `climatology_keep`.
#[must_use]
pub fn filter_pool<T: Clone>(
    pool: &Pool<T>,
    keep: impl Fn(&T) -> bool,
    climatology_keep: Option<&dyn Fn(f64) -> bool>,
) -> Pool<T> {
    let apply = |series: &[TimeSeries<T>]| -> Vec<TimeSeries<T>> {
        series.iter().map(|s| filter_values(s, &keep)).collect()
    };
    Pool {
        main: apply(&pool.main),
        baseline: pool.baseline.as_deref().map(apply),
        climatology: match (&pool.climatology, climatology_keep) {
            (Some(c), Some(f)) => Some(c.iter().copied().filter(|v| f(*v)).collect()),
            (c, _) => c.clone(),
        },
        window: pool.window,
    }
}

/// Bin events into `(end - period, end]` for every requested end.
///
/// Ends with no events map to an empty group. A negative period yields empty groups.
#[must_use]
pub fn group_events_by_interval<'a, V>(
    series: &'a TimeSeries<V>,
    ends_at: &BTreeSet<DateTime<Utc>>,
    period: TimeDelta,
) -> BTreeMap<DateTime<Utc>, Vec<&'a Event<V>>> {
    ends_at
        .iter()
        .map(|&end| {
            let group = if period < TimeDelta::zero() {
                Vec::new()
            } else {
                let start = saturating_sub(end, period);
                series
                    .events_in((Bound::Excluded(start), Bound::Included(end)))
                    .collect()
            };
            (end, group)
        })
        .collect()
}

/// Split an ensemble series into one single-valued series per member, in member order.
///
/// Each series is keyed by its member label, or by its 1-based index when the
/// ensemble is unlabelled. An empty series decomposes to one empty series.
///
/// # Errors
/// Returns `InvalidState` when the member count varies between events.
pub fn decompose(
    series: &TimeSeries<Ensemble>,
) -> Result<Vec<(String, TimeSeries<f64>)>, EvalignError> {
    if series.is_empty() {
        return Ok(vec![(
            "1".to_string(),
            TimeSeries::empty(series.metadata().clone()),
        )]);
    }
    let members = ensure_uniform_member_count(series.events())?;
    let labels: Vec<String> = match series.first().and_then(|e| e.value().labels()) {
        Some(l) => l.to_vec(),
        None => (1..=members).map(|i| i.to_string()).collect(),
    };

    let mut out = Vec::with_capacity(members);
    for (m, label) in labels.into_iter().enumerate() {
        let member = TimeSeries::new(
            series.metadata().clone(),
            series.events().map(|e| {
                Event::with_reference_time(e.reference_time(), e.valid_time(), e.value().members()[m])
            }),
        )?;
        out.push((label, member));
    }
    Ok(out)
}

/// Join single-valued member series into one ensemble series.
///
/// Valid times missing from a member are filled with a missing value.
///
/// # Errors
/// - Returns `InvalidArg` when `series` is empty.
/// - Returns `InvalidArg` when `labels` is non-empty and its length differs from `series`.
/// - Returns `InvalidArg` when the member series carry different metadata.
pub fn compose(
    series: &[TimeSeries<f64>],
    labels: &[String],
) -> Result<TimeSeries<Ensemble>, EvalignError> {
    let Some(first) = series.first() else {
        return Err(EvalignError::invalid_arg("no member series to compose"));
    };
    if !labels.is_empty() && labels.len() != series.len() {
        return Err(EvalignError::invalid_arg(format!(
            "expected {} labels for {} member series, got {}",
            series.len(),
            series.len(),
            labels.len()
        )));
    }
    if series.iter().any(|s| s.metadata() != first.metadata()) {
        return Err(EvalignError::invalid_arg(
            "cannot compose member series with different metadata",
        ));
    }

    let valid_times: BTreeSet<DateTime<Utc>> =
        series.iter().flat_map(TimeSeries::valid_times).collect();
    let mut builder = TimeSeries::builder().metadata(first.metadata().clone());
    for t in valid_times {
        let reference_time = series
            .iter()
            .find_map(|s| s.get(t))
            .map_or(t, Event::reference_time);
        let members: Vec<f64> = series
            .iter()
            .map(|s| s.get(t).map_or(MISSING, |e| *e.value()))
            .collect();
        let ensemble = Ensemble::with_labels(members, labels.to_vec())?;
        builder.push(Event::with_reference_time(reference_time, t, ensemble));
    }
    builder.build()
}

/// Trim `series` to `[reference.first - lower, reference.last + upper]`.
///
/// An empty `reference` leaves the series untouched.
#[must_use]
pub fn snip<V: Clone, U>(
    series: &TimeSeries<V>,
    reference: &TimeSeries<U>,
    lower_buffer: TimeDelta,
    upper_buffer: TimeDelta,
) -> TimeSeries<V> {
    let (Some(first), Some(last)) = (reference.first(), reference.last()) else {
        return series.clone();
    };
    let lower = saturating_sub(first.valid_time(), lower_buffer);
    let upper = saturating_add(last.valid_time(), upper_buffer);
    series
        .clone()
        .retain(|e| e.valid_time() >= lower && e.valid_time() <= upper)
}

/// Shift every valid time by `offset`, keeping reference times.
///
/// # Errors
/// Returns `InvalidArg` when a shifted valid time is out of range.
pub fn apply_offset_to_valid_times<V: Clone>(
    series: &TimeSeries<V>,
    offset: TimeDelta,
) -> Result<TimeSeries<V>, EvalignError> {
    if offset.is_zero() {
        return Ok(series.clone());
    }
    let mut builder = TimeSeries::builder().metadata(series.metadata().clone());
    for e in series.events() {
        let shifted = e.clone().shifted(offset).ok_or_else(|| {
            EvalignError::invalid_arg(format!(
                "valid time {} shifted by {offset} is out of range",
                e.valid_time()
            ))
        })?;
        builder.push(shifted);
    }
    builder.build()
}

/// Map events by their lead duration from the reference time of `kind`.
///
/// Empty when the series has no reference time of that kind.
#[must_use]
pub fn map_events_by_duration<V: Clone>(
    series: &TimeSeries<V>,
    kind: ReferenceTimeType,
) -> BTreeMap<TimeDelta, Event<V>> {
    let Some(&reference) = series.reference_times().get(&kind) else {
        return BTreeMap::new();
    };
    series
        .events()
        .map(|e| (e.valid_time() - reference, e.clone()))
        .collect()
}

/// Partition series by their event count.
#[must_use]
pub fn group_by_event_count<V: Clone>(
    series: &[TimeSeries<V>],
) -> BTreeMap<usize, Vec<TimeSeries<V>>> {
    let mut out: BTreeMap<usize, Vec<TimeSeries<V>>> = BTreeMap::new();
    for s in series {
        out.entry(s.len()).or_default().push(s.clone());
    }
    out
}
