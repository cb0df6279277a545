//! Upscaling of time series to a coarser time scale.
//!
//! Before any aggregation the requested change of scale is checked against a
//! fixed set of rules, each producing a [`ScaleValidationEvent`]. Any `Error`
//! event fails the request with [`EvalignError::Rescaling`], which carries the
//! full event list. Successful results carry the same list.
//!
//! Upscaled values are formed over windows `(end - period, end]` and stamped at
//! `end`, keeping the first reference time of the series. A missing input value
//! makes the aggregate missing. Windows with no events are omitted, and so are
//! windows with a single event or unevenly spaced events; each of the latter is
//! reported as a `Debug` validation event.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::{
    EvalignError, ReferenceTimeType, ScaleValidationEvent, TimeScale, TimeScaleFunction,
};

use crate::model::{Ensemble, Event, TimeSeries, TimeSeriesMetadata};
use crate::timeseries::infer::first_time_step;
use crate::timeseries::slice::group_events_by_interval;
use crate::timeseries::util::{MISSING, ensure_uniform_member_count, is_missing, saturating_sub};

/// A rescaled series with the validation events raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledSeries<V> {
    /// Series at the desired time scale.
    pub series: TimeSeries<V>,
    /// Validation log, in rule order.
    pub events: Vec<ScaleValidationEvent>,
}

/// Upscales a series of `V` to a coarser time scale.
pub trait TimeSeriesUpscaler<V> {
    /// Rescale `series` to `desired`, forming values that end at each time in `ends_at`.
    ///
    /// An empty `ends_at` lets the upscaler choose back-to-back windows that
    /// cover the series. A `unit` replaces the unit in the output metadata.
    ///
    /// # Errors
    /// Returns `Rescaling` when a validation rule fails or the values cannot be aggregated.
    fn upscale(
        &self,
        series: &TimeSeries<V>,
        desired: TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        unit: Option<&str>,
    ) -> Result<RescaledSeries<V>, EvalignError>;
}

/// Stateless upscaler for single-valued and ensemble series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Upscaler;

impl TimeSeriesUpscaler<f64> for Upscaler {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign_core::upscale::doubles",
            skip(self, series, ends_at, unit),
            fields(events = series.len(), desired = %desired),
        )
    )]
    fn upscale(
        &self,
        series: &TimeSeries<f64>,
        desired: TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        unit: Option<&str>,
    ) -> Result<RescaledSeries<f64>, EvalignError> {
        upscale_with(series, desired, ends_at, unit, |group, function| {
            aggregate(group.iter().map(|e| *e.value()), function)
        })
    }
}

impl TimeSeriesUpscaler<Ensemble> for Upscaler {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign_core::upscale::ensemble",
            skip(self, series, ends_at, unit),
            fields(events = series.len(), desired = %desired),
        )
    )]
    fn upscale(
        &self,
        series: &TimeSeries<Ensemble>,
        desired: TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        unit: Option<&str>,
    ) -> Result<RescaledSeries<Ensemble>, EvalignError> {
        upscale_with(series, desired, ends_at, unit, |group, function| {
            let members = ensure_uniform_member_count(group.iter().copied())?;
            let mut values = Vec::with_capacity(members);
            for m in 0..members {
                values.push(aggregate(
                    group.iter().map(|e| e.value().members()[m]),
                    function,
                )?);
            }
            let labels = group
                .first()
                .and_then(|e| e.value().labels())
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            Ensemble::with_labels(values, labels)
        })
    }
}

/// Whether converting `existing` to `desired` involves any aggregation.
///
/// No change is required when the scales are equal, when both are
/// instantaneous, or when the periods match and the existing function is unknown.
#[must_use]
pub fn is_change_of_scale_required(existing: TimeScale, desired: TimeScale) -> bool {
    let both_instantaneous = existing.is_instantaneous() && desired.is_instantaneous();
    let relabel_unknown = existing.period() == desired.period()
        && existing.function() == TimeScaleFunction::Unknown;
    existing != desired && !both_instantaneous && !relabel_unknown
}

/// Check a change of time scale against the rescaling rules.
///
/// Returns one event per rule. When no change of scale is required a single
/// `Pass` event is returned.
#[must_use]
pub fn validate_rescaling(existing: TimeScale, desired: TimeScale) -> Vec<ScaleValidationEvent> {
    let mut events = Vec::new();
    if !is_change_of_scale_required(existing, desired) {
        events.push(ScaleValidationEvent::pass(format!(
            "No change of scale is required from {existing} to {desired}."
        )));
        return events;
    }

    if desired.function() == TimeScaleFunction::Unknown {
        events.push(ScaleValidationEvent::error(format!(
            "The desired time scale function is {}. The function must be known to rescale.",
            TimeScaleFunction::Unknown
        )));
    } else {
        events.push(ScaleValidationEvent::pass(
            "The desired function is not unknown and is, therefore, acceptable.",
        ));
    }

    let (Some(existing_period), Some(desired_period)) = (existing.period(), desired.period())
    else {
        events.push(ScaleValidationEvent::error(format!(
            "Rescaling from {existing} to {desired} needs a fixed period on both time scales."
        )));
        return events;
    };

    if existing_period > desired_period {
        events.push(ScaleValidationEvent::error(format!(
            "Downscaling is not supported: the desired period of {desired_period} is smaller than the existing period of {existing_period}."
        )));
    } else {
        events.push(ScaleValidationEvent::pass(
            "The desired period is not smaller than the existing period.",
        ));
    }

    let existing_ms = existing_period.num_milliseconds();
    let desired_ms = desired_period.num_milliseconds();
    if existing_ms == 0 || desired_ms == 0 {
        events.push(ScaleValidationEvent::error(format!(
            "Cannot rescale with a zero period: existing {existing_period}, desired {desired_period}."
        )));
    } else if desired_ms % existing_ms != 0 {
        events.push(ScaleValidationEvent::error(format!(
            "The desired period of {desired_period} is not an integer multiple of the existing period of {existing_period}."
        )));
    } else {
        events.push(ScaleValidationEvent::pass(
            "The desired period is an integer multiple of the existing period.",
        ));
    }

    if existing_period == desired_period && existing.function() != desired.function() {
        if existing.function() == TimeScaleFunction::Unknown {
            events.push(ScaleValidationEvent::warn(format!(
                "The periods are equal and the existing function is {}; assuming it is {}.",
                TimeScaleFunction::Unknown,
                desired.function()
            )));
        } else {
            events.push(ScaleValidationEvent::error(format!(
                "The periods are equal but the functions differ: cannot change {} to {} without changing the period.",
                existing.function(),
                desired.function()
            )));
        }
    }

    if desired.function() == TimeScaleFunction::Total {
        if existing.is_instantaneous() {
            events.push(ScaleValidationEvent::error(
                "Cannot accumulate instantaneous values: the existing period is too short for a TOTAL.",
            ));
        } else {
            match existing.function() {
                TimeScaleFunction::Total => events.push(ScaleValidationEvent::pass(
                    "Accumulating values that are already accumulations.",
                )),
                TimeScaleFunction::Unknown => events.push(ScaleValidationEvent::warn(format!(
                    "The existing function is {}; assuming the values are accumulations.",
                    TimeScaleFunction::Unknown
                ))),
                other => events.push(ScaleValidationEvent::error(format!(
                    "Cannot form a TOTAL from values whose function is {other}."
                ))),
            }
        }
    }

    events
}

fn upscale_with<V, F>(
    series: &TimeSeries<V>,
    desired: TimeScale,
    ends_at: &BTreeSet<DateTime<Utc>>,
    unit: Option<&str>,
    aggregate_group: F,
) -> Result<RescaledSeries<V>, EvalignError>
where
    V: Clone,
    F: Fn(&[&Event<V>], TimeScaleFunction) -> Result<V, EvalignError>,
{
    let mut events = Vec::new();

    if series.is_empty() {
        return Ok(RescaledSeries {
            series: relabel(series, desired, unit),
            events,
        });
    }

    let Some(existing) = series.time_scale() else {
        if desired.is_instantaneous() {
            events.push(ScaleValidationEvent::info(format!(
                "The existing time scale is missing; assuming it matches the desired time scale of {desired}."
            )));
            return Ok(RescaledSeries {
                series: relabel(series, desired, unit),
                events,
            });
        }
        events.push(ScaleValidationEvent::error(format!(
            "The existing time scale is missing, so the series cannot be rescaled to {desired}."
        )));
        return Err(failure(series.metadata(), desired, events));
    };

    events.extend(validate_rescaling(existing, desired));
    if events.iter().any(ScaleValidationEvent::is_error) {
        return Err(failure(series.metadata(), desired, events));
    }

    let period = match desired.period() {
        Some(p) if existing.period() != Some(p) && is_change_of_scale_required(existing, desired) => p,
        _ => {
            return Ok(RescaledSeries {
                series: relabel(series, desired, unit),
                events,
            });
        }
    };

    let ends = if ends_at.is_empty() {
        default_ends(series, period)
    } else {
        ends_at.clone()
    };

    let reference_time = series.reference_times().values().next().copied();
    let mut builder = TimeSeries::builder().metadata(rescaled_metadata(series, desired, unit));
    for (end, group) in group_events_by_interval(series, &ends, period) {
        if group.is_empty() {
            continue;
        }
        if let Some(skipped) = check_group(&group, end, period) {
            events.push(skipped);
            continue;
        }
        let value = aggregate_group(&group, desired.function())
            .map_err(|e| EvalignError::rescaling(e.to_string(), events.clone()))?;
        builder.push(Event::with_reference_time(
            reference_time.unwrap_or(end),
            end,
            value,
        ));
    }

    let rescaled = builder.build()?;
    #[cfg(feature = "tracing")]
    tracing::debug!(
        input = series.len(),
        output = rescaled.len(),
        "upscaled series"
    );
    Ok(RescaledSeries {
        series: rescaled,
        events,
    })
}

/// Back-to-back ends starting one time step before the first valid time.
///
/// The time step is the gap between the first two events. A single event
/// yields no ends.
fn default_ends<V>(series: &TimeSeries<V>, period: TimeDelta) -> BTreeSet<DateTime<Utc>> {
    let mut ends = BTreeSet::new();
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return ends;
    };
    let step = first_time_step(series).unwrap_or_else(TimeDelta::zero);
    let mut check = saturating_sub(first.valid_time(), step);
    while check < last.valid_time() {
        let Some(next) = check.checked_add_signed(period) else {
            break;
        };
        ends.insert(next);
        check = next;
    }
    ends
}

/// Returns a `Debug` event when `group` cannot form a value ending at `end`.
///
/// A value needs at least two events, evenly spaced from the lower bound of
/// the window onwards.
fn check_group<V>(
    group: &[&Event<V>],
    end: DateTime<Utc>,
    period: TimeDelta,
) -> Option<ScaleValidationEvent> {
    if group.len() < 2 {
        return Some(ScaleValidationEvent::debug(format!(
            "Skipped the upscaled value ending at {end}: {} event(s) are too few to form a value over a period of {period}.",
            group.len()
        )));
    }
    let mut previous = saturating_sub(end, period);
    let mut spacing: Option<TimeDelta> = None;
    for e in group {
        let gap = e.valid_time() - previous;
        match spacing {
            Some(s) if s != gap => {
                return Some(ScaleValidationEvent::debug(format!(
                    "Skipped the upscaled value ending at {end}: the {} events are not evenly spaced within the period of {period}, found gaps of {s} and {gap}.",
                    group.len()
                )));
            }
            _ => spacing = Some(gap),
        }
        previous = e.valid_time();
    }
    None
}

fn aggregate(
    values: impl Iterator<Item = f64>,
    function: TimeScaleFunction,
) -> Result<f64, EvalignError> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() || values.iter().copied().any(is_missing) {
        return Ok(MISSING);
    }
    #[allow(clippy::cast_precision_loss)]
    let out = match function {
        TimeScaleFunction::Total => values.iter().sum(),
        TimeScaleFunction::Mean => values.iter().sum::<f64>() / values.len() as f64,
        TimeScaleFunction::Maximum => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        TimeScaleFunction::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
        other => {
            return Err(EvalignError::invalid_state(format!(
                "cannot aggregate values with function {other}"
            )));
        }
    };
    Ok(if is_missing(out) { MISSING } else { out })
}

fn relabel<V: Clone>(series: &TimeSeries<V>, desired: TimeScale, unit: Option<&str>) -> TimeSeries<V> {
    let mut metadata = series.metadata().clone();
    metadata.time_scale = Some(desired);
    if let Some(u) = unit {
        metadata.unit = u.to_string();
    }
    series.clone().with_metadata(metadata)
}

fn rescaled_metadata<V>(
    series: &TimeSeries<V>,
    desired: TimeScale,
    unit: Option<&str>,
) -> TimeSeriesMetadata {
    let mut metadata = series.metadata().clone();
    metadata.time_scale = Some(desired);
    if let Some(u) = unit {
        metadata.unit = u.to_string();
    }
    if metadata.reference_times.is_empty()
        && let Some(first) = series.first()
    {
        metadata
            .reference_times
            .insert(ReferenceTimeType::Unknown, first.valid_time());
    }
    metadata
}

fn failure(
    metadata: &TimeSeriesMetadata,
    desired: TimeScale,
    events: Vec<ScaleValidationEvent>,
) -> EvalignError {
    let errors: Vec<&str> = events
        .iter()
        .filter(|e| e.is_error())
        .map(|e| e.message.as_str())
        .collect();
    let existing = metadata
        .time_scale
        .map_or_else(|| "(none)".to_string(), |s| s.to_string());
    let message = format!(
        "Encountered {} errors while attempting to upscale time-series {} at {} from {existing} to {desired}: {}",
        errors.len(),
        metadata.variable_name,
        metadata.feature_name,
        errors.join(" "),
    );
    EvalignError::rescaling(message, events)
}
