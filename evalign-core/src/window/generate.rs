//! Window generation from a pooling declaration.
//!
//! Each of the three axes is expanded independently into a sequence of
//! `(start, start + period]` windows stepped by the frequency, then the axes
//! are combined by Cartesian product. An axis without pools contributes a
//! single window spanning its declared interval.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::window::{EARLIEST_LEAD, EARLIEST_TIME, LATEST_LEAD, LATEST_TIME};
use evalign_types::{
    EvalignError, LeadTimeInterval, PoolingDeclaration, TimeInterval, TimePools, TimeWindow,
};

/// Every time window described by `declaration`.
///
/// With no pools on any axis and no explicit windows the result is the single
/// [`one_big_window`]. Explicit windows are added to the generated ones; when
/// only explicit windows are declared they are the whole result.
///
/// # Errors
/// - Returns `MissingConfiguration` when an axis declares pools without a
///   complete interval.
/// - Returns `InvalidArg` when a period or frequency is negative, or an
///   interval ends before it starts.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "evalign_core::window::time_windows", skip(declaration), err)
)]
pub fn time_windows(declaration: &PoolingDeclaration) -> Result<BTreeSet<TimeWindow>, EvalignError> {
    if declaration.has_no_pools() {
        return Ok(BTreeSet::from([one_big_window(declaration)]));
    }

    let mut windows: BTreeSet<TimeWindow> = declaration.time_pools.iter().copied().collect();
    let axis_pools = declaration.lead_time_pools.is_some()
        || declaration.reference_date_pools.is_some()
        || declaration.valid_date_pools.is_some();
    if !axis_pools {
        return Ok(windows);
    }

    let leads = lead_axis(declaration.lead_times, declaration.lead_time_pools)?;
    let references = time_axis(
        "reference dates",
        declaration.reference_dates,
        declaration.reference_date_pools,
    )?;
    let valids = time_axis(
        "valid dates",
        declaration.valid_dates,
        declaration.valid_date_pools,
    )?;

    for &(lead_lo, lead_hi) in &leads {
        for &(ref_lo, ref_hi) in &references {
            for &(valid_lo, valid_hi) in &valids {
                windows.insert(
                    TimeWindow::builder()
                        .lead_durations(lead_lo, lead_hi)
                        .reference_times(ref_lo, ref_hi)
                        .valid_times(valid_lo, valid_hi)
                        .build()?,
                );
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        windows = windows.len(),
        lead = leads.len(),
        reference = references.len(),
        valid = valids.len(),
        "generated time windows"
    );
    Ok(windows)
}

/// The single window spanning every declared interval; undeclared ends are unbounded.
#[must_use]
pub fn one_big_window(declaration: &PoolingDeclaration) -> TimeWindow {
    let lead = declaration.lead_times.unwrap_or_default();
    let reference = declaration.reference_dates.unwrap_or_default();
    let valid = declaration.valid_dates.unwrap_or_default();
    let window = TimeWindow::builder()
        .lead_durations(
            lead.minimum.unwrap_or(EARLIEST_LEAD),
            lead.maximum.unwrap_or(LATEST_LEAD),
        )
        .reference_times(
            reference.minimum.unwrap_or(EARLIEST_TIME),
            reference.maximum.unwrap_or(LATEST_TIME),
        )
        .valid_times(
            valid.minimum.unwrap_or(EARLIEST_TIME),
            valid.maximum.unwrap_or(LATEST_TIME),
        )
        .build();
    // A reversed interval cannot bound anything; fall back to no bounds at all.
    window.unwrap_or_default()
}

fn lead_axis(
    interval: Option<LeadTimeInterval>,
    pools: Option<TimePools>,
) -> Result<Vec<(TimeDelta, TimeDelta)>, EvalignError> {
    let interval = interval.unwrap_or_default();
    let Some(pools) = pools else {
        return Ok(vec![(
            interval.minimum.unwrap_or(EARLIEST_LEAD),
            interval.maximum.unwrap_or(LATEST_LEAD),
        )]);
    };
    let (Some(min), Some(max)) = (interval.minimum, interval.maximum) else {
        return Err(EvalignError::missing_configuration(
            "lead time pools need lead times with a minimum and a maximum",
        ));
    };
    axis_windows(min, max, pools, |d, p| d.checked_add(&p))
}

fn time_axis(
    name: &str,
    interval: Option<TimeInterval>,
    pools: Option<TimePools>,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, EvalignError> {
    let interval = interval.unwrap_or_default();
    let Some(pools) = pools else {
        return Ok(vec![(
            interval.minimum.unwrap_or(EARLIEST_TIME),
            interval.maximum.unwrap_or(LATEST_TIME),
        )]);
    };
    let (Some(min), Some(max)) = (interval.minimum, interval.maximum) else {
        return Err(EvalignError::missing_configuration(format!(
            "{name} pools need {name} with a minimum and a maximum"
        )));
    };
    axis_windows(min, max, pools, |t, p| t.checked_add_signed(p))
}

/// Windows `(start, start + period]` for `start = min, min + frequency, ...` while the end fits.
fn axis_windows<T, F>(
    min: T,
    max: T,
    pools: TimePools,
    add: F,
) -> Result<Vec<(T, T)>, EvalignError>
where
    T: Copy + Ord + std::fmt::Debug,
    F: Fn(T, TimeDelta) -> Option<T>,
{
    let period = pools.period;
    let frequency = pools.effective_frequency();
    if period < TimeDelta::zero() || frequency < TimeDelta::zero() {
        return Err(EvalignError::invalid_arg(format!(
            "pool period ({period}) and frequency ({frequency}) must not be negative"
        )));
    }
    if max < min {
        return Err(EvalignError::invalid_arg(format!(
            "pool interval ends at {max:?} before it starts at {min:?}"
        )));
    }

    if min == max || period.is_zero() || frequency.is_zero() {
        let upper = add(min, period).map_or(max, |end| end.min(max));
        return Ok(vec![(min, upper)]);
    }

    let mut out = Vec::new();
    let mut start = Some(min);
    while let Some(s) = start
        && let Some(end) = add(s, period)
        && end <= max
    {
        out.push((s, end));
        start = add(s, frequency);
    }
    Ok(out)
}
