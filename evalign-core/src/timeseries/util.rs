//! Shared helpers for missing values, sentinel-safe arithmetic and ensemble invariants.

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{Ensemble, Event};
use crate::EvalignError;

/// Sentinel for a missing `f64` value.
pub const MISSING: f64 = f64::NAN;

/// Non-finite values are missing.
#[must_use]
pub const fn is_missing(v: f64) -> bool {
    !v.is_finite()
}

/// Add a duration to a time, clamping to the representable range.
#[must_use]
pub fn saturating_add(t: DateTime<Utc>, d: TimeDelta) -> DateTime<Utc> {
    t.checked_add_signed(d).unwrap_or(if d < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Subtract a duration from a time, clamping to the representable range.
#[must_use]
pub fn saturating_sub(t: DateTime<Utc>, d: TimeDelta) -> DateTime<Utc> {
    t.checked_sub_signed(d).unwrap_or(if d < TimeDelta::zero() {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Add two durations, clamping to the representable range.
#[must_use]
pub fn saturating_add_delta(a: TimeDelta, b: TimeDelta) -> TimeDelta {
    a.checked_add(&b).unwrap_or(if b < TimeDelta::zero() {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

/// Subtract two durations, clamping to the representable range.
#[must_use]
pub fn saturating_sub_delta(a: TimeDelta, b: TimeDelta) -> TimeDelta {
    a.checked_sub(&b).unwrap_or(if b < TimeDelta::zero() {
        TimeDelta::MAX
    } else {
        TimeDelta::MIN
    })
}

/// Ensure every ensemble event carries the same number of members.
/// Returns the common member count on success.
///
/// # Errors
/// - Returns `Err(EvalignError::InvalidState)` if two events differ in member count.
/// - Returns `Err(EvalignError::InvalidArg)` if `events` is empty.
pub fn ensure_uniform_member_count<'a, I>(events: I) -> Result<usize, EvalignError>
where
    I: IntoIterator<Item = &'a Event<Ensemble>>,
{
    let mut count: Option<usize> = None;
    for e in events {
        let n = e.value().len();
        match count {
            Some(c) if c != n => {
                return Err(EvalignError::invalid_state(format!(
                    "ensemble member count varies: expected {c} members, found {n} at {}",
                    e.valid_time()
                )));
            }
            Some(_) => {}
            None => count = Some(n),
        }
    }
    count.ok_or_else(|| EvalignError::invalid_arg("no ensemble events to inspect"))
}
