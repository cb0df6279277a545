//! Recurring month-day seasons.
//!
//! Calendar arithmetic runs in a caller-supplied time zone; `chrono_tz::UTC`
//! reproduces plain UTC behavior. Season intervals are lower-exclusive: the
//! start is one nanosecond before the first day begins, so events at local
//! midnight on the first day are inside.

use std::collections::BTreeSet;

use chrono::offset::LocalResult;
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use evalign_types::{EvalignError, MonthDay, Season, TimeScale};

use crate::model::TimeSeries;
use crate::timeseries::util::{saturating_add, saturating_sub};

/// Season interval `(start, end]` enclosing `instant`.
///
/// When both bookends are present and the season wraps the calendar year, the
/// enclosing year is chosen from the month-day of `instant`. With one bookend
/// the other end is derived from `period`.
///
/// # Errors
/// Returns `InvalidArg` when neither bookend is present, or when one bookend is
/// present without a period.
pub fn interval_from_month_days(
    instant: DateTime<Utc>,
    start: Option<MonthDay>,
    end: Option<MonthDay>,
    period: Option<TimeDelta>,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), EvalignError> {
    let local = instant.with_timezone(&tz).date_naive();
    let year = local.year();
    let here = MonthDay::of(local);

    match (start, end, period) {
        (Some(s), Some(e), _) => {
            let (mut start_year, mut end_year) = (year, year);
            if s > e {
                if here >= s {
                    end_year = year + 1;
                } else {
                    start_year = year - 1;
                }
            }
            Ok((
                season_start(s, start_year, tz)?,
                season_end(e, end_year, tz)?,
            ))
        }
        (Some(s), None, Some(p)) => {
            let start_year = if here >= s { year } else { year - 1 };
            let lower = season_start(s, start_year, tz)?;
            Ok((lower, saturating_add(lower, p)))
        }
        (None, Some(e), Some(p)) => {
            let end_year = if here <= e { year } else { year + 1 };
            let upper = season_end(e, end_year, tz)?;
            Ok((saturating_sub(upper, p), upper))
        }
        (None, None, _) => Err(EvalignError::invalid_arg(
            "a season needs at least one month-day bookend",
        )),
        _ => Err(EvalignError::invalid_arg(
            "a season with one month-day bookend needs a period",
        )),
    }
}

/// Distinct season intervals enclosing the valid times of `series`.
///
/// # Errors
/// Returns `InvalidArg` when `scale` has no month-day bookends.
pub fn intervals_from_time_scale_with_month_days<V>(
    scale: TimeScale,
    series: &TimeSeries<V>,
    tz: Tz,
) -> Result<BTreeSet<(DateTime<Utc>, DateTime<Utc>)>, EvalignError> {
    if !scale.has_month_days() {
        return Err(EvalignError::invalid_arg(format!(
            "time scale {scale} has no month-day bookends"
        )));
    }
    series
        .valid_times()
        .map(|t| {
            interval_from_month_days(t, scale.start_day(), scale.end_day(), scale.period(), tz)
        })
        .collect()
}

/// Whether a month-day lies within `[start, end]`, wrapping the year when `start > end`.
#[must_use]
pub fn month_day_in_season(md: MonthDay, start: MonthDay, end: MonthDay) -> bool {
    if start <= end {
        start <= md && md <= end
    } else {
        md >= start || md <= end
    }
}

/// Keep the events whose local valid date falls within the season.
#[must_use]
pub fn valid_time_season_filter<V: Clone>(
    series: &TimeSeries<V>,
    season: &Season,
    tz: Tz,
) -> TimeSeries<V> {
    series.clone().retain(|e| {
        let md = MonthDay::of(e.valid_time().with_timezone(&tz).date_naive());
        month_day_in_season(md, season.start, season.end)
    })
}

/// Keep the series when every reference time falls within the season; otherwise empty it.
#[must_use]
pub fn reference_time_season_filter<V: Clone>(
    series: &TimeSeries<V>,
    season: &Season,
    tz: Tz,
) -> TimeSeries<V> {
    let inside = series.reference_times().values().all(|t| {
        let md = MonthDay::of(t.with_timezone(&tz).date_naive());
        month_day_in_season(md, season.start, season.end)
    });
    if inside {
        series.clone()
    } else {
        TimeSeries::empty(series.metadata().clone())
    }
}

/// Apply a season to valid or reference times as configured.
#[must_use]
pub fn season_filter<V: Clone>(series: &TimeSeries<V>, season: &Season, tz: Tz) -> TimeSeries<V> {
    if season.on_reference_times {
        reference_time_season_filter(series, season, tz)
    } else {
        valid_time_season_filter(series, season, tz)
    }
}

fn season_start(md: MonthDay, year: i32, tz: Tz) -> Result<DateTime<Utc>, EvalignError> {
    let day = place(md, year)?;
    Ok(saturating_sub(start_of_day(day, tz), TimeDelta::nanoseconds(1)))
}

fn season_end(md: MonthDay, year: i32, tz: Tz) -> Result<DateTime<Utc>, EvalignError> {
    let day = place(md, year)?;
    let next = day
        .succ_opt()
        .ok_or_else(|| EvalignError::invalid_arg(format!("no day follows {day}")))?;
    Ok(saturating_sub(start_of_day(next, tz), TimeDelta::nanoseconds(1)))
}

fn place(md: MonthDay, year: i32) -> Result<NaiveDate, EvalignError> {
    md.at_year(year)
        .ok_or_else(|| EvalignError::invalid_arg(format!("{md} cannot be placed in year {year}")))
}

/// First instant of `date` in `tz`, resolving DST gaps and folds.
fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST transition: the day starts an hour later.
        LocalResult::None => match tz.from_local_datetime(&(midnight + TimeDelta::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => midnight.and_utc(),
        },
    }
}
