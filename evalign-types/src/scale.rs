//! Time scales: the period and function that describe how a value represents
//! an underlying continuous quantity.

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EvalignError;

/// Periods at or below this threshold are treated as instantaneous.
pub const INSTANTANEOUS_THRESHOLD: TimeDelta = TimeDelta::seconds(60);

/// Function applied over the period of a time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum TimeScaleFunction {
    /// Arithmetic mean over the period.
    Mean,
    /// Accumulation over the period.
    Total,
    /// Largest value within the period.
    Maximum,
    /// Smallest value within the period.
    Minimum,
    /// Undocumented; storable but rejected as a rescaling target.
    #[default]
    Unknown,
}

impl fmt::Display for TimeScaleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mean => "MEAN",
            Self::Total => "TOTAL",
            Self::Maximum => "MAXIMUM",
            Self::Minimum => "MINIMUM",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A recurring calendar day, such as the start of a season.
///
/// Serialized in the ISO-8601 `--MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Create a month-day, validating against a leap year so that 29 February is accepted.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the month or day does not exist.
    pub fn new(month: u32, day: u32) -> Result<Self, EvalignError> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(EvalignError::invalid_arg(format!(
                "month-day {month:02}-{day:02} does not exist"
            )));
        }
        Ok(Self { month, day })
    }

    /// Month of the year, 1-based.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Day of the month, 1-based.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// The month-day of a calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Place this month-day in a year; 29 February becomes 28 February outside leap years.
    #[must_use]
    pub fn at_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            if self.month == 2 && self.day == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = EvalignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EvalignError::invalid_arg(format!("expected --MM-DD, got '{s}'"));
        let rest = s.strip_prefix("--").ok_or_else(bad)?;
        let (m, d) = rest.split_once('-').ok_or_else(bad)?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        let day = d.parse::<u32>().map_err(|_| bad())?;
        Self::new(month, day)
    }
}

impl TryFrom<String> for MonthDay {
    type Error = EvalignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

/// Period and function describing a value, optionally bounded to a recurring season.
///
/// Either the period or both month-day bookends are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeScaleRepr", into = "TimeScaleRepr")]
pub struct TimeScale {
    period: Option<TimeDelta>,
    function: TimeScaleFunction,
    start_day: Option<MonthDay>,
    end_day: Option<MonthDay>,
}

impl TimeScale {
    /// Create a time scale from a fixed period and function.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a negative period.
    pub fn new(period: TimeDelta, function: TimeScaleFunction) -> Result<Self, EvalignError> {
        Self::seasonal(Some(period), function, None, None)
    }

    /// Create a time scale that is bounded to a recurring season.
    ///
    /// With both bookends present the period may be omitted; it is then implied
    /// by the season. With one bookend the period is required.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a negative period, when neither a period nor both
    /// bookends are supplied, or when one bookend is supplied without a period.
    pub fn seasonal(
        period: Option<TimeDelta>,
        function: TimeScaleFunction,
        start_day: Option<MonthDay>,
        end_day: Option<MonthDay>,
    ) -> Result<Self, EvalignError> {
        if let Some(p) = period
            && p < TimeDelta::zero()
        {
            return Err(EvalignError::invalid_arg(format!(
                "time scale period must not be negative: {p}"
            )));
        }
        match (period, start_day, end_day) {
            (None, Some(_), Some(_)) | (Some(_), _, _) => Ok(Self {
                period,
                function,
                start_day,
                end_day,
            }),
            (None, None, None) => Err(EvalignError::invalid_arg(
                "a time scale needs a period or both month-day bookends",
            )),
            (None, _, _) => Err(EvalignError::invalid_arg(
                "a time scale with a single month-day bookend needs a period",
            )),
        }
    }

    /// An instantaneous scale with a one-second period and unknown function.
    #[must_use]
    pub const fn instantaneous() -> Self {
        Self {
            period: Some(TimeDelta::seconds(1)),
            function: TimeScaleFunction::Unknown,
            start_day: None,
            end_day: None,
        }
    }

    /// Fixed period, if declared.
    #[must_use]
    pub const fn period(&self) -> Option<TimeDelta> {
        self.period
    }

    /// Function applied over the period.
    #[must_use]
    pub const fn function(&self) -> TimeScaleFunction {
        self.function
    }

    /// Start of the recurring season, if bounded.
    #[must_use]
    pub const fn start_day(&self) -> Option<MonthDay> {
        self.start_day
    }

    /// End of the recurring season, if bounded.
    #[must_use]
    pub const fn end_day(&self) -> Option<MonthDay> {
        self.end_day
    }

    /// Returns true when either month-day bookend is present.
    #[must_use]
    pub const fn has_month_days(&self) -> bool {
        self.start_day.is_some() || self.end_day.is_some()
    }

    /// Returns true when the period is at or below [`INSTANTANEOUS_THRESHOLD`].
    #[must_use]
    pub fn is_instantaneous(&self) -> bool {
        !self.has_month_days() && self.period.is_some_and(|p| p <= INSTANTANEOUS_THRESHOLD)
    }

    /// Same period and bookends with a different function.
    #[must_use]
    pub const fn with_function(mut self, function: TimeScaleFunction) -> Self {
        self.function = function;
        self
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_instantaneous() {
            return f.write_str("[INSTANTANEOUS]");
        }
        f.write_str("[")?;
        if let Some(p) = self.period {
            write!(f, "{p},")?;
        }
        if let Some(s) = self.start_day {
            write!(f, "{s},")?;
        }
        if let Some(e) = self.end_day {
            write!(f, "{e},")?;
        }
        write!(f, "{}]", self.function)
    }
}

#[derive(Serialize, Deserialize)]
struct TimeScaleRepr {
    #[serde(default, with = "crate::serde_millis::option")]
    period_ms: Option<TimeDelta>,
    function: TimeScaleFunction,
    #[serde(default)]
    start_day: Option<MonthDay>,
    #[serde(default)]
    end_day: Option<MonthDay>,
}

impl TryFrom<TimeScaleRepr> for TimeScale {
    type Error = EvalignError;

    fn try_from(r: TimeScaleRepr) -> Result<Self, Self::Error> {
        Self::seasonal(r.period_ms, r.function, r.start_day, r.end_day)
    }
}

impl From<TimeScale> for TimeScaleRepr {
    fn from(s: TimeScale) -> Self {
        Self {
            period_ms: s.period,
            function: s.function,
            start_day: s.start_day,
            end_day: s.end_day,
        }
    }
}
