// Shared fixtures so tests can `use crate::helpers::*;`
use chrono::{DateTime, TimeDelta, Utc};
use evalign::{
    LeadTimeInterval, PoolingDeclaration, TimePools, TimeScale, TimeScaleFunction, TimeSeries,
};
use evalign_mock::{MockSource, hour};

/// Feature with hourly observations and forecasts in the mock source.
pub const DRRC2: &str = "DRRC2";

/// Hour `h` after the fixture epoch; panics outside the chrono range.
pub fn at(h: i64) -> DateTime<Utc> {
    hour(h).expect("fixture hour in range")
}

pub fn observed() -> TimeSeries<f64> {
    MockSource::new().observations(DRRC2).unwrap()
}

pub fn forecasts() -> Vec<TimeSeries<f64>> {
    MockSource::new().forecasts(DRRC2).unwrap()
}

pub fn persistence() -> Vec<TimeSeries<f64>> {
    MockSource::new().baseline(DRRC2).unwrap()
}

pub fn six_hour_mean() -> TimeScale {
    TimeScale::new(TimeDelta::hours(6), TimeScaleFunction::Mean).unwrap()
}

/// Lead durations `(0, max]` hours split into pools of `period` hours.
pub fn lead_pools(max: i64, period: i64) -> PoolingDeclaration {
    PoolingDeclaration {
        lead_times: Some(LeadTimeInterval::new(TimeDelta::zero(), TimeDelta::hours(max))),
        lead_time_pools: Some(TimePools::new(TimeDelta::hours(period))),
        ..PoolingDeclaration::default()
    }
}
