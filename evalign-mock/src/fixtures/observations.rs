use chrono::TimeDelta;
use evalign_core::{Event, TimeScale, TimeScaleFunction, TimeSeries, TimeSeriesMetadata};

use super::hour;

const STAGE_CYCLE: [f64; 4] = [4.0, 4.25, 4.5, 4.75];

/// Hourly streamflow at `DRRC2` for three days from the fixture epoch; six-hourly stage at `DOLC2`.
pub fn by_feature(feature: &str) -> Option<TimeSeries<f64>> {
    match feature {
        "DRRC2" => build(
            TimeSeriesMetadata::new("STREAMFLOW", "DRRC2", "CMS"),
            1,
            (0..=72).map(|h| (h, streamflow(h))),
        ),
        "DOLC2" => build(
            TimeSeriesMetadata::new("STAGE", "DOLC2", "FT"),
            6,
            STAGE_CYCLE
                .iter()
                .cycle()
                .zip(0..=12)
                .map(|(v, i)| (i * 6, *v)),
        ),
        _ => None,
    }
}

/// Observed streamflow `hours` after the fixture epoch: a daily cycle from 100 CMS.
pub fn streamflow(hours: i64) -> f64 {
    let phase = i32::try_from(hours.rem_euclid(24)).unwrap_or_default();
    100.0 + f64::from(phase) * 2.0
}

fn build(
    metadata: TimeSeriesMetadata,
    period_hours: i64,
    values: impl Iterator<Item = (i64, f64)>,
) -> Option<TimeSeries<f64>> {
    let scale = TimeScale::new(TimeDelta::hours(period_hours), TimeScaleFunction::Mean).ok()?;
    let events = values
        .map(|(h, v)| Some(Event::new(hour(h)?, v)))
        .collect::<Option<Vec<_>>>()?;
    TimeSeries::new(metadata.with_time_scale(Some(scale)), events).ok()
}
