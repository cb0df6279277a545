use chrono::TimeDelta;
use evalign_core::{
    Ensemble, Event, ReferenceTimeType, TimeScale, TimeScaleFunction, TimeSeries,
    TimeSeriesMetadata,
};

use super::hour;
use super::observations::streamflow;

/// Issue times, in hours after the fixture epoch.
const ISSUES: [i64; 4] = [0, 12, 24, 36];
/// Longest lead duration, in hours.
const MAX_LEAD: i64 = 24;
const MEMBERS: [&str; 3] = ["1981", "1982", "1983"];

/// Hourly single-valued forecasts issued every 12 hours; biased high by half a CMS per lead hour.
pub fn by_feature(feature: &str) -> Option<Vec<TimeSeries<f64>>> {
    if feature != "DRRC2" {
        return None;
    }
    ISSUES
        .iter()
        .map(|&issued| {
            forecast(issued, |valid, lead| {
                streamflow(valid) + f64::from(i32::try_from(lead).unwrap_or_default()) * 0.5
            })
        })
        .collect()
}

/// Persistence forecasts: the observation at issue time, held for every lead.
pub fn persistence_by_feature(feature: &str) -> Option<Vec<TimeSeries<f64>>> {
    if feature != "DRRC2" {
        return None;
    }
    ISSUES
        .iter()
        .map(|&issued| forecast(issued, |_, _| streamflow(issued)))
        .collect()
}

/// Three-member labelled ensembles issued once a day.
pub fn ensemble_by_feature(feature: &str) -> Option<Vec<TimeSeries<Ensemble>>> {
    if feature != "DRRC2" {
        return None;
    }
    let labels: Vec<String> = MEMBERS.iter().map(ToString::to_string).collect();
    [0, 24]
        .iter()
        .map(|&issued| {
            let mut builder = TimeSeries::builder().metadata(metadata(issued)?);
            for lead in 1..=MAX_LEAD {
                let valid = issued + lead;
                let members = (0..MEMBERS.len())
                    .map(|m| streamflow(valid) + f64::from(u8::try_from(m).unwrap_or_default()))
                    .collect();
                let ensemble = Ensemble::with_labels(members, labels.clone()).ok()?;
                builder.push(Event::with_reference_time(hour(issued)?, hour(valid)?, ensemble));
            }
            builder.build().ok()
        })
        .collect()
}

fn forecast(issued: i64, value: impl Fn(i64, i64) -> f64) -> Option<TimeSeries<f64>> {
    let reference = hour(issued)?;
    let events = (1..=MAX_LEAD)
        .map(|lead| {
            let valid = issued + lead;
            Some(Event::with_reference_time(reference, hour(valid)?, value(valid, lead)))
        })
        .collect::<Option<Vec<_>>>()?;
    TimeSeries::new(metadata(issued)?, events).ok()
}

fn metadata(issued: i64) -> Option<TimeSeriesMetadata> {
    let scale = TimeScale::new(TimeDelta::hours(1), TimeScaleFunction::Mean).ok()?;
    Some(
        TimeSeriesMetadata::new("STREAMFLOW", "DRRC2", "CMS")
            .with_reference_time(ReferenceTimeType::T0, hour(issued)?)
            .with_time_scale(Some(scale)),
    )
}
