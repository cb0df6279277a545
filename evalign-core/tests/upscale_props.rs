use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_core::{
    Event, TimeScale, TimeScaleFunction, TimeSeries, TimeSeriesMetadata, TimeSeriesUpscaler,
    Upscaler,
};
use proptest::prelude::*;

fn t(h: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(h * 3600, 0).unwrap()
}

fn hourly(function: TimeScaleFunction, values: &[i32]) -> TimeSeries<f64> {
    TimeSeries::new(
        TimeSeriesMetadata::default().with_time_scale(Some(
            TimeScale::new(TimeDelta::hours(1), function).unwrap(),
        )),
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Event::new(t(i as i64 + 1), f64::from(*v))),
    )
    .unwrap()
}

fn upscale(series: &TimeSeries<f64>, hours: i64, function: TimeScaleFunction) -> TimeSeries<f64> {
    let desired = TimeScale::new(TimeDelta::hours(hours), function).unwrap();
    Upscaler
        .upscale(series, desired, &BTreeSet::new(), None)
        .unwrap()
        .series
}

proptest! {
    #[test]
    fn totals_preserve_the_sum(values in proptest::collection::vec(-1000i32..1000, 1..40), k in 2i64..6) {
        let n = values.len() as i64;
        let whole = (n / k) * k;
        prop_assume!(whole >= k);
        let values = &values[..usize::try_from(whole).unwrap()];

        let series = hourly(TimeScaleFunction::Total, values);
        let out = upscale(&series, k, TimeScaleFunction::Total);

        prop_assert_eq!(out.len() as i64, whole / k);
        let input: f64 = values.iter().map(|v| f64::from(*v)).sum();
        let output: f64 = out.events().map(|e| *e.value()).sum();
        prop_assert!((input - output).abs() < 1e-6);
    }

    #[test]
    fn output_times_are_window_ends(values in proptest::collection::vec(0i32..100, 2..40), k in 2i64..6) {
        let series = hourly(TimeScaleFunction::Mean, &values);
        let out = upscale(&series, k, TimeScaleFunction::Mean);
        for e in out.events() {
            let hours = e.valid_time().timestamp() / 3600;
            prop_assert_eq!(hours % k, 0);
        }
    }

    #[test]
    fn maximum_bounds_minimum(values in proptest::collection::vec(-50i32..50, 2..40), k in 2i64..6) {
        let max = upscale(&hourly(TimeScaleFunction::Maximum, &values), k, TimeScaleFunction::Maximum);
        let min = upscale(&hourly(TimeScaleFunction::Minimum, &values), k, TimeScaleFunction::Minimum);
        prop_assert_eq!(max.len(), min.len());
        for (a, b) in max.events().zip(min.events()) {
            prop_assert_eq!(a.valid_time(), b.valid_time());
            prop_assert!(a.value() >= b.value());
        }
    }
}
