use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_core::timeseries::upscale::{is_change_of_scale_required, validate_rescaling};
use evalign_core::{
    Ensemble, EvalignError, Event, ExactTimePairer, ReferenceTimeType, ScaleValidationEvent,
    TimeScale, TimeScaleFunction, TimeSeries, TimeSeriesMetadata, TimeSeriesPairer,
    TimeSeriesUpscaler, Upscaler, ValidationSeverity,
};

fn t(h: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(h * 3600, 0).unwrap()
}

fn scale(hours: i64, function: TimeScaleFunction) -> TimeScale {
    TimeScale::new(TimeDelta::hours(hours), function).unwrap()
}

fn hourly(function: TimeScaleFunction, values: &[f64]) -> TimeSeries<f64> {
    TimeSeries::new(
        TimeSeriesMetadata::new("PRECIPITATION", "DRRC2", "MM")
            .with_time_scale(Some(scale(1, function))),
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Event::new(t(i as i64 + 1), *v)),
    )
    .unwrap()
}

fn values(series: &TimeSeries<f64>) -> Vec<(DateTime<Utc>, f64)> {
    series.events().map(|e| (e.valid_time(), *e.value())).collect()
}

#[test]
fn hourly_totals_accumulate_to_two_hourly_totals() {
    let series = hourly(TimeScaleFunction::Total, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let desired = scale(2, TimeScaleFunction::Total);

    let out = Upscaler
        .upscale(&series, desired, &BTreeSet::new(), None)
        .unwrap();

    assert_eq!(values(&out.series), vec![(t(2), 3.0), (t(4), 7.0), (t(6), 11.0)]);
    assert_eq!(out.series.time_scale(), Some(desired));
    assert!(out.events.iter().all(|e| !e.is_error()));
    assert_eq!(
        out.series.reference_times().get(&ReferenceTimeType::Unknown),
        Some(&t(1))
    );
}

#[test]
fn explicit_ends_select_the_windows() {
    let series = hourly(TimeScaleFunction::Mean, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let ends = BTreeSet::from([t(3), t(6)]);

    let out = Upscaler
        .upscale(&series, scale(3, TimeScaleFunction::Mean), &ends, Some("IN"))
        .unwrap();

    assert_eq!(values(&out.series), vec![(t(3), 2.0), (t(6), 5.0)]);
    assert_eq!(out.series.metadata().unit, "IN");
}

#[test]
fn window_without_events_is_omitted() {
    let series = hourly(TimeScaleFunction::Maximum, &[1.0, 9.0]);
    let ends = BTreeSet::from([t(2), t(20)]);
    let out = Upscaler
        .upscale(&series, scale(2, TimeScaleFunction::Maximum), &ends, None)
        .unwrap();
    assert_eq!(values(&out.series), vec![(t(2), 9.0)]);
}

#[test]
fn missing_input_makes_the_aggregate_missing() {
    let series = hourly(TimeScaleFunction::Mean, &[1.0, f64::NAN, 3.0, 4.0]);
    let out = Upscaler
        .upscale(&series, scale(2, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap();
    let v = values(&out.series);
    assert_eq!(v.len(), 2);
    assert!(v[0].1.is_nan());
    assert!((v[1].1 - 3.5).abs() < 1e-12);
}

fn series_at(scale: TimeScale, points: &[(i64, f64)]) -> TimeSeries<f64> {
    TimeSeries::new(
        TimeSeriesMetadata::new("STREAMFLOW", "DRRC2", "CMS").with_time_scale(Some(scale)),
        points.iter().map(|&(h, v)| Event::new(t(h), v)),
    )
    .unwrap()
}

fn debug_count(events: &[ScaleValidationEvent]) -> usize {
    events
        .iter()
        .filter(|e| e.severity == ValidationSeverity::Debug)
        .count()
}

#[test]
fn single_event_window_is_skipped_with_a_debug_event() {
    let series = hourly(TimeScaleFunction::Total, &[1.0, 2.0, 3.0]);
    let ends = BTreeSet::from([t(2), t(4)]);
    let out = Upscaler
        .upscale(&series, scale(2, TimeScaleFunction::Total), &ends, None)
        .unwrap();
    assert_eq!(values(&out.series), vec![(t(2), 3.0)]);
    assert_eq!(debug_count(&out.events), 1);
    assert!(out.events.iter().any(|e| e.message.contains("too few")));
}

#[test]
fn sparse_minute_means_form_one_value_and_one_missing_value() {
    let minute_mean = TimeScale::new(TimeDelta::minutes(1), TimeScaleFunction::Mean).unwrap();
    let series = series_at(
        minute_mean,
        &[(0, 12.0), (1, 15.0), (2, 3.0), (4, 22.0), (5, f64::NAN), (6, 25.0)],
    );
    let ends = BTreeSet::from([t(2), t(4), t(6)]);

    let out = Upscaler
        .upscale(&series, scale(2, TimeScaleFunction::Mean), &ends, None)
        .unwrap();

    // The window ending at 4h holds a single event and yields nothing.
    let v = values(&out.series);
    assert_eq!(v.len(), 2);
    assert_eq!(v[0], (t(2), 9.0));
    assert_eq!(v[1].0, t(6));
    assert!(v[1].1.is_nan());
    assert_eq!(debug_count(&out.events), 1);
}

#[test]
fn unevenly_spaced_window_is_skipped_with_a_debug_event() {
    let series = series_at(
        scale(1, TimeScaleFunction::Mean),
        &[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (7, 7.0), (8, 8.0)],
    );
    let ends = BTreeSet::from([t(4), t(8)]);

    let out = Upscaler
        .upscale(&series, scale(4, TimeScaleFunction::Mean), &ends, None)
        .unwrap();

    assert_eq!(values(&out.series), vec![(t(4), 2.5)]);
    assert!(
        out.events
            .iter()
            .any(|e| e.severity == ValidationSeverity::Debug && e.message.contains("evenly spaced"))
    );
}

#[test]
fn default_ends_match_explicit_back_to_back_ends() {
    let series = series_at(
        scale(1, TimeScaleFunction::Total),
        &[(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0), (4, 5.0), (5, 6.0)],
    );
    let desired = scale(2, TimeScaleFunction::Total);
    let ends = BTreeSet::from([t(1), t(3), t(5)]);

    let explicit = Upscaler.upscale(&series, desired, &ends, None).unwrap();
    let chosen = Upscaler
        .upscale(&series, desired, &BTreeSet::new(), None)
        .unwrap();

    assert_eq!(values(&explicit.series), vec![(t(1), 3.0), (t(3), 7.0), (t(5), 11.0)]);
    assert_eq!(values(&chosen.series), values(&explicit.series));
}

#[test]
fn upscaled_forecasts_pair_with_daily_observations() {
    let issued = t(-6);
    let forecast = TimeSeries::new(
        TimeSeriesMetadata::new("STREAMFLOW", "DRRC2", "CMS")
            .with_reference_time(ReferenceTimeType::T0, issued)
            .with_time_scale(Some(TimeScale::instantaneous())),
        [5.0, 7.0, 11.0, 6.0, 23.0, 9.0, 14.0, 4.0, 8.0, 12.0, 13.0]
            .iter()
            .zip(0i64..)
            .map(|(v, i)| Event::new(t(6 * i), *v)),
    )
    .unwrap();
    let daily_mean = scale(24, TimeScaleFunction::Mean);
    let observed = series_at(
        daily_mean,
        &[(0, 5.0), (12, 27.0), (36, 2.0), (60, 111.0)],
    );
    let ends: BTreeSet<_> = observed.valid_times().collect();

    let out = Upscaler.upscale(&forecast, daily_mean, &ends, None).unwrap();

    // 0h holds one event and 12h starts with a twelve-hour gap.
    assert_eq!(values(&out.series), vec![(t(36), 13.0), (t(60), 9.25)]);
    assert_eq!(debug_count(&out.events), 2);
    assert_eq!(
        out.series.reference_times().get(&ReferenceTimeType::T0),
        Some(&issued)
    );

    let pairs = ExactTimePairer::exact().pair(&observed, &out.series).unwrap();
    let paired: Vec<_> = pairs
        .events()
        .map(|e| (e.valid_time(), e.value().left, e.value().right))
        .collect();
    assert_eq!(paired, vec![(t(36), 2.0, 13.0), (t(60), 111.0, 9.25)]);
}

#[test]
fn eighteen_six_hourly_values_form_a_four_day_maximum() {
    let raw = [
        6.575788, 6.999999, 6.969816, 6.983924, 6.9274936, 6.8008533, 6.6371393, 6.475394,
        6.331365, 6.1879926, 6.031824, 5.874672, 5.725722, 5.57874, 5.424213, 5.284777,
        5.174213, 5.0879264,
    ];
    let points: Vec<(i64, f64)> = raw.iter().zip(0i64..).map(|(v, i)| (6 * i, *v)).collect();
    let series = series_at(TimeScale::instantaneous(), &points);
    let ends = BTreeSet::from([t(102)]);

    let out = Upscaler
        .upscale(&series, scale(96, TimeScaleFunction::Maximum), &ends, None)
        .unwrap();

    // The second value sits on the open lower bound and is excluded.
    assert_eq!(values(&out.series), vec![(t(102), 6.983924)]);
}

#[test]
fn three_hourly_values_form_daily_means_once_a_day_is_covered() {
    let raw = [
        51.409998850896955,
        50.95999886095524,
        50.679998867213726,
        50.789998864755034,
        51.08999885804951,
        51.47999884933233,
        51.96999883837998,
        52.569998824968934,
        53.229998810216784,
        53.83999879658222,
        54.25999878719449,
        54.44999878294766,
        54.49999878183007,
        54.509998781606555,
        54.5999987795949,
        54.829998774454,
    ];
    let points: Vec<(i64, f64)> = raw.iter().zip(0i64..).map(|(v, i)| (3 * i, *v)).collect();
    let series = series_at(TimeScale::instantaneous(), &points);
    let ends: BTreeSet<_> = series.valid_times().collect();

    let out = Upscaler
        .upscale(&series, scale(24, TimeScaleFunction::Mean), &ends, None)
        .unwrap();

    let expected = [
        (21, 51.368748851818964),
        (24, 51.59624884673394),
        (27, 51.956248838687316),
        (30, 52.40374882868491),
        (33, 52.86124881845899),
        (36, 53.28749880893156),
        (39, 53.66624880046584),
        (42, 53.9949987931177),
        (45, 54.277498786803335),
    ];
    let actual = values(&out.series);
    assert_eq!(actual.len(), expected.len());
    for ((time, value), (h, want)) in actual.iter().zip(expected) {
        assert_eq!(*time, t(h));
        assert!((value - want).abs() < 1e-9, "{time}: {value} vs {want}");
    }
    assert_eq!(debug_count(&out.events), 7);
}

#[test]
fn downscaling_fails_with_validation_events() {
    let series = TimeSeries::new(
        TimeSeriesMetadata::default().with_time_scale(Some(scale(6, TimeScaleFunction::Mean))),
        vec![Event::new(t(6), 1.0)],
    )
    .unwrap();

    let err = Upscaler
        .upscale(&series, scale(1, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap_err();

    assert!(matches!(err, EvalignError::Rescaling { .. }));
    assert!(err.error_count() >= 1);
    assert!(
        err.validation_events()
            .iter()
            .any(|e| e.is_error() && e.message.contains("Downscaling"))
    );
    assert!(err.to_string().contains("Encountered"));
}

#[test]
fn rescaling_to_the_existing_scale_is_identity() {
    let series = hourly(TimeScaleFunction::Mean, &[1.0, 2.0, 3.0]);
    let out = Upscaler
        .upscale(&series, scale(1, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap();
    assert_eq!(values(&out.series), values(&series));
    assert_eq!(out.events.len(), 1);
    assert_eq!(out.events[0].severity, ValidationSeverity::Pass);
}

#[test]
fn non_integer_multiple_is_rejected() {
    let series = TimeSeries::new(
        TimeSeriesMetadata::default().with_time_scale(Some(scale(2, TimeScaleFunction::Mean))),
        vec![Event::new(t(2), 1.0)],
    )
    .unwrap();
    let err = Upscaler
        .upscale(&series, scale(3, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap_err();
    assert!(
        err.validation_events()
            .iter()
            .any(|e| e.is_error() && e.message.contains("integer multiple"))
    );
}

#[test]
fn total_from_instantaneous_is_rejected() {
    let events = validate_rescaling(
        TimeScale::instantaneous(),
        scale(1, TimeScaleFunction::Total),
    );
    assert!(events.iter().any(|e| e.is_error()));
}

#[test]
fn unknown_desired_function_is_rejected() {
    let events = validate_rescaling(
        scale(1, TimeScaleFunction::Mean),
        scale(6, TimeScaleFunction::Unknown),
    );
    assert!(events.iter().any(|e| e.is_error()));
}

#[test]
fn missing_existing_scale_passes_only_for_instantaneous_target() {
    let series = TimeSeries::new(TimeSeriesMetadata::default(), vec![Event::new(t(1), 1.0)])
        .unwrap();

    let ok = Upscaler
        .upscale(&series, TimeScale::instantaneous(), &BTreeSet::new(), None)
        .unwrap();
    assert_eq!(ok.series.len(), 1);
    assert_eq!(ok.events[0].severity, ValidationSeverity::Info);

    let err = Upscaler
        .upscale(&series, scale(6, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap_err();
    assert!(matches!(err, EvalignError::Rescaling { .. }));
}

#[test]
fn change_of_scale_detection() {
    let sixty = TimeScale::new(TimeDelta::seconds(60), TimeScaleFunction::Mean).unwrap();
    assert!(!is_change_of_scale_required(TimeScale::instantaneous(), sixty));
    assert!(!is_change_of_scale_required(
        scale(1, TimeScaleFunction::Unknown),
        scale(1, TimeScaleFunction::Mean)
    ));
    assert!(is_change_of_scale_required(
        scale(1, TimeScaleFunction::Mean),
        scale(6, TimeScaleFunction::Mean)
    ));
}

#[test]
fn ensemble_members_are_upscaled_independently() {
    let series = TimeSeries::new(
        TimeSeriesMetadata::default().with_time_scale(Some(scale(1, TimeScaleFunction::Mean))),
        vec![
            Event::new(
                t(1),
                Ensemble::with_labels(vec![1.0, 10.0], vec!["a".into(), "b".into()]).unwrap(),
            ),
            Event::new(
                t(2),
                Ensemble::with_labels(vec![2.0, 20.0], vec!["a".into(), "b".into()]).unwrap(),
            ),
        ],
    )
    .unwrap();

    let out = Upscaler
        .upscale(&series, scale(2, TimeScaleFunction::Mean), &BTreeSet::new(), None)
        .unwrap();

    assert_eq!(out.series.len(), 1);
    let e = out.series.get(t(2)).unwrap();
    assert_eq!(e.value().members(), &[1.5, 15.0]);
    assert_eq!(e.value().member_by_label("b"), Some(15.0));
}

#[test]
fn empty_series_is_relabelled() {
    let series: TimeSeries<f64> = TimeSeries::empty(TimeSeriesMetadata::default());
    let desired = scale(6, TimeScaleFunction::Mean);
    let out = Upscaler
        .upscale(&series, desired, &BTreeSet::new(), None)
        .unwrap();
    assert!(out.series.is_empty());
    assert_eq!(out.series.time_scale(), Some(desired));
}
