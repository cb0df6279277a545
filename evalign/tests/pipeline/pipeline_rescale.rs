use chrono::TimeDelta;
use evalign::{Evalign, EvalignError, TimeScale, TimeScaleFunction, ValidationSeverity};

use crate::helpers::{at, observed, six_hour_mean};

#[test]
fn no_desired_scale_returns_the_series_unchanged() {
    let obs = observed();
    let rescaled = Evalign::builder().build().unwrap().rescale(&obs).unwrap();
    assert_eq!(rescaled.series, obs);
    assert!(rescaled.events.is_empty());
}

#[test]
fn hourly_means_become_six_hour_means() {
    let evalign = Evalign::builder()
        .desired_time_scale(six_hour_mean())
        .build()
        .unwrap();
    let rescaled = evalign.rescale(&observed()).unwrap();

    assert_eq!(rescaled.series.time_scale(), Some(six_hour_mean()));
    // 73 hourly values from hour 0: windows end at 5, 11, ..., 77.
    assert_eq!(rescaled.series.len(), 12);
    let first = rescaled.series.first().unwrap();
    assert_eq!(first.valid_time(), at(5));
    assert!((first.value() - 105.0).abs() < 1e-9);
    assert_eq!(rescaled.series.last().unwrap().valid_time(), at(71));

    assert!(!rescaled.events.iter().any(|e| e.is_error()));
    // The window ending at 77 holds only hour 72 and is skipped.
    let skipped: Vec<_> = rescaled
        .events
        .iter()
        .filter(|e| e.severity == ValidationSeverity::Debug)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].message.contains("too few"));
}

#[test]
fn downscaling_fails_with_the_validation_log() {
    let half_hour = TimeScale::new(TimeDelta::minutes(30), TimeScaleFunction::Mean).unwrap();
    let evalign = Evalign::builder()
        .desired_time_scale(half_hour)
        .build()
        .unwrap();
    let err = evalign.rescale(&observed()).unwrap_err();
    assert!(matches!(err, EvalignError::Rescaling { .. }), "{err}");
    assert!(err.validation_events().iter().any(|e| e.is_error()));
}
