use chrono::TimeDelta;
use evalign::{
    Evalign, EvalignConfig, EvalignError, MonthDay, PoolingDeclaration, TimePools, TimeScale,
    TimeScaleFunction, TimeWindow,
};

use crate::helpers::{lead_pools, six_hour_mean};

#[test]
fn default_pipeline_has_one_unbounded_window() {
    let evalign = Evalign::builder().build().unwrap();
    let windows = evalign.time_windows().unwrap();
    assert_eq!(windows.len(), 1);
    assert!(windows.contains(&TimeWindow::unbounded()));
    assert_eq!(evalign.time_zone(), chrono_tz::UTC);
    assert_eq!(evalign.config(), &EvalignConfig::default());
}

#[test]
fn lead_pools_generate_back_to_back_windows() {
    let evalign = Evalign::builder().pooling(lead_pools(24, 6)).build().unwrap();
    let leads: Vec<(TimeDelta, TimeDelta)> = evalign
        .time_windows()
        .unwrap()
        .iter()
        .map(|w| (w.earliest_lead_duration(), w.latest_lead_duration()))
        .collect();
    assert_eq!(
        leads,
        vec![
            (TimeDelta::hours(0), TimeDelta::hours(6)),
            (TimeDelta::hours(6), TimeDelta::hours(12)),
            (TimeDelta::hours(12), TimeDelta::hours(18)),
            (TimeDelta::hours(18), TimeDelta::hours(24)),
        ]
    );
}

#[test]
fn rescale_frequency_requires_desired_scale() {
    let err = Evalign::builder()
        .rescale_frequency(TimeDelta::hours(6))
        .build()
        .unwrap_err();
    assert!(matches!(err, EvalignError::InvalidArg(_)), "{err}");
}

#[test]
fn rescale_frequency_must_be_positive() {
    let err = Evalign::builder()
        .desired_time_scale(six_hour_mean())
        .rescale_frequency(TimeDelta::zero())
        .build()
        .unwrap_err();
    assert!(matches!(err, EvalignError::InvalidArg(_)), "{err}");
}

#[test]
fn seasonal_desired_scale_is_rejected() {
    let seasonal = TimeScale::seasonal(
        None,
        TimeScaleFunction::Mean,
        Some(MonthDay::new(4, 1).unwrap()),
        Some(MonthDay::new(7, 31).unwrap()),
    )
    .unwrap();
    let err = Evalign::builder()
        .desired_time_scale(seasonal)
        .build()
        .unwrap_err();
    assert!(matches!(err, EvalignError::InvalidArg(_)), "{err}");
}

#[test]
fn incomplete_pooling_fails_at_build() {
    let err = Evalign::builder()
        .pooling(PoolingDeclaration {
            valid_date_pools: Some(TimePools::new(TimeDelta::days(1))),
            ..PoolingDeclaration::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, EvalignError::MissingConfiguration(_)), "{err}");
}

#[test]
fn whole_config_can_be_replaced() {
    let cfg = EvalignConfig {
        pooling: lead_pools(12, 3),
        desired_time_scale: Some(six_hour_mean()),
        ..EvalignConfig::default()
    };
    let evalign = Evalign::builder()
        .config(cfg.clone())
        .time_zone(chrono_tz::America::Denver)
        .build()
        .unwrap();
    assert_eq!(evalign.config(), &cfg);
    assert_eq!(evalign.time_zone(), chrono_tz::America::Denver);
    assert_eq!(evalign.time_windows().unwrap().len(), 4);
}
