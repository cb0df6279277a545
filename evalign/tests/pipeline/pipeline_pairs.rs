use chrono::{DateTime, TimeDelta, Utc};
use evalign::{Evalign, EvalignError, PairingStrategy, ReferenceTimeType};
use evalign_mock::MockSource;

use crate::helpers::{at, forecasts, observed, six_hour_mean};

#[test]
fn pairs_every_forecast_at_native_scale() {
    let evalign = Evalign::builder().build().unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();

    assert_eq!(paired.pairs.len(), 4);
    assert!(paired.pairs.iter().all(|p| p.len() == 24));
    assert_eq!(paired.event_count(), 96);
    assert!(paired.events.is_empty());

    let first = paired.pairs[0].first().unwrap();
    assert_eq!(first.valid_time(), at(1));
    assert_eq!(first.reference_time(), at(0));
    assert!((first.value().left - 102.0).abs() < 1e-9);
    assert!((first.value().right - 102.5).abs() < 1e-9);
    assert_eq!(
        paired.pairs[1].reference_times()[&ReferenceTimeType::T0],
        at(12)
    );
}

#[test]
fn sources_for_other_features_are_skipped() {
    let other = MockSource::new().observations("DOLC2").unwrap();
    let paired = Evalign::builder()
        .build()
        .unwrap()
        .pair_sources(&other, &forecasts())
        .unwrap();
    assert!(paired.pairs.is_empty());
}

#[test]
fn exact_pairing_refuses_mismatched_scales() {
    let mut relabelled = forecasts();
    let mut metadata = relabelled[0].metadata().clone();
    metadata.time_scale = Some(six_hour_mean());
    relabelled[0] = relabelled[0].clone().with_metadata(metadata);

    let err = Evalign::builder()
        .build()
        .unwrap()
        .pair_sources(&observed(), &relabelled)
        .unwrap_err();
    assert!(matches!(err, EvalignError::Pairing(_)), "{err}");

    let paired = Evalign::builder()
        .pairing(PairingStrategy::Crisp)
        .build()
        .unwrap()
        .pair_sources(&observed(), &relabelled)
        .unwrap();
    assert_eq!(paired.event_count(), 96);
}

#[test]
fn rescaled_pairs_end_on_issue_aligned_boundaries() {
    let evalign = Evalign::builder()
        .desired_time_scale(six_hour_mean())
        .build()
        .unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();

    assert_eq!(paired.pairs.len(), 4);
    let ends: Vec<DateTime<Utc>> = paired.pairs[1].valid_times().collect();
    assert_eq!(ends, vec![at(18), at(24), at(30), at(36)]);

    // Leads 1..=6 of the first issue: observed mean 107, forecast bias 0.5 * 3.5.
    let first = paired.pairs[0].first().unwrap();
    assert_eq!(first.valid_time(), at(6));
    assert_eq!(first.reference_time(), at(0));
    assert!((first.value().left - 107.0).abs() < 1e-9);
    assert!((first.value().right - 108.75).abs() < 1e-9);

    assert!(!paired.events.is_empty());
    assert!(!paired.events.iter().any(|e| e.is_error()));
}

#[test]
fn rescale_frequency_thins_the_sequence() {
    let evalign = Evalign::builder()
        .desired_time_scale(six_hour_mean())
        .rescale_frequency(TimeDelta::hours(12))
        .build()
        .unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();
    let ends: Vec<DateTime<Utc>> = paired.pairs[0].valid_times().collect();
    assert_eq!(ends, vec![at(6), at(18)]);
}
