use chrono::TimeDelta;
use evalign::{Evalign, MatchMode, PersistenceGenerator};
use proptest::prelude::*;

use crate::helpers::{at, forecasts, lead_pools, observed, persistence, six_hour_mean};

#[test]
fn one_pool_per_lead_window() {
    let evalign = Evalign::builder().pooling(lead_pools(24, 6)).build().unwrap();
    let reports = evalign.pools(&observed(), &forecasts(), None).unwrap();

    assert_eq!(reports.len(), 4);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.pool.window, Some(report.window));
        assert_eq!(report.pool.main.len(), 4);
        assert_eq!(report.pool.main_event_count(), 24);
        assert!(report.pool.baseline.is_none());
        assert_eq!(report.pool.climatology.as_ref().map(Vec::len), Some(73));
        let lo = TimeDelta::hours(6 * i64::try_from(i).unwrap());
        for series in &report.pool.main {
            let issued = series.first().unwrap().reference_time();
            for e in series.events() {
                let lead = e.valid_time() - issued;
                assert!(lead > lo && lead <= lo + TimeDelta::hours(6), "lead {lead}");
            }
        }
    }
}

#[test]
fn rescaled_pools_hold_one_value_per_issue() {
    let evalign = Evalign::builder()
        .pooling(lead_pools(24, 6))
        .desired_time_scale(six_hour_mean())
        .build()
        .unwrap();
    let reports = evalign.pools(&observed(), &forecasts(), None).unwrap();

    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert_eq!(report.pool.main.len(), 4);
        assert_eq!(report.pool.main_event_count(), 4);
        assert!(!report.events.is_empty());
    }
}

#[test]
fn baseline_pools_follow_the_main_pools() {
    let evalign = Evalign::builder()
        .pooling(lead_pools(24, 12))
        .cross_pair(MatchMode::Exact)
        .build()
        .unwrap();
    let baseline = persistence();
    let reports = evalign
        .pools(&observed(), &forecasts(), Some(baseline.as_slice()))
        .unwrap();

    assert_eq!(reports.len(), 2);
    for report in &reports {
        let base = report.pool.baseline.as_ref().unwrap();
        assert_eq!(base.len(), 4);
        assert_eq!(report.pool.main_event_count(), 48);
        for (m, b) in report.pool.main.iter().zip(base) {
            assert_eq!(m.reference_times(), b.reference_times());
            assert_eq!(
                m.valid_times().collect::<Vec<_>>(),
                b.valid_times().collect::<Vec<_>>()
            );
        }
    }
    // Persistence holds the observation at issue time.
    let first = reports[0].pool.baseline.as_ref().unwrap()[0].first().unwrap();
    assert!((first.value().right - 100.0).abs() < 1e-9);
}

#[test]
fn exact_cross_pairing_drops_unmatched_issues() {
    let evalign = Evalign::builder()
        .pooling(lead_pools(24, 24))
        .cross_pair(MatchMode::Exact)
        .build()
        .unwrap();
    let baseline = persistence()[1..].to_vec();
    let reports = evalign
        .pools(&observed(), &forecasts(), Some(baseline.as_slice()))
        .unwrap();

    assert_eq!(reports.len(), 1);
    let pool = &reports[0].pool;
    assert_eq!(pool.main.len(), 3);
    assert_eq!(pool.baseline.as_ref().map(Vec::len), Some(3));
}

#[test]
fn without_cross_pairing_baseline_is_kept_whole() {
    let evalign = Evalign::builder().pooling(lead_pools(24, 24)).build().unwrap();
    let baseline = persistence()[1..].to_vec();
    let reports = evalign
        .pools(&observed(), &forecasts(), Some(baseline.as_slice()))
        .unwrap();
    let pool = &reports[0].pool;
    assert_eq!(pool.main.len(), 4);
    assert_eq!(pool.baseline.as_ref().map(Vec::len), Some(3));
}

#[test]
fn generated_persistence_serves_as_the_baseline() {
    let obs = observed();
    let baseline = PersistenceGenerator::new(std::slice::from_ref(&obs), 1)
        .unwrap()
        .apply_all(&forecasts())
        .unwrap();
    // Nothing is observed before the first issue.
    assert!(baseline[0].is_empty());
    assert_eq!(
        baseline[1].first().unwrap().value(),
        obs.get(at(11)).unwrap().value()
    );

    let evalign = Evalign::builder()
        .pooling(lead_pools(24, 24))
        .cross_pair(MatchMode::Exact)
        .build()
        .unwrap();
    let reports = evalign
        .pools(&obs, &forecasts(), Some(baseline.as_slice()))
        .unwrap();

    assert_eq!(reports.len(), 1);
    let pool = &reports[0].pool;
    assert_eq!(pool.main.len(), 3);
    let base = pool.baseline.as_ref().unwrap();
    assert_eq!(base.len(), 3);
    for series in base {
        let held = series.first().unwrap().value().right;
        assert!(series.events().all(|e| e.value().right == held));
    }
}

proptest! {
    #[test]
    fn lead_pools_partition_paired_events(period in 1i64..=24) {
        let evalign = Evalign::builder().pooling(lead_pools(24, period)).build().unwrap();
        let reports = evalign.pools(&observed(), &forecasts(), None).unwrap();
        let windows = 24 / period;
        prop_assert_eq!(reports.len(), usize::try_from(windows).unwrap());
        let total: usize = reports.iter().map(|r| r.pool.main_event_count()).sum();
        prop_assert_eq!(total, usize::try_from(4 * period * windows).unwrap());
    }
}
