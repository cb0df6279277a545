use evalign::{Evalign, MonthDay, Season};

use crate::helpers::{forecasts, lead_pools, observed};

fn second_of_january(on_reference_times: bool) -> Season {
    let day = MonthDay::new(1, 2).unwrap();
    Season {
        start: day,
        end: day,
        on_reference_times,
    }
}

#[test]
fn valid_time_season_keeps_events_on_the_day() {
    let evalign = Evalign::builder()
        .season(second_of_january(false))
        .build()
        .unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();

    // Hours 24..=47 of each issue: 1 + 13 + 23 + 11.
    let counts: Vec<usize> = paired.pairs.iter().map(|p| p.len()).collect();
    assert_eq!(counts, vec![1, 13, 23, 11]);
}

#[test]
fn season_follows_the_time_zone() {
    let evalign = Evalign::builder()
        .season(second_of_january(false))
        .time_zone(chrono_tz::America::Denver)
        .build()
        .unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();

    // Local January 2nd is UTC hours 31..=54.
    let counts: Vec<usize> = paired.pairs.iter().map(|p| p.len()).collect();
    assert_eq!(counts, vec![0, 6, 18, 18]);
}

#[test]
fn reference_time_season_keeps_whole_forecasts() {
    let evalign = Evalign::builder()
        .season(second_of_january(true))
        .build()
        .unwrap();
    let paired = evalign.pair_sources(&observed(), &forecasts()).unwrap();

    let counts: Vec<usize> = paired.pairs.iter().map(|p| p.len()).collect();
    assert_eq!(counts, vec![0, 0, 24, 24]);
}

#[test]
fn season_narrows_climatology() {
    let evalign = Evalign::builder()
        .pooling(lead_pools(24, 24))
        .season(second_of_january(false))
        .build()
        .unwrap();
    let reports = evalign.pools(&observed(), &forecasts(), None).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].pool.climatology.as_ref().map(Vec::len), Some(24));
    // The issue with a single in-season event keeps it; empty series are dropped.
    assert_eq!(reports[0].pool.main_event_count(), 48);
}
