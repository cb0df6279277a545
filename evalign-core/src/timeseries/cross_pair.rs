//! Cross-pairing of a main pool against a baseline pool.
//!
//! Every main series is matched to at most one baseline series that shares a
//! reference time type. Matching is greedy and without replacement, in main
//! series order. Matched series are then trimmed to their common valid times;
//! a match with no common valid time is dropped.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use evalign_types::{EvalignError, MatchMode, ReferenceTimeType};

use crate::model::{CrossPairs, TimeSeries};

/// Aligns two pools of series onto common reference and valid times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSeriesCrossPairer {
    mode: MatchMode,
}

impl TimeSeriesCrossPairer {
    /// Cross-pairer with the given matching mode.
    #[must_use]
    pub const fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Configured matching mode.
    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Match `baseline` series to `main` series and trim each match to shared valid times.
    ///
    /// When neither pool carries reference times every candidate is equally
    /// near, so series are matched in order.
    ///
    /// # Errors
    /// Returns `Pairing` when both pools are non-empty and the reference time
    /// types of the main pool do not intersect those of the baseline pool.
    pub fn apply<L: Clone, R: Clone>(
        &self,
        main: &[TimeSeries<L>],
        baseline: &[TimeSeries<R>],
    ) -> Result<CrossPairs<L, R>, EvalignError> {
        let mut out = CrossPairs {
            main: Vec::new(),
            baseline: Vec::new(),
        };
        if main.is_empty() || baseline.is_empty() {
            return Ok(out);
        }

        let main_types = reference_time_types(main);
        let baseline_types = reference_time_types(baseline);
        let common: BTreeSet<ReferenceTimeType> =
            main_types.intersection(&baseline_types).copied().collect();
        let no_reference_times = main_types.is_empty() && baseline_types.is_empty();
        if common.is_empty() && !no_reference_times {
            return Err(EvalignError::pairing(format!(
                "no common reference time types: main pool has {main_types:?}, baseline pool has {baseline_types:?}"
            )));
        }

        let mut used = vec![false; baseline.len()];
        for m in main {
            let Some(idx) = self.select(m, baseline, &used, &common, no_reference_times) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    mode = ?self.mode,
                    "no baseline series matched a main series"
                );
                continue;
            };
            used[idx] = true;

            let b = &baseline[idx];
            let baseline_times: BTreeSet<DateTime<Utc>> = b.valid_times().collect();
            let shared: BTreeSet<DateTime<Utc>> = m
                .valid_times()
                .filter(|t| baseline_times.contains(t))
                .collect();
            if shared.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    baseline_index = idx,
                    "dropping cross-pair without common valid times"
                );
                continue;
            }
            out.main
                .push(m.clone().retain(|e| shared.contains(&e.valid_time())));
            out.baseline
                .push(b.clone().retain(|e| shared.contains(&e.valid_time())));
        }

        Ok(out)
    }

    fn select<L, R>(
        &self,
        main: &TimeSeries<L>,
        baseline: &[TimeSeries<R>],
        used: &[bool],
        common: &BTreeSet<ReferenceTimeType>,
        no_reference_times: bool,
    ) -> Option<usize> {
        baseline
            .iter()
            .enumerate()
            .filter(|(i, _)| !used[*i])
            .filter_map(|(i, b)| {
                let distance = if no_reference_times {
                    Some(TimeDelta::zero())
                } else {
                    nearest_distance(main, b, common)
                }?;
                match self.mode {
                    MatchMode::Exact if distance != TimeDelta::zero() => None,
                    _ => Some((distance, i)),
                }
            })
            .min()
            .map(|(_, i)| i)
    }
}

fn reference_time_types<V>(pool: &[TimeSeries<V>]) -> BTreeSet<ReferenceTimeType> {
    pool.iter()
        .flat_map(|s| s.reference_times().keys().copied())
        .collect()
}

/// Smallest absolute gap between reference times of a common type, if the series share one.
fn nearest_distance<L, R>(
    main: &TimeSeries<L>,
    baseline: &TimeSeries<R>,
    common: &BTreeSet<ReferenceTimeType>,
) -> Option<TimeDelta> {
    common
        .iter()
        .filter_map(|kind| {
            let a = main.reference_times().get(kind)?;
            let b = baseline.reference_times().get(kind)?;
            Some((*a - *b).abs())
        })
        .min()
}
