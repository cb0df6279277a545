use std::collections::BTreeSet;

use evalign_core::timeseries::slice;
use evalign_core::window::{adjust_for_time_scale, union};
use evalign_core::{
    EvalignError, Pair, Pool, TimeSeries, TimeSeriesCrossPairer, TimeSeriesUpscaler, TimeWindow,
    Upscaler, time_windows,
};

use crate::Evalign;
use crate::pipeline::PoolReport;

impl Evalign {
    /// Time windows generated from the pooling declaration, in window order.
    ///
    /// # Errors
    /// Returns the window generation error when the declaration is incomplete
    /// or inconsistent.
    pub fn time_windows(&self) -> Result<BTreeSet<TimeWindow>, EvalignError> {
        time_windows(&self.cfg.pooling)
    }

    /// Build one pool per time window from observed `left` and forecast `right` series.
    ///
    /// Sources are first narrowed to the union of all windows, widened by the
    /// desired period when rescaling so that every rescaled value keeps its
    /// constituents. Main and optional baseline sources are then paired with
    /// `left`, cross-paired when configured, and sliced into each window.
    /// The climatological sample holds every finite `left` value in season.
    ///
    /// # Errors
    /// - Returns the window generation error for an invalid pooling declaration.
    /// - Returns `Rescaling` or `Pairing` when a source cannot be rescaled or paired.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign::pipeline::pools",
            skip(self, left, right, baseline),
            fields(
                feature = %left.metadata().feature_name,
                sources = right.len(),
                baseline = baseline.is_some(),
            ),
            err,
        )
    )]
    pub fn pools<R>(
        &self,
        left: &TimeSeries<f64>,
        right: &[TimeSeries<R>],
        baseline: Option<&[TimeSeries<R>]>,
    ) -> Result<Vec<PoolReport<f64, R>>, EvalignError>
    where
        R: Clone + 'static,
        Upscaler: TimeSeriesUpscaler<f64> + TimeSeriesUpscaler<R>,
    {
        let windows = self.time_windows()?;
        let mut selection = union(&windows)?;
        if let Some(scale) = self.cfg.desired_time_scale {
            selection = adjust_for_time_scale(&selection, scale)?;
        }
        let narrow = |sources: &[TimeSeries<R>]| -> Vec<TimeSeries<R>> {
            sources
                .iter()
                .map(|s| slice::filter(s, &selection))
                .filter(|s| !s.is_empty())
                .collect()
        };

        let main = self.pair_sources(left, &narrow(right))?;
        let mut events = main.events;
        let mut main_pairs = main.pairs;
        let mut baseline_pairs = match baseline {
            Some(b) => {
                let paired = self.pair_sources(left, &narrow(b))?;
                events.extend(paired.events);
                Some(paired.pairs)
            }
            None => None,
        };

        if let Some(mode) = self.cfg.cross_pair
            && let Some(base) = baseline_pairs.as_ref()
        {
            let crossed = TimeSeriesCrossPairer::new(mode).apply(&main_pairs, base)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                matched = crossed.len(),
                main = main_pairs.len(),
                baseline = base.len(),
                "cross-paired main and baseline"
            );
            main_pairs = crossed.main;
            baseline_pairs = Some(crossed.baseline);
        }

        let climatology: Vec<f64> = self
            .in_season(left)
            .events()
            .map(|e| *e.value())
            .filter(|v| v.is_finite())
            .collect();

        let reports = windows
            .into_iter()
            .map(|window| {
                let pool = Pool {
                    main: within(&main_pairs, &window),
                    baseline: baseline_pairs.as_deref().map(|b| within(b, &window)),
                    climatology: Some(climatology.clone()),
                    window: Some(window),
                };
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    window = %window,
                    main_events = pool.main_event_count(),
                    "built pool"
                );
                PoolReport {
                    window,
                    pool,
                    events: events.clone(),
                }
            })
            .collect();
        Ok(reports)
    }
}

fn within<L: Clone, R: Clone>(
    series: &[TimeSeries<Pair<L, R>>],
    window: &TimeWindow,
) -> Vec<TimeSeries<Pair<L, R>>> {
    series
        .iter()
        .map(|s| slice::filter(s, window))
        .filter(|s| !s.is_empty())
        .collect()
}
