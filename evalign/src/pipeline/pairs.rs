use evalign_core::timeseries::season::season_filter;
use evalign_core::{
    EvalignError, ExactTimePairer, TimeSeries, TimeSeriesPairer, TimeSeriesUpscaler, TimeWindow,
    Upscaler, regular_sequence_of_intersecting_times,
};

use crate::Evalign;
use crate::pipeline::PairedSources;

impl Evalign {
    /// Pair `left` with every series in `right` that describes the same feature.
    ///
    /// With a desired time scale both sides are rescaled at the regular
    /// sequence of valid times they share before pairing; a source sharing no
    /// valid time with `left` is skipped. A configured season is applied to
    /// both sides first.
    ///
    /// # Errors
    /// - Returns `Rescaling` when either side cannot be rescaled.
    /// - Returns `Pairing` when the exact pairing strategy meets different time scales.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign::pipeline::pair_sources",
            skip(self, left, right),
            fields(feature = %left.metadata().feature_name, sources = right.len()),
            err,
        )
    )]
    pub fn pair_sources<L, R>(
        &self,
        left: &TimeSeries<L>,
        right: &[TimeSeries<R>],
    ) -> Result<PairedSources<L, R>, EvalignError>
    where
        L: Clone + 'static,
        R: Clone + 'static,
        Upscaler: TimeSeriesUpscaler<L> + TimeSeriesUpscaler<R>,
    {
        let pairer = ExactTimePairer::<L, R>::new(self.cfg.pairing);
        let left = self.in_season(left);
        let mut out = PairedSources {
            pairs: Vec::new(),
            events: Vec::new(),
        };

        for source in right {
            if !same_feature(&left, source) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    source_feature = %source.metadata().feature_name,
                    "skipping source for a different feature"
                );
                continue;
            }
            let source = self.in_season(source);

            let (l, r) = if self.cfg.desired_time_scale.is_some() {
                let ends = regular_sequence_of_intersecting_times(
                    &left,
                    &source,
                    &TimeWindow::unbounded(),
                    self.cfg.desired_time_scale,
                    self.cfg.rescale_frequency,
                );
                if ends.is_empty() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("no shared valid times to rescale at; skipping source");
                    continue;
                }
                let l = self.rescale_at(&left, &ends)?;
                let r = self.rescale_at(&source, &ends)?;
                out.events.extend(l.events);
                out.events.extend(r.events);
                (l.series, r.series)
            } else {
                (left.clone(), source)
            };

            out.pairs.push(pairer.pair(&l, &r)?);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            paired_series = out.pairs.len(),
            paired_events = out.event_count(),
            "paired sources"
        );
        Ok(out)
    }

    pub(crate) fn in_season<V: Clone>(&self, series: &TimeSeries<V>) -> TimeSeries<V> {
        match &self.cfg.season {
            Some(season) => season_filter(series, season, self.tz),
            None => series.clone(),
        }
    }
}

fn same_feature<L, R>(left: &TimeSeries<L>, right: &TimeSeries<R>) -> bool {
    let (a, b) = (
        &left.metadata().feature_name,
        &right.metadata().feature_name,
    );
    a.is_empty() || b.is_empty() || a == b
}
