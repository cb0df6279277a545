use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use evalign_core::{EvalignError, RescaledSeries, TimeSeries, TimeSeriesUpscaler, Upscaler};

use crate::Evalign;

impl Evalign {
    /// Rescale `series` to the desired time scale.
    ///
    /// Without a desired time scale the series is returned as-is with no
    /// validation events. Values are formed over back-to-back windows that
    /// cover the series.
    ///
    /// # Errors
    /// Returns `Rescaling` when the change of scale is invalid.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign::pipeline::rescale",
            skip(self, series),
            fields(
                variable = %series.metadata().variable_name,
                feature = %series.metadata().feature_name,
                events = series.len(),
            ),
            err,
        )
    )]
    pub fn rescale<V>(&self, series: &TimeSeries<V>) -> Result<RescaledSeries<V>, EvalignError>
    where
        V: Clone,
        Upscaler: TimeSeriesUpscaler<V>,
    {
        self.rescale_at(series, &BTreeSet::new())
    }

    pub(crate) fn rescale_at<V>(
        &self,
        series: &TimeSeries<V>,
        ends_at: &BTreeSet<DateTime<Utc>>,
    ) -> Result<RescaledSeries<V>, EvalignError>
    where
        V: Clone,
        Upscaler: TimeSeriesUpscaler<V>,
    {
        match self.cfg.desired_time_scale {
            Some(desired) => Upscaler.upscale(series, desired, ends_at, None),
            None => Ok(RescaledSeries {
                series: series.clone(),
                events: Vec::new(),
            }),
        }
    }
}
