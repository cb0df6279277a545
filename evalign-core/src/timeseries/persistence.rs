//! Persistence baselines generated from a source of observations.
//!
//! A persistence forecast holds the value observed `lag` events before it was
//! issued. Templates with a reference time receive one value for every valid
//! time, taken before the first reference time. Templates without reference
//! times are persisted per valid time. When the template and source time scales
//! differ, the source is upscaled to the template scale before values are taken.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use evalign_types::EvalignError;

use crate::model::{Event, TimeSeries};
use crate::timeseries::merge::consolidate;
use crate::timeseries::upscale::{TimeSeriesUpscaler, Upscaler};

type Admissible<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Generates persistence series shaped like a template series.
pub struct PersistenceGenerator<V> {
    lag: usize,
    source: TimeSeries<V>,
    admissible: Admissible<V>,
}

impl<V: Clone + 'static> PersistenceGenerator<V> {
    /// Generator over the consolidated `sources`, persisting the value `lag` events back.
    ///
    /// # Errors
    /// - Returns `InvalidArg` when `lag` is zero or the sources hold fewer than `lag` events.
    /// - Propagates the `consolidate` error when `sources` is empty or the metadata differs.
    pub fn new(sources: &[TimeSeries<V>], lag: usize) -> Result<Self, EvalignError> {
        if lag == 0 {
            return Err(EvalignError::invalid_arg(
                "a positive lag is required to generate persistence",
            ));
        }
        let source = consolidate(sources)?;
        if source.len() < lag {
            return Err(EvalignError::invalid_arg(format!(
                "a persistence lag of {lag} needs at least {lag} source values, found {}",
                source.len()
            )));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(lag, events = source.len(), "created persistence generator");
        Ok(Self {
            lag,
            source,
            admissible: Box::new(|_: &V| true),
        })
    }

    /// Only persist values accepted by `f`.
    #[must_use]
    pub fn with_admissibility(mut self, f: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.admissible = Box::new(f);
        self
    }
}

impl<V> PersistenceGenerator<V> {
    /// Number of source events between a persisted value and its forecast time.
    #[must_use]
    pub const fn lag(&self) -> usize {
        self.lag
    }

    /// The consolidated source series.
    #[must_use]
    pub const fn source(&self) -> &TimeSeries<V> {
        &self.source
    }

    /// The `lag`-th source event strictly before `time`.
    fn lagged(&self, time: DateTime<Utc>) -> Option<&Event<V>> {
        self.source.events_in(..time).nth_back(self.lag - 1)
    }
}

impl<V: Clone> PersistenceGenerator<V>
where
    Upscaler: TimeSeriesUpscaler<V>,
{
    /// Persistence series with the metadata and valid times of `template`.
    ///
    /// Valid times without an admissible lagged value are left out. An empty
    /// template is returned as is.
    ///
    /// # Errors
    /// Returns `Rescaling` when the source cannot be upscaled to the template time scale.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "evalign_core::persistence::apply",
            skip(self, template),
            fields(events = template.len(), lag = self.lag),
            err,
        )
    )]
    pub fn apply(&self, template: &TimeSeries<V>) -> Result<TimeSeries<V>, EvalignError> {
        if template.is_empty() {
            return Ok(template.clone());
        }
        match template.reference_times().values().next() {
            Some(&issued) => self.for_reference_time(template, issued),
            None => self.for_valid_times(template),
        }
    }

    /// Persistence series for each template, in order.
    ///
    /// # Errors
    /// Returns the first error raised by [`Self::apply`].
    pub fn apply_all(&self, templates: &[TimeSeries<V>]) -> Result<Vec<TimeSeries<V>>, EvalignError> {
        templates.iter().map(|t| self.apply(t)).collect()
    }

    fn for_reference_time(
        &self,
        template: &TimeSeries<V>,
        issued: DateTime<Utc>,
    ) -> Result<TimeSeries<V>, EvalignError> {
        let empty = || TimeSeries::empty(template.metadata().clone());
        let Some(lagged) = self.lagged(issued) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(%issued, "no source value before the reference time");
            return Ok(empty());
        };

        let value = if self.needs_upscaling(template) {
            let ends = BTreeSet::from([lagged.valid_time()]);
            self.upscaled(template, &ends)?
                .get(lagged.valid_time())
                .map(|e| e.value().clone())
        } else {
            Some(lagged.value().clone())
        };

        match value {
            Some(v) if (self.admissible)(&v) => {
                let mut builder = TimeSeries::builder().metadata(template.metadata().clone());
                for e in template.events() {
                    builder.push(Event::with_reference_time(
                        e.reference_time(),
                        e.valid_time(),
                        v.clone(),
                    ));
                }
                builder.build()
            }
            _ => Ok(empty()),
        }
    }

    fn for_valid_times(&self, template: &TimeSeries<V>) -> Result<TimeSeries<V>, EvalignError> {
        let lagged: Vec<(DateTime<Utc>, &Event<V>)> = template
            .valid_times()
            .filter_map(|t| self.lagged(t).map(|e| (t, e)))
            .collect();

        let upscaled = if self.needs_upscaling(template) {
            let ends = lagged.iter().map(|(_, e)| e.valid_time()).collect();
            Some(self.upscaled(template, &ends)?)
        } else {
            None
        };

        let mut builder = TimeSeries::builder().metadata(template.metadata().clone());
        for (valid, event) in lagged {
            let value = match &upscaled {
                Some(series) => series.get(event.valid_time()).map(Event::value),
                None => Some(event.value()),
            };
            if let Some(v) = value.filter(|v| (self.admissible)(*v)) {
                builder.push(Event::new(valid, v.clone()));
            }
        }
        builder.build()
    }

    fn needs_upscaling(&self, template: &TimeSeries<V>) -> bool {
        matches!(
            (template.time_scale(), self.source.time_scale()),
            (Some(desired), Some(existing)) if desired != existing
        )
    }

    fn upscaled(
        &self,
        template: &TimeSeries<V>,
        ends: &BTreeSet<DateTime<Utc>>,
    ) -> Result<TimeSeries<V>, EvalignError> {
        let Some(desired) = template.time_scale() else {
            return Ok(self.source.clone());
        };
        Ok(Upscaler.upscale(&self.source, desired, ends, None)?.series)
    }
}

impl<V> fmt::Debug for PersistenceGenerator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceGenerator")
            .field("lag", &self.lag)
            .field("events", &self.source.len())
            .finish_non_exhaustive()
    }
}
