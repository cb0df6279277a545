//! Time series keyed by valid time.
//!
//! A series holds at most one event per valid time, in valid time order, and
//! carries its metadata alongside. Series are built through [`TimeSeriesBuilder`],
//! which rejects duplicate valid times.

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use chrono::{DateTime, Utc};
use evalign_types::{EvalignError, ReferenceTimeType, TimeScale};
use serde::{Deserialize, Serialize};

use super::event::Event;

/// Descriptive metadata shared by every event of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeSeriesMetadata {
    /// Reference times, at most one per kind.
    pub reference_times: BTreeMap<ReferenceTimeType, DateTime<Utc>>,
    /// Time scale of the values, if known.
    pub time_scale: Option<TimeScale>,
    /// Name of the measured or forecast variable.
    pub variable_name: String,
    /// Name of the geographic feature.
    pub feature_name: String,
    /// Measurement unit.
    pub unit: String,
}

impl TimeSeriesMetadata {
    /// Metadata with names and unit; no reference times or time scale.
    pub fn new(
        variable_name: impl Into<String>,
        feature_name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            reference_times: BTreeMap::new(),
            time_scale: None,
            variable_name: variable_name.into(),
            feature_name: feature_name.into(),
            unit: unit.into(),
        }
    }

    /// Add or replace one reference time.
    #[must_use]
    pub fn with_reference_time(mut self, kind: ReferenceTimeType, t: DateTime<Utc>) -> Self {
        self.reference_times.insert(kind, t);
        self
    }

    /// Replace all reference times.
    #[must_use]
    pub fn with_reference_times(mut self, times: BTreeMap<ReferenceTimeType, DateTime<Utc>>) -> Self {
        self.reference_times = times;
        self
    }

    /// Set the time scale.
    #[must_use]
    pub const fn with_time_scale(mut self, scale: Option<TimeScale>) -> Self {
        self.time_scale = scale;
        self
    }

    /// Set the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// An ordered set of events with unique valid times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeries<V> {
    metadata: TimeSeriesMetadata,
    events: BTreeMap<DateTime<Utc>, Event<V>>,
}

impl<V> TimeSeries<V> {
    /// Start building a series.
    #[must_use]
    pub fn builder() -> TimeSeriesBuilder<V> {
        TimeSeriesBuilder::new()
    }

    /// Build a series from metadata and events.
    ///
    /// # Errors
    /// Returns `InvalidState` when two events share a valid time.
    pub fn new(
        metadata: TimeSeriesMetadata,
        events: impl IntoIterator<Item = Event<V>>,
    ) -> Result<Self, EvalignError> {
        TimeSeriesBuilder::new()
            .metadata(metadata)
            .add_events(events)
            .build()
    }

    /// A series without events.
    #[must_use]
    pub const fn empty(metadata: TimeSeriesMetadata) -> Self {
        Self {
            metadata,
            events: BTreeMap::new(),
        }
    }

    /// Series metadata.
    pub const fn metadata(&self) -> &TimeSeriesMetadata {
        &self.metadata
    }

    /// Reference times keyed by kind.
    pub const fn reference_times(&self) -> &BTreeMap<ReferenceTimeType, DateTime<Utc>> {
        &self.metadata.reference_times
    }

    /// Time scale of the values, if known.
    pub const fn time_scale(&self) -> Option<TimeScale> {
        self.metadata.time_scale
    }

    /// Events in valid time order.
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &Event<V>> + ExactSizeIterator {
        self.events.values()
    }

    /// Valid times in order.
    pub fn valid_times(&self) -> impl DoubleEndedIterator<Item = DateTime<Utc>> + '_ {
        self.events.keys().copied()
    }

    /// Events whose valid time falls in `range`.
    pub fn events_in<R>(&self, range: R) -> impl DoubleEndedIterator<Item = &Event<V>>
    where
        R: RangeBounds<DateTime<Utc>>,
    {
        self.events.range(range).map(|(_, e)| e)
    }

    /// The event at a valid time.
    pub fn get(&self, valid_time: DateTime<Utc>) -> Option<&Event<V>> {
        self.events.get(&valid_time)
    }

    /// Earliest event.
    pub fn first(&self) -> Option<&Event<V>> {
        self.events.values().next()
    }

    /// Latest event.
    pub fn last(&self) -> Option<&Event<V>> {
        self.events.values().next_back()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Same events with different metadata.
    #[must_use]
    pub fn with_metadata(self, metadata: TimeSeriesMetadata) -> Self {
        Self {
            metadata,
            events: self.events,
        }
    }

    /// Split into metadata and events.
    pub fn into_parts(self) -> (TimeSeriesMetadata, Vec<Event<V>>) {
        (self.metadata, self.events.into_values().collect())
    }

    /// Keep the events accepted by `keep`.
    #[must_use]
    pub fn retain(mut self, mut keep: impl FnMut(&Event<V>) -> bool) -> Self {
        self.events.retain(|_, e| keep(e));
        self
    }

    /// Map every borrowed value into a new series, keeping timestamps and metadata.
    pub fn map_ref<U>(&self, mut f: impl FnMut(&V) -> U) -> TimeSeries<U> {
        TimeSeries {
            metadata: self.metadata.clone(),
            events: self
                .events
                .iter()
                .map(|(t, e)| {
                    (
                        *t,
                        Event::with_reference_time(e.reference_time(), e.valid_time(), f(e.value())),
                    )
                })
                .collect(),
        }
    }

    /// Map every value, keeping timestamps and metadata.
    pub fn map_values<U>(self, mut f: impl FnMut(V) -> U) -> TimeSeries<U> {
        TimeSeries {
            metadata: self.metadata,
            events: self
                .events
                .into_iter()
                .map(|(t, e)| (t, e.map(&mut f)))
                .collect(),
        }
    }
}

impl<V: Clone> TimeSeries<V> {
    /// A builder seeded with this series' metadata and events.
    #[must_use]
    pub fn to_builder(&self) -> TimeSeriesBuilder<V> {
        TimeSeriesBuilder {
            metadata: self.metadata.clone(),
            events: self.events.clone(),
            duplicate: None,
        }
    }
}

/// Accumulating, validating builder for [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder<V> {
    metadata: TimeSeriesMetadata,
    events: BTreeMap<DateTime<Utc>, Event<V>>,
    duplicate: Option<DateTime<Utc>>,
}

impl<V> Default for TimeSeriesBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TimeSeriesBuilder<V> {
    /// An empty builder with default metadata.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: TimeSeriesMetadata::default(),
            events: BTreeMap::new(),
            duplicate: None,
        }
    }

    /// Set the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: TimeSeriesMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add one reference time to the metadata.
    #[must_use]
    pub fn reference_time(mut self, kind: ReferenceTimeType, t: DateTime<Utc>) -> Self {
        self.metadata.reference_times.insert(kind, t);
        self
    }

    /// Set the time scale in the metadata.
    #[must_use]
    pub const fn time_scale(mut self, scale: TimeScale) -> Self {
        self.metadata.time_scale = Some(scale);
        self
    }

    /// Add an event; a repeated valid time is reported by [`build`](Self::build).
    #[must_use]
    pub fn add_event(mut self, event: Event<V>) -> Self {
        self.push(event);
        self
    }

    /// Add several events.
    #[must_use]
    pub fn add_events(mut self, events: impl IntoIterator<Item = Event<V>>) -> Self {
        for e in events {
            self.push(e);
        }
        self
    }

    /// Add an event in place.
    pub fn push(&mut self, event: Event<V>) {
        let t = event.valid_time();
        if self.events.insert(t, event).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(t);
        }
    }

    /// Validate and build the series.
    ///
    /// # Errors
    /// Returns `InvalidState` when two events were added at the same valid time.
    pub fn build(self) -> Result<TimeSeries<V>, EvalignError> {
        if let Some(t) = self.duplicate {
            return Err(EvalignError::invalid_state(format!(
                "a time series cannot contain two events at the same valid time: {t}"
            )));
        }
        Ok(TimeSeries {
            metadata: self.metadata,
            events: self.events,
        })
    }
}
