use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A value at a valid time, anchored to a reference time.
///
/// Events order by reference time, then valid time, then value. Two events are
/// equal (and hash equal) when all three components are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Event<V> {
    reference_time: DateTime<Utc>,
    valid_time: DateTime<Utc>,
    value: V,
}

impl<V> Event<V> {
    /// An event whose reference time equals its valid time.
    pub const fn new(valid_time: DateTime<Utc>, value: V) -> Self {
        Self {
            reference_time: valid_time,
            valid_time,
            value,
        }
    }

    /// An event with an explicit reference time.
    pub const fn with_reference_time(
        reference_time: DateTime<Utc>,
        valid_time: DateTime<Utc>,
        value: V,
    ) -> Self {
        Self {
            reference_time,
            valid_time,
            value,
        }
    }

    /// Reference time of this event.
    pub const fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Valid time of this event.
    pub const fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    /// Borrow the value.
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Take the value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Replace the value, keeping both timestamps.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Event<U> {
        Event {
            reference_time: self.reference_time,
            valid_time: self.valid_time,
            value: f(self.value),
        }
    }

    /// Move the valid time by `offset`, keeping the reference time.
    ///
    /// Returns `None` when the shifted time is out of range.
    pub fn shifted(self, offset: TimeDelta) -> Option<Self> {
        let valid_time = self.valid_time.checked_add_signed(offset)?;
        Some(Self { valid_time, ..self })
    }
}
