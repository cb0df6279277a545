//! Serde adapters that encode `chrono::TimeDelta` as signed integer milliseconds.
//!
//! `TimeDelta` spans exactly `±i64::MAX` milliseconds, so the sentinel bounds
//! `TimeDelta::MIN` and `TimeDelta::MAX` survive a round trip. Sub-millisecond
//! precision is dropped.

use chrono::TimeDelta;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a duration as milliseconds.
///
/// # Errors
/// Propagates serializer failures.
pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_milliseconds())
}

/// Deserialize a duration from milliseconds.
///
/// # Errors
/// Fails when the value is outside the range of `TimeDelta`.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
    let ms = i64::deserialize(d)?;
    TimeDelta::try_milliseconds(ms)
        .ok_or_else(|| D::Error::custom(format!("duration out of range: {ms}ms")))
}

/// The same encoding for optional durations; `None` maps to `null`.
pub mod option {
    use super::{Deserialize, Deserializer, Serializer, TimeDelta};
    use serde::de::Error as _;

    /// Serialize an optional duration as milliseconds or `null`.
    ///
    /// # Errors
    /// Propagates serializer failures.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(d: &Option<TimeDelta>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.num_milliseconds()),
            None => s.serialize_none(),
        }
    }

    /// Deserialize an optional duration from milliseconds or `null`.
    ///
    /// # Errors
    /// Fails when the value is outside the range of `TimeDelta`.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeDelta>, D::Error> {
        match Option::<i64>::deserialize(d)? {
            Some(ms) => TimeDelta::try_milliseconds(ms)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("duration out of range: {ms}ms"))),
            None => Ok(None),
        }
    }
}
