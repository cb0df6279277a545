use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of timestamp anchoring a time series.
///
/// A series may carry zero or more reference times, at most one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ReferenceTimeType {
    /// Forecast initialization time.
    T0,
    /// Start of an analysis or simulation run.
    AnalysisStartTime,
    /// Time at which a forecast was issued.
    IssuedTime,
    /// Time of the latest observation assimilated.
    LatestObservation,
    /// Reference time of undocumented meaning.
    Unknown,
}

impl fmt::Display for ReferenceTimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::T0 => "T0",
            Self::AnalysisStartTime => "ANALYSIS START TIME",
            Self::IssuedTime => "ISSUED TIME",
            Self::LatestObservation => "LATEST OBSERVATION",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
