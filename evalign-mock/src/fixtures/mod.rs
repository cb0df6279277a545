use chrono::{DateTime, Utc};

pub mod forecasts;
pub mod observations;

/// 2023-01-01T00:00:00Z.
pub const EPOCH_SECONDS: i64 = 1_672_531_200;

/// The instant `hours` after the fixture epoch.
pub fn hour(hours: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(EPOCH_SECONDS.checked_add(hours.checked_mul(3600)?)?, 0)
}
