//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole hours elapsed from `earlier` to this timestamp, truncated.
    ///
    /// Returns 0 when `earlier` lies in the future, so a future-dated row
    /// reads as fresh rather than as aged by the absolute difference.
    pub fn whole_hours_since(&self, earlier: &Timestamp) -> u64 {
        self.duration_since(earlier).num_hours().max(0) as u64
    }

    /// Creates a new timestamp by adding the specified number of hours.
    ///
    /// Negative values subtract hours.
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: u64) -> Self {
        i64::try_from(secs)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(Self)
            .unwrap_or_else(|| Self(DateTime::<Utc>::default()))
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> u64 {
        self.0.timestamp().max(0) as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt);

        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();

        assert_eq!(ts.as_datetime().year(), 2024);
    }

    #[test]
    fn whole_hours_since_truncates_partial_hours() {
        let start = Timestamp::from_unix_secs(1_705_276_800);
        let later = start.plus_hours(47).plus_minutes(59);
        assert_eq!(later.whole_hours_since(&start), 47);
    }

    #[test]
    fn whole_hours_since_is_zero_for_future_start() {
        let start = Timestamp::from_unix_secs(1_705_276_800);
        let earlier = start.plus_hours(-3);
        assert_eq!(earlier.whole_hours_since(&start), 0);
    }

    #[test]
    fn out_of_range_unix_secs_fall_back_to_epoch() {
        let epoch = DateTime::<Utc>::default();

        // u64::MAX would wrap to -1s, one second before the epoch.
        assert_eq!(*Timestamp::from_unix_secs(u64::MAX).as_datetime(), epoch);
        assert_eq!(*Timestamp::from_unix_secs(i64::MAX as u64 + 1).as_datetime(), epoch);
        assert_eq!(Timestamp::from_unix_secs(1_705_276_800).as_unix_secs(), 1_705_276_800);
    }

    #[test]
    fn plus_hours_moves_forward_and_back() {
        let ts = Timestamp::from_unix_secs(10_000);
        assert_eq!(ts.plus_hours(1).as_unix_secs(), 13_600);
        assert!(ts.plus_hours(-1).is_before(&ts));
    }
}
