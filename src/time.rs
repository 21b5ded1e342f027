use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Add, Sub};
use std::str::FromStr;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Naive (timezone-less) point in time, compared and shifted in whole minutes.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash)]
pub struct Timestamp(pub NaiveDateTime);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognised timestamp '{0}'")]
pub struct TimestampError(pub String);

impl Timestamp {
    /// Floors to a multiple of `hours` counted from the Unix epoch.
    pub fn floor_hours(&self, hours: u32) -> Timestamp {
        let bucket = i64::from(hours.max(1)) * 3600;
        let secs = self.0.and_utc().timestamp();
        let floored = secs.div_euclid(bucket) * bucket;
        DateTime::from_timestamp(floored, 0)
            .map(|dt| Timestamp(dt.naive_utc()))
            .unwrap_or(*self)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(Timestamp)
            .ok_or_else(|| TimestampError(s.to_string()))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Add<i64> for Timestamp {
    type Output = Self;

    fn add(self, minutes: i64) -> Self::Output {
        Timestamp(self.0 + TimeDelta::minutes(minutes))
    }
}

impl Sub<i64> for Timestamp {
    type Output = Self;

    fn sub(self, minutes: i64) -> Self::Output {
        Timestamp(self.0 - TimeDelta::minutes(minutes))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = i64;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        (self.0 - rhs.0).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = ts("2024-03-01 09:30:00");
        assert_eq!(expected, ts("2024-03-01 09:30"));
        assert_eq!(expected, ts("2024-03-01T09:30:00"));
        assert_eq!(expected, ts("2024/03/01 09:30"));
        assert_eq!(expected, ts("  2024-03-01T09:30 "));
        assert_eq!(ts("2024-03-01 00:00:00"), ts("2024-03-01"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not a date".parse::<Timestamp>().is_err());
        assert!("2024-13-01 09:00".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!("2024-03-01 09:05:00", ts("2024-03-01T09:05").to_string());
    }

    #[test]
    fn test_minute_arithmetic() {
        let t = ts("2024-03-01 23:50");
        assert_eq!(ts("2024-03-02 00:20"), t + 30);
        assert_eq!(ts("2024-03-01 23:20"), t - 30);
        assert_eq!(ts("2024-03-01 23:50") + -5, ts("2024-03-01 23:45"));
        assert_eq!(120, ts("2024-03-02 01:50") - t);
    }

    #[test]
    fn test_floor_hours() {
        assert_eq!(ts("2024-03-01 09:00"), ts("2024-03-01 09:59:59").floor_hours(1));
        assert_eq!(ts("2024-03-01 08:00"), ts("2024-03-01 09:15").floor_hours(2));
        assert_eq!(ts("2024-03-01 06:00"), ts("2024-03-01 11:59").floor_hours(6));
        assert_eq!(ts("1969-12-31 23:00"), ts("1969-12-31 23:30").floor_hours(1));
    }
}
