//! Chain time types and their `YYYY-MM-DDTHH:MM:SS.sss` string form

use chrono::{DateTime, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Time parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Not an ISO-8601 `YYYY-MM-DDTHH:MM:SS[.fff][Z]` string
    #[error("invalid time string \"{0}\"")]
    Parse(String),
    /// Valid date, but not representable by the target type
    #[error("time \"{0}\" is out of range")]
    OutOfRange(String),
}

/// Milliseconds between the Unix epoch and 2000-01-01T00:00:00
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;

/// Length of a block slot in milliseconds
pub const BLOCK_INTERVAL_MS: i64 = 500;

fn parse_micros(s: &str) -> Result<i64, TimeError> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| TimeError::Parse(s.to_string()))?;
    Ok(naive.and_utc().timestamp_micros())
}

fn format_micros(f: &mut fmt::Formatter<'_>, micros: i64) -> fmt::Result {
    let dt = DateTime::from_timestamp_micros(micros).ok_or(fmt::Error)?;
    if micros.rem_euclid(1000) == 0 {
        write!(f, "{}", dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.3f"))
    } else {
        write!(f, "{}", dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}

/// Microseconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Create from microseconds
    pub const fn from_micros(micros: i64) -> Self {
        TimePoint(micros)
    }

    /// Microseconds since the epoch
    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    /// Whether the value falls inside the range the string form can express
    pub fn is_representable(&self) -> bool {
        DateTime::from_timestamp_micros(self.0).is_some()
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_micros(f, self.0)
    }
}

impl fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimePoint({})", self)
    }
}

impl FromStr for TimePoint {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_micros(s).map(TimePoint)
    }
}

/// Whole seconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimePointSec(u32);

impl TimePointSec {
    /// Create from seconds
    pub const fn from_secs(secs: u32) -> Self {
        TimePointSec(secs)
    }

    /// Seconds since the epoch
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Offset by a number of seconds, saturating at the type bounds
    pub fn saturating_add(&self, secs: u32) -> Self {
        TimePointSec(self.0.saturating_add(secs))
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_micros(f, i64::from(self.0) * 1_000_000)
    }
}

impl fmt::Debug for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimePointSec({})", self)
    }
}

impl FromStr for TimePointSec {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = parse_micros(s)?.div_euclid(1_000_000);
        u32::try_from(secs)
            .map(TimePointSec)
            .map_err(|_| TimeError::OutOfRange(s.to_string()))
    }
}

impl From<TimePointSec> for TimePoint {
    fn from(t: TimePointSec) -> Self {
        TimePoint(i64::from(t.0) * 1_000_000)
    }
}

/// Half-second slots since 2000-01-01T00:00:00
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockTimestamp(u32);

impl BlockTimestamp {
    /// Create from a slot number
    pub const fn from_slot(slot: u32) -> Self {
        BlockTimestamp(slot)
    }

    /// Slot number
    pub const fn slot(&self) -> u32 {
        self.0
    }

    fn as_millis(&self) -> i64 {
        BLOCK_TIMESTAMP_EPOCH_MS + i64::from(self.0) * BLOCK_INTERVAL_MS
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_micros(f, self.as_millis() * 1000)
    }
}

impl fmt::Debug for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockTimestamp({})", self)
    }
}

impl FromStr for BlockTimestamp {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let millis = parse_micros(s)?.div_euclid(1000);
        let slot = (millis - BLOCK_TIMESTAMP_EPOCH_MS).div_euclid(BLOCK_INTERVAL_MS);
        u32::try_from(slot)
            .map(BlockTimestamp)
            .map_err(|_| TimeError::OutOfRange(s.to_string()))
    }
}

impl From<BlockTimestamp> for TimePoint {
    fn from(t: BlockTimestamp) -> Self {
        TimePoint(t.as_millis() * 1000)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    macro_rules! string_serde {
        ($ty:ty) => {
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                }
            }
        };
    }

    string_serde!(TimePoint);
    string_serde!(TimePointSec);
    string_serde!(BlockTimestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== TimePointSec ====================

    #[test]
    fn test_time_point_sec_parse() {
        let t: TimePointSec = "2019-02-26T18:31:50".parse().unwrap();
        assert_eq!(hex::encode(t.as_secs().to_le_bytes()), "1686755c");
        assert_eq!(t.to_string(), "2019-02-26T18:31:50.000");
    }

    #[test]
    fn test_time_point_sec_accepts_fraction_and_zulu() {
        let a: TimePointSec = "2019-02-26T18:31:50.000".parse().unwrap();
        let b: TimePointSec = "2019-02-26T18:31:50Z".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_point_sec_out_of_range() {
        assert!(matches!(
            "1969-12-31T23:59:59".parse::<TimePointSec>(),
            Err(TimeError::OutOfRange(_))
        ));
        assert!(matches!(
            "2200-01-01T00:00:00".parse::<TimePointSec>(),
            Err(TimeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_time_point_sec_rejects_garbage() {
        assert!(matches!("yesterday".parse::<TimePointSec>(), Err(TimeError::Parse(_))));
        assert!("2019-02-30T00:00:00".parse::<TimePointSec>().is_err());
    }

    // ==================== TimePoint ====================

    #[test]
    fn test_time_point_millis() {
        let t: TimePoint = "2019-02-26T18:31:50.123".parse().unwrap();
        assert_eq!(t.as_micros(), 1_551_205_910_123_000);
        assert_eq!(t.to_string(), "2019-02-26T18:31:50.123");
    }

    #[test]
    fn test_time_point_micros_keep_precision() {
        let t = TimePoint::from_micros(1_551_205_910_123_456);
        assert_eq!(t.to_string(), "2019-02-26T18:31:50.123456");
        assert_eq!(t.to_string().parse::<TimePoint>().unwrap(), t);
    }

    #[test]
    fn test_time_point_representable() {
        assert!(TimePoint::from_micros(0).is_representable());
        assert!(!TimePoint::from_micros(i64::MAX).is_representable());
    }

    #[test]
    fn test_time_point_before_epoch() {
        let t: TimePoint = "1969-12-31T23:59:59.500".parse().unwrap();
        assert_eq!(t.as_micros(), -500_000);
        assert_eq!(t.to_string(), "1969-12-31T23:59:59.500");
    }

    // ==================== BlockTimestamp ====================

    #[test]
    fn test_block_timestamp() {
        let t: BlockTimestamp = "2019-02-26T18:31:50.500".parse().unwrap();
        assert_eq!(t.slot(), 1_209_042_221);
        assert_eq!(t.to_string(), "2019-02-26T18:31:50.500");
    }

    #[test]
    fn test_block_timestamp_epoch() {
        let t: BlockTimestamp = "2000-01-01T00:00:00.000".parse().unwrap();
        assert_eq!(t.slot(), 0);
        assert!("1999-12-31T23:59:59".parse::<BlockTimestamp>().is_err());
    }
}
