use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Format used when rendering timestamps for humans: fixed width, no
/// locale-dependent month names, sorts lexically in time order.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Whole-second UNIX timestamp of a tag's last update.
///
/// Comparison is numeric, so timestamps of different digit counts order
/// correctly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateTime(i64);

impl UpdateTime {
    /// Create a timestamp from seconds since the UNIX epoch.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Seconds since the UNIX epoch.
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// The current wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Convert a fractional second count, as stored in registry metadata.
    ///
    /// The fraction is truncated. Negative, NaN and out-of-range values are
    /// rejected.
    pub fn from_fractional_secs(secs: f64) -> Result<Self, TypeError> {
        if !secs.is_finite() {
            return Err(TypeError::InvalidTimestamp(format!("{secs} is not finite")));
        }
        if secs < 0.0 {
            return Err(TypeError::InvalidTimestamp(format!("{secs} is before the epoch")));
        }
        if secs >= i64::MAX as f64 {
            return Err(TypeError::InvalidTimestamp(format!("{secs} is out of range")));
        }
        Ok(Self(secs.trunc() as i64))
    }

    /// This timestamp moved back by `window`.
    ///
    /// Returns `None` when the result would precede the epoch.
    pub fn checked_sub(&self, window: Duration) -> Option<Self> {
        let window = i64::try_from(window.as_secs()).ok()?;
        let secs = self.0.checked_sub(window)?;
        (secs >= 0).then_some(Self(secs))
    }
}

impl fmt::Debug for UpdateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpdateTime({})", self.0)
    }
}

impl fmt::Display for UpdateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.0, 0) {
            Some(dt) => write!(f, "{}", dt.format(DISPLAY_FORMAT)),
            None => write!(f, "@{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn ordering_is_numeric_across_digit_counts() {
        // 9 digits vs 10 digits: a string comparison gets this backwards.
        let short = UpdateTime::from_secs(999_999_999);
        let long = UpdateTime::from_secs(1_000_000_000);
        assert!(short < long);
        assert!("999999999" > "1000000000");
    }

    #[test]
    fn display_is_sortable_utc() {
        let t = UpdateTime::from_secs(1_400_000_000);
        assert_eq!(t.to_string(), "2014-05-13 16:53:20 UTC");
    }

    #[test]
    fn display_of_epoch() {
        assert_eq!(UpdateTime::from_secs(0).to_string(), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let t = UpdateTime::from_fractional_secs(1_400_000_000.9).unwrap();
        assert_eq!(t.as_secs(), 1_400_000_000);
    }

    #[test]
    fn bad_fractional_values_are_rejected() {
        assert!(UpdateTime::from_fractional_secs(-1.0).is_err());
        assert!(UpdateTime::from_fractional_secs(f64::NAN).is_err());
        assert!(UpdateTime::from_fractional_secs(f64::INFINITY).is_err());
        assert!(UpdateTime::from_fractional_secs(1e30).is_err());
    }

    #[test]
    fn checked_sub_moves_back() {
        let now = UpdateTime::from_secs(100 * DAY as i64);
        let cutoff = now.checked_sub(Duration::from_secs(20 * DAY)).unwrap();
        assert_eq!(cutoff.as_secs(), 80 * DAY as i64);
    }

    #[test]
    fn checked_sub_before_epoch_is_none() {
        let now = UpdateTime::from_secs(10);
        assert!(now.checked_sub(Duration::from_secs(11)).is_none());
        assert!(now.checked_sub(Duration::from_secs(u64::MAX)).is_none());
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        // Should be after 2020-01-01.
        assert!(UpdateTime::now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn serde_is_a_plain_number() {
        let t = UpdateTime::from_secs(1234);
        assert_eq!(serde_json::to_string(&t).unwrap(), "1234");
    }

    proptest::proptest! {
        #[test]
        fn order_matches_seconds(a in 0i64..=i64::MAX / 2, b in 0i64..=i64::MAX / 2) {
            let ta = UpdateTime::from_secs(a);
            let tb = UpdateTime::from_secs(b);
            proptest::prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        }
    }
}
