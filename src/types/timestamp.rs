//! Unix timestamps reported by the gateway.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch.
///
/// Displayed in the local time zone followed by how long ago it was.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    const RUBY_DATE: &'static str = "%a %b %d %H:%M:%S %z %Y";

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs)
    }

    pub fn secs(self) -> i64 {
        self.0
    }

    pub fn datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Elapsed time between this timestamp and `now`, in its largest whole unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::DateTime;
    /// use lightctl::Timestamp;
    ///
    /// let now = DateTime::from_timestamp(1_000_000, 0).unwrap();
    /// assert_eq!(Timestamp::from_secs(1_000_000 - 42).ago(now), "42s");
    /// assert_eq!(Timestamp::from_secs(1_000_000 - 3 * 86_400).ago(now), "3d");
    /// ```
    pub fn ago(self, now: DateTime<Utc>) -> String {
        let elapsed = (now.timestamp() - self.0).max(0);
        match elapsed {
            e if e > 86_400 => format!("{}d", e / 86_400),
            e if e > 3_600 => format!("{}h", e / 3_600),
            e if e > 60 => format!("{}m", e / 60),
            e => format!("{e}s"),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.datetime() {
            Some(at) => write!(
                f,
                "{} ({} ago)",
                at.with_timezone(&Local).format(Self::RUBY_DATE),
                self.ago(Utc::now())
            ),
            None => write!(f, "invalid timestamp ({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ago_units() {
        let now = DateTime::from_timestamp(10_000_000, 0).unwrap();
        let at = |secs_ago: i64| Timestamp::from_secs(10_000_000 - secs_ago).ago(now);

        assert_eq!(at(0), "0s");
        assert_eq!(at(60), "60s");
        assert_eq!(at(61), "1m");
        assert_eq!(at(2 * 3_600 + 5), "2h");
        assert_eq!(at(86_400), "24h");
        assert_eq!(at(5 * 86_400 + 1), "5d");
        // clock skew never renders a negative age
        assert_eq!(at(-30), "0s");
    }

    #[test]
    fn test_display_suffix() {
        let rendered = Timestamp::from_secs(1_577_836_800).to_string();
        assert!(rendered.contains("2020") || rendered.contains("2019"), "{rendered}");
        assert!(rendered.ends_with("d ago)"), "{rendered}");
    }
}
