//! Fade duration for light changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transition time in tenths of a second.
///
/// Durations are truncated, never rounded up.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lightctl::Transition;
///
/// assert_eq!(Transition::from(Duration::from_millis(450)).tenths(), 4);
/// assert_eq!(Transition::from(Duration::from_millis(50)).tenths(), 0);
/// assert_eq!(Transition::from(Duration::from_secs(2)).tenths(), 20);
/// ```
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transition(u32);

impl Transition {
    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn duration(self) -> Duration {
        Duration::from_millis(u64::from(self.0) * 100)
    }
}

impl From<Duration> for Transition {
    fn from(duration: Duration) -> Self {
        let tenths = duration.as_millis() / 100;
        Transition(u32::try_from(tenths).unwrap_or(u32::MAX))
    }
}
