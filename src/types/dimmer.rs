//! Brightness on the gateway's native scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Brightness from 0 to 255 as stored by the gateway.
///
/// Displayed as a percentage of the full scale.
///
/// # Examples
///
/// ```
/// use lightctl::Dimmer;
///
/// assert_eq!(Dimmer::new().value(), 255);
/// assert_eq!(Dimmer::create(127).percent(), 49);
/// assert_eq!(Dimmer::create(255).to_string(), "100%");
/// ```
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Dimmer(u8);

impl Dimmer {
    const MAX: u8 = u8::MAX;

    /// Full brightness.
    pub fn new() -> Self {
        Dimmer(Self::MAX)
    }

    pub fn create(value: u8) -> Self {
        Dimmer(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Share of full brightness, truncated to a whole percent.
    pub fn percent(self) -> u8 {
        (u16::from(self.0) * 100 / u16::from(Self::MAX)) as u8
    }
}

impl fmt::Display for Dimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
