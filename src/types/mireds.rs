//! White-spectrum color temperature.

use serde::{Deserialize, Serialize};

/// Color temperature in mireds (10^6 / Kelvin), valid from 250 to 454.
///
/// Higher values are warmer: 454 is the reddest white the gateway accepts,
/// 250 the coolest.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Mireds(u16);

impl Mireds {
    pub const COOLEST: u16 = 250;
    pub const WARMEST: u16 = 454;

    /// Create a new Mireds with the given value.
    ///
    /// Returns `None` if value is outside the valid range (250-454).
    ///
    /// # Examples
    ///
    /// ```
    /// use lightctl::Mireds;
    ///
    /// assert!(Mireds::create(249).is_none());
    /// assert!(Mireds::create(250).is_some());
    /// assert!(Mireds::create(454).is_some());
    /// assert!(Mireds::create(455).is_none());
    /// ```
    pub fn create(value: u16) -> Option<Self> {
        if (Self::COOLEST..=Self::WARMEST).contains(&value) {
            Some(Mireds(value))
        } else {
            None
        }
    }

    /// Clamp `value` into the valid range.
    pub fn saturating(value: u16) -> Self {
        Mireds(value.clamp(Self::COOLEST, Self::WARMEST))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Approximate color temperature in Kelvin.
    pub fn kelvin(self) -> u32 {
        1_000_000 / u32::from(self.0.max(1))
    }
}
