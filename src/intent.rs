//! User-level light commands and their conversion to wire values.
//!
//! Levels and white temperatures are given as percentages. Values outside
//! 0..=100 are clamped silently rather than rejected.

use std::time::Duration;

use crate::client::Client;
use crate::errors::Error;
use crate::resource::Root;
use crate::transport::Transport;
use crate::types::{Dimmer, Mireds};

/// Brightness for a level percentage, rounded to the nearest step.
///
/// ```
/// use lightctl::dimmer_for_level;
///
/// assert_eq!(dimmer_for_level(50).value(), 128);
/// assert_eq!(dimmer_for_level(150).value(), 255);
/// ```
pub fn dimmer_for_level(level: i32) -> Dimmer {
    let level = f64::from(level.clamp(0, 100));
    Dimmer::create((level / 100.0 * f64::from(u8::MAX)).round() as u8)
}

/// Color temperature for a white percentage: 0 is warmest, 100 coolest.
///
/// ```
/// use lightctl::{mireds_for_white, Mireds};
///
/// assert_eq!(mireds_for_white(0).value(), Mireds::WARMEST);
/// assert_eq!(mireds_for_white(100).value(), Mireds::COOLEST);
/// ```
pub fn mireds_for_white(white: i32) -> Mireds {
    let span = f64::from(Mireds::WARMEST - Mireds::COOLEST);
    let warmth = f64::from(100 - white.clamp(0, 100));
    Mireds::saturating(Mireds::COOLEST + (warmth / 100.0 * span).round() as u16)
}

/// One light command addressed at a device or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Power(bool),
    /// Brightness percentage.
    Level(i32),
    /// White temperature percentage.
    White(i32),
}

impl Intent {
    /// Issue this command as a single write.
    ///
    /// `transition` is ignored for power changes.
    pub async fn apply<T: Transport>(
        &self,
        client: &Client<T>,
        root: Root,
        id: u32,
        transition: Duration,
    ) -> Result<(), Error> {
        match *self {
            Intent::Power(on) => client.set_light_state(root, id, on).await,
            Intent::Level(level) => {
                client
                    .set_light_dimmer(root, id, dimmer_for_level(level), transition)
                    .await
            }
            Intent::White(white) => {
                client
                    .set_light_color_temperature(root, id, mireds_for_white(white), transition)
                    .await
            }
        }
    }
}
