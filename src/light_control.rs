//! Light output channels and partial updates to them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Dimmer, Mireds, OnOff, Transition};

/// The controllable light attributes of a device channel.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LightControl {
    #[serde(rename = "5850")]
    pub state: OnOff,
    #[serde(rename = "5851")]
    pub dimmer: Dimmer,
    #[serde(rename = "5706")]
    pub color_hex: String,
    #[serde(rename = "5709")]
    pub color_x: u32,
    #[serde(rename = "5710")]
    pub color_y: u32,
    #[serde(rename = "5711")]
    pub mireds: u16,
    /// Reported by the gateway with no known meaning; kept so it round-trips.
    #[serde(rename = "5717")]
    pub reserved: i64,
}

/// A partial update of light attributes.
///
/// Only attributes that were set are sent, so changing the brightness
/// leaves color and state untouched.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lightctl::{Dimmer, LightControlUpdate};
///
/// let mut update = LightControlUpdate::new();
/// assert!(!update.is_valid());
///
/// update.dimmer(Dimmer::create(128));
/// update.transition(Duration::from_secs(1));
/// assert!(update.is_valid());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LightControlUpdate {
    #[serde(rename = "5850")]
    pub(crate) state: Option<OnOff>,
    #[serde(rename = "5851")]
    pub(crate) dimmer: Option<Dimmer>,
    #[serde(rename = "5706")]
    pub(crate) color_hex: Option<String>,
    #[serde(rename = "5709")]
    pub(crate) color_x: Option<u32>,
    #[serde(rename = "5710")]
    pub(crate) color_y: Option<u32>,
    #[serde(rename = "5711")]
    pub(crate) mireds: Option<Mireds>,
    #[serde(rename = "5712")]
    pub(crate) transition: Option<Transition>,
}

impl LightControlUpdate {
    /// Create a new empty update.
    ///
    /// At least one light attribute must be set for the update to be valid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this update changes at least one light attribute.
    ///
    /// A transition alone changes nothing.
    pub fn is_valid(&self) -> bool {
        self.state.is_some()
            || self.dimmer.is_some()
            || self.color_hex.is_some()
            || (self.color_x.is_some() && self.color_y.is_some())
            || self.mireds.is_some()
    }

    pub fn state(&mut self, on: bool) -> &mut Self {
        self.state = Some(OnOff::from(on));
        self
    }

    pub fn dimmer(&mut self, dimmer: Dimmer) -> &mut Self {
        self.dimmer = Some(dimmer);
        self
    }

    /// Set the color as a hex string such as `"f1e0b5"`.
    pub fn color_hex(&mut self, hex: &str) -> &mut Self {
        self.color_hex = Some(hex.to_string());
        self
    }

    /// Set the color as CIE 1931 coordinates on the gateway's 0-65535 scale.
    pub fn color_xy(&mut self, x: u32, y: u32) -> &mut Self {
        self.color_x = Some(x);
        self.color_y = Some(y);
        self
    }

    pub fn mireds(&mut self, mireds: Mireds) -> &mut Self {
        self.mireds = Some(mireds);
        self
    }

    /// Fade over `duration`, truncated to tenths of a second.
    pub fn transition(&mut self, duration: Duration) -> &mut Self {
        self.transition = Some(Transition::from(duration));
        self
    }
}

impl From<OnOff> for LightControlUpdate {
    fn from(state: OnOff) -> Self {
        LightControlUpdate {
            state: Some(state),
            ..Self::default()
        }
    }
}

impl From<Dimmer> for LightControlUpdate {
    fn from(dimmer: Dimmer) -> Self {
        let mut update = LightControlUpdate::new();
        update.dimmer(dimmer);
        update
    }
}

impl From<Mireds> for LightControlUpdate {
    fn from(mireds: Mireds) -> Self {
        let mut update = LightControlUpdate::new();
        update.mireds(mireds);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn encoded(update: &LightControlUpdate) -> Value {
        serde_json::from_slice(&codec::encode(update).unwrap()).unwrap()
    }

    #[test]
    fn test_state_only_update_has_single_key() {
        let update = LightControlUpdate::from(OnOff::OFF);
        assert_eq!(encoded(&update), json!({"5850": 0}));
    }

    #[test]
    fn test_zero_is_distinct_from_absent() {
        let mut update = LightControlUpdate::new();
        update
            .dimmer(Dimmer::create(0))
            .transition(Duration::from_millis(450));
        assert_eq!(encoded(&update), json!({"5851": 0, "5712": 4}));
    }

    #[test]
    fn test_full_update() {
        let mut update = LightControlUpdate::new();
        update
            .state(true)
            .color_hex("f1e0b5")
            .color_xy(30138, 26909)
            .mireds(Mireds::create(370).unwrap());
        assert_eq!(
            encoded(&update),
            json!({"5850": 1, "5706": "f1e0b5", "5709": 30138, "5710": 26909, "5711": 370})
        );
    }

    #[test]
    fn test_validity() {
        let mut update = LightControlUpdate::new();
        update.transition(Duration::from_secs(1));
        assert!(!update.is_valid());

        let mut update = LightControlUpdate::new();
        update.color_x = Some(1);
        assert!(!update.is_valid());
        update.color_y = Some(1);
        assert!(update.is_valid());
    }

    #[test]
    fn test_decode_light_control_round_trips_reserved() {
        let payload = br#"{"5850":1,"5851":254,"5706":"f1e0b5","5709":30138,"5710":26909,"5711":370,"5717":0,"9003":0}"#;
        let control: LightControl = codec::decode("/15001/65537", payload).unwrap();
        assert_eq!(control.dimmer, Dimmer::create(254));
        assert_eq!(control.mireds, 370);
        assert!(control.state.is_on());

        let mut with_reserved = control.clone();
        with_reserved.reserved = 7;
        let back: LightControl =
            codec::decode("/", &codec::encode(&with_reserved).unwrap()).unwrap();
        assert_eq!(back, with_reserved);
    }

    #[test]
    fn test_malformed_channel_names_key() {
        let err = codec::decode::<LightControl>("/15001/65537", br#"{"5711": -1}"#).unwrap_err();
        assert!(err.to_string().contains("5711: invalid value"), "{err}");
    }
}
