//! Devices paired with the gateway.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::light_control::LightControl;
use crate::resource::Resource;
use crate::types::{Percent, PowerSource, Timestamp, YesNo};

/// Hardware description block of a device.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceInfo {
    #[serde(rename = "0")]
    pub manufacturer: String,
    #[serde(rename = "1")]
    pub model: String,
    #[serde(rename = "2")]
    pub serial: String,
    #[serde(rename = "3")]
    pub firmware: String,
    /// Raw power source code, see [`DeviceInfo::power_source`].
    #[serde(rename = "6")]
    pub power_source_code: i64,
    #[serde(rename = "9")]
    pub battery_level: Percent,
}

impl DeviceInfo {
    pub fn power_source(&self) -> Option<PowerSource> {
        PowerSource::create(self.power_source_code)
    }
}

/// A snapshot of one device, decoded fresh on every read.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Device {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(rename = "3")]
    pub info: DeviceInfo,
    #[serde(rename = "9020")]
    pub last_seen: Timestamp,
    #[serde(rename = "9019")]
    pub reachable: YesNo,
    /// Usually a single channel; empty for remotes and sensors.
    #[serde(rename = "3311")]
    pub light_control: Vec<LightControl>,
}

impl Device {
    pub fn id(&self) -> u32 {
        self.resource.id
    }

    pub fn name(&self) -> &str {
        &self.resource.name
    }

    /// One-line listing: `<id>: <name> (<model>)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightctl::Device;
    ///
    /// let mut device = Device::default();
    /// device.resource.id = 65537;
    /// device.resource.name = "Desk".into();
    /// device.info.model = "TRADFRI bulb E27 WS opal 980lm".into();
    /// assert_eq!(device.summary(), "65537: Desk (TRADFRI bulb E27 WS opal 980lm)");
    /// ```
    pub fn summary(&self) -> String {
        format!("{}: {} ({})", self.id(), self.name(), self.info.model)
    }

    /// Multi-line description including every light channel.
    pub fn details(&self) -> String {
        let mut out = String::new();
        let info = &self.info;
        let _ = writeln!(out, "Name: {}", self.resource.name);
        let _ = writeln!(out, "Created at: {}", self.resource.created_at);
        let _ = writeln!(out, "ID: {}", self.resource.id);
        let _ = writeln!(out, "Manufacturer: {}", info.manufacturer);
        let _ = writeln!(out, "Model: {}", info.model);
        let _ = writeln!(out, "Serial: {}", info.serial);
        let _ = writeln!(out, "Firmware: {}", info.firmware);
        let _ = writeln!(out, "Power source: {}", PowerSource::describe(info.power_source_code));
        let _ = writeln!(out, "Battery level: {}", info.battery_level);
        let _ = writeln!(out, "Last seen: {}", self.last_seen);
        let _ = writeln!(out, "Reachable: {}", self.reachable);
        let _ = writeln!(out, "Light control count: {}", self.light_control.len());
        for (index, control) in self.light_control.iter().enumerate() {
            let n = index + 1;
            let _ = writeln!(out, "Light control {n}: State: {}", control.state);
            let _ = writeln!(out, "Light control {n}: Dimmer: {}", control.dimmer);
            let _ = writeln!(out, "Light control {n}: Light color (hex): {}", control.color_hex);
            let _ = writeln!(out, "Light control {n}: Light color (X): {}", control.color_x);
            let _ = writeln!(out, "Light control {n}: Light color (Y): {}", control.color_y);
            let _ = writeln!(out, "Light control {n}: Light mireds: {}", control.mireds);
        }
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::types::{Dimmer, OnOff};
    use pretty_assertions::assert_eq;

    const BULB: &[u8] = br#"{
        "3": {"0": "IKEA of Sweden", "1": "TRADFRI bulb E27 WS opal 980lm", "2": "",
              "3": "2.3.086", "6": 1, "7": 8710},
        "5750": 2,
        "9001": "Desk",
        "9002": 1577836800,
        "9003": 65537,
        "9019": 1,
        "9020": 1600000000,
        "9054": 0,
        "3311": [{"5850": 1, "5851": 203, "5706": "f1e0b5", "5709": 30138,
                  "5710": 26909, "5711": 370, "5717": 0, "9003": 0}]
    }"#;

    #[test]
    fn test_decode_bulb() {
        let device: Device = codec::decode("/15001/65537", BULB).unwrap();
        assert_eq!(device.id(), 65537);
        assert_eq!(device.name(), "Desk");
        assert_eq!(device.resource.created_at, Timestamp::from_secs(1_577_836_800));
        assert_eq!(device.info.manufacturer, "IKEA of Sweden");
        assert_eq!(device.info.firmware, "2.3.086");
        assert_eq!(device.info.power_source(), Some(PowerSource::InternalBattery));
        assert_eq!(device.info.battery_level.value(), 0);
        assert!(device.reachable.is_yes());
        assert_eq!(device.last_seen.secs(), 1_600_000_000);
        assert_eq!(device.light_control.len(), 1);
        assert_eq!(device.light_control[0].state, OnOff::ON);
        assert_eq!(device.light_control[0].dimmer, Dimmer::create(203));
    }

    #[test]
    fn test_decode_remote_without_light_control() {
        let payload = br#"{"3": {"1": "TRADFRI remote control", "6": 3, "9": 87}, "9001": "Remote", "9003": 65536}"#;
        let device: Device = codec::decode("/15001/65536", payload).unwrap();
        assert!(device.light_control.is_empty());
        assert_eq!(device.info.battery_level.value(), 87);
        assert_eq!(device.info.power_source(), Some(PowerSource::Battery));
        assert!(!device.reachable.is_yes());
        assert_eq!(device.summary(), "65536: Remote (TRADFRI remote control)");
    }

    #[test]
    fn test_malformed_light_control_fails_whole_device() {
        let payload = br#"{"9003": 65537, "3311": [{"5851": "bright"}]}"#;
        let err = codec::decode::<Device>("/15001/65537", payload).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/15001/65537"), "{message}");
        assert!(message.contains("3311[0].5851: invalid type"), "{message}");
    }

    #[test]
    fn test_details_lists_channels() {
        let device: Device = codec::decode("/15001/65537", BULB).unwrap();
        let details = device.details();
        assert!(details.starts_with("Name: Desk\n"));
        assert!(details.contains("Power source: internal battery"));
        assert!(details.contains("Reachable: yes"));
        assert!(details.contains("Light control 1: Dimmer: 79%"));
        assert!(details.ends_with("Light control 1: Light mireds: 370"));
    }
}
