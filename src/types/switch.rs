//! Boolean attributes carried as integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// On/off state of a light channel or group (`0` = off, anything else = on).
///
/// # Examples
///
/// ```
/// use lightctl::OnOff;
///
/// assert!(OnOff::from(true).is_on());
/// assert_eq!(OnOff::from(false).to_string(), "off");
/// ```
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct OnOff(u8);

impl OnOff {
    pub const OFF: OnOff = OnOff(0);
    pub const ON: OnOff = OnOff(1);

    pub fn is_on(self) -> bool {
        self.0 != 0
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<bool> for OnOff {
    fn from(on: bool) -> Self {
        if on { OnOff::ON } else { OnOff::OFF }
    }
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_on() { "on" } else { "off" })
    }
}

/// Yes/no flag such as device reachability.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct YesNo(u8);

impl YesNo {
    pub fn is_yes(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for YesNo {
    fn from(yes: bool) -> Self {
        YesNo(u8::from(yes))
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_yes() { "yes" } else { "no" })
    }
}
