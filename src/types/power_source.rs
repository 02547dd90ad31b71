//! Device power sources.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// How a device is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PowerSource {
    #[strum(serialize = "internal battery")]
    InternalBattery = 1,
    #[strum(serialize = "external battery")]
    ExternalBattery = 2,
    #[strum(serialize = "battery")]
    Battery = 3,
    #[strum(serialize = "power over ethernet")]
    PowerOverEthernet = 4,
    #[strum(serialize = "USB")]
    Usb = 5,
    #[strum(serialize = "mains")]
    Mains = 6,
    #[strum(serialize = "solar")]
    Solar = 7,
}

impl PowerSource {
    pub fn create(code: i64) -> Option<Self> {
        PowerSource::iter().find(|source| *source as i64 == code)
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Human-readable name for a raw code, including codes this crate does not know.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightctl::PowerSource;
    ///
    /// assert_eq!(PowerSource::describe(6), "mains");
    /// assert_eq!(PowerSource::describe(0), "unknown power source (0)");
    /// ```
    pub fn describe(code: i64) -> String {
        match PowerSource::create(code) {
            Some(source) => source.to_string(),
            None => format!("unknown power source ({code})"),
        }
    }
}
