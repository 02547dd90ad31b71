//! Resource header and gateway addressing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Collection roots exposed by the gateway.
///
/// Devices and groups live in separate ID spaces under their own root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    Devices = 15001,
    Groups = 15004,
    Gateway = 15011,
}

impl Root {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// `/<root>`, the listing of a collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightctl::Root;
    ///
    /// assert_eq!(Root::Devices.path(), "/15001");
    /// assert_eq!(Root::Groups.item_path(131073), "/15004/131073");
    /// ```
    pub fn path(self) -> String {
        format!("/{}", self.id())
    }

    /// `/<root>/<id>`, a single resource.
    pub fn item_path(self, id: u32) -> String {
        format!("/{}/{id}", self.id())
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Root::Devices => "devices",
            Root::Groups => "groups",
            Root::Gateway => "gateway",
        })
    }
}

/// Header shared by every addressable resource.
///
/// Flattened into [`crate::Device`] and [`crate::Group`].
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "9001")]
    pub name: String,
    #[serde(rename = "9002")]
    pub created_at: Timestamp,
    /// Assigned by the gateway, unique within its collection.
    #[serde(rename = "9003")]
    pub id: u32,
}
