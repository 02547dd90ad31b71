//! Groups of devices controlled together.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::types::{Dimmer, OnOff};

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
struct MemberLink {
    #[serde(rename = "9003")]
    ids: Vec<u32>,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
struct GroupMembers {
    #[serde(rename = "15002")]
    link: MemberLink,
}

/// A snapshot of one group, decoded fresh on every read.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Group {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(rename = "5850")]
    pub state: OnOff,
    #[serde(rename = "5851")]
    pub dimmer: Dimmer,
    #[serde(rename = "5706")]
    pub color_hex: String,
    #[serde(rename = "9039")]
    pub mood_id: u32,
    #[serde(rename = "9018")]
    members: GroupMembers,
}

impl Group {
    pub fn id(&self) -> u32 {
        self.resource.id
    }

    pub fn name(&self) -> &str {
        &self.resource.name
    }

    /// Member device IDs in the order the gateway reported them.
    pub fn members(&self) -> &[u32] {
        &self.members.link.ids
    }

    /// One-line listing: `<id>: <name> (<state>) - <n> member(s)`.
    pub fn summary(&self) -> String {
        let n = self.members().len();
        let plural = if n == 1 { "" } else { "s" };
        format!("{}: {} ({}) - {n} member{plural}", self.id(), self.name(), self.state)
    }

    pub fn details(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", self.resource.name);
        let _ = writeln!(out, "Created at: {}", self.resource.created_at);
        let _ = writeln!(out, "ID: {}", self.resource.id);
        let _ = writeln!(out, "State: {}", self.state);
        let _ = writeln!(out, "Dimmer: {}", self.dimmer);
        let _ = writeln!(out, "Light color: {}", self.color_hex);
        let _ = writeln!(out, "Mood ID: {}", self.mood_id);
        let _ = writeln!(out, "Member count: {}", self.members().len());
        for (index, id) in self.members().iter().enumerate() {
            let _ = writeln!(out, "Member {}: {id}", index + 1);
        }
        out.trim_end().to_string()
    }
}
