//! Slot store
//!
//! Conversation variables collected across turns. Values are the literal
//! user-facing strings the customer picked ("Downtown Branch"), never
//! normalized identifiers.
//!
//! The store only grows or is reset wholesale; there is no partial removal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named conversation variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKey {
    Purpose,
    Service,
    Branch,
    Date,
    Time,
}

impl SlotKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKey::Purpose => "purpose",
            SlotKey::Service => "service",
            SlotKey::Branch => "branch",
            SlotKey::Date => "date",
            SlotKey::Time => "time",
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `purpose` slot.
///
/// An absent purpose means the appointment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Queue,
    QueuePosition,
    Learn,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Queue => "queue",
            Purpose::QueuePosition => "queue_position",
            Purpose::Learn => "learn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "queue" => Some(Purpose::Queue),
            "queue_position" => Some(Purpose::QueuePosition),
            "learn" => Some(Purpose::Learn),
            _ => None,
        }
    }
}

/// Accumulated slot values for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotStore {
    values: BTreeMap<SlotKey, String>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh store holding only a purpose
    pub fn with_purpose(purpose: Purpose) -> Self {
        let mut slots = Self::new();
        slots.set(SlotKey::Purpose, purpose.as_str());
        slots
    }

    /// Write a slot, replacing any earlier value for the same key
    pub fn set(&mut self, key: SlotKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: SlotKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Slot value or empty string, for template interpolation
    pub fn get_or_empty(&self, key: SlotKey) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: SlotKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn purpose(&self) -> Option<Purpose> {
        self.get(SlotKey::Purpose).and_then(Purpose::parse)
    }

    pub fn is_queue_flow(&self) -> bool {
        self.purpose() == Some(Purpose::Queue)
    }

    /// Wholesale reset
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
