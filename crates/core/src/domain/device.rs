// Device Domain Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Device identifier as issued by the management service
pub type DeviceId = String;

/// Attribute names the core depends on
pub const FIELD_DEVICE_ID: &str = "DeviceID";
pub const FIELD_DEVICE_NAME: &str = "DeviceName";
pub const FIELD_DEVICE_TIMESTAMP: &str = "DeviceTimeStamp";

/// One row of the inventory grid.
///
/// The service returns dozens of attributes per device; they are kept verbatim
/// so the inventory report reproduces exactly what was fetched. Only the
/// identifier, name and last-seen timestamp are interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord(Map<String, Value>);

impl DeviceRecord {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Identifier, with numeric IDs rendered as strings
    pub fn device_id(&self) -> Option<DeviceId> {
        match self.0.get(FIELD_DEVICE_ID)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn device_name(&self) -> Option<&str> {
        self.0.get(FIELD_DEVICE_NAME).and_then(Value::as_str)
    }

    /// Raw last-seen timestamp; `None` when absent, null or blank
    pub fn timestamp(&self) -> Option<&str> {
        self.0
            .get(FIELD_DEVICE_TIMESTAMP)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DeviceRecord {
    fn from(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }
}

/// Projection of a device that fell behind the staleness cutoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleDeviceRecord {
    #[serde(rename = "DeviceID")]
    pub device_id: DeviceId,
    #[serde(rename = "DeviceName")]
    pub device_name: String,
    #[serde(rename = "DeviceTimeStamp")]
    pub raw_timestamp: String,
    /// Parsed timestamp, naive UTC
    #[serde(skip)]
    pub last_seen: NaiveDateTime,
}

/// Records left out of classification, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionCounts {
    pub missing_timestamp: usize,
    pub unparsable_timestamp: usize,
    pub missing_id: usize,
}

impl ExclusionCounts {
    pub fn total(&self) -> usize {
        self.missing_timestamp + self.unparsable_timestamp + self.missing_id
    }
}

/// Stale devices of one run, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleSet {
    pub cutoff: NaiveDateTime,
    pub devices: Vec<StaleDeviceRecord>,
    pub excluded: ExclusionCounts,
}

impl StaleSet {
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.iter().map(|d| d.device_id.clone()).collect()
    }
}
