// Report output location

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ALL_DEVICES_JSON: &str = "all_devices.json";
pub const STALE_DEVICES_JSON: &str = "stale_devices.json";
pub const STALE_DEVICES_CSV: &str = "stale_devices.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving the report files; created if missing
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
        }
    }
}

impl ReportConfig {
    pub fn all_devices_json(&self) -> PathBuf {
        self.output_dir.join(ALL_DEVICES_JSON)
    }

    pub fn stale_devices_json(&self) -> PathBuf {
        self.output_dir.join(STALE_DEVICES_JSON)
    }

    pub fn stale_devices_csv(&self) -> PathBuf {
        self.output_dir.join(STALE_DEVICES_CSV)
    }
}
