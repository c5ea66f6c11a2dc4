// Report Sink Port - durable record of what a run saw

use crate::domain::{DeviceRecord, StaleSet};
use crate::error::Result;

/// Destination for the inventory and stale-device reports
pub trait ReportSink: Send + Sync {
    /// Persist the full inventory in fetch order
    fn write_inventory(&self, devices: &[DeviceRecord]) -> Result<()>;

    /// Persist the stale subset, oldest first
    fn write_stale(&self, stale: &StaleSet) -> Result<()>;
}

pub mod mocks {
    use super::*;
    use crate::domain::StaleDeviceRecord;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory sink; optionally refuses every write
    #[derive(Default)]
    pub struct MemoryReportSink {
        inventory: Mutex<Option<Vec<DeviceRecord>>>,
        stale: Mutex<Option<Vec<StaleDeviceRecord>>>,
        fail: bool,
    }

    impl MemoryReportSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn inventory(&self) -> Option<Vec<DeviceRecord>> {
            self.inventory.lock().unwrap().clone()
        }

        pub fn stale(&self) -> Option<Vec<StaleDeviceRecord>> {
            self.stale.lock().unwrap().clone()
        }
    }

    impl ReportSink for MemoryReportSink {
        fn write_inventory(&self, devices: &[DeviceRecord]) -> Result<()> {
            if self.fail {
                return Err(AppError::Report("disk full".to_string()));
            }
            *self.inventory.lock().unwrap() = Some(devices.to_vec());
            Ok(())
        }

        fn write_stale(&self, stale: &StaleSet) -> Result<()> {
            if self.fail {
                return Err(AppError::Report("disk full".to_string()));
            }
            *self.stale.lock().unwrap() = Some(stale.devices.clone());
            Ok(())
        }
    }
}
