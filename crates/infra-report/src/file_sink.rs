// File Report Sink

use crate::config::ReportConfig;
use devsweep_core::domain::{DeviceRecord, StaleSet};
use devsweep_core::error::{AppError, Result};
use devsweep_core::port::ReportSink;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `all_devices.json`, `stale_devices.json` and `stale_devices.csv`
pub struct FileReportSink {
    config: ReportConfig,
}

impl FileReportSink {
    /// Create the sink, making sure the output directory exists
    pub fn new(config: &ReportConfig) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            config: config.clone(),
        })
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    fn write_csv(path: &Path, stale: &StaleSet) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(report_error)?;
        for device in &stale.devices {
            writer.serialize(device).map_err(report_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn report_error(err: csv::Error) -> AppError {
    AppError::Report(err.to_string())
}

impl ReportSink for FileReportSink {
    fn write_inventory(&self, devices: &[DeviceRecord]) -> Result<()> {
        let path = self.config.all_devices_json();
        Self::write_json(&path, devices)?;
        info!(devices = devices.len(), path = %path.display(), "Saved inventory");
        Ok(())
    }

    fn write_stale(&self, stale: &StaleSet) -> Result<()> {
        if stale.is_empty() {
            info!("No stale devices to save");
            return Ok(());
        }

        let json_path = self.config.stale_devices_json();
        Self::write_json(&json_path, &stale.devices)?;
        info!(devices = stale.len(), path = %json_path.display(), "Wrote stale devices");

        let csv_path = self.config.stale_devices_csv();
        Self::write_csv(&csv_path, stale)?;
        info!(devices = stale.len(), path = %csv_path.display(), "Wrote stale devices");

        Ok(())
    }
}
