// Sweep Service - fetch, classify, report, then remove stale devices

use crate::application::classifier::StalenessClassifier;
use crate::application::fetcher::{DeviceFetcher, FetchCompletion};
use crate::application::lifecycle::{LifecycleManager, LifecycleOutcome};
use crate::application::retry::RetryPolicy;
use crate::config::{PartialInventoryPolicy, SweepConfig};
use crate::domain::{BatchState, DeviceBatch, DeviceId, StaleSet};
use crate::error::Result;
use crate::port::{DeviceService, ReportSink, Sleeper, TimeProvider, TokenProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// How far a run is allowed to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Fetch, classify and write reports only
    Scan,
    /// Also move stale devices to the recycle bin
    RecycleOnly,
    /// Recycle, then permanently delete
    Full,
}

/// What one run did
#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub total_devices: usize,
    pub completion: FetchCompletion,
    pub stale: StaleSet,
    pub batch_state: BatchState,
    pub recycle: LifecycleOutcome,
    pub purge: LifecycleOutcome,
}

/// Orchestrates one audit run over the whole fleet
pub struct SweepService {
    fetcher: DeviceFetcher,
    classifier: StalenessClassifier,
    lifecycle: LifecycleManager,
    report_sink: Arc<dyn ReportSink>,
    token_provider: Arc<dyn TokenProvider>,
    partial_inventory: PartialInventoryPolicy,
}

impl SweepService {
    /// Wire a sweep service from its ports
    ///
    /// # Arguments
    /// * `config` - Sweep configuration (page size, threshold, retry, partial policy)
    /// * `device_service` - Remote device-management service
    /// * `report_sink` - Destination for inventory and stale reports
    /// * `token_provider` - Source of the force-delete verification code
    /// * `time_provider` - Clock for the staleness cutoff
    /// * `sleeper` - Backoff delays between page attempts
    pub fn new(
        config: &SweepConfig,
        device_service: Arc<dyn DeviceService>,
        report_sink: Arc<dyn ReportSink>,
        token_provider: Arc<dyn TokenProvider>,
        time_provider: Arc<dyn TimeProvider>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let retry_policy = Arc::new(RetryPolicy::from_config(config));
        Self {
            fetcher: DeviceFetcher::new(device_service.clone(), retry_policy, sleeper, config),
            classifier: StalenessClassifier::from_config(config, time_provider),
            lifecycle: LifecycleManager::new(device_service),
            report_sink,
            token_provider,
            partial_inventory: config.partial_inventory,
        }
    }

    /// Run one sweep
    ///
    /// # Errors
    /// Only report-sink failures are returned: nothing is removed that was not
    /// first written down. Fetch, classification and lifecycle problems are
    /// logged and surface in the summary.
    pub async fn run(&self, mode: SweepMode) -> Result<SweepSummary> {
        let inventory = self.fetcher.fetch_all().await;
        self.report_sink.write_inventory(&inventory.devices)?;

        info!("Filtering stale devices");
        let stale = self.classifier.classify(&inventory.devices);
        info!(stale = stale.len(), "Found stale devices");

        if stale.is_empty() {
            info!("No stale devices to save");
        } else {
            self.report_sink.write_stale(&stale)?;
        }

        let mut batch = DeviceBatch::from_stale_set(&stale);
        let (recycle, purge) = match self.lifecycle_gate(mode, inventory.is_partial(), &batch) {
            Some(reason) => (
                LifecycleOutcome::skipped(reason.clone()),
                LifecycleOutcome::skipped(reason),
            ),
            None => self.remove(mode, &mut batch).await,
        };

        for device in &stale.devices {
            info!(
                device_id = %device.device_id,
                device_name = %device.device_name,
                timestamp = %device.raw_timestamp,
                "Stale device"
            );
        }

        Ok(SweepSummary {
            total_devices: inventory.devices.len(),
            completion: inventory.completion,
            stale,
            batch_state: batch.state(),
            recycle,
            purge,
        })
    }

    /// Permanently delete devices by ID, typically ones recycled by an earlier run
    ///
    /// Blank IDs are dropped; they would otherwise widen the joined `DeviceId`.
    pub async fn purge(&self, ids: Vec<DeviceId>) -> LifecycleOutcome {
        let ids: Vec<DeviceId> = ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        let mut batch = DeviceBatch::new(ids);
        self.purge_batch(&mut batch).await
    }

    /// Reason the lifecycle stage must not run, if any
    fn lifecycle_gate(&self, mode: SweepMode, partial: bool, batch: &DeviceBatch) -> Option<String> {
        if mode == SweepMode::Scan {
            return Some("scan only".to_string());
        }
        if partial && self.partial_inventory == PartialInventoryPolicy::Halt {
            warn!("Inventory is partial, skipping recycle-bin move and force delete");
            return Some("partial inventory".to_string());
        }
        if batch.is_empty() {
            return Some("no stale devices".to_string());
        }
        None
    }

    async fn remove(
        &self,
        mode: SweepMode,
        batch: &mut DeviceBatch,
    ) -> (LifecycleOutcome, LifecycleOutcome) {
        info!(devices = batch.len(), "Moving stale devices to recycle bin");
        let recycle = self.lifecycle.move_to_recycle_bin(batch).await;

        // A failed move does not stop the force delete; the service decides
        let purge = if mode == SweepMode::RecycleOnly {
            LifecycleOutcome::skipped("recycle only")
        } else {
            self.purge_batch(batch).await
        };

        (recycle, purge)
    }

    async fn purge_batch(&self, batch: &mut DeviceBatch) -> LifecycleOutcome {
        if batch.is_empty() {
            return LifecycleOutcome::skipped("no devices");
        }
        match self.token_provider.verification_token(batch) {
            Ok(token) => self.lifecycle.permanently_delete(batch, &token).await,
            Err(e) => {
                warn!(
                    provider = self.token_provider.name(),
                    error = %e,
                    "Could not obtain verification token, skipping force delete"
                );
                LifecycleOutcome::skipped(e.to_string())
            }
        }
    }
}
