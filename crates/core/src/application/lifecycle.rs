// Lifecycle Manager - recycle-bin move and verified permanent delete
use crate::domain::{DeviceBatch, VerificationToken};
use crate::port::{DeviceService, RemovalAction, RemovalRequest};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of one batch transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// Request accepted by the service
    Completed {
        action: RemovalAction,
        devices: usize,
    },
    /// No request was sent
    Skipped { reason: String },
    /// Request sent and failed; the batch state is unchanged
    Failed {
        action: RemovalAction,
        error: String,
    },
}

impl LifecycleOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        LifecycleOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, LifecycleOutcome::Completed { .. })
    }
}

impl std::fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleOutcome::Completed { action, devices } => {
                write!(f, "{} accepted for {} devices", action, devices)
            }
            LifecycleOutcome::Skipped { reason } => write!(f, "skipped ({})", reason),
            LifecycleOutcome::Failed { action, error } => write!(f, "{} failed: {}", action, error),
        }
    }
}

/// Drives a device batch ACTIVE -> RECYCLE_BIN -> PERMANENTLY_DELETED.
///
/// Each transition is a single whole-batch request, sent once. Failures are
/// logged and reported as an outcome; they never abort the caller.
pub struct LifecycleManager {
    service: Arc<dyn DeviceService>,
}

impl LifecycleManager {
    pub fn new(service: Arc<dyn DeviceService>) -> Self {
        Self { service }
    }

    /// Soft-delete the batch into the service's recycle bin
    pub async fn move_to_recycle_bin(&self, batch: &mut DeviceBatch) -> LifecycleOutcome {
        if batch.is_empty() {
            info!("No devices to move to recycle bin");
            return LifecycleOutcome::skipped("no devices");
        }

        // Validate before touching the service
        let mut next = batch.clone();
        if let Err(e) = next.mark_recycled() {
            warn!(error = %e, "Recycle-bin move not applicable");
            return LifecycleOutcome::skipped(e.to_string());
        }

        let request = RemovalRequest::send_to_recycle_bin(batch);
        match self.service.submit_removal(&request).await {
            Ok(()) => {
                *batch = next;
                info!(devices = batch.len(), "Moved devices to recycle bin");
                LifecycleOutcome::Completed {
                    action: request.action,
                    devices: batch.len(),
                }
            }
            Err(e) => {
                error!(devices = batch.len(), error = %e, "Failed recycle-bin move");
                LifecycleOutcome::Failed {
                    action: request.action,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Irreversibly delete the batch.
    ///
    /// `token` is forwarded verbatim; the service alone decides whether it is
    /// acceptable. An empty batch or empty token sends nothing.
    pub async fn permanently_delete(
        &self,
        batch: &mut DeviceBatch,
        token: &VerificationToken,
    ) -> LifecycleOutcome {
        if batch.is_empty() {
            info!("No devices to force-delete");
            return LifecycleOutcome::skipped("no devices");
        }
        if token.is_empty() {
            warn!(devices = batch.len(), "No verification token, skipping force delete");
            return LifecycleOutcome::skipped("no verification token");
        }

        let mut next = batch.clone();
        if let Err(e) = next.mark_purged() {
            warn!(error = %e, "Force delete not applicable");
            return LifecycleOutcome::skipped(e.to_string());
        }

        let request = RemovalRequest::force_delete(batch, token);
        match self.service.submit_removal(&request).await {
            Ok(()) => {
                *batch = next;
                info!(devices = batch.len(), "Permanently deleted devices");
                LifecycleOutcome::Completed {
                    action: request.action,
                    devices: batch.len(),
                }
            }
            Err(e) => {
                error!(devices = batch.len(), error = %e, "Failed force delete");
                LifecycleOutcome::Failed {
                    action: request.action,
                    error: e.to_string(),
                }
            }
        }
    }
}
