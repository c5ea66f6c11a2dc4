// Device Batch Domain Model - two-stage removal state machine

use crate::domain::device::{DeviceId, StaleSet};
use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a batch of devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchState {
    Active,
    RecycleBin,
    PermanentlyDeleted,
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchState::Active => write!(f, "ACTIVE"),
            BatchState::RecycleBin => write!(f, "RECYCLE_BIN"),
            BatchState::PermanentlyDeleted => write!(f, "PERMANENTLY_DELETED"),
        }
    }
}

/// Operator-supplied code required by the service for a force delete.
///
/// Forwarded as-is; only the remote service decides whether it is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Device identifiers moved through the removal workflow together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBatch {
    ids: Vec<DeviceId>,
    state: BatchState,
}

impl DeviceBatch {
    pub fn new(ids: Vec<DeviceId>) -> Self {
        Self {
            ids,
            state: BatchState::Active,
        }
    }

    pub fn from_stale_set(stale: &StaleSet) -> Self {
        Self::new(stale.device_ids())
    }

    pub fn ids(&self) -> &[DeviceId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Comma-delimited list as the delete endpoint expects it
    pub fn joined_ids(&self) -> String {
        self.ids.join(",")
    }

    /// Transition ACTIVE -> RECYCLE_BIN
    pub fn mark_recycled(&mut self) -> Result<()> {
        if self.state != BatchState::Active {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: BatchState::RecycleBin.to_string(),
            });
        }
        self.state = BatchState::RecycleBin;
        Ok(())
    }

    /// Transition ACTIVE | RECYCLE_BIN -> PERMANENTLY_DELETED
    ///
    /// A batch that never reached the recycle bin (failed move, or IDs recycled
    /// in an earlier run) is still eligible; the service rejects what it must.
    pub fn mark_purged(&mut self) -> Result<()> {
        if self.state == BatchState::PermanentlyDeleted {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: BatchState::PermanentlyDeleted.to_string(),
            });
        }
        self.state = BatchState::PermanentlyDeleted;
        Ok(())
    }
}
