// Sweep configuration - constructed once at startup and passed into each service

use crate::application::constants::{
    DEFAULT_BACKOFF_BASE_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_PAGE_SIZE, DEFAULT_STALE_DAYS,
};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with lifecycle transitions when the inventory fetch stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialInventoryPolicy {
    /// Write reports but do not move or delete anything
    #[default]
    Halt,
    /// Act on whatever was fetched
    Proceed,
}

/// Core tuning knobs for fetch, classification and lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Rows requested per inventory page
    pub page_size: u32,

    /// Devices silent for longer than this are stale
    pub stale_days: u32,

    /// Attempts per page before the fetch aborts
    pub max_attempts: u32,

    /// Backoff base; the delay before retry `n` is `base * 2^n`
    pub backoff_base_secs: u64,

    pub partial_inventory: PartialInventoryPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            stale_days: DEFAULT_STALE_DAYS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base_secs: DEFAULT_BACKOFF_BASE_SECS,
            partial_inventory: PartialInventoryPolicy::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be greater than 0".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(AppError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn staleness_threshold(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.stale_days))
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }
}
