// Remote service endpoints and credentials

use devsweep_core::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout (60s)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

const DEVICE_GRID_PATH: &str = "/api/v2/devicegrid";
const DEVICE_DELETE_PATH: &str = "/api/v2/device/delete";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Tenant root, e.g. `https://tenant.eu.suremdm.io`; fills unset endpoint URLs
    pub base_url: String,

    /// Inventory grid endpoint (POST)
    pub device_url: String,

    /// Delete/lifecycle endpoint (PUT)
    pub delete_url: String,

    /// Basic-auth user (account email)
    pub username: String,

    pub password: String,

    /// Sent as the `ApiKey` header
    pub api_key: String,

    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            device_url: String::new(),
            delete_url: String::new(),
            username: String::new(),
            password: String::new(),
            api_key: String::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

// Credentials stay out of logs
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("device_url", &self.device_url)
            .field("delete_url", &self.delete_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("api_key", &"***")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Derive endpoint URLs from `base_url` where not set explicitly
    pub fn resolved(mut self) -> Self {
        let base = self.base_url.trim_end_matches('/').to_string();
        if !base.is_empty() {
            if self.device_url.is_empty() {
                self.device_url = format!("{}{}", base, DEVICE_GRID_PATH);
            }
            if self.delete_url.is_empty() {
                self.delete_url = format!("{}{}", base, DEVICE_DELETE_PATH);
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("device_url", &self.device_url),
            ("delete_url", &self.delete_url),
            ("username", &self.username),
            ("password", &self.password),
            ("api_key", &self.api_key),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "missing service settings: {}",
                missing.join(", ")
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(AppError::Config(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
