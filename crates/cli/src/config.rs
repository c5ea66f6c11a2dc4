// Configuration loading: defaults -> TOML file -> DEVSWEEP_* environment

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use devsweep_core::config::SweepConfig;
use devsweep_infra_http::ServiceConfig;
use devsweep_infra_report::ReportConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "devsweep.toml";
pub const ENV_PREFIX: &str = "DEVSWEEP";

/// Credential variables read when the namespaced settings are absent
const LEGACY_API_KEY: &str = "API_KEY";
const LEGACY_EMAIL: &str = "MY_EMAIL";
const LEGACY_PASSWORD: &str = "MY_PASSWORD";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    #[default]
    Pretty,
    /// Production: JSON structured logging
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// EnvFilter directive; `RUST_LOG` wins when set
    pub filter: Option<String>,
    /// Also write a daily-rolling log file here
    pub directory: Option<PathBuf>,
}

/// Everything a run needs, built once at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub sweep: SweepConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
    /// Force-delete code; prompted for when absent
    pub verification_code: Option<String>,
}

impl AppConfig {
    /// Load layered configuration
    ///
    /// An explicit `path` must exist; otherwise `devsweep.toml` in the working
    /// directory is used if present. Environment variables such as
    /// `DEVSWEEP_SERVICE__API_KEY` or `DEVSWEEP_SWEEP__STALE_DAYS` override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(config.with_legacy_env(|key| std::env::var(key).ok()))
    }

    /// Fill unset credentials from `API_KEY`, `MY_EMAIL`, `MY_PASSWORD`
    pub fn with_legacy_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |slot: &mut String, key: &str| {
            if slot.is_empty() {
                if let Some(value) = lookup(key) {
                    *slot = value;
                }
            }
        };
        fill(&mut self.service.api_key, LEGACY_API_KEY);
        fill(&mut self.service.username, LEGACY_EMAIL);
        fill(&mut self.service.password, LEGACY_PASSWORD);

        self.service = self.service.resolved();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.service.validate()?;
        self.sweep.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devsweep_core::config::PartialInventoryPolicy;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
verification_code = "12"

[service]
base_url = "https://tenant.eu.suremdm.io"
username = "ops@example.com"
password = "secret"
api_key = "abc"

[sweep]
stale_days = 90
partial_inventory = "proceed"

[report]
output_dir = "/var/lib/devsweep"

[logging]
format = "json"
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(
            config.service.device_url,
            "https://tenant.eu.suremdm.io/api/v2/devicegrid"
        );
        assert_eq!(config.sweep.stale_days, 90);
        assert_eq!(config.sweep.page_size, 1000);
        assert_eq!(config.sweep.partial_inventory, PartialInventoryPolicy::Proceed);
        assert_eq!(config.report.output_dir, PathBuf::from("/var/lib/devsweep"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.verification_code.as_deref(), Some("12"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_legacy_env_fills_only_missing_credentials() {
        let env: HashMap<&str, &str> = [
            ("API_KEY", "legacy-key"),
            ("MY_EMAIL", "legacy@example.com"),
            ("MY_PASSWORD", "legacy-pass"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.service.username = "explicit@example.com".to_string();
        let config = config.with_legacy_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.service.api_key, "legacy-key");
        assert_eq!(config.service.username, "explicit@example.com");
        assert_eq!(config.service.password, "legacy-pass");
    }

    #[test]
    fn test_validate_requires_credentials() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("missing service settings"));
    }
}
