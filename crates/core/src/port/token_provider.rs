// Token Provider Port - source of the force-delete verification code

use crate::domain::{DeviceBatch, VerificationToken};
use crate::error::{AppError, Result};
use tracing::debug;

/// Supplies the verification token required by a permanent delete
pub trait TokenProvider: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Obtain a token for `batch`
    ///
    /// # Errors
    /// `AppError::TokenUnavailable` when this source has no token
    fn verification_token(&self, batch: &DeviceBatch) -> Result<VerificationToken>;
}

/// Fixed token (configuration value or tests)
pub struct StaticTokenProvider {
    token: VerificationToken,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: VerificationToken::new(token),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn verification_token(&self, _batch: &DeviceBatch) -> Result<VerificationToken> {
        if self.token.is_empty() {
            return Err(AppError::TokenUnavailable("no token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// Tries each provider in order and returns the first non-empty token
pub struct ChainedTokenProvider {
    providers: Vec<Box<dyn TokenProvider>>,
}

impl ChainedTokenProvider {
    pub fn new(providers: Vec<Box<dyn TokenProvider>>) -> Self {
        Self { providers }
    }
}

impl TokenProvider for ChainedTokenProvider {
    fn name(&self) -> &str {
        "chain"
    }

    fn verification_token(&self, batch: &DeviceBatch) -> Result<VerificationToken> {
        for provider in &self.providers {
            match provider.verification_token(batch) {
                Ok(token) if !token.is_empty() => return Ok(token),
                Ok(_) => debug!(provider = provider.name(), "Token provider returned empty token"),
                Err(e) => debug!(provider = provider.name(), error = %e, "Token provider had no token"),
            }
        }
        Err(AppError::TokenUnavailable(
            "no verification token from any source".to_string(),
        ))
    }
}
