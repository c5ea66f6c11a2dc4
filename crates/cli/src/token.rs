// Verification token sources for the CLI: environment, then interactive prompt

use devsweep_core::domain::{DeviceBatch, VerificationToken};
use devsweep_core::error::{AppError, Result};
use devsweep_core::port::{ChainedTokenProvider, StaticTokenProvider, TokenProvider};
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::sync::Mutex;

pub const VERIFICATION_ENV_VAR: &str = "FORCE_DELETE_VERIFICATION_CODE";

/// Reads the token from an environment variable
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(VERIFICATION_ENV_VAR)
    }
}

impl TokenProvider for EnvTokenProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn verification_token(&self, _batch: &DeviceBatch) -> Result<VerificationToken> {
        std::env::var(&self.var)
            .map(VerificationToken::new)
            .map_err(|_| AppError::TokenUnavailable(format!("{} is not set", self.var)))
    }
}

/// Asks the operator for the token
pub struct PromptTokenProvider {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
    interactive: bool,
}

impl PromptTokenProvider {
    /// Prompt on stderr, read from stdin; refuses when stdin is not a terminal
    pub fn stdin() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            input: Mutex::new(Box::new(BufReader::new(io::stdin()))),
            output: Mutex::new(Box::new(io::stderr())),
        }
    }

    pub fn with_io(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
            interactive: true,
        }
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("prompt lock poisoned".to_string())
}

impl TokenProvider for PromptTokenProvider {
    fn name(&self) -> &str {
        "prompt"
    }

    fn verification_token(&self, batch: &DeviceBatch) -> Result<VerificationToken> {
        if !self.interactive {
            return Err(AppError::TokenUnavailable(
                "stdin is not a terminal".to_string(),
            ));
        }

        {
            let mut output = self.output.lock().map_err(poisoned)?;
            write!(
                output,
                "Enter verification code to permanently delete these {} devices: ",
                batch.len()
            )?;
            output.flush()?;
        }

        let mut line = String::new();
        let read = self.input.lock().map_err(poisoned)?.read_line(&mut line)?;
        if read == 0 {
            return Err(AppError::TokenUnavailable("input closed".to_string()));
        }

        let token = VerificationToken::new(line.trim());
        if token.is_empty() {
            return Err(AppError::TokenUnavailable(
                "empty verification code".to_string(),
            ));
        }
        Ok(token)
    }
}

/// Token sources in priority order: configured code, environment, prompt
///
/// An empty configured code counts as absent. `prompt` is `None` for scans
/// and `--no-prompt` runs.
pub fn verification_chain(
    configured: Option<&str>,
    env: EnvTokenProvider,
    prompt: Option<PromptTokenProvider>,
) -> ChainedTokenProvider {
    let mut providers: Vec<Box<dyn TokenProvider>> = Vec::new();
    if let Some(code) = configured {
        providers.push(Box::new(StaticTokenProvider::new(code)));
    }
    providers.push(Box::new(env));
    if let Some(prompt) = prompt {
        providers.push(Box::new(prompt));
    }
    ChainedTokenProvider::new(providers)
}
