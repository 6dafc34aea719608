//! Environment-variable fetcher.

use crate::errors::{CredCycleError, Result};

use super::SecretFetcher;

/// Default variable read when no other provider is configured.
pub const DEFAULT_SECRET_VAR: &str = "CREDCYCLE_SECRET";

/// Reads the raw secret from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvFetcher {
    var: String,
}

impl EnvFetcher {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_VAR)
    }
}

impl SecretFetcher for EnvFetcher {
    fn fetch(&self, name: &str) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(CredCycleError::fetch(
                name,
                format!("environment variable {} is empty", self.var),
            )),
            Err(e) => Err(CredCycleError::fetch(name, format!("{}: {e}", self.var))),
        }
    }
}
