use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{SecretCache, DEFAULT_CACHE_DURATION};
use crate::connector::{MarkerClassifier, MYSQL_ACCESS_DENIED_MARKER};
use crate::decoder::{DsnTemplate, RdsSource};
use crate::errors::{CredCycleError, Result};
use crate::provider::env::DEFAULT_SECRET_VAR;
use crate::provider::{CommandFetcher, EnvFetcher, FileFetcher, SecretFetcher};

/// Where raw secrets come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Read the secret from a file on every fetch.
    File { path: PathBuf },

    /// Read the secret from an environment variable.
    Env {
        #[serde(default = "default_secret_var")]
        var: String,
    },

    /// Run a command and take its stdout; `{name}` in args is replaced
    /// with the secret name.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl ProviderConfig {
    /// Build the fetcher this config describes.
    pub fn build(&self) -> Box<dyn SecretFetcher> {
        match self {
            Self::File { path } => Box::new(FileFetcher::new(path.clone())),
            Self::Env { var } => Box::new(EnvFetcher::new(var.clone())),
            Self::Command { program, args } => {
                Box::new(CommandFetcher::new(program.clone(), args.clone()))
            }
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Env {
            var: default_secret_var(),
        }
    }
}

/// Project-level configuration, loaded from `credcycle.toml`.
///
/// Every field has a default, so the tool works without a config file
/// as long as the secret name comes from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the secret at the provider (e.g. an ARN).
    #[serde(default)]
    pub secret_name: String,

    /// Database name written into the connection string.
    #[serde(default)]
    pub database: String,

    /// How long a fetched secret is reused (default: 24h).
    #[serde(default = "default_cache_duration", with = "humantime_serde")]
    pub cache_duration: Duration,

    /// Text in a driver error meaning "credential rejected".
    #[serde(default = "default_auth_marker")]
    pub auth_marker: String,

    /// Regex used instead of `auth_marker` when set.
    #[serde(default)]
    pub auth_pattern: Option<String>,

    /// TLS profile name registered with the driver (e.g. "rds").
    #[serde(default)]
    pub tls_profile: Option<String>,

    /// Fixed connection string parameters.
    #[serde(default = "default_params")]
    pub params: BTreeMap<String, String>,

    #[serde(default)]
    pub provider: ProviderConfig,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_cache_duration() -> Duration {
    DEFAULT_CACHE_DURATION
}

fn default_auth_marker() -> String {
    MYSQL_ACCESS_DENIED_MARKER.to_string()
}

fn default_secret_var() -> String {
    DEFAULT_SECRET_VAR.to_string()
}

fn default_params() -> BTreeMap<String, String> {
    [
        ("parseTime", "true"),
        ("multiStatements", "true"),
        ("collation", "utf8mb4_unicode_ci"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_name: String::new(),
            database: String::new(),
            cache_duration: default_cache_duration(),
            auth_marker: default_auth_marker(),
            auth_pattern: None,
            tls_profile: None,
            params: default_params(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = "credcycle.toml";

    /// Load settings from `<dir>/credcycle.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load settings from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CredCycleError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            CredCycleError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// The fixed part of the connection string.
    pub fn dsn_template(&self) -> DsnTemplate {
        let template = DsnTemplate::new(self.database.clone()).with_params(self.params.clone());
        match self.tls_profile {
            Some(ref profile) => template.with_tls_profile(profile.clone()),
            None => template,
        }
    }

    /// The auth-rejection classifier, preferring `auth_pattern`.
    pub fn classifier(&self) -> Result<MarkerClassifier> {
        match self.auth_pattern {
            Some(ref pattern) => MarkerClassifier::pattern(pattern),
            None => Ok(MarkerClassifier::literal(self.auth_marker.clone())),
        }
    }

    /// A secret cache for `secret_name` backed by the configured provider.
    pub fn secret_cache(&self) -> Result<SecretCache> {
        if self.secret_name.is_empty() {
            return Err(CredCycleError::Config(
                "no secret name configured: set `secret_name` or pass --secret".into(),
            ));
        }
        Ok(
            SecretCache::from_boxed(self.secret_name.clone(), self.provider.build())
                .with_cache_duration(self.cache_duration),
        )
    }

    /// A connection-string source over [`Settings::secret_cache`].
    pub fn rds_source(&self) -> Result<RdsSource> {
        Ok(RdsSource::new(self.secret_cache()?, self.dsn_template()))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
