//! File-backed fetcher: the secret is whatever the file holds right now.
//!
//! Handy for rotation drills: edit the file, change the database
//! password, and watch the connector pick up the new value.

use std::path::{Path, PathBuf};

use crate::errors::{CredCycleError, Result};

use super::SecretFetcher;

/// Reads the raw secret from a file on every fetch.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretFetcher for FileFetcher {
    fn fetch(&self, name: &str) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            CredCycleError::fetch(name, format!("read {}: {e}", self.path.display()))
        })
    }
}
