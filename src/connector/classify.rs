//! Recognizing "the server rejected this credential".
//!
//! Drivers rarely expose a typed access-denied error, so the usual
//! signal is a fixed code inside the error text. That match lives here,
//! behind [`AuthClassifier`], so it can be swapped per driver without
//! touching the retry logic.

use std::error::Error;

use regex::Regex;

use crate::errors::{CredCycleError, Result};

/// MySQL's "Access denied for user" error code, as the driver prints it.
pub const MYSQL_ACCESS_DENIED_MARKER: &str = "Error 1045";

/// What a failed open means for the retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    /// The server refused the presented credential.
    AuthRejected,
    /// Anything else: network, server down, unknown database...
    Other,
}

/// Maps a driver error to an [`OpenFailure`].
pub trait AuthClassifier: Send + Sync {
    fn classify(&self, err: &(dyn Error + 'static)) -> OpenFailure;
}

impl<F> AuthClassifier for F
where
    F: Fn(&(dyn Error + 'static)) -> OpenFailure + Send + Sync,
{
    fn classify(&self, err: &(dyn Error + 'static)) -> OpenFailure {
        self(err)
    }
}

#[derive(Debug, Clone)]
enum Marker {
    Literal(String),
    Pattern(Regex),
}

/// Classifies by looking for a marker in the error's display text.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    marker: Marker,
}

impl MarkerClassifier {
    /// Match errors whose text contains `marker` verbatim.
    pub fn literal(marker: impl Into<String>) -> Self {
        Self {
            marker: Marker::Literal(marker.into()),
        }
    }

    /// Match errors whose text matches the regular expression `pattern`.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            CredCycleError::Config(format!("invalid auth marker pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            marker: Marker::Pattern(regex),
        })
    }

    /// The marker as text, for display.
    pub fn marker(&self) -> &str {
        match self.marker {
            Marker::Literal(ref s) => s,
            Marker::Pattern(ref re) => re.as_str(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self.marker {
            Marker::Literal(ref s) => text.contains(s.as_str()),
            Marker::Pattern(ref re) => re.is_match(text),
        }
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::literal(MYSQL_ACCESS_DENIED_MARKER)
    }
}

impl AuthClassifier for MarkerClassifier {
    fn classify(&self, err: &(dyn Error + 'static)) -> OpenFailure {
        if self.matches(&err.to_string()) {
            OpenFailure::AuthRejected
        } else {
            OpenFailure::Other
        }
    }
}
