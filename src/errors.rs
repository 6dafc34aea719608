use thiserror::Error;

/// All errors that can occur while resolving credentials.
///
/// Connection failures are not listed here: the connector hands the
/// driver's own error back untouched inside
/// [`ConnectError::Open`](crate::connector::ConnectError::Open).
#[derive(Debug, Error)]
pub enum CredCycleError {
    // --- Provider errors ---
    #[error("Could not fetch secret '{name}': {message}")]
    Fetch { name: String, message: String },

    // --- Decoder errors ---
    #[error("Could not decode secret payload: {0}")]
    Decode(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl CredCycleError {
    /// Build a fetch error for the secret `name`.
    pub fn fetch(name: &str, message: impl Into<String>) -> Self {
        Self::Fetch {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// True for errors raised by the credential provider.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// True for errors raised while decoding a secret payload.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Convenience type alias for credcycle results.
pub type Result<T> = std::result::Result<T, CredCycleError>;
