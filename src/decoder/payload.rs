//! The JSON payload a managed database secret carries.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{CredCycleError, Result};

/// Credentials and location of one database, as stored by the provider.
///
/// Unknown fields are ignored. The whole struct is wiped on drop.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RdsSecret {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,

    /// Database engine, e.g. "mysql". Informational only.
    #[serde(default)]
    pub engine: Option<String>,

    #[serde(default, rename = "dbClusterIdentifier")]
    pub db_cluster_identifier: Option<String>,
}

impl RdsSecret {
    /// Parse a raw payload. Malformed input is a decode error.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CredCycleError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for RdsSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsSecret")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("engine", &self.engine)
            .field("db_cluster_identifier", &self.db_cluster_identifier)
            .finish()
    }
}
