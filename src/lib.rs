pub mod cache;
pub mod cli;
pub mod config;
pub mod connector;
pub mod decoder;
pub mod errors;
pub mod provider;
pub mod source;

pub use cache::SecretCache;
pub use connector::{ConnectError, Connector, Driver};
pub use decoder::RdsSource;
pub use errors::{CredCycleError, Result};
pub use source::CredentialSource;
