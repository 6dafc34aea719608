//! Provider module: the fetch capability behind the secret cache.
//!
//! A [`SecretFetcher`] turns a secret name into its raw payload. The
//! cache treats every fetcher as a black box: errors are propagated,
//! never retried. Closures of the right shape are fetchers too, which
//! keeps test doubles small.

pub mod command;
pub mod env;
pub mod file;

pub use command::CommandFetcher;
pub use env::EnvFetcher;
pub use file::FileFetcher;

use crate::errors::Result;

/// Fetches the current raw value of a named secret from a provider.
pub trait SecretFetcher: Send + Sync {
    fn fetch(&self, name: &str) -> Result<String>;
}

impl<F> SecretFetcher for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn fetch(&self, name: &str) -> Result<String> {
        self(name)
    }
}
