//! The credential-source capability shared by the cache and the decoder.

use std::sync::Arc;

use crate::errors::Result;

/// Anything that hands out a credential and can be told to refetch it.
///
/// [`SecretCache`](crate::cache::SecretCache) yields the raw secret,
/// [`RdsSource`](crate::decoder::RdsSource) a ready connection string.
/// The connector does not care which one it holds.
pub trait CredentialSource: Send + Sync {
    /// Current credential; `force` skips any cached value.
    fn get(&self, force: bool) -> Result<String>;

    /// Successful calls made to the underlying provider.
    fn calls_made(&self) -> u64;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Arc<T> {
    fn get(&self, force: bool) -> Result<String> {
        (**self).get(force)
    }

    fn calls_made(&self) -> u64 {
        (**self).calls_made()
    }
}
