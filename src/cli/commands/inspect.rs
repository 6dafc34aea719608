//! `credcycle inspect`: fetch and decode the secret, twice each.
//!
//! The second fetch should be served from cache, so "calls made" stays
//! at 1. The password is never printed; the raw payload is shown only
//! as a SHA-256 fingerprint, which changes when the secret rotates.

use sha2::{Digest, Sha256};

use crate::cli::{output, settings, Cli};
use crate::errors::{CredCycleError, Result};

/// Execute the `inspect` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = settings(cli)?;

    // 1. Raw secret through the cache.
    let cache = settings.secret_cache()?;
    cache.get(false)?;
    let raw = cache.get(false)?;
    output::info(&format!(
        "Secret '{}': fingerprint {}, calls made: {}",
        cache.name(),
        fingerprint(&raw),
        cache.calls_made()
    ));

    // 2. Decoded connection string through a fresh cache.
    let rds = settings.rds_source()?;
    rds.get(false)?;
    rds.get(false)?;
    output::info(&format!("Decoded secret, calls made: {}", rds.calls_made()));
    if rds.calls_made() > 1 || cache.calls_made() > 1 {
        output::warning("Repeated reads reached the provider; check cache_duration.");
    }

    let target = rds
        .target()
        .ok_or_else(|| CredCycleError::CommandFailed("secret decoded to no target".into()))?;
    let redacted = rds.redacted_dsn().unwrap_or_default();
    output::print_target_table(&target, &redacted);

    Ok(())
}

/// First 16 hex digits of the payload's SHA-256.
fn fingerprint(raw: &str) -> String {
    Sha256::digest(raw.as_bytes())
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = fingerprint("secret");
        assert_eq!(a.len(), 16);
        assert_eq!(a, fingerprint("secret"));
        assert_ne!(a, fingerprint("secret2"));
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(fingerprint("abc"), "ba7816bf8f01cfea");
    }
}
