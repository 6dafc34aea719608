//! `RdsSource`: turns a cached JSON secret into a connection string.
//!
//! The decoded result is memoized against the raw payload it came from,
//! so an unchanged secret is never parsed twice and the connection
//! string only changes when the provider's payload does.

use parking_lot::Mutex;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::cache::SecretCache;
use crate::errors::Result;
use crate::source::CredentialSource;

use super::dsn::DsnTemplate;
use super::payload::RdsSecret;

/// Where a decoded secret points, without the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub username: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

#[derive(Default)]
struct Decoded {
    /// Raw payload behind `dsn`; `None` until the first good decode.
    raw_seen: Option<Zeroizing<String>>,
    target: Option<ConnectionTarget>,
    dsn: Zeroizing<String>,
    decodes: u64,
}

/// A credential source producing MySQL connection strings.
pub struct RdsSource<S = SecretCache> {
    child: S,
    template: DsnTemplate,
    decoded: Mutex<Decoded>,
}

impl<S: CredentialSource> RdsSource<S> {
    /// Wrap `child`, which must yield the raw JSON payload.
    pub fn new(child: S, template: DsnTemplate) -> Self {
        Self {
            child,
            template,
            decoded: Mutex::new(Decoded::default()),
        }
    }

    pub fn template(&self) -> &DsnTemplate {
        &self.template
    }

    pub fn child(&self) -> &S {
        &self.child
    }

    /// The connection string for the current secret.
    ///
    /// A malformed payload is reported as a decode error and the
    /// previously decoded connection string stays in place.
    pub fn get(&self, force: bool) -> Result<String> {
        let mut decoded = self.decoded.lock();
        let raw = Zeroizing::new(self.child.get(force)?);

        if let Some(ref seen) = decoded.raw_seen {
            if bool::from(seen.as_bytes().ct_eq(raw.as_bytes())) {
                tracing::trace!("secret unchanged, reusing connection string");
                return Ok(String::clone(&decoded.dsn));
            }
        }

        let secret = RdsSecret::parse(&raw)?;
        decoded.decodes += 1;

        let dsn = self
            .template
            .render(&secret.username, &secret.password, &secret.host, secret.port);
        let target = ConnectionTarget {
            username: secret.username.clone(),
            host: secret.host.clone(),
            port: secret.port,
            database: self.template.database.clone(),
        };
        tracing::info!(
            user = %target.username,
            host = %target.host,
            port = target.port,
            "decoded new database credentials"
        );

        decoded.dsn = dsn;
        decoded.target = Some(target);
        decoded.raw_seen = Some(raw);
        Ok(String::clone(&decoded.dsn))
    }

    /// Successful calls made to the provider behind the cache.
    pub fn calls_made(&self) -> u64 {
        self.child.calls_made()
    }

    /// How many times a payload has actually been parsed.
    pub fn decodes(&self) -> u64 {
        self.decoded.lock().decodes
    }

    /// The last successfully decoded target, if any.
    pub fn target(&self) -> Option<ConnectionTarget> {
        self.decoded.lock().target.clone()
    }

    /// The current connection string with the password masked.
    pub fn redacted_dsn(&self) -> Option<String> {
        let decoded = self.decoded.lock();
        decoded.target.as_ref().map(|t| {
            String::clone(&self.template.render(&t.username, "***", &t.host, t.port))
        })
    }
}

impl<S: CredentialSource> CredentialSource for RdsSource<S> {
    fn get(&self, force: bool) -> Result<String> {
        RdsSource::get(self, force)
    }

    fn calls_made(&self) -> u64 {
        RdsSource::calls_made(self)
    }
}

impl<S> std::fmt::Debug for RdsSource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsSource")
            .field("template", &self.template)
            .field("target", &self.decoded.lock().target)
            .finish_non_exhaustive()
    }
}
