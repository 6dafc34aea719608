//! Connector module: opening connections that survive credential rotation.
//!
//! A [`Connector`] asks its credential source for a connection string and
//! hands it to a [`Driver`]. When the server rejects the credential, the
//! cached value is provably stale: the connector forces one refetch and
//! tries exactly once more. Every other failure goes straight back to
//! the caller.
//!
//! This module provides:
//! - The `Driver` capability and `ConnectError` (here)
//! - Auth-rejection classification (`classify`)
//! - A TCP reachability driver for smoke tests (`tcp`)

pub mod classify;
pub mod tcp;

pub use classify::{AuthClassifier, MarkerClassifier, OpenFailure, MYSQL_ACCESS_DENIED_MARKER};
pub use tcp::TcpDriver;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::errors::CredCycleError;
use crate::source::CredentialSource;

/// Opens database connections from a connection string.
pub trait Driver: Send + Sync {
    type Conn;
    type Error: std::error::Error + Send + Sync + 'static;

    fn open(&self, dsn: &str) -> Result<Self::Conn, Self::Error>;

    /// Identity of the driver, for pools and logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T: Driver> Driver for Arc<T> {
    type Conn = T::Conn;
    type Error = T::Error;

    fn open(&self, dsn: &str) -> Result<Self::Conn, Self::Error> {
        (**self).open(dsn)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Why [`Connector::connect`] failed.
///
/// Driver errors are carried as-is so callers can match on them.
#[derive(Debug, Error)]
pub enum ConnectError<E>
where
    E: std::error::Error + 'static,
{
    /// The credential could not be fetched or decoded.
    #[error(transparent)]
    Credential(#[from] CredCycleError),

    /// The driver failed to open a connection.
    #[error(transparent)]
    Open(E),

    /// The deadline passed; any connection that was opened has been closed.
    #[error("connection attempt abandoned: deadline passed")]
    Cancelled,
}

/// Opens connections, retrying once with a fresh credential when the
/// server rejects the cached one.
pub struct Connector<S, D> {
    source: S,
    driver: D,
    classifier: Box<dyn AuthClassifier>,
    /// Serializes connect attempts so retries never race.
    lock: Mutex<()>,
}

impl<S: CredentialSource, D: Driver> Connector<S, D> {
    pub fn new(source: S, driver: D) -> Self {
        Self {
            source,
            driver,
            classifier: Box::new(MarkerClassifier::default()),
            lock: Mutex::new(()),
        }
    }

    /// Replace the auth-rejection classifier.
    pub fn with_classifier(mut self, classifier: impl AuthClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Swap the driver, keeping source and classifier.
    pub fn with_driver<D2: Driver>(self, driver: D2) -> Connector<S, D2> {
        Connector {
            source: self.source,
            driver,
            classifier: self.classifier,
            lock: self.lock,
        }
    }

    /// The driver connections are opened with.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Open a connection.
    ///
    /// On an auth rejection the credential is refetched with `force` and
    /// the open is retried once; the second result is final either way.
    pub fn connect(&self) -> Result<D::Conn, ConnectError<D::Error>> {
        self.connect_inner(None)
    }

    /// Like [`Connector::connect`], but gives up once `deadline` passes.
    ///
    /// Waiting behind another attempt counts against the deadline. After
    /// that it is checked between steps since the source and driver calls
    /// block. A connection that arrives late is closed before returning
    /// [`ConnectError::Cancelled`].
    pub fn connect_before(&self, deadline: Instant) -> Result<D::Conn, ConnectError<D::Error>> {
        self.connect_inner(Some(deadline))
    }

    fn connect_inner(&self, deadline: Option<Instant>) -> Result<D::Conn, ConnectError<D::Error>> {
        let _guard = match deadline {
            Some(at) => self.lock.try_lock_until(at).ok_or(ConnectError::<D::Error>::Cancelled)?,
            None => self.lock.lock(),
        };
        check_deadline::<D::Error>(deadline)?;

        let dsn = Zeroizing::new(self.source.get(false)?);
        let conn = match self.driver.open(&dsn) {
            Ok(conn) => conn,
            Err(err) => {
                if self.classifier.classify(&err) == OpenFailure::AuthRejected {
                    tracing::warn!(
                        driver = self.driver.name(),
                        "credential rejected by server, refetching and retrying once"
                    );
                    check_deadline::<D::Error>(deadline)?;
                    let dsn = Zeroizing::new(self.source.get(true)?);
                    self.driver.open(&dsn).map_err(ConnectError::Open)?
                } else {
                    tracing::debug!(driver = self.driver.name(), error = %err, "open failed");
                    return Err(ConnectError::Open(err));
                }
            }
        };

        if let Err(e) = check_deadline(deadline) {
            drop(conn);
            return Err(e);
        }
        Ok(conn)
    }
}

fn check_deadline<E>(deadline: Option<Instant>) -> Result<(), ConnectError<E>>
where
    E: std::error::Error + 'static,
{
    match deadline {
        Some(at) if Instant::now() >= at => Err(ConnectError::Cancelled),
        _ => Ok(()),
    }
}

impl<S, D: Driver> std::fmt::Debug for Connector<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("driver", &self.driver.name())
            .finish_non_exhaustive()
    }
}
