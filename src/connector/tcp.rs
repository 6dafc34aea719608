//! A reachability-only driver.
//!
//! Opens a TCP connection to the `host:port` named in the connection
//! string and nothing more. Used by the `probe` command to check that
//! a decoded secret points somewhere that answers.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::decoder::dsn::address_of;

use super::Driver;

/// Default budget for resolving and connecting.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects with one time budget covering DNS resolution and every
/// connect attempt.
///
/// Resolution runs on a helper thread since the system resolver cannot be
/// interrupted. If it outlives the budget, `open` returns `TimedOut` and
/// the thread finishes in the background.
#[derive(Debug, Clone, Copy)]
pub struct TcpDriver {
    timeout: Duration,
}

impl TcpDriver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpDriver {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Driver for TcpDriver {
    type Conn = TcpStream;
    type Error = io::Error;

    fn open(&self, dsn: &str) -> io::Result<TcpStream> {
        let addr = address_of(dsn).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "connection string has no tcp(host:port) address",
            )
        })?;

        let deadline = Instant::now() + self.timeout;
        let mut last_err = None;
        for sock in resolve(addr, self.timeout)? {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out(addr));
            }
            match TcpStream::connect_timeout(&sock, remaining) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{addr} resolved to no addresses"))
        }))
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

/// Resolve `addr`, giving up after `budget`.
fn resolve(addr: &str, budget: Duration) -> io::Result<Vec<SocketAddr>> {
    let (tx, rx) = mpsc::channel();
    let owned = addr.to_string();
    thread::spawn(move || {
        let _ = tx.send(owned.to_socket_addrs().map(|addrs| addrs.collect::<Vec<_>>()));
    });
    rx.recv_timeout(budget).unwrap_or_else(|_| Err(timed_out(addr)))
}

fn timed_out(addr: &str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, format!("connecting to {addr} timed out"))
}
