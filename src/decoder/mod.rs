//! Decoder module: from a raw provider payload to a connection string.
//!
//! This module provides:
//! - The `RdsSecret` payload shape and its parser (`payload`)
//! - `DsnTemplate`, the fixed part of the connection string (`dsn`)
//! - `RdsSource`, a memoizing credential source over a secret cache (`rds`)

pub mod dsn;
pub mod payload;
pub mod rds;

// Re-export the most commonly used items.
pub use dsn::DsnTemplate;
pub use payload::RdsSecret;
pub use rds::{ConnectionTarget, RdsSource};
