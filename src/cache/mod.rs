//! Cache module: the TTL-bounded credential cache.
//!
//! This module provides:
//! - `SecretCache`, holding one secret with forced-refresh support (`secret`)
//! - The `Clock` seam used to decide expiry (`clock`)

pub mod clock;
pub mod secret;

// Re-export the most commonly used items.
pub use clock::{Clock, ManualClock, SystemClock};
pub use secret::{SecretCache, DEFAULT_CACHE_DURATION};
