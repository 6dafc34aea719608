//! Config module: `credcycle.toml` settings.

pub mod settings;

pub use settings::{ProviderConfig, Settings};
