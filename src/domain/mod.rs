//! Domain layer for the configuration registry
//!
//! Options the registry is built from and the errors the fallible API returns.

pub mod errors;
pub mod models;

// Re-export error types for convenient access
pub use errors::{CoerceError, ConfigError, ConfigResult};
