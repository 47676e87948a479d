//! Infrastructure layer module
//!
//! Adapters around the external crates:
//! - Configuration file loading (figment) and watching (notify)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod logging;
