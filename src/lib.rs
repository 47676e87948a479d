//! Confhub - named configuration registry with typed accessors
//!
//! Confhub loads structured configuration files by logical name, keeps them
//! current as they change on disk, and reads values through typed getters
//! that fall back to a default instead of failing.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): error types and registry options
//! - **Service Layer** (`services`): registry, instances and value coercion
//! - **Infrastructure Layer** (`infrastructure`): figment loading, notify
//!   watching, tracing setup
//! - **Process-wide facade**: free functions over one default registry
//!
//! # Example
//!
//! ```no_run
//! use confhub::{ConfigRegistry, RegistryOptions};
//!
//! let registry = ConfigRegistry::new(RegistryOptions::default().with_config_path("etc"));
//! let app = registry.use_name("app");
//! let port = app.get_int("server.port", Some(8080));
//! let timeout = app.try_get_duration("server.timeout");
//! # let _ = (port, timeout);
//! ```

#[macro_use]
mod macros;

pub mod domain;
pub mod global;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CoerceError, ConfigError, ConfigResult};
pub use domain::models::{ConfigFormat, RegistryOptions};
pub use global::*;
pub use infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
pub use services::{ConfigInstance, ConfigRegistry, FromConfigValue};
