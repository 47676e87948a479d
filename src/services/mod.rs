//! Registry, instances and value coercion

pub mod coerce;
pub mod instance;
pub mod registry;

pub use coerce::{parse_size_in_bytes, FromConfigValue};
pub use instance::ConfigInstance;
pub use registry::ConfigRegistry;
