pub mod options;

pub use options::{ConfigFormat, RegistryOptions};
