//! Configuration file infrastructure
//!
//! - File loading through figment, with an optional environment overlay
//! - Dotted-key lookup and flattening over the parsed tree
//! - Change notification through notify

pub mod loader;
pub mod tree;
pub mod watcher;

pub use loader::ConfigLoader;
pub use watcher::FileWatcher;
