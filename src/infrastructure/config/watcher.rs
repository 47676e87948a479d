//! Change notification for configuration files
//!
//! The parent directory is watched rather than the file itself so editors
//! that save through a rename (write temp file, move over original) keep
//! triggering reloads.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::domain::errors::ConfigResult;

/// Live watch on a single configuration file
///
/// Watching stops when this value is dropped.
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `path`, calling `on_change` on notify's thread whenever
    /// the file is created or modified
    pub fn spawn<F>(path: &Path, on_change: F) -> ConfigResult<Self>
    where
        F: Fn() + Send + 'static,
    {
        let target = path.canonicalize().map_err(notify::Error::io)?;
        let file_name = target.file_name().map(ToOwned::to_owned);
        let watch_root = target.parent().map_or_else(|| target.clone(), Path::to_path_buf);

        let event_path = target.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_change_of(&event, file_name.as_ref()) {
                    debug!(path = %event_path.display(), kind = ?event.kind, "config file changed");
                    on_change();
                }
            }
            Err(e) => error!(error = %e, path = %event_path.display(), "config file watcher error"),
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        info!(path = %target.display(), "watching config file");

        Ok(Self {
            path: target,
            _watcher: watcher,
        })
    }

    /// Canonical path of the watched file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Returns `true` if the event creates or modifies the watched file.
fn is_change_of(event: &Event, file_name: Option<&OsString>) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == file_name.map(OsString::as_os_str))
}
