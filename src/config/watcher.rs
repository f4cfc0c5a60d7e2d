//! Config file watcher for `probe --watch-config`.
//!
//! # Design Decisions
//! - Watches the parent directory, not the file: editors and deploy tools
//!   replace the file by rename, which drops a watch held on the old inode
//! - Events for other files in that directory are ignored
//! - Only configs that pass validation reach the monitor; a bad edit keeps
//!   the running probe list

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::DialerConfig;

/// Sends a fresh [`DialerConfig`] every time the file is rewritten with a
/// valid config.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<DialerConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver for validated updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<DialerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Keep the returned watcher alive for as long as
    /// updates are wanted; dropping it stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(OsString::from);
        let path = self.path.clone();
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !is_rewrite(&event.kind) {
                    return;
                }
                if !event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == file_name.as_deref())
                {
                    return;
                }
                if tx.is_closed() {
                    tracing::debug!("Config receiver gone, ignoring change");
                    return;
                }

                match load_config(&path) {
                    Ok(config) => {
                        tracing::info!(
                            path = %path.display(),
                            targets = config.probe.targets.len(),
                            "Config reloaded"
                        );
                        if tx.send(config).is_err() {
                            tracing::debug!("Config receiver gone, dropping reload");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Config reload rejected, keeping current targets"
                        );
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn is_rewrite(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}
