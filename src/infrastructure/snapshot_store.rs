//! Raw HTML snapshots, a diagnostic side-channel of every fetch.
//!
//! Writes overwrite: only the latest capture for a name is kept. Failures
//! are logged and never fail the fetch that produced the capture.

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.html", name))
    }

    /// Persist `html` under `<dir>/<name>.html`
    pub async fn save(&self, name: &str, html: &str) -> Option<PathBuf> {
        let path = self.path_for(name);

        if let Err(e) = fs::create_dir_all(&self.dir).await {
            warn!("[Fetch] Cannot create snapshot dir {:?}: {}", self.dir, e);
            return None;
        }

        match fs::write(&path, html).await {
            Ok(()) => {
                debug!("[Fetch] Snapshot saved: {:?} ({} bytes)", path, html.len());
                Some(path)
            }
            Err(e) => {
                warn!("[Fetch] Failed to save snapshot {:?}: {}", path, e);
                None
            }
        }
    }
}
