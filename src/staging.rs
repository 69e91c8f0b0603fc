/*!
 * Staging areas for intermediate pipeline outputs.
 *
 * Each pipeline stage that produces files gets its own uniquely named
 * directory under the system temp root. The directory is removed when the
 * area is cleaned up or dropped, on success and failure paths alike;
 * cleanup is idempotent so explicit invocation ahead of drop is safe.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use tempfile::TempDir;

/// An exclusively-owned scratch directory scoped to one pipeline stage
#[derive(Debug)]
pub struct StagingArea {
    dir: Option<TempDir>,
    path: PathBuf,
    retain: bool,
}

impl StagingArea {
    /// Create a fresh staging directory whose name starts with `prefix`
    pub fn stage(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .with_context(|| format!("Failed to create staging directory with prefix '{}'", prefix))?;
        let path = dir.path().to_path_buf();

        Ok(StagingArea {
            dir: Some(dir),
            path,
            retain: false,
        })
    }

    /// Root of the staging directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a member file inside the staging directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Keep the directory on disk instead of removing it at cleanup
    pub fn retain(&mut self) {
        self.retain = true;
    }

    /// Remove the staging directory and everything beneath it.
    ///
    /// A second call is a no-op.
    pub fn cleanup(&mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };

        if self.retain {
            let kept = dir.into_path();
            info!("Keeping staging directory {:?}", kept);
            return Ok(());
        }

        dir.close()
            .with_context(|| format!("Failed to remove staging directory {:?}", self.path))
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("{}", e);
        }
    }
}
