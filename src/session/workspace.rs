use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::ReelConfig;
use crate::foundation::error::ReelResult;

/// Output and intermediate directories for one run.
///
/// Acquiring wipes both directories. Dropping removes the intermediate directory on every exit
/// path; finished artifacts in the output directory are never touched.
#[derive(Debug)]
pub struct Workspace {
    output_dir: PathBuf,
    work_dir: PathBuf,
    images_dir: PathBuf,
}

impl Workspace {
    /// Wipe and recreate the directories named by `cfg`.
    ///
    /// `cfg` is validated first, so nothing is removed for a work or output directory that would
    /// swallow the images or each other. A wipe that fails (a file held open, missing
    /// permissions) is logged and skipped; the run continues on top of the leftovers.
    pub fn acquire(cfg: &ReelConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let output_dir = cfg.output_dir.clone();
        let work_dir = cfg.work_dir();
        let images_dir = cfg.images_dir.clone();

        wipe(&output_dir);
        if !work_dir.starts_with(&output_dir) {
            wipe(&work_dir);
        }

        for dir in [&output_dir, &work_dir, &images_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
        }

        tracing::info!(
            output = %output_dir.display(),
            work = %work_dir.display(),
            "workspace ready"
        );
        Ok(Self {
            output_dir,
            work_dir,
            images_dir,
        })
    }

    /// Directory that receives the finished video and thumbnail.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory for intermediates; gone once the workspace is dropped.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Visual pool directory, created if it was missing.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Remove a partially written artifact. Missing files are ignored.
    pub fn discard(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::info!(path = %path.display(), "discarded partial artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to discard partial artifact"
            ),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.work_dir) {
            Ok(()) => tracing::debug!(work = %self.work_dir.display(), "intermediates removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                work = %self.work_dir.display(),
                error = %e,
                "failed to remove intermediates"
            ),
        }
    }
}

fn wipe(dir: &Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        tracing::warn!(
            dir = %dir.display(),
            error = %e,
            "could not wipe directory (file in use?); continuing without cleanup"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/workspace.rs"]
mod tests;
