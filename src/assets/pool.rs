use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::VisualAsset;
use crate::foundation::error::{ReelError, ReelResult};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Ordered snapshot of the images available in a pool directory.
#[derive(Clone, Debug, Default)]
pub struct VisualPool {
    root: PathBuf,
    assets: Vec<VisualAsset>,
}

impl VisualPool {
    /// Enumerate `dir` in lexicographic file-name order.
    ///
    /// A missing directory is an empty pool. Files that are hidden, have an unsupported extension,
    /// or whose header cannot be read are skipped.
    pub fn scan(dir: impl AsRef<Path>) -> ReelResult<Self> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            tracing::debug!(dir = %root.display(), "visual pool directory missing");
            return Ok(Self {
                root,
                assets: Vec::new(),
            });
        }

        let mut candidates = Vec::new();
        let entries = std::fs::read_dir(&root)
            .with_context(|| format!("read visual pool '{}'", root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in '{}'", root.display()))?;
            let path = entry.path();
            if !path.is_file() || !has_image_extension(&path) {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
                continue;
            };
            if id.starts_with('.') {
                continue;
            }
            candidates.push((id, path));
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut assets = Vec::with_capacity(candidates.len());
        for (id, path) in candidates {
            match image::image_dimensions(&path) {
                Ok((width, height)) if width > 0 && height > 0 => assets.push(VisualAsset {
                    id,
                    path,
                    width,
                    height,
                }),
                Ok(_) => tracing::warn!(asset = %id, "skipping zero-sized image"),
                Err(e) => tracing::warn!(asset = %id, error = %e, "skipping unreadable image"),
            }
        }

        Ok(Self { root, assets })
    }

    /// Build a pool from already-described assets, keeping their order.
    pub fn from_assets(root: impl Into<PathBuf>, assets: Vec<VisualAsset>) -> Self {
        Self {
            root: root.into(),
            assets,
        }
    }

    /// Assets in pool order.
    pub fn assets(&self) -> &[VisualAsset] {
        &self.assets
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// `true` when the pool holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Pick `count` assets in pool order, wrapping around when the pool is smaller.
    pub fn select(&self, count: usize) -> ReelResult<Vec<VisualAsset>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.assets.is_empty() {
            return Err(ReelError::empty_asset_pool(format!(
                "no usable images in '{}' but {count} clip slot(s) need one",
                self.root.display()
            )));
        }
        if count > self.assets.len() {
            tracing::warn!(
                pool = self.assets.len(),
                slots = count,
                "visual pool smaller than slot count; cycling assets"
            );
        }
        Ok(cycle_indices(self.assets.len(), count)
            .into_iter()
            .map(|i| self.assets[i].clone())
            .collect())
    }
}

/// Scan `pool_dir` and pick `count` assets from it.
pub fn select(pool_dir: impl AsRef<Path>, count: usize) -> ReelResult<Vec<VisualAsset>> {
    VisualPool::scan(pool_dir)?.select(count)
}

/// Pool indices for `count` slots over a pool of `pool_len` assets.
pub(crate) fn cycle_indices(pool_len: usize, count: usize) -> Vec<usize> {
    if pool_len == 0 {
        return Vec::new();
    }
    (0..count).map(|i| i % pool_len).collect()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
