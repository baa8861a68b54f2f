use std::{path::PathBuf, sync::Arc};

pub(crate) mod decode;
pub(crate) mod media;
pub(crate) mod pool;

/// One image in the visual pool.
///
/// Assets are read-only: the pipeline never writes back to the pool and the same asset may back
/// several slots in one run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VisualAsset {
    /// Stable identifier (the file name).
    pub id: String,
    /// Location of the encoded image.
    pub path: PathBuf,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
}

/// Decoded image fitted to the output canvas.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight RGBA8, row-major, tightly packed.
    pub rgba8: Arc<Vec<u8>>,
}
