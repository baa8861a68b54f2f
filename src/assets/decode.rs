use std::sync::Arc;

use anyhow::Context;

use crate::assets::{PreparedImage, VisualAsset};
use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;

/// Decode encoded image bytes at their intrinsic size.
pub(crate) fn decode_image(bytes: &[u8]) -> ReelResult<image::DynamicImage> {
    Ok(image::load_from_memory(bytes).context("decode image from memory")?)
}

/// Load `asset` and scale it to cover `canvas`, cropping the overflow around the centre.
pub fn load_fitted(asset: &VisualAsset, canvas: Canvas) -> ReelResult<PreparedImage> {
    let bytes = std::fs::read(&asset.path)
        .with_context(|| format!("read image asset '{}'", asset.path.display()))?;
    let dyn_img = decode_image(&bytes)
        .map_err(|e| anyhow::anyhow!("decode image asset '{}': {e}", asset.path.display()))?;
    Ok(fit_cover(&dyn_img, canvas))
}

pub(crate) fn fit_cover(img: &image::DynamicImage, canvas: Canvas) -> PreparedImage {
    let rgba = if img.width() == canvas.width && img.height() == canvas.height {
        img.to_rgba8()
    } else {
        img.resize_to_fill(
            canvas.width,
            canvas.height,
            image::imageops::FilterType::Lanczos3,
        )
        .to_rgba8()
    };
    PreparedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba8: Arc::new(rgba.into_raw()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
