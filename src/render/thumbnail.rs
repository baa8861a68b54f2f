use std::path::{Path, PathBuf};

use crate::assets::media::{decode_video_frame_rgba8, inspect_video};
use crate::foundation::error::{ReelError, ReelResult};

/// Suffix appended to the full video file name.
pub const THUMBNAIL_SUFFIX: &str = ".jpg";

/// `<video file name>.jpg`, next to the video.
pub fn thumbnail_path_for(video_path: &Path) -> PathBuf {
    let mut name = video_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(THUMBNAIL_SUFFIX);
    video_path.with_file_name(name)
}

/// Pull the frame at the temporal midpoint of `video_path` and save it as a JPEG cover.
///
/// Missing or zero-byte videos are refused; nothing is written for them.
#[tracing::instrument]
pub fn extract(video_path: &Path) -> ReelResult<PathBuf> {
    let size = std::fs::metadata(video_path)
        .map(|m| m.len())
        .map_err(|e| {
            ReelError::thumbnail(format!(
                "video '{}' is not readable: {e}",
                video_path.display()
            ))
        })?;
    if size == 0 {
        return Err(ReelError::thumbnail(format!(
            "video '{}' is empty",
            video_path.display()
        )));
    }

    let info = inspect_video(video_path)?;
    let at = midpoint_secs(info.duration_sec);
    let rgba = decode_video_frame_rgba8(&info, at)?;
    let img = image::RgbaImage::from_raw(info.width, info.height, rgba).ok_or_else(|| {
        ReelError::thumbnail(format!(
            "decoded frame does not fit {}x{}",
            info.width, info.height
        ))
    })?;

    let out = thumbnail_path_for(video_path);
    image::DynamicImage::ImageRgba8(img)
        .to_rgb8()
        .save_with_format(&out, image::ImageFormat::Jpeg)
        .map_err(|e| {
            ReelError::thumbnail(format!("failed to write '{}': {e}", out.display()))
        })?;

    tracing::info!(
        at_secs = at,
        has_audio = info.has_audio,
        out = %out.display(),
        "thumbnail extracted"
    );
    Ok(out)
}

/// Time of the representative frame for a video lasting `duration_secs`.
pub(crate) fn midpoint_secs(duration_secs: f64) -> f64 {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs / 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
