use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate used for narration PCM and the muxed audio stream.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Stream facts about an encoded video, as reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Probed file.
    pub source_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Container duration in seconds (0 when unknown).
    pub duration_sec: f64,
    /// Whether an audio stream is present.
    pub has_audio: bool,
}

/// Interleaved PCM audio.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.interleaved_f32.len() / usize::from(self.channels);
        frames as f64 / f64::from(self.sample_rate)
    }
}

/// Run `ffprobe` on `source_path`.
pub fn inspect_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::thumbnail(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::thumbnail(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::thumbnail(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::thumbnail("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| ReelError::thumbnail("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ReelError::thumbnail("missing video height from ffprobe"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_sec,
        has_audio,
    })
}

/// Decode the frame shown at `source_time_sec` as straight RGBA8.
pub fn decode_video_frame_rgba8(
    source: &VideoSourceInfo,
    source_time_sec: f64,
) -> ReelResult<Vec<u8>> {
    let out = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-ss",
            &format!("{:.6}", source_time_sec.max(0.0)),
        ])
        .arg("-i")
        .arg(&source.source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::thumbnail(format!("failed to run ffmpeg for frame decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::thumbnail(format!(
            "ffmpeg frame decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.width as usize * source.height as usize * 4;
    if expected_len == 0 {
        return Err(ReelError::thumbnail(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }
    if out.stdout.len() < expected_len {
        return Err(ReelError::thumbnail(format!(
            "decoded frame is short: got {} bytes, expected {expected_len}",
            out.stdout.len()
        )));
    }
    let mut frame = out.stdout;
    frame.truncate(expected_len);
    Ok(frame)
}

/// Decode any audio file `ffmpeg` understands into interleaved stereo `f32`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            ReelError::engine_unavailable(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(ReelError::engine_unavailable(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::engine_unavailable(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

/// Return `true` when `program <check_arg>` runs successfully from `PATH`.
pub fn is_tool_on_path(program: &str, check_arg: &str) -> bool {
    Command::new(program)
        .arg(check_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path("ffmpeg", "-version")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
