use std::path::Path;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};

/// Zero-amplitude PCM lasting `duration_secs`.
pub(crate) fn silent_pcm(duration_secs: f64, sample_rate: u32, channels: u16) -> AudioPcm {
    let frames = secs_to_sample_frames(duration_secs, sample_rate);
    AudioPcm {
        sample_rate,
        channels,
        interleaved_f32: vec![0.0; frames as usize * usize::from(channels)],
    }
}

/// Nearest whole sample frame for `secs` at `sample_rate`.
pub(crate) fn secs_to_sample_frames(secs: f64, sample_rate: u32) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * f64::from(sample_rate)).round() as u64
}

/// Pad with silence or truncate so `pcm` lasts exactly `duration_secs`.
pub(crate) fn fit_pcm_to_duration(pcm: &mut AudioPcm, duration_secs: f64) {
    let frames = secs_to_sample_frames(duration_secs, pcm.sample_rate) as usize;
    pcm.interleaved_f32
        .resize(frames * usize::from(pcm.channels), 0.0);
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_pcm_to_f32le_file(
    samples_interleaved: &[f32],
    out_path: &Path,
) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::render(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.clamp(-1.0, 1.0).to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::render(format!(
            "failed to write narration audio '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
