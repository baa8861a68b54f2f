use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::load_fitted;
use crate::assets::media::MIX_SAMPLE_RATE;
use crate::assets::{PreparedImage, VisualAsset};
use crate::audio::pcm::{fit_pcm_to_duration, silent_pcm, write_pcm_to_f32le_file};
use crate::config::ReelConfig;
use crate::effects::composite::{crossfade_into, grade_in_place};
use crate::effects::transitions::{SlotBlend, blend_at};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::narration::NarrationTrack;
use crate::timeline::plan::{ClipSlot, Timeline};

/// Render settings derived from [`ReelConfig`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background used to flatten transparency.
    pub bg_rgba: [u8; 4],
    /// Prepare slot frames on a rayon pool.
    pub parallel: bool,
    /// Override rayon worker threads.
    pub threads: Option<usize>,
}

impl RenderOpts {
    /// Pick the render-related fields out of `cfg`.
    pub fn from_config(cfg: &ReelConfig) -> Self {
        Self {
            fps: cfg.fps,
            canvas: cfg.canvas,
            bg_rgba: cfg.bg_rgba,
            parallel: cfg.parallel,
            threads: cfg.threads,
        }
    }
}

/// Counters for one render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames produced by a crossfade.
    pub frames_blended: u64,
    /// Distinct images decoded.
    pub assets_decoded: usize,
}

/// A successfully encoded video.
#[derive(Clone, Debug)]
pub struct RenderedVideo {
    /// Encoded file.
    pub path: PathBuf,
    /// Duration of the visual stream in seconds.
    pub duration_secs: f64,
    /// Frame and decode counters.
    pub stats: RenderStats,
}

/// Graded still for each slot, in slot order.
pub struct SlotFrames {
    frames: Vec<Arc<Vec<u8>>>,
    assets_decoded: usize,
}

impl SlotFrames {
    /// Graded RGBA8 for slot `i`.
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        self.frames.get(i).map(|f| f.as_slice())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when no slots were prepared.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Composites an annotated [`Timeline`] and muxes it with narration.
#[derive(Clone, Debug)]
pub struct Renderer {
    opts: RenderOpts,
}

impl Renderer {
    /// Create a renderer.
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }

    /// Settings in use.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Number of frames covering `duration_secs`.
    pub fn frame_count(&self, duration_secs: f64) -> u64 {
        self.opts.fps.secs_to_frames_round(duration_secs)
    }

    /// Decode each distinct asset once, fit it to the canvas, and grade a copy per slot.
    pub fn prepare(&self, timeline: &Timeline) -> ReelResult<SlotFrames> {
        timeline.check()?;
        self.opts.canvas.validate()?;

        let mut unique: Vec<&VisualAsset> = Vec::new();
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for slot in &timeline.slots {
            if !index_of.contains_key(slot.asset.id.as_str()) {
                index_of.insert(slot.asset.id.as_str(), unique.len());
                unique.push(&slot.asset);
            }
        }

        let canvas = self.opts.canvas;
        let decode = |asset: &&VisualAsset| -> ReelResult<PreparedImage> {
            load_fitted(asset, canvas)
                .map_err(|e| ReelError::render(format!("asset '{}': {e}", asset.id)))
        };
        let grade = |slot: &ClipSlot,
                     images: &[PreparedImage]|
         -> ReelResult<Arc<Vec<u8>>> {
            let base = &images[index_of[slot.asset.id.as_str()]];
            let mut buf = base.rgba8.as_ref().clone();
            grade_in_place(&mut buf, slot.grade as f32)?;
            Ok(Arc::new(buf))
        };

        let (images, frames) = if self.opts.parallel {
            let pool = build_thread_pool(self.opts.threads)?;
            pool.install(|| -> ReelResult<_> {
                let images = unique
                    .par_iter()
                    .map(decode)
                    .collect::<ReelResult<Vec<_>>>()?;
                let frames = timeline
                    .slots
                    .par_iter()
                    .map(|slot| grade(slot, &images))
                    .collect::<ReelResult<Vec<_>>>()?;
                Ok((images, frames))
            })?
        } else {
            let images = unique.iter().map(decode).collect::<ReelResult<Vec<_>>>()?;
            let frames = timeline
                .slots
                .iter()
                .map(|slot| grade(slot, &images))
                .collect::<ReelResult<Vec<_>>>()?;
            (images, frames)
        };

        tracing::debug!(
            assets = images.len(),
            slots = frames.len(),
            "slot frames prepared"
        );
        Ok(SlotFrames {
            frames,
            assets_decoded: images.len(),
        })
    }

    /// Stream the composited frames into `sink`, in frame order.
    pub fn stream(
        &self,
        timeline: &Timeline,
        slots: &SlotFrames,
        sink: &mut dyn FrameSink,
        audio: Option<AudioInputConfig>,
    ) -> ReelResult<RenderStats> {
        if slots.len() != timeline.len() {
            return Err(ReelError::render(format!(
                "prepared {} slot frames for a {}-slot timeline",
                slots.len(),
                timeline.len()
            )));
        }

        let canvas = self.opts.canvas;
        let fps = self.opts.fps;
        let total = self.frame_count(timeline.narration_secs);
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
            audio,
        })?;

        let mut frame = FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgba_len()],
        };
        let mut stats = RenderStats {
            assets_decoded: slots.assets_decoded,
            ..RenderStats::default()
        };
        for k in 0..total {
            let t = fps.frames_to_secs(k);
            match blend_at(timeline, t) {
                SlotBlend::Single(i) => {
                    frame.data.copy_from_slice(slot_frame(slots, i)?);
                }
                SlotBlend::Crossfade { from, to, t } => {
                    crossfade_into(
                        &mut frame.data,
                        slot_frame(slots, from)?,
                        slot_frame(slots, to)?,
                        t,
                    )?;
                    stats.frames_blended += 1;
                }
            }
            sink.push_frame(FrameIndex(k), &frame)?;
            stats.frames_total += 1;
        }
        sink.end()?;
        Ok(stats)
    }

    /// Render `timeline` with `narration` to an MP4 at `out_path`.
    ///
    /// The narration PCM is written to `work_dir` and padded or trimmed to the exact length of the
    /// visual stream. A partially written `out_path` is removed when rendering fails.
    #[tracing::instrument(skip(self, timeline, narration), fields(slots = timeline.len()))]
    pub fn render(
        &self,
        timeline: &Timeline,
        narration: &NarrationTrack,
        out_path: &Path,
        work_dir: &Path,
    ) -> ReelResult<RenderedVideo> {
        let result = self.render_to(timeline, narration, out_path, work_dir);
        if result.is_err() && out_path.exists() {
            match std::fs::remove_file(out_path) {
                Ok(()) => tracing::warn!(out = %out_path.display(), "removed partial output"),
                Err(e) => tracing::warn!(
                    out = %out_path.display(),
                    error = %e,
                    "failed to remove partial output"
                ),
            }
        }
        result
    }

    fn render_to(
        &self,
        timeline: &Timeline,
        narration: &NarrationTrack,
        out_path: &Path,
        work_dir: &Path,
    ) -> ReelResult<RenderedVideo> {
        let slots = self.prepare(timeline)?;

        let frames = self.frame_count(timeline.narration_secs);
        let video_secs = self.opts.fps.frames_to_secs(frames);
        let mut pcm = narration.pcm.clone();
        if pcm.sample_rate == 0 || pcm.channels == 0 {
            pcm = silent_pcm(video_secs, MIX_SAMPLE_RATE, 2);
        }
        fit_pcm_to_duration(&mut pcm, video_secs);
        let audio_path = work_dir.join("narration.f32le");
        write_pcm_to_f32le_file(&pcm.interleaved_f32, &audio_path)?;
        let audio = AudioInputConfig {
            path: audio_path,
            sample_rate: pcm.sample_rate,
            channels: pcm.channels,
        };

        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out_path.to_path_buf(),
            bg_rgba: self.opts.bg_rgba,
        });
        let stats = self.stream(timeline, &slots, &mut sink, Some(audio))?;

        let written = std::fs::metadata(out_path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ReelError::render(format!(
                "encoder finished but '{}' is missing or empty",
                out_path.display()
            )));
        }

        tracing::info!(
            frames = stats.frames_total,
            blended = stats.frames_blended,
            size_mb = written as f64 / 1024.0 / 1024.0,
            out = %out_path.display(),
            "render complete"
        );
        Ok(RenderedVideo {
            path: out_path.to_path_buf(),
            duration_secs: video_secs,
            stats,
        })
    }
}

fn slot_frame(slots: &SlotFrames, i: usize) -> ReelResult<&[u8]> {
    slots
        .get(i)
        .ok_or_else(|| ReelError::render(format!("internal error: slot {i} was not prepared")))
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
