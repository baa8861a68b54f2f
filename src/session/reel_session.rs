use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::assets::pool::VisualPool;
use crate::config::ReelConfig;
use crate::effects::transitions;
use crate::foundation::error::{ReelError, ReelResult};
use crate::narration::{NarrationSource, NarrationSynthesizer, NarrationTrack};
use crate::render::pipeline::{RenderOpts, Renderer};
use crate::render::thumbnail;
use crate::session::workspace::Workspace;
use crate::timeline::grade;
use crate::timeline::plan::{Timeline, build};

/// The finished output of one successful run.
///
/// Only ever built after both the video and its thumbnail exist on disk.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderedArtifact {
    /// Encoded MP4.
    pub video_path: PathBuf,
    /// JPEG cover frame.
    pub thumbnail_path: PathBuf,
    /// Length of the video in seconds.
    pub duration_secs: f64,
    /// Frames encoded.
    pub frame_count: u64,
    /// Whether the narration was spoken or silent.
    pub narration_source: NarrationSource,
    /// [`Timeline::fingerprint`] of the rendered plan.
    pub timeline_fingerprint: u64,
}

/// Narration and annotated timeline, before rendering.
#[derive(Clone, Debug)]
pub struct PlannedReel {
    /// Narration that sets the length of the reel.
    pub narration: NarrationTrack,
    /// Graded, transition-annotated slots.
    pub timeline: Timeline,
}

impl PlannedReel {
    /// Serializable summary of the plan.
    pub fn report(&self) -> PlanReport {
        PlanReport {
            narration_secs: self.narration.duration_secs,
            narration_source: self.narration.source,
            fingerprint: self.timeline.fingerprint(),
            timeline: self.timeline.clone(),
        }
    }
}

/// JSON view of a [`PlannedReel`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanReport {
    /// Narration length in seconds.
    pub narration_secs: f64,
    /// Provider that produced the narration.
    pub narration_source: NarrationSource,
    /// [`Timeline::fingerprint`].
    pub fingerprint: u64,
    /// The annotated timeline.
    pub timeline: Timeline,
}

/// Structured script produced by the external text generator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptFields {
    /// Line that is narrated.
    pub hindi_quote: String,
    /// Translation for the caption; not narrated.
    pub english_translation: String,
    /// Post caption.
    pub caption: String,
    /// Space-separated hashtags.
    pub hashtags: String,
}

impl ScriptFields {
    /// Load a script from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open script JSON '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Load a script from JSON; every field is required.
    pub fn from_reader(r: impl Read) -> ReelResult<Self> {
        let script: Self = serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse script JSON: {e}")))?;
        if script.hindi_quote.trim().is_empty() {
            return Err(ReelError::validation("script field 'hindi_quote' is empty"));
        }
        Ok(script)
    }

    /// Text handed to narration.
    pub fn narration_text(&self) -> &str {
        self.hindi_quote.trim()
    }

    /// `caption`, a blank line, then `hashtags`.
    pub fn post_caption(&self) -> String {
        format!("{}\n\n{}", self.caption.trim(), self.hashtags.trim())
    }
}

/// Everything an external uploader needs; no upload happens here.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadManifest {
    /// Video to upload.
    pub video_path: PathBuf,
    /// Cover image to attach.
    pub thumbnail_path: PathBuf,
    /// Post caption.
    pub caption: String,
    /// Video length in seconds.
    pub duration_secs: f64,
}

impl UploadManifest {
    /// Pair `artifact` with a ready-made caption.
    pub fn new(artifact: &RenderedArtifact, caption: impl Into<String>) -> Self {
        Self {
            video_path: artifact.video_path.clone(),
            thumbnail_path: artifact.thumbnail_path.clone(),
            caption: caption.into(),
            duration_secs: artifact.duration_secs,
        }
    }

    /// Pair `artifact` with the caption composed from `script`.
    pub fn from_script(artifact: &RenderedArtifact, script: &ScriptFields) -> Self {
        Self::new(artifact, script.post_caption())
    }

    /// Write the manifest as pretty JSON.
    pub fn write_to(&self, path: &Path) -> ReelResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize upload manifest")?;
        std::fs::write(path, json)
            .with_context(|| format!("write upload manifest '{}'", path.display()))?;
        Ok(())
    }
}

/// One configured pipeline: narration, planning, rendering, thumbnail.
pub struct ReelSession {
    config: ReelConfig,
    narrator: NarrationSynthesizer,
}

impl ReelSession {
    /// Validate `config` and pick the narration provider.
    pub fn new(config: ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        let narrator = NarrationSynthesizer::from_config(&config.voice);
        Ok(Self { config, narrator })
    }

    /// Validate `config` and narrate with `narrator`.
    pub fn with_narrator(config: ReelConfig, narrator: NarrationSynthesizer) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self { config, narrator })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    /// Narrate and plan `text` without touching the output directory.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub fn plan(&self, text: &str) -> ReelResult<PlannedReel> {
        let text = checked_text(text)?;
        let scratch = plan_scratch_dir();
        std::fs::create_dir_all(&scratch)
            .with_context(|| format!("create directory '{}'", scratch.display()))?;
        let planned = self.plan_in(text, &scratch);
        let _ = std::fs::remove_dir_all(&scratch);
        planned
    }

    /// Run the whole pipeline for `text`.
    ///
    /// Either both the video and its thumbnail exist afterwards, or neither does.
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    pub fn run(&self, text: &str) -> ReelResult<RenderedArtifact> {
        let text = checked_text(text)?;
        let ws = Workspace::acquire(&self.config)?;
        let planned = self.plan_in(text, ws.work_dir())?;

        let video_path = self.config.video_path();
        let thumb_path = self.config.thumbnail_path();
        let renderer = Renderer::new(RenderOpts::from_config(&self.config));
        let video = match renderer.render(
            &planned.timeline,
            &planned.narration,
            &video_path,
            ws.work_dir(),
        ) {
            Ok(v) => v,
            Err(e) => {
                ws.discard(&video_path);
                return Err(e);
            }
        };

        let thumbnail_path = match thumbnail::extract(&video.path) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "thumbnail failed; discarding video");
                ws.discard(&thumb_path);
                ws.discard(&video_path);
                return Err(e);
            }
        };

        let artifact = RenderedArtifact {
            video_path: video.path,
            thumbnail_path,
            duration_secs: video.duration_secs,
            frame_count: video.stats.frames_total,
            narration_source: planned.narration.source,
            timeline_fingerprint: planned.timeline.fingerprint(),
        };
        tracing::info!(
            video = %artifact.video_path.display(),
            thumbnail = %artifact.thumbnail_path.display(),
            duration_secs = artifact.duration_secs,
            "reel ready"
        );
        Ok(artifact)
    }

    fn plan_in(&self, text: &str, scratch_dir: &Path) -> ReelResult<PlannedReel> {
        let narration = self
            .narrator
            .synthesize(text, self.config.voice.enabled, scratch_dir);
        tracing::info!(
            duration_secs = narration.duration_secs,
            source = ?narration.source,
            "narration ready"
        );

        let pool = VisualPool::scan(&self.config.images_dir)?;
        let timeline = build(narration.duration_secs, self.config.clip_duration_secs, &pool)?;
        let timeline = grade::annotate(timeline);
        let timeline = transitions::annotate(timeline, self.config.overlap_fraction)?;
        timeline.check()?;
        tracing::info!(
            slots = timeline.len(),
            fingerprint = %format!("{:016x}", timeline.fingerprint()),
            "timeline planned"
        );

        Ok(PlannedReel {
            narration,
            timeline,
        })
    }
}

fn checked_text(text: &str) -> ReelResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ReelError::validation("narration text is empty"));
    }
    Ok(trimmed)
}

fn plan_scratch_dir() -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    std::env::temp_dir().join(format!(
        "reelforge-plan-{}-{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/session/reel_session.rs"]
mod tests;
