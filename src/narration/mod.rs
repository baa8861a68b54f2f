//! Narration synthesis.
//!
//! Speech is an optional capability. [`NarrationSynthesizer`] picks a provider once, at
//! construction, and never fails: when the engine is missing, disabled, or breaks mid-run the
//! track falls back to silence with a duration estimated from the text.

use std::path::Path;

use crate::assets::media::AudioPcm;
use crate::config::VoiceConfig;
use crate::foundation::error::ReelResult;

pub(crate) mod engine;
pub(crate) mod heuristic;

pub use engine::EngineNarration;
pub use heuristic::HeuristicNarration;

/// Which provider produced a [`NarrationTrack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationSource {
    /// Synthesized speech.
    Engine,
    /// Silence with an estimated duration.
    Heuristic,
}

/// Narration audio for one run.
#[derive(Clone, Debug)]
pub struct NarrationTrack {
    /// Interleaved PCM; silent for heuristic tracks.
    pub pcm: AudioPcm,
    /// Total duration in seconds, always `> 0`.
    pub duration_secs: f64,
    /// Provider that produced the track.
    pub source: NarrationSource,
}

/// A way of turning text into a [`NarrationTrack`].
pub trait NarrationProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Produce narration for `text`, writing any intermediate files under `scratch_dir`.
    fn synthesize(&self, text: &str, scratch_dir: &Path) -> ReelResult<NarrationTrack>;
}

/// Narration stage: a primary provider plus the heuristic fallback.
pub struct NarrationSynthesizer {
    primary: Option<Box<dyn NarrationProvider>>,
    fallback: HeuristicNarration,
}

impl NarrationSynthesizer {
    /// Choose the provider for `cfg`.
    ///
    /// The engine is checked once here; call sites never check for it again.
    pub fn from_config(cfg: &VoiceConfig) -> Self {
        let fallback = HeuristicNarration::from_config(cfg);
        if !cfg.enabled {
            tracing::info!("voice disabled; narration will be silent");
            return Self {
                primary: None,
                fallback,
            };
        }

        let engine = EngineNarration::from_config(cfg);
        if !engine.is_available() {
            tracing::warn!(
                engine = %cfg.engine,
                "narration engine unavailable; narration will be silent"
            );
            return Self {
                primary: None,
                fallback,
            };
        }

        Self {
            primary: Some(Box::new(engine)),
            fallback,
        }
    }

    /// Use `primary` ahead of the heuristic fallback.
    pub fn with_provider(primary: Box<dyn NarrationProvider>, fallback: HeuristicNarration) -> Self {
        Self {
            primary: Some(primary),
            fallback,
        }
    }

    /// Heuristic-only synthesizer.
    pub fn heuristic(fallback: HeuristicNarration) -> Self {
        Self {
            primary: None,
            fallback,
        }
    }

    /// Whether a speech provider was selected.
    pub fn has_engine(&self) -> bool {
        self.primary.is_some()
    }

    /// Produce narration for `text`.
    ///
    /// With `voice_enabled == false`, or when the provider fails, the heuristic track is returned.
    pub fn synthesize(&self, text: &str, voice_enabled: bool, scratch_dir: &Path) -> NarrationTrack {
        if voice_enabled && let Some(primary) = self.primary.as_ref() {
            match primary.synthesize(text, scratch_dir) {
                Ok(track) if track.duration_secs > 0.0 && track.duration_secs.is_finite() => {
                    tracing::info!(
                        provider = primary.name(),
                        duration_secs = track.duration_secs,
                        "narration synthesized"
                    );
                    return track;
                }
                Ok(track) => tracing::warn!(
                    provider = primary.name(),
                    duration_secs = track.duration_secs,
                    "narration engine returned empty audio; using silent fallback"
                ),
                Err(e) => tracing::warn!(
                    provider = primary.name(),
                    error = %e,
                    "narration failed; using silent fallback"
                ),
            }
        }

        let track = self.fallback.track(text);
        tracing::info!(
            duration_secs = track.duration_secs,
            "heuristic narration duration"
        );
        track
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/synthesizer.rs"]
mod tests;
