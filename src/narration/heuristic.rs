use std::path::Path;

use crate::assets::media::MIX_SAMPLE_RATE;
use crate::audio::pcm::silent_pcm;
use crate::config::VoiceConfig;
use crate::foundation::error::ReelResult;
use crate::narration::{NarrationProvider, NarrationSource, NarrationTrack};

/// Silent narration timed by a words-per-second estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicNarration {
    words_per_second: f64,
    min_duration_secs: f64,
}

impl HeuristicNarration {
    /// Build from explicit rates. Non-positive values fall back to the defaults.
    pub fn new(words_per_second: f64, min_duration_secs: f64) -> Self {
        let defaults = VoiceConfig::default();
        Self {
            words_per_second: positive_or(words_per_second, defaults.words_per_second),
            min_duration_secs: positive_or(min_duration_secs, defaults.min_duration_secs),
        }
    }

    /// Build from the voice settings.
    pub fn from_config(cfg: &VoiceConfig) -> Self {
        Self::new(cfg.words_per_second, cfg.min_duration_secs)
    }

    /// Estimated speaking time for `text`, never below the configured floor.
    pub fn estimate_secs(&self, text: &str) -> f64 {
        let words = text.split_whitespace().count();
        (words as f64 / self.words_per_second).max(self.min_duration_secs)
    }

    /// Silent track lasting [`Self::estimate_secs`].
    pub fn track(&self, text: &str) -> NarrationTrack {
        let duration_secs = self.estimate_secs(text);
        NarrationTrack {
            pcm: silent_pcm(duration_secs, MIX_SAMPLE_RATE, 2),
            duration_secs,
            source: NarrationSource::Heuristic,
        }
    }
}

impl Default for HeuristicNarration {
    fn default() -> Self {
        Self::from_config(&VoiceConfig::default())
    }
}

impl NarrationProvider for HeuristicNarration {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn synthesize(&self, text: &str, _scratch_dir: &Path) -> ReelResult<NarrationTrack> {
        Ok(self.track(text))
    }
}

fn positive_or(v: f64, default: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { default }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/heuristic.rs"]
mod tests;
