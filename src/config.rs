//! Run configuration.
//!
//! A [`ReelConfig`] is an immutable value handed to [`crate::ReelSession`]; nothing in the crate
//! reads process-wide settings. Every field has a default, so an empty JSON object is a valid
//! configuration.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::thumbnail::thumbnail_path_for;

/// Configuration for one pipeline run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Directory receiving the final video and thumbnail. Wiped at run start.
    pub output_dir: PathBuf,
    /// Directory for intermediate files. Defaults to `<output_dir>/.work`.
    pub work_dir: Option<PathBuf>,
    /// Read-only directory of source images.
    pub images_dir: PathBuf,
    /// File name of the rendered video inside `output_dir`.
    pub output_name: String,
    /// Length of one clip slot in seconds.
    pub clip_duration_secs: f64,
    /// Crossfade length as a fraction of `clip_duration_secs`, in `[0, 1)`.
    pub overlap_fraction: f64,
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas.
    pub canvas: Canvas,
    /// Background used to flatten any transparency before encoding (straight RGBA8).
    pub bg_rgba: [u8; 4],
    /// Prepare slot frames on a rayon pool.
    pub parallel: bool,
    /// Override rayon worker threads (parallel mode only).
    pub threads: Option<usize>,
    /// Narration settings.
    pub voice: VoiceConfig,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            work_dir: None,
            images_dir: PathBuf::from("images"),
            output_name: "viral_reel.mp4".to_string(),
            clip_duration_secs: 0.5,
            overlap_fraction: 0.2,
            fps: Fps::default(),
            canvas: Canvas::default(),
            bg_rgba: [0, 0, 0, 255],
            parallel: true,
            threads: None,
            voice: VoiceConfig::default(),
        }
    }
}

/// Narration engine settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Attempt speech synthesis. `false` always yields silent heuristic narration.
    pub enabled: bool,
    /// TTS program invoked as `<engine> --voice V --text T --write-media F`.
    pub engine: String,
    /// Voice name passed to the engine.
    pub voice: String,
    /// Optional rate adjustment, e.g. `-10%`.
    pub rate: Option<String>,
    /// Optional pitch adjustment, e.g. `-8Hz`.
    pub pitch: Option<String>,
    /// Upper bound on one engine invocation.
    pub timeout_secs: u64,
    /// Speaking rate assumed by the heuristic duration estimate.
    pub words_per_second: f64,
    /// Floor for the heuristic duration estimate.
    pub min_duration_secs: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: "edge-tts".to_string(),
            voice: "hi-IN-MadhurNeural".to_string(),
            rate: None,
            pitch: None,
            timeout_secs: 60,
            words_per_second: 2.5,
            min_duration_secs: 1.0,
        }
    }
}

impl ReelConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Load a configuration from JSON.
    pub fn from_reader(r: impl Read) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse config JSON: {e}")))
    }

    /// Check every setting before any work begins.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.clip_duration_secs.is_finite() || self.clip_duration_secs <= 0.0 {
            return Err(ReelError::invalid_duration(format!(
                "clip_duration_secs must be finite and > 0, got {}",
                self.clip_duration_secs
            )));
        }
        if !self.overlap_fraction.is_finite()
            || self.overlap_fraction < 0.0
            || self.overlap_fraction >= 1.0
        {
            return Err(ReelError::invalid_overlap(format!(
                "overlap_fraction must be in [0, 1), got {}",
                self.overlap_fraction
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        self.canvas.validate()?;

        let name = self.output_name.trim();
        if name.is_empty() {
            return Err(ReelError::validation("output_name must be non-empty"));
        }
        if Path::new(name).file_name().map(|f| f.len()) != Some(name.len()) {
            return Err(ReelError::validation(format!(
                "output_name '{name}' must be a plain file name"
            )));
        }
        if !is_dedicated_dir(&self.output_dir) {
            return Err(ReelError::validation(format!(
                "output_dir '{}' is wiped on every run and must name a dedicated directory",
                self.output_dir.display()
            )));
        }
        if self.images_dir.starts_with(&self.output_dir) {
            return Err(ReelError::validation(format!(
                "images_dir '{}' must not live inside output_dir '{}'",
                self.images_dir.display(),
                self.output_dir.display()
            )));
        }
        let work = self.work_dir();
        if !is_dedicated_dir(&work) {
            return Err(ReelError::validation(format!(
                "work_dir '{}' is removed after every run and must name a dedicated directory",
                work.display()
            )));
        }
        if self.output_dir.starts_with(&work) {
            return Err(ReelError::validation(format!(
                "work_dir '{}' must not contain output_dir '{}'",
                work.display(),
                self.output_dir.display()
            )));
        }
        if self.images_dir.starts_with(&work) || work.starts_with(&self.images_dir) {
            return Err(ReelError::validation(format!(
                "work_dir '{}' and images_dir '{}' must not overlap",
                work.display(),
                self.images_dir.display()
            )));
        }
        if self.threads == Some(0) {
            return Err(ReelError::validation("threads must be >= 1 when set"));
        }

        let voice = &self.voice;
        if !voice.words_per_second.is_finite() || voice.words_per_second <= 0.0 {
            return Err(ReelError::validation(
                "voice.words_per_second must be finite and > 0",
            ));
        }
        if !voice.min_duration_secs.is_finite() || voice.min_duration_secs <= 0.0 {
            return Err(ReelError::validation(
                "voice.min_duration_secs must be finite and > 0",
            ));
        }
        if voice.timeout_secs == 0 {
            return Err(ReelError::validation("voice.timeout_secs must be > 0"));
        }
        if voice.enabled && voice.engine.trim().is_empty() {
            return Err(ReelError::validation(
                "voice.engine must be set when voice is enabled",
            ));
        }
        Ok(())
    }

    /// Resolved intermediate directory.
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join(".work"))
    }

    /// `<output_dir>/<output_name>`.
    pub fn video_path(&self) -> PathBuf {
        self.output_dir.join(self.output_name.trim())
    }

    /// `<output_dir>/<output_name>.jpg`.
    pub fn thumbnail_path(&self) -> PathBuf {
        thumbnail_path_for(&self.video_path())
    }
}

/// Not empty, not `.`, not a filesystem root.
fn is_dedicated_dir(dir: &Path) -> bool {
    !dir.as_os_str().is_empty() && dir != Path::new(".") && dir.parent().is_some()
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
