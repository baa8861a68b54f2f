use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_f32_stereo, is_tool_on_path};
use crate::config::VoiceConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::narration::{NarrationProvider, NarrationSource, NarrationTrack};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Speech synthesized by an external TTS program in the `edge-tts` command style.
#[derive(Clone, Debug)]
pub struct EngineNarration {
    program: String,
    voice: String,
    rate: Option<String>,
    pitch: Option<String>,
    timeout: Duration,
}

impl EngineNarration {
    /// Build from the voice settings.
    pub fn from_config(cfg: &VoiceConfig) -> Self {
        Self {
            program: cfg.engine.trim().to_string(),
            voice: cfg.voice.clone(),
            rate: cfg.rate.clone(),
            pitch: cfg.pitch.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs.max(1)),
        }
    }

    /// Probe the engine program on `PATH`.
    pub fn is_available(&self) -> bool {
        !self.program.is_empty() && is_tool_on_path(&self.program, "--version")
    }

    pub(crate) fn command(&self, text: &str, media_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--voice").arg(&self.voice);
        // Values such as `-10%` start with a dash, so they are passed in `--flag=value` form.
        if let Some(rate) = self.rate.as_deref() {
            cmd.arg(format!("--rate={rate}"));
        }
        if let Some(pitch) = self.pitch.as_deref() {
            cmd.arg(format!("--pitch={pitch}"));
        }
        cmd.arg("--text")
            .arg(text)
            .arg("--write-media")
            .arg(media_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl NarrationProvider for EngineNarration {
    fn name(&self) -> &str {
        &self.program
    }

    fn synthesize(&self, text: &str, scratch_dir: &Path) -> ReelResult<NarrationTrack> {
        if text.trim().is_empty() {
            return Err(ReelError::engine_unavailable("narration text is empty"));
        }
        std::fs::create_dir_all(scratch_dir).map_err(|e| {
            ReelError::engine_unavailable(format!(
                "create narration scratch dir '{}': {e}",
                scratch_dir.display()
            ))
        })?;
        let media_path: PathBuf = scratch_dir.join("narration.mp3");
        let _ = std::fs::remove_file(&media_path);

        let child = self.command(text, &media_path).spawn().map_err(|e| {
            ReelError::engine_unavailable(format!("failed to spawn '{}': {e}", self.program))
        })?;
        let status = wait_with_timeout(child, self.timeout)?;
        if !status.success() {
            return Err(ReelError::engine_unavailable(format!(
                "'{}' exited with status {status}",
                self.program
            )));
        }

        let written = std::fs::metadata(&media_path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ReelError::engine_unavailable(format!(
                "'{}' produced no audio at '{}'",
                self.program,
                media_path.display()
            )));
        }

        let pcm = decode_audio_f32_stereo(&media_path, MIX_SAMPLE_RATE)?;
        let duration_secs = pcm.duration_secs();
        if duration_secs <= 0.0 {
            return Err(ReelError::engine_unavailable(
                "synthesized narration decoded to zero samples",
            ));
        }

        Ok(NarrationTrack {
            pcm,
            duration_secs,
            source: NarrationSource::Engine,
        })
    }
}

/// Wait for `child`, killing it once `timeout` elapses.
pub(crate) fn wait_with_timeout(mut child: Child, timeout: Duration) -> ReelResult<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReelError::engine_unavailable(format!(
                    "failed to poll narration engine: {e}"
                )));
            }
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::engine_unavailable(format!(
                "narration engine timed out after {:.1}s",
                timeout.as_secs_f64()
            )));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/engine.rs"]
mod tests;
