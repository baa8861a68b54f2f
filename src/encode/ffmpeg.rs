use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::assets::media::is_ffmpeg_on_path;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;

/// Where an [`FfmpegSink`] writes, and what it flattens transparency onto.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// MP4 to create; an existing file is replaced.
    pub out_path: PathBuf,
    /// Opaque colour behind translucent pixels.
    pub bg_rgba: [u8; 4],
}

/// Encodes the reel with the system `ffmpeg`: raw RGBA frames on stdin, narration from the PCM
/// file in [`SinkConfig::audio`], H.264 + AAC out.
///
/// A sink dropped between `begin` and `end` kills its encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    run: Option<EncoderRun>,
}

struct EncoderRun {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    width: u32,
    height: u32,
    flat: Vec<u8>,
    last: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self { opts, run: None }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        let audio = checked_audio(&cfg)?;
        let frame_bytes = frame_len(cfg.width, cfg.height)?;

        if let Some(dir) = self.opts.out_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output directory '{}'", dir.display()))?;
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::render("ffmpeg not found on PATH"));
        }

        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&cfg, audio, &self.opts.out_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::render(format!("spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut err_pipe)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::render("ffmpeg started without piped stdio"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            err_pipe.read_to_end(&mut buf)?;
            Ok(buf)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.run = Some(EncoderRun {
            child,
            stdin,
            stderr,
            width: cfg.width,
            height: cfg.height,
            flat: vec![0u8; frame_bytes],
            last: None,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let run = self
            .run
            .as_mut()
            .ok_or_else(|| ReelError::render("ffmpeg sink is not running"))?;
        if run.last.is_some_and(|last| idx.0 <= last.0) {
            return Err(ReelError::render(format!(
                "frame {} arrived after frame {}",
                idx.0,
                run.last.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (run.width, run.height)
            || frame.data.len() != run.flat.len()
        {
            return Err(ReelError::validation(format!(
                "frame is {}x{} with {} bytes, encoder expects {}x{}",
                frame.width,
                frame.height,
                frame.data.len(),
                run.width,
                run.height
            )));
        }
        run.last = Some(idx);

        flatten_onto(self.opts.bg_rgba, &frame.data, &mut run.flat)?;
        run.stdin
            .write_all(&run.flat)
            .map_err(|e| ReelError::render(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> ReelResult<()> {
        let EncoderRun {
            mut child,
            stdin,
            stderr,
            ..
        } = self
            .run
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg sink is not running"))?;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| ReelError::render(format!("wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| ReelError::render("ffmpeg stderr reader panicked"))?
            .map_err(|e| ReelError::render(format!("read ffmpeg stderr: {e}")))?;

        if !status.success() {
            return Err(ReelError::render(format!(
                "ffmpeg failed ({status}): {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(EncoderRun {
            mut child, stdin, ..
        }) = self.run.take()
        {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(out = %self.opts.out_path.display(), "unfinished ffmpeg encode killed");
        }
    }
}

/// The narration input is mandatory; a reel is never encoded silent.
fn checked_audio(cfg: &SinkConfig) -> ReelResult<&AudioInputConfig> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ReelError::validation("encoder fps must be non-zero"));
    }
    if cfg.width == 0
        || cfg.height == 0
        || !cfg.width.is_multiple_of(2)
        || !cfg.height.is_multiple_of(2)
    {
        return Err(ReelError::validation(format!(
            "yuv420p needs even, non-zero dimensions; got {}x{}",
            cfg.width, cfg.height
        )));
    }
    let audio = cfg
        .audio
        .as_ref()
        .ok_or_else(|| ReelError::validation("ffmpeg sink needs a narration audio input"))?;
    if audio.sample_rate == 0 || audio.channels == 0 {
        return Err(ReelError::validation(format!(
            "narration audio needs a sample rate and channels; got {} Hz x {}",
            audio.sample_rate, audio.channels
        )));
    }
    Ok(audio)
}

/// Bytes in one RGBA8 frame, computed without `u32` overflow.
fn frame_len(width: u32, height: u32) -> ReelResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| ReelError::validation(format!("{width}x{height} frame is too large")))
}

/// Input 0 is the raw video pipe, input 1 the f32le narration. `-shortest` keeps the two
/// streams the same length.
fn encoder_args(cfg: &SinkConfig, audio: &AudioInputConfig, out: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(40);
    let mut push = |items: &[&str]| args.extend(items.iter().map(OsString::from));

    push(&["-y", "-loglevel", "error"]);
    push(&["-f", "rawvideo", "-pix_fmt", "rgba"]);
    push(&["-s", &format!("{}x{}", cfg.width, cfg.height)]);
    push(&["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)]);
    push(&["-i", "pipe:0"]);
    push(&["-f", "f32le"]);
    push(&["-ar", &audio.sample_rate.to_string()]);
    push(&["-ac", &audio.channels.to_string()]);
    push(&["-i"]);
    args.push(audio.path.as_os_str().to_owned());

    let mut push = |items: &[&str]| args.extend(items.iter().map(OsString::from));
    push(&["-map", "0:v:0", "-map", "1:a:0"]);
    push(&["-c:v", "libx264", "-pix_fmt", "yuv420p"]);
    push(&["-c:a", "aac", "-shortest"]);
    push(&["-movflags", "+faststart"]);
    args.push(out.as_os_str().to_owned());
    args
}

/// Composite straight-alpha `src` over the opaque `bg` into `dst`.
fn flatten_onto(bg: [u8; 4], src: &[u8], dst: &mut [u8]) -> ReelResult<()> {
    if src.len() != dst.len() || !src.len().is_multiple_of(4) {
        return Err(ReelError::validation(format!(
            "cannot flatten {} RGBA bytes into {}",
            src.len(),
            dst.len()
        )));
    }
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let alpha = u16::from(px[3]);
        let keep = 255 - alpha;
        for c in 0..3 {
            let v =
                mul_div255_u16(u16::from(px[c]), alpha) + mul_div255_u16(u16::from(bg[c]), keep);
            out[c] = v.min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
