#![allow(dead_code)]

use std::path::{Path, PathBuf};

use reelforge::{HeuristicNarration, NarrationSynthesizer, ReelConfig, ReelSession};

/// Fresh scratch root under `target/`.
pub fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write `count` distinct solid-colour PNGs named `00.png`, `01.png`, ...
pub fn write_pool(dir: &Path, count: usize, size: u32) {
    std::fs::create_dir_all(dir).unwrap();
    for i in 0..count {
        let shade = (i * 60 % 256) as u8;
        image::RgbImage::from_pixel(size, size, image::Rgb([shade, 255 - shade, 128]))
            .save_with_format(dir.join(format!("{i:02}.png")), image::ImageFormat::Png)
            .unwrap();
    }
}

/// Small, fast, silent configuration rooted at `root`.
pub fn small_config(root: &Path) -> ReelConfig {
    let mut cfg = ReelConfig {
        output_dir: root.join("output"),
        images_dir: root.join("images"),
        fps: reelforge::Fps::new(10, 1).unwrap(),
        canvas: reelforge::Canvas {
            width: 64,
            height: 96,
        },
        ..ReelConfig::default()
    };
    cfg.voice.enabled = false;
    cfg
}

pub fn silent_session(cfg: ReelConfig) -> ReelSession {
    let narrator = NarrationSynthesizer::heuristic(HeuristicNarration::from_config(&cfg.voice));
    ReelSession::with_narrator(cfg, narrator).unwrap()
}

/// `ffmpeg` and `ffprobe` are both runnable.
pub fn have_ffmpeg_tools() -> bool {
    let on_path = |program: &str| {
        std::process::Command::new(program)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    };
    on_path("ffmpeg") && on_path("ffprobe")
}
