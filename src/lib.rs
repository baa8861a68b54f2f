//! Reelforge turns a short narration script into a vertical video reel.
//!
//! A run narrates the text, lays out fixed-length clip slots over a pool of still images, grades
//! them from monochrome to full colour, cross-dissolves between neighbours, encodes the result
//! with the narration, and pulls a cover thumbnail from the finished file:
//!
//! - Build a [`ReelConfig`] (or load one from JSON)
//! - Create a [`ReelSession`]
//! - Call [`ReelSession::run`] for a [`RenderedArtifact`], or [`ReelSession::plan`] to inspect
//!   the timeline without rendering
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod config;
mod foundation;

pub(crate) mod effects;
/// Frame sinks and the `ffmpeg` encoder.
pub mod encode;
pub(crate) mod narration;
/// Frame compositing and thumbnail extraction.
pub mod render;
/// Workspace lifecycle and the end-to-end pipeline.
pub mod session;
pub(crate) mod timeline;

pub use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE, is_ffmpeg_on_path};
pub use crate::assets::pool::{VisualPool, select};
pub use crate::assets::{PreparedImage, VisualAsset};
pub use crate::config::{ReelConfig, VoiceConfig};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::effects::transitions::{SlotBlend, annotate as annotate_transitions, blend_at};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::narration::{
    EngineNarration, HeuristicNarration, NarrationProvider, NarrationSource,
    NarrationSynthesizer, NarrationTrack,
};
pub use crate::render::pipeline::{RenderOpts, RenderStats, RenderedVideo, Renderer, SlotFrames};
pub use crate::render::thumbnail::{extract as extract_thumbnail, thumbnail_path_for};
pub use crate::session::{
    PlanReport, PlannedReel, ReelSession, RenderedArtifact, ScriptFields, UploadManifest,
    Workspace,
};
pub use crate::timeline::grade::{annotate as annotate_grades, grade_for};
pub use crate::timeline::plan::{ClipSlot, Timeline, build as build_timeline, slot_count};
