//! Encoding sinks.
//!
//! Sinks consume composited frames in timeline order.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
