use super::*;

#[test]
fn pcm_duration_counts_frames_not_samples() {
    let pcm = AudioPcm {
        sample_rate: 48_000,
        channels: 2,
        interleaved_f32: vec![0.0; 48_000 * 2 * 3],
    };
    assert!((pcm.duration_secs() - 3.0).abs() < 1e-12);
}

#[test]
fn pcm_duration_of_degenerate_layout_is_zero() {
    let pcm = AudioPcm {
        sample_rate: 0,
        channels: 2,
        interleaved_f32: vec![0.0; 8],
    };
    assert_eq!(pcm.duration_secs(), 0.0);
}

#[test]
fn missing_tool_is_not_on_path() {
    assert!(!is_tool_on_path(
        "reelforge-definitely-missing-tool",
        "--version"
    ));
}

#[test]
fn inspect_of_missing_file_is_a_thumbnail_error() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let err = inspect_video(Path::new("target/unit_media/missing.mp4")).unwrap_err();
    assert!(matches!(err, ReelError::Thumbnail(_)));
}
