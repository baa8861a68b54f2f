use super::*;
use crate::narration::HeuristicNarration;

fn heuristic_session(name: &str, images: usize) -> ReelSession {
    let root = PathBuf::from("target").join("unit_session").join(name);
    let _ = std::fs::remove_dir_all(&root);
    let images_dir = root.join("images");
    std::fs::create_dir_all(&images_dir).unwrap();
    for i in 0..images {
        image::RgbImage::from_pixel(4, 4, image::Rgb([i as u8 * 40, 0, 0]))
            .save_with_format(images_dir.join(format!("{i}.png")), image::ImageFormat::Png)
            .unwrap();
    }
    let mut cfg = ReelConfig {
        output_dir: root.join("output"),
        images_dir,
        ..ReelConfig::default()
    };
    cfg.voice.enabled = false;
    let narrator = NarrationSynthesizer::heuristic(HeuristicNarration::from_config(&cfg.voice));
    ReelSession::with_narrator(cfg, narrator).unwrap()
}

#[test]
fn script_fields_require_every_key() {
    let ok = r##"{"hindi_quote":" kuch shabd ","english_translation":"a few words","caption":"Cap","hashtags":"#a #b"}"##;
    let script = ScriptFields::from_reader(ok.as_bytes()).unwrap();
    assert_eq!(script.narration_text(), "kuch shabd");
    assert_eq!(script.post_caption(), "Cap\n\n#a #b");

    let missing = r#"{"hindi_quote":"x","caption":"c","hashtags":"h"}"#;
    assert!(matches!(
        ScriptFields::from_reader(missing.as_bytes()),
        Err(ReelError::Validation(_))
    ));

    let blank = r#"{"hindi_quote":"  ","english_translation":"","caption":"","hashtags":""}"#;
    assert!(matches!(
        ScriptFields::from_reader(blank.as_bytes()),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn manifest_carries_artifact_paths_and_caption() {
    let artifact = RenderedArtifact {
        video_path: PathBuf::from("output/viral_reel.mp4"),
        thumbnail_path: PathBuf::from("output/viral_reel.mp4.jpg"),
        duration_secs: 3.0,
        frame_count: 90,
        narration_source: NarrationSource::Heuristic,
        timeline_fingerprint: 7,
    };
    let script = ScriptFields {
        hindi_quote: "q".into(),
        english_translation: "t".into(),
        caption: "Caption".into(),
        hashtags: "#reel".into(),
    };
    let manifest = UploadManifest::from_script(&artifact, &script);
    assert_eq!(manifest.caption, "Caption\n\n#reel");
    assert_eq!(manifest.thumbnail_path, artifact.thumbnail_path);

    let path = PathBuf::from("target/unit_session/manifest/upload.json");
    manifest.write_to(&path).unwrap();
    let back: UploadManifest =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(back, manifest);
}

#[test]
fn blank_text_is_rejected_before_any_work() {
    let session = heuristic_session("blank", 1);
    assert!(matches!(session.plan(" \n\t"), Err(ReelError::Validation(_))));
    assert!(matches!(session.run(""), Err(ReelError::Validation(_))));
    assert!(!session.config().output_dir.exists());
}

#[test]
fn plan_is_deterministic_and_leaves_output_alone() {
    let session = heuristic_session("plan", 3);
    let text = "one two three four five six seven eight nine ten";
    let a = session.plan(text).unwrap();
    let b = session.plan(text).unwrap();

    assert_eq!(a.narration.source, NarrationSource::Heuristic);
    assert!((a.narration.duration_secs - 4.0).abs() < 1e-12);
    assert_eq!(a.timeline, b.timeline);
    assert_eq!(a.report().fingerprint, b.report().fingerprint);
    assert_eq!(a.timeline.len(), 8);
    assert_eq!(a.timeline.grades().first(), Some(&0.0));
    assert_eq!(a.timeline.grades().last(), Some(&1.0));
    assert!(!session.config().output_dir.exists());
}

#[test]
fn empty_pool_fails_planning() {
    let session = heuristic_session("empty_pool", 0);
    assert!(matches!(
        session.plan("some words"),
        Err(ReelError::EmptyAssetPool(_))
    ));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = ReelConfig {
        overlap_fraction: 1.5,
        ..ReelConfig::default()
    };
    assert!(matches!(
        ReelSession::new(cfg),
        Err(ReelError::InvalidOverlap(_))
    ));
}
