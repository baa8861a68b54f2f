use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = ReelConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, ReelConfig::default());
    cfg.validate().unwrap();
    assert_eq!(cfg.video_path(), PathBuf::from("output/viral_reel.mp4"));
    assert_eq!(
        cfg.thumbnail_path(),
        PathBuf::from("output/viral_reel.mp4.jpg")
    );
    assert_eq!(cfg.work_dir(), PathBuf::from("output/.work"));
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r#"{ "clip_duration_secs": 0.75, "voice": { "enabled": false } }"#;
    let cfg = ReelConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.clip_duration_secs, 0.75);
    assert!(!cfg.voice.enabled);
    assert_eq!(cfg.voice.engine, "edge-tts");
    assert_eq!(cfg.overlap_fraction, 0.2);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ReelConfig::from_reader(r#"{ "clip_secs": 1 }"#.as_bytes()).unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn clip_duration_must_be_positive() {
    for bad in [0.0, -0.5, f64::NAN] {
        let cfg = ReelConfig {
            clip_duration_secs: bad,
            ..ReelConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ReelError::InvalidDuration(_))));
    }
}

#[test]
fn overlap_fraction_must_stay_below_one() {
    for bad in [1.0, 1.5, -0.1] {
        let cfg = ReelConfig {
            overlap_fraction: bad,
            ..ReelConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ReelError::InvalidOverlap(_))));
    }
    let ok = ReelConfig {
        overlap_fraction: 0.0,
        ..ReelConfig::default()
    };
    ok.validate().unwrap();
}

#[test]
fn output_name_must_be_a_plain_file_name() {
    for bad in ["", "  ", "nested/reel.mp4"] {
        let cfg = ReelConfig {
            output_name: bad.to_string(),
            ..ReelConfig::default()
        };
        assert!(cfg.validate().is_err(), "accepted '{bad}'");
    }
}

#[test]
fn explicit_work_dir_is_respected() {
    let cfg = ReelConfig {
        work_dir: Some(PathBuf::from("scratch")),
        ..ReelConfig::default()
    };
    assert_eq!(cfg.work_dir(), PathBuf::from("scratch"));
}

#[test]
fn zero_threads_and_zero_timeout_are_rejected() {
    let cfg = ReelConfig {
        threads: Some(0),
        ..ReelConfig::default()
    };
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.voice.timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn output_dir_must_be_a_dedicated_directory() {
    for bad in ["", ".", "/"] {
        let cfg = ReelConfig {
            output_dir: PathBuf::from(bad),
            ..ReelConfig::default()
        };
        assert!(
            matches!(cfg.validate(), Err(ReelError::Validation(_))),
            "accepted '{bad}'"
        );
    }
}

#[test]
fn images_inside_output_dir_are_rejected() {
    let cfg = ReelConfig {
        images_dir: PathBuf::from("output/images"),
        ..ReelConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));
}

#[test]
fn work_dir_must_not_swallow_output_or_images() {
    for bad in ["", ".", "/", "media", "media/output", "media/images"] {
        let cfg = ReelConfig {
            output_dir: PathBuf::from("media/output"),
            images_dir: PathBuf::from("media/images"),
            work_dir: Some(PathBuf::from(bad)),
            ..ReelConfig::default()
        };
        assert!(
            matches!(cfg.validate(), Err(ReelError::Validation(_))),
            "accepted work_dir '{bad}'"
        );
    }
}

#[test]
fn work_dir_inside_images_is_rejected() {
    let cfg = ReelConfig {
        work_dir: Some(PathBuf::from("images/tmp")),
        ..ReelConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ReelError::Validation(_))));
}

#[test]
fn sibling_work_dir_is_accepted() {
    let cfg = ReelConfig {
        output_dir: PathBuf::from("media/output"),
        images_dir: PathBuf::from("media/images"),
        work_dir: Some(PathBuf::from("media/scratch")),
        ..ReelConfig::default()
    };
    cfg.validate().unwrap();
}
