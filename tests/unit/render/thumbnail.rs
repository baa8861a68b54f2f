use super::*;

#[test]
fn suffix_is_appended_to_the_full_file_name() {
    assert_eq!(
        thumbnail_path_for(Path::new("output/viral_reel.mp4")),
        PathBuf::from("output/viral_reel.mp4.jpg")
    );
    assert_eq!(
        thumbnail_path_for(Path::new("clip")),
        PathBuf::from("clip.jpg")
    );
}

#[test]
fn midpoint_is_half_the_duration() {
    assert_eq!(midpoint_secs(4.0), 2.0);
    assert_eq!(midpoint_secs(0.0), 0.0);
    assert_eq!(midpoint_secs(f64::NAN), 0.0);
}

#[test]
fn missing_video_is_refused() {
    let path = Path::new("target/unit_thumbnail/does_not_exist.mp4");
    assert!(matches!(extract(path), Err(ReelError::Thumbnail(_))));
    assert!(!thumbnail_path_for(path).exists());
}

#[test]
fn empty_video_is_refused_without_writing_a_thumbnail() {
    let dir = Path::new("target/unit_thumbnail/empty");
    let _ = std::fs::remove_dir_all(dir);
    std::fs::create_dir_all(dir).unwrap();
    let video = dir.join("reel.mp4");
    std::fs::write(&video, b"").unwrap();

    assert!(matches!(extract(&video), Err(ReelError::Thumbnail(_))));
    assert!(!thumbnail_path_for(&video).exists());
}
