use std::path::PathBuf;

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pool").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_image(dir: &Path, name: &str, w: u32, h: u32) {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30]));
    let format = if name.to_ascii_lowercase().ends_with(".jpg") {
        image::ImageFormat::Jpeg
    } else {
        image::ImageFormat::Png
    };
    img.save_with_format(dir.join(name), format).unwrap();
}

#[test]
fn cycle_indices_wraps_small_pool() {
    assert_eq!(cycle_indices(3, 7), vec![0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(cycle_indices(5, 2), vec![0, 1]);
    assert!(cycle_indices(0, 4).is_empty());
}

#[test]
fn scan_orders_lexicographically_and_filters() {
    let dir = scratch("ordering");
    write_image(&dir, "c.png", 2, 2);
    write_image(&dir, "a.png", 4, 2);
    write_image(&dir, "b.PNG", 2, 4);
    write_image(&dir, ".hidden.png", 2, 2);
    std::fs::write(dir.join("notes.txt"), "not an image").unwrap();
    std::fs::write(dir.join("broken.jpg"), "not a jpeg").unwrap();

    let pool = VisualPool::scan(&dir).unwrap();
    let ids: Vec<_> = pool.assets().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a.png", "b.PNG", "c.png"]);
    assert_eq!((pool.assets()[0].width, pool.assets()[0].height), (4, 2));
}

#[test]
fn select_cycles_pool_of_three_over_seven_slots() {
    let dir = scratch("cycling");
    for name in ["0.png", "1.png", "2.png"] {
        write_image(&dir, name, 2, 2);
    }
    let picked = select(&dir, 7).unwrap();
    let ids: Vec<_> = picked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["0.png", "1.png", "2.png", "0.png", "1.png", "2.png", "0.png"]
    );
}

#[test]
fn empty_pool_fails_only_when_slots_are_needed() {
    let dir = scratch("empty");
    assert!(matches!(select(&dir, 1), Err(ReelError::EmptyAssetPool(_))));
    assert!(select(&dir, 0).unwrap().is_empty());

    let missing = dir.join("does_not_exist");
    assert!(matches!(
        select(&missing, 3),
        Err(ReelError::EmptyAssetPool(_))
    ));
}

#[test]
fn non_empty_pool_never_reports_empty() {
    let dir = scratch("single");
    write_image(&dir, "only.jpg", 2, 2);
    for count in [0usize, 1, 2, 50] {
        assert_eq!(select(&dir, count).unwrap().len(), count);
    }
}

#[test]
fn repeated_scans_are_identical() {
    let dir = scratch("stable");
    for name in ["z.png", "m.png", "a.png"] {
        write_image(&dir, name, 2, 2);
    }
    let a = select(&dir, 5).unwrap();
    let b = select(&dir, 5).unwrap();
    assert_eq!(a, b);
}
