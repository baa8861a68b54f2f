use super::*;

fn pool(n: usize) -> VisualPool {
    let assets = (0..n)
        .map(|i| VisualAsset {
            id: format!("{i}.png"),
            path: format!("images/{i}.png").into(),
            width: 4,
            height: 4,
        })
        .collect();
    VisualPool::from_assets("images", assets)
}

#[test]
fn slot_count_matches_ceiling() {
    assert_eq!(slot_count(9.7, 0.5).unwrap(), 20);
    assert_eq!(slot_count(0.3, 0.5).unwrap(), 1);
    assert_eq!(slot_count(1.0, 0.5).unwrap(), 2);
    assert_eq!(slot_count(1.01, 0.5).unwrap(), 3);
}

#[test]
fn slot_count_ignores_float_noise() {
    // 1.5 / 0.1 is 15.000000000000002 in binary floating point.
    assert_eq!(slot_count(1.5, 0.1).unwrap(), 15);
    assert_eq!(slot_count(0.3, 0.1).unwrap(), 3);
}

#[test]
fn invalid_durations_are_rejected() {
    for (d, c) in [(0.0, 0.5), (-1.0, 0.5), (1.0, 0.0), (1.0, -0.5), (f64::NAN, 0.5)] {
        assert!(matches!(
            build(d, c, &pool(2)),
            Err(ReelError::InvalidDuration(_))
        ));
    }
}

#[test]
fn last_slot_is_clamped_to_narration_end() {
    let tl = build(9.7, 0.5, &pool(3)).unwrap();
    assert_eq!(tl.len(), 20);
    for slot in &tl.slots[..19] {
        assert_eq!(slot.duration_secs, 0.5);
    }
    let last = tl.slots.last().unwrap();
    assert!((last.start_secs - 9.5).abs() < 1e-12);
    assert!((last.duration_secs - 0.2).abs() < 1e-9);
    assert!((last.start_secs + last.duration_secs - 9.7).abs() < 1e-9);
}

#[test]
fn short_narration_yields_single_short_slot() {
    let tl = build(0.3, 0.5, &pool(3)).unwrap();
    assert_eq!(tl.len(), 1);
    assert!((tl.slots[0].duration_secs - 0.3).abs() < 1e-12);
}

#[test]
fn assets_are_assigned_one_to_one_with_cycling() {
    let tl = build(3.5, 0.5, &pool(3)).unwrap();
    let ids: Vec<_> = tl.slots.iter().map(|s| s.asset.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["0.png", "1.png", "2.png", "0.png", "1.png", "2.png", "0.png"]
    );
}

#[test]
fn empty_pool_fails_build() {
    assert!(matches!(
        build(2.0, 0.5, &pool(0)),
        Err(ReelError::EmptyAssetPool(_))
    ));
}

#[test]
fn composited_length_equals_narration_before_transitions() {
    for d in [0.3, 0.5, 1.0, 2.25, 9.7, 14.9] {
        let tl = build(d, 0.5, &pool(4)).unwrap();
        assert!((tl.composited_secs() - d).abs() < 1e-9, "d={d}");
        assert!((tl.visible_end_secs() - d).abs() < 1e-9, "d={d}");
    }
}

#[test]
fn slot_at_finds_visible_owner() {
    let tl = build(2.0, 0.5, &pool(2)).unwrap();
    assert_eq!(tl.slot_at(-1.0), 0);
    assert_eq!(tl.slot_at(0.0), 0);
    assert_eq!(tl.slot_at(0.49), 0);
    assert_eq!(tl.slot_at(0.5), 1);
    assert_eq!(tl.slot_at(1.99), 3);
    assert_eq!(tl.slot_at(50.0), 3);
}

#[test]
fn fingerprint_tracks_every_planned_value() {
    let a = build(4.0, 0.5, &pool(3)).unwrap();
    let b = build(4.0, 0.5, &pool(3)).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let mut c = a.clone();
    c.slots[2].grade = 0.25;
    assert_ne!(a.fingerprint(), c.fingerprint());

    let d = build(4.0, 0.5, &pool(2)).unwrap();
    assert_ne!(a.fingerprint(), d.fingerprint());
}

#[test]
fn check_rejects_decreasing_grades() {
    let mut tl = build(1.5, 0.5, &pool(3)).unwrap();
    tl.slots[0].grade = 0.5;
    tl.slots[1].grade = 0.4;
    tl.slots[2].grade = 1.0;
    assert!(tl.check().is_err());
    tl.slots[1].grade = 0.5;
    tl.check().unwrap();
}
