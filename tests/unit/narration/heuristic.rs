use super::*;

#[test]
fn estimate_scales_with_word_count() {
    let h = HeuristicNarration::new(2.0, 1.0);
    let text = "duniya ke aage rona band karo sabr rakho aur tawakkul karo";
    assert!((h.estimate_secs(text) - 5.5).abs() < 1e-12);
}

#[test]
fn estimate_never_drops_below_floor() {
    let h = HeuristicNarration::new(2.5, 1.0);
    assert_eq!(h.estimate_secs(""), 1.0);
    assert_eq!(h.estimate_secs("   \n\t "), 1.0);
    assert_eq!(h.estimate_secs("ek"), 1.0);
}

#[test]
fn invalid_rates_fall_back_to_defaults() {
    assert_eq!(
        HeuristicNarration::new(0.0, -1.0),
        HeuristicNarration::default()
    );
    assert_eq!(
        HeuristicNarration::new(f64::NAN, f64::INFINITY),
        HeuristicNarration::default()
    );
}

#[test]
fn track_is_silent_and_matches_estimate() {
    let h = HeuristicNarration::new(2.5, 1.0);
    let text = "one two three four five six seven eight nine ten";
    let track = h.track(text);
    assert_eq!(track.source, NarrationSource::Heuristic);
    assert!((track.duration_secs - 4.0).abs() < 1e-12);
    assert!((track.pcm.duration_secs() - 4.0).abs() < 1e-3);
    assert!(track.pcm.interleaved_f32.iter().all(|s| *s == 0.0));
}
