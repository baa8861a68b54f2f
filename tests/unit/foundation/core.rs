use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_rounds_seconds_to_nearest_frame() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(9.7), 291);
    assert_eq!(fps.secs_to_frames_round(0.001), 1);
    assert!((fps.frames_to_secs(15) - 0.5).abs() < 1e-12);
}

#[test]
fn canvas_requires_even_non_zero_dims() {
    assert!(Canvas::default().validate().is_ok());
    assert!(
        Canvas {
            width: 0,
            height: 2
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 1081,
            height: 1920
        }
        .validate()
        .is_err()
    );
    assert_eq!(
        Canvas {
            width: 4,
            height: 2
        }
        .rgba_len(),
        32
    );
}
