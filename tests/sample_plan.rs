//! Sample plan derivation tests.

mod common;

use std::time::Duration;

use reloop::{ConvertOptions, ReloopError, SamplePlan};

use common::synthetic_clip;

#[test]
fn frame_count_is_floor_of_duration_times_rate() {
    let clip = synthetic_clip(320, 180, 2.0);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.frame_count, 20);

    let clip = synthetic_clip(320, 180, 1.95);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.frame_count, 19);
}

#[test]
fn width_is_the_configured_target() {
    let clip = synthetic_clip(320, 180, 2.0);
    let options = ConvertOptions::new().with_target_width(256);
    let plan = SamplePlan::derive(&clip, &options).unwrap();
    assert_eq!(plan.width, 256);
}

#[test]
fn height_preserves_aspect_and_rounds_down_to_even() {
    // 320x180 at 400 wide scales to 225, forced down to 224.
    let clip = synthetic_clip(320, 180, 2.0);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.height, 224);

    // An already-even result is kept.
    let clip = synthetic_clip(800, 400, 2.0);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.height, 200);
}

#[test]
fn height_never_drops_below_two() {
    let clip = synthetic_clip(4000, 2, 2.0);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.height, 2);
}

#[test]
fn height_is_even_across_many_source_shapes() {
    for (w, h) in [(321, 181), (1920, 1080), (640, 479), (123, 457), (99, 33)] {
        let clip = synthetic_clip(w, h, 1.0);
        let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
        assert_eq!(plan.height % 2, 0, "odd height for {w}x{h}");
        assert!(plan.height >= 2);
    }
}

#[test]
fn delay_is_thousand_over_frame_rate() {
    let clip = synthetic_clip(320, 180, 2.0);

    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.delay_ms, 100);

    let options = ConvertOptions::new().with_frame_rate(25);
    let plan = SamplePlan::derive(&clip, &options).unwrap();
    assert_eq!(plan.delay_ms, 40);
}

#[test]
fn timestamps_advance_by_frame_period() {
    let clip = synthetic_clip(320, 180, 2.0);
    let plan = SamplePlan::derive(&clip, &ConvertOptions::new()).unwrap();
    assert_eq!(plan.timestamp_for(0), Duration::ZERO);
    assert_eq!(plan.timestamp_for(5), Duration::from_millis(500));
}

#[test]
fn zero_duration_clip_is_rejected() {
    let clip = synthetic_clip(320, 180, 0.0);
    match SamplePlan::derive(&clip, &ConvertOptions::new()) {
        Err(ReloopError::EmptyClip { frame_rate, .. }) => assert_eq!(frame_rate, 10),
        other => panic!("Expected EmptyClip, got: {other:?}"),
    }
}

#[test]
fn sub_frame_duration_clip_is_rejected() {
    // 50 ms at 10 fps floors to zero frames.
    let clip = synthetic_clip(320, 180, 0.05);
    assert!(matches!(
        SamplePlan::derive(&clip, &ConvertOptions::new()),
        Err(ReloopError::EmptyClip { .. })
    ));
}

#[test]
fn option_ranges_are_enforced() {
    let clip = synthetic_clip(320, 180, 2.0);

    let options = ConvertOptions::new().with_target_width(0);
    assert!(matches!(
        SamplePlan::derive(&clip, &options),
        Err(ReloopError::InvalidTargetWidth(0))
    ));

    let options = ConvertOptions::new().with_frame_rate(0);
    assert!(matches!(
        SamplePlan::derive(&clip, &options),
        Err(ReloopError::InvalidFrameRate(0))
    ));

    let options = ConvertOptions::new().with_frame_rate(200);
    assert!(matches!(
        SamplePlan::derive(&clip, &options),
        Err(ReloopError::InvalidFrameRate(200))
    ));

    let options = ConvertOptions::new().with_palette_size(1);
    assert!(matches!(
        SamplePlan::derive(&clip, &options),
        Err(ReloopError::InvalidPaletteSize(1))
    ));

    let options = ConvertOptions::new().with_quantizer_speed(0);
    assert!(matches!(
        SamplePlan::derive(&clip, &options),
        Err(ReloopError::InvalidQuantizerSpeed(0))
    ));
}
