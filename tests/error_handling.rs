//! Error taxonomy tests: open failures, option validation, display strings.

use reloop::{ClipInfo, ConvertOptions, ReloopError};

#[test]
fn probing_a_missing_file_is_a_clip_open_failure() {
    let result = ClipInfo::probe("tests/fixtures/does_not_exist.mp4");
    match result {
        Err(ReloopError::ClipOpen { path, .. }) => {
            assert!(path.ends_with("does_not_exist.mp4"));
        }
        other => panic!("Expected ClipOpen, got: {other:?}"),
    }
}

#[test]
fn converting_a_missing_file_produces_no_output() {
    let result = reloop::convert("tests/fixtures/does_not_exist.mp4", &ConvertOptions::new());
    assert!(result.is_err());
}

#[test]
fn option_validation_rejects_out_of_range_values() {
    assert!(ConvertOptions::new().validate().is_ok());

    assert!(matches!(
        ConvertOptions::new().with_target_width(100_000).validate(),
        Err(ReloopError::InvalidTargetWidth(100_000))
    ));
    assert!(matches!(
        ConvertOptions::new().with_palette_size(512).validate(),
        Err(ReloopError::InvalidPaletteSize(512))
    ));
    assert!(matches!(
        ConvertOptions::new().with_quantizer_speed(31).validate(),
        Err(ReloopError::InvalidQuantizerSpeed(31))
    ));
}

#[test]
fn error_messages_carry_actionable_context() {
    let error = ReloopError::ClipOpen {
        path: "clip.mp4".into(),
        reason: "No such file or directory".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("clip.mp4"));
    assert!(message.contains("No such file"));

    let error = ReloopError::PixelAccessDenied {
        path: "https://example.com/clip.mp4".into(),
        reason: "HTTP 403".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("denied"));
    assert!(message.contains("403"));

    let error = ReloopError::ClipStalled {
        waited: std::time::Duration::from_secs(10),
    };
    assert!(error.to_string().contains("never presented"));
}

#[test]
fn access_denied_reads_differently_from_open_failure() {
    // The two fatal input failures must be distinguishable by message so the
    // caller can surface an actionable hint for refused sources.
    let open = ReloopError::ClipOpen {
        path: "clip.mp4".into(),
        reason: "x".to_string(),
    }
    .to_string();
    let denied = ReloopError::PixelAccessDenied {
        path: "clip.mp4".into(),
        reason: "x".to_string(),
    }
    .to_string();
    assert_ne!(open, denied);
}
