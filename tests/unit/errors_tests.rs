/*!
 * Tests for error types
 */

use telop::errors::{AppError, SegmentationError, SubtitleError};

#[test]
fn test_segmentationError_display_shouldNameSection() {
    let error = SegmentationError::MalformedInput {
        section: "3".to_string(),
        reason: "2 characters, 1 start times, 2 end times".to_string(),
    };

    let message = error.to_string();
    assert!(message.contains("section 3"));
    assert!(message.contains("1 start times"));
}

#[test]
fn test_timingInversion_display_shouldFormatSeconds() {
    let error = SegmentationError::TimingInversion {
        text: "テスト".to_string(),
        start: 5.0,
        end: 4.99,
    };

    assert_eq!(
        error.to_string(),
        "Cue 'テスト' has inverted timing: start 5.000s, end 4.990s"
    );
}

#[test]
fn test_appError_from_shouldWrapSourceErrors() {
    let app_error: AppError = SegmentationError::EmptyResult {
        section: "intro".to_string(),
    }
    .into();
    assert!(matches!(app_error, AppError::Segmentation(_)));
    assert!(app_error.to_string().contains("intro"));

    let app_error: AppError = SubtitleError::EmptyOutput.into();
    assert!(matches!(app_error, AppError::Subtitle(SubtitleError::EmptyOutput)));

    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(AppError::from(io_error), AppError::File(_)));

    let app_error = AppError::from(anyhow::anyhow!("boom"));
    assert_eq!(app_error.to_string(), "Unknown error: boom");
}
