/*!
 * Tests for combined cue validation
 */

use telop::app_config::SegmentationConfig;
use telop::segmentation::Cue;
use telop::validation::{CueIssue, CueValidator, LayoutIssue, TimecodeIssue};

#[test]
fn test_cueValidator_withCleanCues_shouldPass() {
    let config = SegmentationConfig::default();
    let cues = vec![
        Cue::new(1, "信長は尾張の", Some("大うつけと呼ばれた".to_string()), 0.0, 2.0),
        Cue::new(2, "しかし彼は天下統一を目指した", None, 2.5, 4.0),
    ];

    let report = CueValidator::new(&config).validate(&cues);

    assert!(report.passed());
    assert!(report.issues().is_empty());
    assert_eq!(report.layout.longest_line, 14);
}

#[test]
fn test_cueValidator_withProblems_shouldReportInCueOrder() {
    let config = SegmentationConfig::default();
    let cues = vec![
        Cue::new(1, "あ".repeat(20), None, 0.0, 2.0),
        Cue::new(2, "短い", None, 1.5, 9.0),
    ];

    let report = CueValidator::new(&config).validate(&cues);
    let issues = report.issues();

    assert!(!report.passed());
    assert!(matches!(
        issues[0],
        CueIssue::Layout { index: 1, issue: LayoutIssue::LineTooLong { length: 20, .. } }
    ));
    assert!(matches!(
        issues[1],
        CueIssue::Timecode { index: 1, issue: TimecodeIssue::OverlapsWithNext { next_index: 2, overlap_ms: 500 } }
    ));
    assert!(matches!(
        issues[2],
        CueIssue::Timecode { index: 2, issue: TimecodeIssue::DurationTooLong { .. } }
    ));
}

#[test]
fn test_cueValidator_withCueSqueezedByNext_shouldAcceptShortDuration() {
    let config = SegmentationConfig::default();
    let cues = vec![
        Cue::new(1, "えっ", None, 5.0, 5.041),
        Cue::new(2, "本当に", None, 5.051, 6.2),
    ];

    let report = CueValidator::new(&config).validate(&cues);

    assert!(report.timecodes.passed);
}

#[test]
fn test_failedEntries_withOverlap_shouldListOnlyFailingCues() {
    let config = SegmentationConfig::default();
    let cues = vec![
        Cue::new(1, "最初の字幕", None, 0.0, 2.0),
        Cue::new(2, "重なる字幕", None, 1.8, 3.5),
        Cue::new(3, "最後の字幕", None, 4.0, 5.5),
    ];

    let report = CueValidator::new(&config).validate(&cues);
    let failed = report.timecodes.failed_entries();

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].index, 1);
    assert!(matches!(failed[0].issues[0], TimecodeIssue::OverlapsWithNext { next_index: 2, .. }));
}
