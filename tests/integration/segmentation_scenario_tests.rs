/*!
 * Concrete narration scenarios run through the whole pipeline
 */

use telop::app_config::{SegmentationConfig, TimingConfig};
use telop::errors::SegmentationError;
use telop::segmentation::timing::{DraftCue, TimingAssigner};
use telop::segmentation::{segment_and_time, CueKind, Section, SectionTitle};
use crate::common;

#[test]
fn test_nobunaga_withUniformTiming_shouldSplitAtSentenceEnd() {
    let config = SegmentationConfig::default();
    let section = Section::with_uniform_timing(
        "1",
        "信長は尾張の大うつけと呼ばれた。しかし彼は天下統一を目指した！",
        0.0,
        0.1,
    );

    let cues = segment_and_time(&[section], &config).expect("two sentences");

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text(), "信長は尾張の大うつけと呼ばれた");
    assert_eq!(cues[1].text(), "しかし彼は天下統一を目指した");
    assert!(cues.iter().flat_map(|c| c.lines()).all(|l| l.chars().count() <= 18));
    assert!(cues[0].end <= cues[1].start - 0.01 + 1e-9);
}

#[test]
fn test_quotation_shouldKeepPunctuationOnlyInsideQuotes() {
    let config = SegmentationConfig::default();
    let sections = vec![
        common::uniform_section("quoted", "彼は言った。「これは、テストだ。」", 0.0),
        common::uniform_section("plain", "これは、テストだ。", 10.0),
    ];

    let cues = segment_and_time(&sections, &config).expect("both sections");
    let quoted: String = cues
        .iter()
        .filter(|c| c.section_id == "quoted")
        .map(|c| c.text())
        .collect();
    let plain: String = cues
        .iter()
        .filter(|c| c.section_id == "plain")
        .map(|c| c.text())
        .collect();

    assert!(quoted.contains("「これは、テストだ。」"), "{}", quoted);
    assert!(!quoted.contains("言った。"));
    assert_eq!(plain, "これは、テストだ");
}

#[test]
fn test_longQuote_withComma_shouldBreakAfterComma() {
    let config = SegmentationConfig::default();
    let quote = format!("「{}、{}」", "あ".repeat(11), "い".repeat(21));
    assert_eq!(quote.chars().count(), 35);

    let cues = segment_and_time(&[common::uniform_section("q", &quote, 0.0)], &config)
        .expect("quote segments");

    assert!(cues.len() >= 2);
    assert_eq!(cues[0].text(), format!("「{}、", "あ".repeat(11)));
    assert_eq!(common::cue_text(&cues), quote);
}

#[test]
fn test_timing_withTightFollower_shouldClampToMinGap() {
    let config = TimingConfig::default();
    let draft = |text: &str, start: f64, end: f64| DraftCue {
        section_id: "1".to_string(),
        line1: text.to_string(),
        line2: None,
        start,
        end,
        ends_sentence: false,
        kind: CueKind::Narration,
    };

    let cues = TimingAssigner::new(&config).assign(vec![
        draft("えっ", 5.00, 5.05),
        draft("本当に", 5.051, 6.0),
    ]);

    assert_eq!(cues.len(), 2);
    assert!(cues[0].end <= 5.051 - 0.01 + 1e-12);
    assert!(cues[0].end > cues[0].start);
}

#[test]
fn test_sectionTitle_shouldPrecedeNarration() {
    let config = SegmentationConfig::default();
    let section = Section::with_uniform_timing("2", "桶狭間の戦いが始まった。", 30.0, 0.1)
        .with_title(SectionTitle::new("第二章", -2.0, -0.5));

    let cues = segment_and_time(&[section], &config).expect("title and narration");

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].kind, CueKind::SectionTitle);
    assert_eq!(cues[0].text(), "第二章");
    assert!((cues[0].start - 28.0).abs() < 1e-9);
    assert_eq!(cues[1].kind, CueKind::Narration);
}

#[test]
fn test_segmentAndTime_withMalformedSection_shouldIsolateIt() {
    common::init_test_logging();
    let config = SegmentationConfig::default();
    let mut broken = common::uniform_section("broken", "壊れた区間です。", 0.0);
    broken.characters[3].start = f64::NAN;
    let healthy = common::uniform_section("healthy", "正常な区間です。", 5.0);

    let cues = segment_and_time(&[broken.clone(), healthy], &config).expect("healthy section");
    assert!(cues.iter().all(|c| c.section_id == "healthy"));

    let result = segment_and_time(&[broken], &config);
    assert!(matches!(
        result,
        Err(SegmentationError::MalformedInput { section, .. }) if section == "broken"
    ));
}

#[test]
fn test_segmentAndTime_withNoSections_shouldReturnEmptyResult() {
    let result = segment_and_time(&[], &SegmentationConfig::default());

    assert!(matches!(result, Err(SegmentationError::EmptyResult { .. })));
}

#[test]
fn test_segmentAndTime_withLineBreakHint_shouldCutThere() {
    let config = SegmentationConfig::default();
    let section = common::uniform_section("br", "一行目の文章です\n二行目の文章です", 0.0);

    let cues = segment_and_time(&[section], &config).expect("two parts");

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text(), "一行目の文章です");
    assert_eq!(cues[1].text(), "二行目の文章です");
}
