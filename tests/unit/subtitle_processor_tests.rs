/*!
 * Tests for SRT emission and the timing record
 */

use anyhow::Result;

use telop::errors::SubtitleError;
use telop::file_utils::FileManager;
use telop::segmentation::{Cue, CueKind};
use telop::subtitle_processor::{format_timestamp, parse_timestamp, CueCollection, TimingRecord};
use crate::common;

fn sample_cues() -> Vec<Cue> {
    let mut title = Cue::new(1, "第一章　尾張の風雲児", None, 0.0, 2.0);
    title.kind = CueKind::SectionTitle;
    let first = Cue::new(2, "信長は尾張の", Some("大うつけと呼ばれた".to_string()), 2.5, 4.25);
    let mut second = Cue::new(3, "しかし彼は天下統一を目指した", None, 4.3, 6.0);
    second.tag = Some("normal".to_string());
    vec![title, first, second]
}

#[test]
fn test_timestamps_withHourBoundary_shouldFormatAndParse() -> Result<()> {
    assert_eq!(format_timestamp(0.0), "00:00:00,000");
    assert_eq!(format_timestamp(3599.9996), "01:00:00,000");
    assert!((parse_timestamp("00:01:02,345")? - 62.345).abs() < 1e-9);
    assert!((parse_timestamp("00:01:02.345")? - 62.345).abs() < 1e-9);
    assert!(matches!(
        parse_timestamp("1:2"),
        Err(SubtitleError::InvalidTimestamp(_))
    ));
    Ok(())
}

#[test]
fn test_writeToSrt_withCues_shouldWriteNumberedBlocks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("subtitles.srt");

    CueCollection::new(sample_cues()).write_to_srt(&path)?;
    let content = FileManager::read_to_string(&path)?;

    let blocks: Vec<&str> = content.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks[1],
        "2\n00:00:02,500 --> 00:00:04,250\n信長は尾張の\n大うつけと呼ばれた"
    );
    Ok(())
}

#[test]
fn test_writeTimingJson_shouldProduceTimingRecord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subtitle_timing.json");

    CueCollection::new(sample_cues()).write_timing_json(&path, "oda_nobunaga")?;
    let record: TimingRecord = serde_json::from_str(&FileManager::read_to_string(&path)?)?;

    assert_eq!(record.subject, "oda_nobunaga");
    assert_eq!(record.subtitle_count, 3);
    assert!((record.total_duration - 6.0).abs() < 1e-9);
    assert_eq!(record.subtitles[0].special_type.as_deref(), Some("section_title"));
    assert_eq!(record.subtitles[1].text_line2, "大うつけと呼ばれた");
    assert_eq!(record.subtitles[1].impact_level, None);
    assert_eq!(record.subtitles[2].impact_level.as_deref(), Some("normal"));
    assert!((record.subtitles[1].duration - 1.75).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_timingJson_withoutTags_shouldOmitOptionalKeys() -> Result<()> {
    let record = CueCollection::new(vec![Cue::new(1, "テスト", None, 0.0, 1.0)])
        .to_timing_record("plain")?;
    let json = serde_json::to_string(&record)?;

    assert!(!json.contains("impact_level"));
    assert!(!json.contains("special_type"));
    Ok(())
}

#[test]
fn test_emission_withNoCues_shouldRefuse() {
    let collection = CueCollection::default();

    assert!(matches!(collection.to_srt(), Err(SubtitleError::EmptyOutput)));
    assert!(matches!(
        collection.to_timing_record("empty"),
        Err(SubtitleError::EmptyOutput)
    ));
}

#[test]
fn test_parseSrtString_withCrlfAndBom_shouldRenumber() -> Result<()> {
    let content = "\u{feff}7\r\n00:00:01,000 --> 00:00:02,000\r\n一行目\r\n\r\n9\r\n00:00:03,000 --> 00:00:04,500\r\n二行目\r\n三行目\r\n";

    let cues = CueCollection::parse_srt_string(content)?;

    assert_eq!(cues.len(), 2);
    assert_eq!((cues[0].index, cues[1].index), (1, 2));
    assert_eq!(cues[1].line2.as_deref(), Some("三行目"));
    assert!((cues[1].duration() - 1.5).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_fromSrtFile_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(CueCollection::from_srt_file(temp_dir.path().join("none.srt")).is_err());
    Ok(())
}
