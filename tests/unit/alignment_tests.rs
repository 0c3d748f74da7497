/*!
 * Tests for alignment file parsing
 */

use anyhow::Result;

use telop::alignment::{into_sections, load_alignment, parse_alignment, SectionId};
use telop::errors::SegmentationError;
use crate::common;

const ALIGNMENT: &str = r#"[
    {
        "section_id": 1,
        "offset": 0.0,
        "narration_timing": {
            "text": "今日は晴れ。",
            "characters": ["今日", "は", "晴", "れ", "。"],
            "char_start_times": [0.0, 0.4, 0.6, 0.8, 1.0],
            "char_end_times": [0.4, 0.6, 0.8, 1.0, 1.1]
        }
    },
    {
        "section_id": "outro",
        "offset": 12.0,
        "text": "おしまい"
    }
]"#;

#[test]
fn test_parseAlignment_withMixedIds_shouldKeepBoth() -> Result<()> {
    let sections = parse_alignment(ALIGNMENT)?;

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].section_id, SectionId::Number(1));
    assert_eq!(sections[1].section_id, SectionId::Text("outro".to_string()));
    Ok(())
}

#[test]
fn test_intoSection_withMultiCharToken_shouldSpreadInterval() -> Result<()> {
    let section = parse_alignment(ALIGNMENT)?.remove(0).into_section(0.15)?;

    assert_eq!(section.characters.len(), 6);
    assert_eq!(section.characters[0].ch, '今');
    assert!((section.characters[0].end - 0.2).abs() < 1e-9);
    assert!((section.characters[1].start - 0.2).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_intoSection_withDecreasingStarts_shouldBeMalformed() {
    let json = r#"[{
        "section_id": 9,
        "narration_timing": {
            "characters": ["あ", "い"],
            "char_start_times": [0.5, 0.1],
            "char_end_times": [0.6, 0.2]
        }
    }]"#;

    let result = parse_alignment(json)
        .map(|mut s| s.remove(0).into_section(0.15))
        .expect("alignment parses");

    assert!(matches!(
        result,
        Err(SegmentationError::MalformedInput { section, .. }) if section == "9"
    ));
}

#[test]
fn test_intoSections_withOnlyMalformedSection_shouldReturnError() -> Result<()> {
    let json = r#"[{
        "section_id": 1,
        "narration_timing": {
            "characters": ["あ", "い"],
            "char_start_times": [0.0],
            "char_end_times": [0.1, 0.2]
        }
    }]"#;

    let result = into_sections(parse_alignment(json)?, 0.15);

    assert!(matches!(
        result,
        Err(SegmentationError::MalformedInput { section, .. }) if section == "1"
    ));
    Ok(())
}

#[test]
fn test_intoSections_withMalformedTimingsAndText_shouldUseUniformTiming() -> Result<()> {
    let json = r#"[{
        "section_id": 2,
        "offset": 3.0,
        "narration_timing": {
            "text": "あいう",
            "characters": ["あ", "い", "う"],
            "char_start_times": [0.0, 0.1],
            "char_end_times": [0.1, 0.2, 0.3],
            "start_time": 0.5
        },
        "title_timing": {"text": "第二章", "start_time": 0.0, "end_time": 1.0}
    }]"#;

    let sections = into_sections(parse_alignment(json)?, 0.2)?;

    assert_eq!(sections.len(), 1);
    let section = &sections[0];
    assert_eq!(section.id, "2");
    assert_eq!(section.characters.len(), 3);
    assert!((section.characters[0].start - 0.5).abs() < 1e-9);
    assert!((section.characters[2].end - 1.1).abs() < 1e-9);
    assert!(section.title.is_some());
    Ok(())
}

#[test]
fn test_intoSections_withMalformedBesideHealthy_shouldSkipMalformed() -> Result<()> {
    let json = r#"[
        {
            "section_id": 1,
            "narration_timing": {
                "characters": ["あ", "い"],
                "char_start_times": [0.0],
                "char_end_times": [0.1, 0.2]
            }
        },
        {"section_id": 2, "offset": 5.0, "text": "おしまい"}
    ]"#;

    let sections = into_sections(parse_alignment(json)?, 0.15)?;

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].id, "2");
    Ok(())
}

#[test]
fn test_loadAlignment_fromFile_shouldReadAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "audio_timing.json", ALIGNMENT)?;

    let sections = load_alignment(&path)?;
    assert_eq!(sections.len(), 2);

    assert!(load_alignment(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

#[test]
fn test_parseAlignment_withGarbage_shouldFail() {
    assert!(parse_alignment("{\"sections\": 3}").is_err());
}
