/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use telop::app_config::{Config, LogLevel, SegmentationConfig};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();
    let segmentation = &config.segmentation;

    assert_eq!(segmentation.max_chars_per_line, 18);
    assert_eq!(segmentation.max_lines, 2);
    assert_eq!(segmentation.max_chars_per_chunk, 36);
    assert_eq!(segmentation.min_fragment_length, 10);
    assert_eq!(segmentation.max_quote_length, 30);
    assert_eq!(segmentation.timing.min_display_duration, 1.0);
    assert_eq!(segmentation.timing.max_display_duration, 6.0);
    assert_eq!(segmentation.timing.min_gap, 0.01);
    assert!(!segmentation.timing.sentence_end_extension.enabled);
    assert!(!segmentation.timing.gap_closing.enabled);
    assert!(segmentation.splitting.particles.contains(&"から".to_string()));

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.segmentation.max_chars_per_line = 0;
    assert!(config.validate().is_err());
    config.segmentation.max_chars_per_line = 18;

    config.segmentation.first_line_ratio = 1.0;
    assert!(config.validate().is_err());
    config.segmentation.first_line_ratio = 0.5;

    config.segmentation.timing.min_gap = -0.1;
    assert!(config.validate().is_err());
    config.segmentation.timing.min_gap = 0.01;

    config.segmentation.timing.gap_closing.enabled = true;
    config.segmentation.timing.gap_closing.min_gap = 2.0;
    assert!(config.validate().is_err());
}

/// A chunk budget beyond the screen capacity is accepted, the tail is deferred
#[test]
fn test_validate_withChunkLargerThanCapacity_shouldStillPass() {
    let mut config = SegmentationConfig::default();
    config.max_chars_per_chunk = 60;

    assert!(config.validate().is_ok());
    assert_eq!(config.cue_capacity(), 36);
}

/// Test saving and loading a configuration file
#[test]
fn test_config_saveAndLoad_withCustomValues_shouldPreserveThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("telop.json");

    let mut config = Config::default();
    config.segmentation.max_chars_per_line = 16;
    config.segmentation.timing.sentence_end_extension.enabled = true;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;

    assert_eq!(loaded.segmentation.max_chars_per_line, 16);
    assert!(loaded.segmentation.timing.sentence_end_extension.enabled);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test loading an invalid configuration file
#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}
