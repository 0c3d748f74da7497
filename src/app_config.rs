use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving segmentation and timing settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Segmentation, line layout and timing settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings consumed by the segmentation pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    // @field: Display width of a single line in characters
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    // @field: Lines per cue (1 or 2)
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    // @field: Character budget of a chunk before it is divided
    #[serde(default = "default_max_chars_per_chunk")]
    pub max_chars_per_chunk: usize,

    // @field: Shortest fragment the chunk divider may leave behind
    #[serde(default = "default_min_fragment_length")]
    pub min_fragment_length: usize,

    // @field: Shortest line the line balancer may produce
    #[serde(default = "default_min_line_length")]
    pub min_line_length: usize,

    // @field: Fallback share of the first line when no boundary qualifies
    #[serde(default = "default_first_line_ratio")]
    pub first_line_ratio: f64,

    // @field: Longest quotation kept in one piece
    #[serde(default = "default_max_quote_length")]
    pub max_quote_length: usize,

    // @field: Seconds per character when the alignment provider has no timings
    #[serde(default = "default_fallback_seconds_per_char")]
    pub fallback_seconds_per_char: f64,

    /// Boundary scoring
    #[serde(default)]
    pub splitting: SplittingConfig,

    /// Display duration and gap rules
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            max_lines: default_max_lines(),
            max_chars_per_chunk: default_max_chars_per_chunk(),
            min_fragment_length: default_min_fragment_length(),
            min_line_length: default_min_line_length(),
            first_line_ratio: default_first_line_ratio(),
            max_quote_length: default_max_quote_length(),
            fallback_seconds_per_char: default_fallback_seconds_per_char(),
            splitting: SplittingConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl SegmentationConfig {
    /// Maximum number of characters one cue can display
    pub fn cue_capacity(&self) -> usize {
        self.max_chars_per_line * self.max_lines
    }

    /// Check that the settings describe a usable layout
    pub fn validate(&self) -> Result<()> {
        if self.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be at least 1"));
        }
        if !(1..=2).contains(&self.max_lines) {
            return Err(anyhow!("max_lines must be 1 or 2, got {}", self.max_lines));
        }
        if self.max_chars_per_chunk == 0 {
            return Err(anyhow!("max_chars_per_chunk must be at least 1"));
        }
        if !(self.first_line_ratio > 0.0 && self.first_line_ratio < 1.0) {
            return Err(anyhow!(
                "first_line_ratio must be between 0 and 1, got {}",
                self.first_line_ratio
            ));
        }
        if self.max_quote_length == 0 {
            return Err(anyhow!("max_quote_length must be at least 1"));
        }
        if !(self.fallback_seconds_per_char > 0.0) {
            return Err(anyhow!("fallback_seconds_per_char must be positive"));
        }
        if self.max_chars_per_chunk > self.cue_capacity() {
            warn!(
                "max_chars_per_chunk ({}) exceeds what {} line(s) of {} characters can show; the excess will be deferred",
                self.max_chars_per_chunk, self.max_lines, self.max_chars_per_line
            );
        }
        self.timing.validate().context("Invalid timing settings")
    }
}

/// Priority of each boundary category
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PriorityScores {
    #[serde(default = "default_punctuation_score")]
    pub sentence_end: f64,
    #[serde(default = "default_punctuation_score")]
    pub comma: f64,
    #[serde(default = "default_particle_score")]
    pub particle: f64,
    #[serde(default = "default_hiragana_to_kanji_score")]
    pub hiragana_to_kanji: f64,
    #[serde(default = "default_kanji_to_hiragana_score")]
    pub kanji_to_hiragana: f64,
    #[serde(default = "default_katakana_boundary_score")]
    pub katakana_boundary: f64,
}

impl Default for PriorityScores {
    fn default() -> Self {
        Self {
            sentence_end: default_punctuation_score(),
            comma: default_punctuation_score(),
            particle: default_particle_score(),
            hiragana_to_kanji: default_hiragana_to_kanji_score(),
            kanji_to_hiragana: default_kanji_to_hiragana_score(),
            katakana_boundary: default_katakana_boundary_score(),
        }
    }
}

/// Penalties subtracted from a boundary's priority
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Penalties {
    // @field: Per side shorter than the minimum fragment
    #[serde(default = "default_min_fragment_penalty")]
    pub min_fragment: f64,

    // @field: Per character away from the ideal cut
    #[serde(default = "default_distance_penalty")]
    pub distance_from_ideal: f64,

    // @field: Cutting through a run of digits
    #[serde(default = "default_run_penalty")]
    pub splits_number: f64,

    // @field: Cutting through a run of latin letters
    #[serde(default = "default_run_penalty")]
    pub splits_alphabet: f64,

    // @field: Cutting through an inflected word
    #[serde(default = "default_conjugation_penalty")]
    pub splits_conjugation: f64,

    // @field: Multiplier of |0.5 - left share|
    #[serde(default = "default_balance_penalty")]
    pub balance: f64,

    // @field: Left fragment ending in ん or っ
    #[serde(default = "default_n_tsu_penalty")]
    pub ends_with_n_tsu: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            min_fragment: default_min_fragment_penalty(),
            distance_from_ideal: default_distance_penalty(),
            splits_number: default_run_penalty(),
            splits_alphabet: default_run_penalty(),
            splits_conjugation: default_conjugation_penalty(),
            balance: default_balance_penalty(),
            ends_with_n_tsu: default_n_tsu_penalty(),
        }
    }
}

/// Boundary classifier settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SplittingConfig {
    #[serde(default)]
    pub priority_scores: PriorityScores,

    #[serde(default)]
    pub penalties: Penalties,

    /// Grammatical particles whose trailing position is a preferred cut
    #[serde(default = "default_particles")]
    pub particles: Vec<String>,

    /// A best score at or below this value counts as no usable boundary
    #[serde(default = "default_disqualify_floor")]
    pub disqualify_floor: f64,
}

impl Default for SplittingConfig {
    fn default() -> Self {
        Self {
            priority_scores: PriorityScores::default(),
            penalties: Penalties::default(),
            particles: default_particles(),
            disqualify_floor: default_disqualify_floor(),
        }
    }
}

/// Extension of cues that close a sentence into the following silence
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SentenceEndExtension {
    #[serde(default)]
    pub enabled: bool,

    // @field: Silence kept before the next cue starts
    #[serde(default = "default_next_start_margin")]
    pub next_start_margin: f64,

    // @field: Smallest usable silence before extending at all
    #[serde(default = "default_min_available")]
    pub min_available: f64,

    // @field: Share of the usable silence that is filled
    #[serde(default = "default_fill_ratio")]
    pub fill_ratio: f64,

    // @field: Extension given to the very last cue
    #[serde(default = "default_final_extension")]
    pub final_extension: f64,
}

impl Default for SentenceEndExtension {
    fn default() -> Self {
        Self {
            enabled: false,
            next_start_margin: default_next_start_margin(),
            min_available: default_min_available(),
            fill_ratio: default_fill_ratio(),
            final_extension: default_final_extension(),
        }
    }
}

/// Closing of medium-sized gaps between cues to avoid flicker
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GapClosing {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_gap_closing_min")]
    pub min_gap: f64,

    #[serde(default = "default_gap_closing_max")]
    pub max_gap: f64,

    // @field: Gap left after closing
    #[serde(default = "default_gap_closing_target")]
    pub target_gap: f64,
}

impl Default for GapClosing {
    fn default() -> Self {
        Self {
            enabled: false,
            min_gap: default_gap_closing_min(),
            max_gap: default_gap_closing_max(),
            target_gap: default_gap_closing_target(),
        }
    }
}

/// Timing assigner settings, all values in seconds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_min_display_duration")]
    pub min_display_duration: f64,

    #[serde(default = "default_max_display_duration")]
    pub max_display_duration: f64,

    // @field: Silence required before the next cue starts
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,

    #[serde(default)]
    pub sentence_end_extension: SentenceEndExtension,

    #[serde(default)]
    pub gap_closing: GapClosing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_display_duration: default_min_display_duration(),
            max_display_duration: default_max_display_duration(),
            min_gap: default_min_gap(),
            sentence_end_extension: SentenceEndExtension::default(),
            gap_closing: GapClosing::default(),
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_display_duration >= 0.0) {
            return Err(anyhow!("min_display_duration must not be negative"));
        }
        if self.min_display_duration > self.max_display_duration {
            return Err(anyhow!(
                "min_display_duration ({}) is larger than max_display_duration ({})",
                self.min_display_duration, self.max_display_duration
            ));
        }
        if !(self.min_gap >= 0.0) {
            return Err(anyhow!("min_gap must not be negative"));
        }
        if self.gap_closing.enabled && self.gap_closing.min_gap > self.gap_closing.max_gap {
            return Err(anyhow!("gap_closing.min_gap is larger than gap_closing.max_gap"));
        }
        Ok(())
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_max_chars_per_line() -> usize {
    18
}

fn default_max_lines() -> usize {
    2
}

fn default_max_chars_per_chunk() -> usize {
    36
}

fn default_min_fragment_length() -> usize {
    10
}

fn default_min_line_length() -> usize {
    3
}

fn default_first_line_ratio() -> f64 {
    0.5
}

fn default_max_quote_length() -> usize {
    30
}

fn default_fallback_seconds_per_char() -> f64 {
    0.15
}

fn default_punctuation_score() -> f64 {
    120.0
}

fn default_particle_score() -> f64 {
    100.0
}

fn default_hiragana_to_kanji_score() -> f64 {
    80.0
}

fn default_kanji_to_hiragana_score() -> f64 {
    60.0
}

fn default_katakana_boundary_score() -> f64 {
    40.0
}

fn default_min_fragment_penalty() -> f64 {
    200.0
}

fn default_distance_penalty() -> f64 {
    5.0
}

fn default_run_penalty() -> f64 {
    50.0
}

fn default_conjugation_penalty() -> f64 {
    500.0
}

fn default_balance_penalty() -> f64 {
    100.0
}

fn default_n_tsu_penalty() -> f64 {
    20.0
}

fn default_particles() -> Vec<String> {
    ["は", "が", "を", "に", "で", "と", "も", "や", "へ", "から", "まで", "より"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_disqualify_floor() -> f64 {
    -100.0
}

fn default_next_start_margin() -> f64 {
    0.3
}

fn default_min_available() -> f64 {
    0.5
}

fn default_fill_ratio() -> f64 {
    0.6
}

fn default_final_extension() -> f64 {
    0.5
}

fn default_gap_closing_min() -> f64 {
    0.5
}

fn default_gap_closing_max() -> f64 {
    1.5
}

fn default_gap_closing_target() -> f64 {
    0.3
}

fn default_min_display_duration() -> f64 {
    1.0
}

fn default_max_display_duration() -> f64 {
    6.0
}

fn default_min_gap() -> f64 {
    0.01
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.segmentation
            .validate()
            .context("Invalid segmentation settings")
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}
