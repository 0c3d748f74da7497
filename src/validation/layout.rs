/*!
 * Display layout validation for cues.
 *
 * Checks that every cue has visible text, no more lines than configured and
 * no line wider than the configured width.
 */

use log::debug;

use crate::app_config::SegmentationConfig;
use crate::segmentation::Cue;

/// Types of layout issues
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutIssue {
    /// No visible text at all
    EmptyCue,
    /// More display lines than allowed
    TooManyLines { count: usize, max_lines: usize },
    /// A line is wider than allowed
    LineTooLong { line: usize, length: usize, max_chars: usize },
}

impl std::fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutIssue::EmptyCue => write!(f, "Cue has no visible text"),
            LayoutIssue::TooManyLines { count, max_lines } => {
                write!(f, "{} lines (max: {})", count, max_lines)
            }
            LayoutIssue::LineTooLong { line, length, max_chars } => {
                write!(f, "Line {} has {} characters (max: {})", line, length, max_chars)
            }
        }
    }
}

/// Result of layout validation for a single cue
#[derive(Debug, Clone)]
pub struct LayoutEntryResult {
    pub index: usize,
    pub passed: bool,
    pub issues: Vec<LayoutIssue>,
}

/// Result of validating the layout of a cue list
#[derive(Debug, Clone)]
pub struct LayoutValidationResult {
    pub passed: bool,
    pub entry_results: Vec<LayoutEntryResult>,
    /// Widest line seen
    pub longest_line: usize,
}

/// Configuration for layout validation
#[derive(Debug, Clone)]
pub struct LayoutValidatorConfig {
    pub max_chars_per_line: usize,
    pub max_lines: usize,
}

impl Default for LayoutValidatorConfig {
    fn default() -> Self {
        Self::from(&SegmentationConfig::default())
    }
}

impl From<&SegmentationConfig> for LayoutValidatorConfig {
    fn from(config: &SegmentationConfig) -> Self {
        Self {
            max_chars_per_line: config.max_chars_per_line,
            max_lines: config.max_lines,
        }
    }
}

/// Layout validator for cues
#[derive(Default)]
pub struct LayoutValidator {
    config: LayoutValidatorConfig,
}

impl LayoutValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single cue. Embedded newlines count as extra lines.
    pub fn validate_entry(&self, cue: &Cue) -> LayoutEntryResult {
        let lines: Vec<&str> = cue
            .lines()
            .flat_map(|line| line.split('\n'))
            .filter(|line| !line.is_empty())
            .collect();
        let mut issues = Vec::new();

        if lines.is_empty() {
            issues.push(LayoutIssue::EmptyCue);
        }
        if lines.len() > self.config.max_lines {
            issues.push(LayoutIssue::TooManyLines {
                count: lines.len(),
                max_lines: self.config.max_lines,
            });
        }
        for (i, line) in lines.iter().enumerate() {
            let length = line.chars().count();
            if length > self.config.max_chars_per_line {
                issues.push(LayoutIssue::LineTooLong {
                    line: i + 1,
                    length,
                    max_chars: self.config.max_chars_per_line,
                });
            }
        }

        LayoutEntryResult {
            index: cue.index,
            passed: issues.is_empty(),
            issues,
        }
    }

    pub fn validate_collection(&self, cues: &[Cue]) -> LayoutValidationResult {
        let entry_results: Vec<LayoutEntryResult> =
            cues.iter().map(|c| self.validate_entry(c)).collect();
        let longest_line = cues
            .iter()
            .flat_map(|c| c.lines().flat_map(|l| l.split('\n')))
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Layout validation: {} cues, longest line {} characters",
            cues.len(),
            longest_line
        );

        LayoutValidationResult {
            passed,
            entry_results,
            longest_line,
        }
    }
}
