/*!
 * Timecode validation for cues.
 *
 * This module validates that timecodes are:
 * - Logically consistent (start < end)
 * - Within the configured display duration bounds
 * - Separated from the following cue by at least the minimum gap
 */

use log::debug;

use crate::app_config::TimingConfig;
use crate::segmentation::Cue;

/// Tolerance for rounding when comparing millisecond values
const TOLERANCE_MS: u64 = 1;

/// Result of timecode validation for a single cue
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// Index of the cue
    pub index: usize,
    /// Whether the cue passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeEntryResult {
    /// Create a passing result
    pub fn passed(index: usize) -> Self {
        Self {
            index,
            passed: true,
            issues: vec![],
        }
    }

    /// Create a failing result
    pub fn failed(index: usize, issues: Vec<TimecodeIssue>) -> Self {
        Self {
            index,
            passed: false,
            issues,
        }
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End is not after start
    InvalidTimeRange { start_ms: u64, end_ms: u64 },
    /// Duration is too short
    DurationTooShort { duration_ms: u64, min_duration_ms: u64 },
    /// Duration is too long
    DurationTooLong { duration_ms: u64, max_duration_ms: u64 },
    /// Next cue starts before this one ends
    OverlapsWithNext { next_index: usize, overlap_ms: u64 },
    /// Next cue starts closer than the minimum gap
    GapTooSmall { next_index: usize, gap_ms: u64, min_gap_ms: u64 },
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms >= end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::DurationTooShort { duration_ms, min_duration_ms } => {
                write!(f, "Duration too short: {}ms (min: {}ms)", duration_ms, min_duration_ms)
            }
            TimecodeIssue::DurationTooLong { duration_ms, max_duration_ms } => {
                write!(f, "Duration too long: {}ms (max: {}ms)", duration_ms, max_duration_ms)
            }
            TimecodeIssue::OverlapsWithNext { next_index, overlap_ms } => {
                write!(f, "Overlaps with cue {} by {}ms", next_index, overlap_ms)
            }
            TimecodeIssue::GapTooSmall { next_index, gap_ms, min_gap_ms } => {
                write!(
                    f,
                    "Gap of {}ms before cue {} (min: {}ms)",
                    gap_ms, next_index, min_gap_ms
                )
            }
        }
    }
}

/// Result of validating all timecodes in a cue list
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each cue
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping pairs
    pub overlap_count: usize,
}

impl TimecodeValidationResult {
    /// Get all failed cues
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Minimum cue duration in ms
    pub min_duration_ms: u64,
    /// Maximum cue duration in ms
    pub max_duration_ms: u64,
    /// Minimum silence before the next cue in ms
    pub min_gap_ms: u64,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for TimecodeValidatorConfig {
    fn from(config: &TimingConfig) -> Self {
        Self {
            min_duration_ms: to_ms(config.min_display_duration),
            max_duration_ms: to_ms(config.max_display_duration),
            min_gap_ms: to_ms(config.min_gap),
        }
    }
}

/// Seconds to whole milliseconds, as written to caption files
pub fn to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Timecode validator for cues
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimecodeValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single cue on its own
    pub fn validate_entry(&self, cue: &Cue) -> TimecodeEntryResult {
        let mut issues = Vec::new();
        let start_ms = to_ms(cue.start);
        let end_ms = to_ms(cue.end);

        if end_ms <= start_ms {
            issues.push(TimecodeIssue::InvalidTimeRange { start_ms, end_ms });
            // Can't do further validation with invalid times
            return TimecodeEntryResult::failed(cue.index, issues);
        }

        let duration_ms = end_ms - start_ms;
        if duration_ms + TOLERANCE_MS < self.config.min_duration_ms {
            issues.push(TimecodeIssue::DurationTooShort {
                duration_ms,
                min_duration_ms: self.config.min_duration_ms,
            });
        }
        if duration_ms > self.config.max_duration_ms + TOLERANCE_MS {
            issues.push(TimecodeIssue::DurationTooLong {
                duration_ms,
                max_duration_ms: self.config.max_duration_ms,
            });
        }

        if issues.is_empty() {
            TimecodeEntryResult::passed(cue.index)
        } else {
            TimecodeEntryResult::failed(cue.index, issues)
        }
    }

    /// Validate an ordered cue list.
    ///
    /// A cue shorter than the minimum is accepted when the next cue leaves it
    /// no room to be longer.
    pub fn validate_collection(&self, cues: &[Cue]) -> TimecodeValidationResult {
        let mut entry_results: Vec<TimecodeEntryResult> =
            cues.iter().map(|c| self.validate_entry(c)).collect();
        let mut overlap_count = 0;

        for (i, pair) in cues.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            let end_ms = to_ms(current.end);
            let next_start_ms = to_ms(next.start);
            let result = &mut entry_results[i];

            if end_ms > next_start_ms {
                overlap_count += 1;
                result.issues.push(TimecodeIssue::OverlapsWithNext {
                    next_index: next.index,
                    overlap_ms: end_ms - next_start_ms,
                });
            } else if next_start_ms - end_ms + TOLERANCE_MS < self.config.min_gap_ms {
                result.issues.push(TimecodeIssue::GapTooSmall {
                    next_index: next.index,
                    gap_ms: next_start_ms - end_ms,
                    min_gap_ms: self.config.min_gap_ms,
                });
            }

            let room_ms = next_start_ms.saturating_sub(to_ms(current.start) + self.config.min_gap_ms);
            if room_ms < self.config.min_duration_ms + TOLERANCE_MS {
                result
                    .issues
                    .retain(|issue| !matches!(issue, TimecodeIssue::DurationTooShort { .. }));
            }
            result.passed = result.issues.is_empty();
        }

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} cues, {} issues, {} overlaps",
            cues.len(),
            total_issues,
            overlap_count
        );

        TimecodeValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }
}

impl Default for TimecodeValidator {
    fn default() -> Self {
        Self::new()
    }
}
