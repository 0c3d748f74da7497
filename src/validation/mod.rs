/*!
 * Validation module for produced or imported cues.
 *
 * - `layout`: line count and line width
 * - `timecodes`: time ranges, duration bounds and gaps between cues
 *
 * `CueValidator` runs both with the bounds of a segmentation config.
 */

pub mod layout;
pub mod timecodes;

use crate::app_config::SegmentationConfig;
use crate::segmentation::Cue;

pub use layout::{LayoutIssue, LayoutValidationResult, LayoutValidator, LayoutValidatorConfig};
pub use timecodes::{
    TimecodeIssue, TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig,
};

/// One finding, attributed to a cue
#[derive(Debug, Clone, PartialEq)]
pub enum CueIssue {
    Layout { index: usize, issue: LayoutIssue },
    Timecode { index: usize, issue: TimecodeIssue },
}

impl std::fmt::Display for CueIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CueIssue::Layout { index, issue } => write!(f, "cue {}: {}", index, issue),
            CueIssue::Timecode { index, issue } => write!(f, "cue {}: {}", index, issue),
        }
    }
}

/// Combined result of all cue checks
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub layout: LayoutValidationResult,
    pub timecodes: TimecodeValidationResult,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.layout.passed && self.timecodes.passed
    }

    /// All issues in cue order, layout first
    pub fn issues(&self) -> Vec<CueIssue> {
        let layout = self.layout.entry_results.iter().flat_map(|r| {
            r.issues.iter().map(move |issue| CueIssue::Layout {
                index: r.index,
                issue: issue.clone(),
            })
        });
        let timecodes = self.timecodes.entry_results.iter().flat_map(|r| {
            r.issues.iter().map(move |issue| CueIssue::Timecode {
                index: r.index,
                issue: issue.clone(),
            })
        });

        let mut issues: Vec<CueIssue> = layout.chain(timecodes).collect();
        issues.sort_by_key(|issue| match issue {
            CueIssue::Layout { index, .. } => (*index, 0),
            CueIssue::Timecode { index, .. } => (*index, 1),
        });
        issues
    }
}

/// Runs layout and timecode validation with one configuration
pub struct CueValidator {
    layout: LayoutValidator,
    timecodes: TimecodeValidator,
}

impl CueValidator {
    pub fn new(config: &SegmentationConfig) -> Self {
        Self {
            layout: LayoutValidator::with_config(LayoutValidatorConfig::from(config)),
            timecodes: TimecodeValidator::with_config(TimecodeValidatorConfig::from(&config.timing)),
        }
    }

    pub fn validate(&self, cues: &[Cue]) -> ValidationReport {
        ValidationReport {
            layout: self.layout.validate_collection(cues),
            timecodes: self.timecodes.validate_collection(cues),
        }
    }
}
