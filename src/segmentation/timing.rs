/*!
 * Timing assignment.
 *
 * Cues start with the natural timing of their first and last character and
 * are then adjusted in this order:
 * 1. extended to the minimum display duration
 * 2. optionally extended into the silence after a sentence
 * 3. optionally stretched to close a medium gap before the next cue
 * 4. clamped to the maximum display duration
 * 5. clamped so the next cue starts at least `min_gap` later
 *
 * Only ends move. The pass runs back to front so every cue is measured
 * against the next cue that survives; cues left without a positive duration
 * are dropped.
 */

use log::warn;

use crate::app_config::TimingConfig;
use crate::errors::SegmentationError;

use super::models::{Cue, CueKind};

/// A laid-out cue with its natural timing, before adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct DraftCue {
    pub section_id: String,
    pub line1: String,
    pub line2: Option<String>,
    // @field: Natural start on the full timeline
    pub start: f64,
    // @field: Natural end on the full timeline
    pub end: f64,
    // @field: Last source character was a sentence ender
    pub ends_sentence: bool,
    pub kind: CueKind,
}

impl DraftCue {
    fn text(&self) -> String {
        let mut text = self.line1.clone();
        if let Some(line2) = &self.line2 {
            text.push_str(line2);
        }
        text
    }
}

pub struct TimingAssigner<'a> {
    config: &'a TimingConfig,
}

impl<'a> TimingAssigner<'a> {
    pub fn new(config: &'a TimingConfig) -> Self {
        Self { config }
    }

    /// Turn ordered drafts into timed cues. Indices are left at zero for the
    /// caller to number.
    pub fn assign(&self, drafts: Vec<DraftCue>) -> Vec<Cue> {
        let mut cues = Vec::with_capacity(drafts.len());
        let mut next_start: Option<f64> = None;

        for draft in drafts.into_iter().rev() {
            let start = draft.start;
            let end = self.adjust_end(start, draft.end, draft.ends_sentence, next_start);

            if end <= start {
                warn!(
                    "Dropping cue: {}",
                    SegmentationError::TimingInversion {
                        text: draft.text(),
                        start,
                        end,
                    }
                );
                continue;
            }

            next_start = Some(start);
            cues.push(Cue {
                index: 0,
                line1: draft.line1,
                line2: draft.line2,
                start,
                end,
                tag: None,
                kind: draft.kind,
                section_id: draft.section_id,
            });
        }

        cues.reverse();
        cues
    }

    /// Apply the duration and gap rules to one cue's end
    pub fn adjust_end(&self, start: f64, natural_end: f64, ends_sentence: bool, next_start: Option<f64>) -> f64 {
        let config = self.config;
        let mut end = natural_end;

        if end - start < config.min_display_duration {
            end = start + config.min_display_duration;
        }

        let extension = &config.sentence_end_extension;
        if extension.enabled && ends_sentence {
            match next_start {
                Some(next) => {
                    let available = next - extension.next_start_margin - end;
                    if available > extension.min_available {
                        end += available * extension.fill_ratio;
                    }
                }
                None => end += extension.final_extension,
            }
        }

        let closing = &config.gap_closing;
        if let (true, Some(next)) = (closing.enabled, next_start) {
            let gap = next - end;
            if gap >= closing.min_gap && gap <= closing.max_gap {
                end = next - closing.target_gap;
            }
        }

        if end - start > config.max_display_duration {
            end = start + config.max_display_duration;
        }

        if let Some(next) = next_start {
            end = end.min(next - config.min_gap);
        }

        end
    }
}
