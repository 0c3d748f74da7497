/*!
 * Data model shared by the segmentation stages.
 *
 * `Section` and `TimedCharacter` are the input handed over by the timing
 * alignment provider, `Chunk` is the intermediate span the splitters pass
 * around, and `Cue` is the final timed subtitle.
 */

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::errors::SegmentationError;

/// One source character with its timestamp, in seconds relative to its section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedCharacter {
    pub ch: char,
    pub start: f64,
    pub end: f64,
}

impl TimedCharacter {
    pub fn new(ch: char, start: f64, end: f64) -> Self {
        Self { ch, start, end }
    }
}

/// Title shown on screen while a section is introduced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTitle {
    pub text: String,
    // @field: Seconds relative to the section
    pub start: f64,
    pub end: f64,
}

impl SectionTitle {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Spread the title's display interval evenly over its characters
    pub fn characters(&self) -> Vec<TimedCharacter> {
        let count = self.text.chars().count().max(1) as f64;
        let step = (self.end - self.start).max(0.0) / count;
        self.text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let start = self.start + step * i as f64;
                TimedCharacter::new(ch, start, start + step)
            })
            .collect()
    }
}

/// A narration segment with its own timestamp stream
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    // @field: Identifier used in logs and errors
    pub id: String,

    // @field: Narration text as scripted, may contain line break hints
    pub text: String,

    // @field: Position of the section on the full timeline, in seconds
    pub offset: f64,

    pub characters: Vec<TimedCharacter>,

    pub title: Option<SectionTitle>,
}

impl Section {
    /// Create a section from an already timed character stream
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        offset: f64,
        characters: Vec<TimedCharacter>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            offset,
            characters,
            title: None,
        }
    }

    /// Build a section from the alignment provider's parallel arrays.
    ///
    /// Tokens longer than one character share their interval evenly.
    pub fn from_alignment(
        id: impl Into<String>,
        text: impl Into<String>,
        offset: f64,
        tokens: &[String],
        start_times: &[f64],
        end_times: &[f64],
    ) -> Result<Self, SegmentationError> {
        let id = id.into();
        if tokens.len() != start_times.len() || tokens.len() != end_times.len() {
            return Err(SegmentationError::MalformedInput {
                section: id,
                reason: format!(
                    "{} characters, {} start times, {} end times",
                    tokens.len(),
                    start_times.len(),
                    end_times.len()
                ),
            });
        }

        let mut characters = Vec::with_capacity(tokens.len());
        for ((token, &start), &end) in tokens.iter().zip(start_times).zip(end_times) {
            let count = token.chars().count();
            if count == 0 {
                return Err(SegmentationError::MalformedInput {
                    section: id,
                    reason: format!("empty character token at {:.3}s", start),
                });
            }
            let step = (end - start) / count as f64;
            characters.extend(token.chars().enumerate().map(|(i, ch)| {
                let char_start = start + step * i as f64;
                TimedCharacter::new(ch, char_start, char_start + step)
            }));
        }

        let section = Self::new(id, text, offset, characters);
        section.validate()?;
        Ok(section)
    }

    /// Estimate timestamps at a fixed rate when no alignment is available
    pub fn with_uniform_timing(
        id: impl Into<String>,
        text: impl Into<String>,
        offset: f64,
        seconds_per_char: f64,
    ) -> Self {
        let text = text.into();
        let characters = text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let start = seconds_per_char * i as f64;
                TimedCharacter::new(ch, start, start + seconds_per_char)
            })
            .collect();
        Self::new(id, text, offset, characters)
    }

    pub fn with_title(mut self, title: SectionTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Check the timestamp invariants of the character stream
    pub fn validate(&self) -> Result<(), SegmentationError> {
        let malformed = |reason: String| SegmentationError::MalformedInput {
            section: self.id.clone(),
            reason,
        };

        if !self.offset.is_finite() {
            return Err(malformed(format!("offset {} is not finite", self.offset)));
        }

        let mut previous_start = f64::NEG_INFINITY;
        for (i, c) in self.characters.iter().enumerate() {
            if !c.start.is_finite() || !c.end.is_finite() {
                return Err(malformed(format!("character {} has a non-finite timestamp", i)));
            }
            if c.start > c.end {
                return Err(malformed(format!(
                    "character {} ('{}') ends at {:.3}s before it starts at {:.3}s",
                    i, c.ch, c.end, c.start
                )));
            }
            if c.start < previous_start {
                return Err(malformed(format!(
                    "character {} ('{}') starts at {:.3}s, before the previous character at {:.3}s",
                    i, c.ch, c.start, previous_start
                )));
            }
            previous_start = c.start;
        }

        if let Some(title) = &self.title {
            if !(title.start.is_finite() && title.end.is_finite()) || title.start > title.end {
                return Err(malformed(format!(
                    "title timing {:.3}s..{:.3}s is invalid",
                    title.start, title.end
                )));
            }
        }

        Ok(())
    }
}

/// Half-open span of normalized characters destined to become one cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Split at an offset relative to the start of the chunk
    pub fn split_at(&self, cut: usize) -> (Chunk, Chunk) {
        let at = (self.start + cut).min(self.end);
        (Chunk::new(self.start, at), Chunk::new(at, self.end))
    }
}

/// Origin of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    #[default]
    Narration,
    SectionTitle,
}

impl CueKind {
    /// Label written to the timing record for non-narration cues
    pub fn special_type(&self) -> Option<&'static str> {
        match self {
            Self::Narration => None,
            Self::SectionTitle => Some("section_title"),
        }
    }
}

/// A timed subtitle of one or two display lines
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: 1-based ordinal in the final output
    pub index: usize,
    pub line1: String,
    pub line2: Option<String>,
    // @field: Seconds on the full timeline
    pub start: f64,
    pub end: f64,
    // @field: Opaque classification tag carried through untouched
    pub tag: Option<String>,
    pub kind: CueKind,
    pub section_id: String,
}

impl Cue {
    pub fn new(index: usize, line1: impl Into<String>, line2: Option<String>, start: f64, end: f64) -> Self {
        Self {
            index,
            line1: line1.into(),
            line2,
            start,
            end,
            tag: None,
            kind: CueKind::Narration,
            section_id: String::new(),
        }
    }

    /// Display lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.line1.as_str()).chain(self.line2.as_deref())
    }

    /// All display text without line separators
    pub fn text(&self) -> String {
        self.lines().collect()
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
