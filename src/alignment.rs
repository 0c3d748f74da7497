/*!
 * Timing alignment input.
 *
 * Serde model of the alignment provider's output (one entry per narration
 * section with parallel character and timestamp arrays) and its conversion
 * into `Section`s. A section without usable character timings falls back to
 * a uniform rate per character.
 */

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SegmentationError;
use crate::segmentation::{Section, SectionTitle};

/// Section identifier, numeric or textual in provider output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Per-character timings of the narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationTiming {
    #[serde(default)]
    pub text: String,
    pub characters: Vec<String>,
    pub char_start_times: Vec<f64>,
    pub char_end_times: Vec<f64>,
    // @field: Narration start within the section, added to every character
    #[serde(default)]
    pub start_time: f64,
}

/// Display interval of a section title, relative to the section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleTiming {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// One entry of the alignment file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSection {
    pub section_id: SectionId,

    // @field: Section start on the full timeline, in seconds
    #[serde(default)]
    pub offset: f64,

    // @field: Narration text, used when timings are missing
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub narration_timing: Option<NarrationTiming>,

    #[serde(default)]
    pub title_timing: Option<TitleTiming>,
}

impl AlignmentSection {
    /// Convert into a section, estimating timings at `seconds_per_char` when
    /// the provider produced none
    pub fn into_section(self, seconds_per_char: f64) -> Result<Section, SegmentationError> {
        let id = self.section_id.to_string();
        let title = self.title();

        let section = match self.narration_timing {
            Some(timing) if !timing.characters.is_empty() => {
                let text = if timing.text.is_empty() {
                    self.text.unwrap_or_else(|| timing.characters.concat())
                } else {
                    timing.text
                };
                // Titles are timed against the section, so the narration
                // start moves into the character timestamps
                let shift = |times: &[f64]| -> Vec<f64> {
                    times.iter().map(|t| t + timing.start_time).collect()
                };
                Section::from_alignment(
                    id,
                    text,
                    self.offset,
                    &timing.characters,
                    &shift(&timing.char_start_times),
                    &shift(&timing.char_end_times),
                )?
            }
            timing => {
                let start_time = timing.as_ref().map(|t| t.start_time).unwrap_or_default();
                let text = self
                    .text
                    .or_else(|| timing.map(|t| t.text))
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| SegmentationError::MalformedInput {
                        section: id.clone(),
                        reason: "neither character timings nor narration text".to_string(),
                    })?;
                warn!(
                    "Section {} has no character timings, assuming {:.3}s per character",
                    id, seconds_per_char
                );
                uniform_section(id, text, self.offset, start_time, seconds_per_char)
            }
        };

        Ok(match title {
            Some(title) => section.with_title(title),
            None => section,
        })
    }

    /// Rebuild the section from its narration text alone, ignoring character
    /// timings. `None` when there is no text to fall back on.
    pub fn into_uniform_section(self, seconds_per_char: f64) -> Option<Section> {
        let title = self.title();
        let start_time = self.narration_timing.as_ref().map(|t| t.start_time).unwrap_or_default();
        let text = self
            .text
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.narration_timing.map(|t| t.text))
            .filter(|t| !t.trim().is_empty())?;

        let section = uniform_section(
            self.section_id.to_string(),
            text,
            self.offset,
            start_time,
            seconds_per_char,
        );
        Some(match title {
            Some(title) => section.with_title(title),
            None => section,
        })
    }

    fn title(&self) -> Option<SectionTitle> {
        self.title_timing
            .as_ref()
            .filter(|t| !t.text.trim().is_empty())
            .map(|t| SectionTitle::new(t.text.clone(), t.start_time, t.end_time))
    }
}

/// Uniformly timed section whose narration starts `start_time` into it
fn uniform_section(
    id: String,
    text: String,
    offset: f64,
    start_time: f64,
    seconds_per_char: f64,
) -> Section {
    let mut section = Section::with_uniform_timing(id, text, offset, seconds_per_char);
    for c in &mut section.characters {
        c.start += start_time;
        c.end += start_time;
    }
    section
}

/// Convert every alignment entry into a section.
///
/// An entry with malformed timings is rebuilt with uniform timing when it has
/// narration text, and skipped otherwise. Its error is returned when it was
/// the only entry or when no section survives.
pub fn into_sections(
    entries: Vec<AlignmentSection>,
    seconds_per_char: f64,
) -> Result<Vec<Section>, SegmentationError> {
    let count = entries.len();
    let mut sections = Vec::with_capacity(count);
    let mut first_error = None;

    for entry in entries {
        let fallback = entry.clone();
        match entry.into_section(seconds_per_char) {
            Ok(section) => sections.push(section),
            Err(e) => match fallback.into_uniform_section(seconds_per_char) {
                Some(section) => {
                    warn!("{}; using {:.3}s per character instead", e, seconds_per_char);
                    sections.push(section);
                }
                None if count == 1 => return Err(e),
                None => {
                    warn!("Skipping section: {}", e);
                    first_error.get_or_insert(e);
                }
            },
        }
    }

    match first_error {
        Some(e) if sections.is_empty() => Err(e),
        _ => Ok(sections),
    }
}

/// Parse alignment JSON: either an array of sections or `{ "sections": [...] }`
pub fn parse_alignment(json: &str) -> Result<Vec<AlignmentSection>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Document {
        List(Vec<AlignmentSection>),
        Wrapped { sections: Vec<AlignmentSection> },
    }

    let document: Document =
        serde_json::from_str(json).context("Failed to parse alignment JSON")?;
    Ok(match document {
        Document::List(sections) | Document::Wrapped { sections } => sections,
    })
}

/// Load alignment sections from a file
pub fn load_alignment<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentSection>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read alignment file: {}", path.display()))?;
    let sections = parse_alignment(&content)
        .with_context(|| format!("Invalid alignment file: {}", path.display()))?;
    info!("Loaded {} section(s) from {}", sections.len(), path.display());
    Ok(sections)
}
