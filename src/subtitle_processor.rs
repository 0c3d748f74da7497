use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::segmentation::{renumber, Cue};
use crate::validation::timecodes::to_ms;

// @module: Cue emission to caption files and timing records

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm), rounded to the millisecond
pub fn format_timestamp(seconds: f64) -> String {
    let ms = to_ms(seconds);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timestamp to seconds
pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());
    let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
    if parts.len() != 4 {
        return Err(invalid());
    }

    let mut values = [0u64; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part.parse().map_err(|_| invalid())?;
    }
    let [hours, minutes, secs, millis] = values;
    if minutes >= 60 || secs >= 60 || millis >= 1000 {
        return Err(invalid());
    }

    let ms = hours * 3_600_000 + minutes * 60_000 + secs * 1_000 + millis;
    Ok(ms as f64 / 1000.0)
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", format_timestamp(self.start), format_timestamp(self.end))?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// One cue in the auxiliary timing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub text_line1: String,
    pub text_line2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_type: Option<String>,
}

/// Timing record written next to the caption file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub subject: String,
    pub subtitle_count: usize,
    pub total_duration: f64,
    pub subtitles: Vec<TimingEntry>,
}

/// Round to whole milliseconds, matching the caption file
fn round_ms(seconds: f64) -> f64 {
    to_ms(seconds) as f64 / 1000.0
}

/// Ordered cues ready to be written out
#[derive(Debug, Clone, Default)]
pub struct CueCollection {
    /// List of cues
    pub cues: Vec<Cue>,
}

impl CueCollection {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    fn ensure_not_empty(&self) -> Result<(), SubtitleError> {
        if self.cues.is_empty() {
            return Err(SubtitleError::EmptyOutput);
        }
        Ok(())
    }

    /// Render all cues as SRT
    pub fn to_srt(&self) -> Result<String, SubtitleError> {
        self.ensure_not_empty()?;
        Ok(self.cues.iter().map(|cue| cue.to_string()).collect())
    }

    /// Write cues to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_srt()?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        debug!("Wrote {} cues to {}", self.cues.len(), path.display());
        Ok(())
    }

    /// Build the timing record, carrying each cue's tag through untouched
    pub fn to_timing_record(&self, subject: &str) -> Result<TimingRecord, SubtitleError> {
        self.ensure_not_empty()?;

        let subtitles: Vec<TimingEntry> = self
            .cues
            .iter()
            .map(|cue| {
                let start_time = round_ms(cue.start);
                let end_time = round_ms(cue.end);
                TimingEntry {
                    index: cue.index,
                    start_time,
                    end_time,
                    duration: round_ms(end_time - start_time),
                    text_line1: cue.line1.clone(),
                    text_line2: cue.line2.clone().unwrap_or_default(),
                    impact_level: cue.tag.clone(),
                    special_type: cue.kind.special_type().map(str::to_string),
                }
            })
            .collect();

        Ok(TimingRecord {
            subject: subject.to_string(),
            subtitle_count: subtitles.len(),
            total_duration: subtitles.last().map(|s| s.end_time).unwrap_or_default(),
            subtitles,
        })
    }

    /// Write the timing record as pretty-printed JSON
    pub fn write_timing_json<P: AsRef<Path>>(&self, path: P, subject: &str) -> Result<()> {
        let path = path.as_ref();
        let record = self.to_timing_record(subject)?;
        let json = serde_json::to_string_pretty(&record)
            .context("Failed to serialize timing record")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, json)
            .with_context(|| format!("Failed to write timing record: {}", path.display()))
    }

    /// Read cues back from an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let cues = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;
        Ok(Self::new(cues))
    }

    /// Parse SRT content into cues.
    ///
    /// The first text line becomes `line1`, any further lines are kept in
    /// `line2` separated by newlines so layout checks can see them.
    pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
        let mut cues = Vec::new();
        let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");

        for block in content.split("\n\n") {
            let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
            let Some(first) = lines.next() else {
                continue;
            };

            let (index, timing) = match first.parse::<usize>() {
                Ok(index) => (Some(index), lines.next()),
                Err(_) => (None, Some(first)),
            };

            let Some(caps) = timing.and_then(|t| TIMESTAMP_REGEX.captures(t)) else {
                warn!("Skipping block without a timestamp line: {:?}", first);
                continue;
            };
            let start = parse_timestamp(&format!("{}:{}:{},{}", &caps[1], &caps[2], &caps[3], &caps[4]))?;
            let end = parse_timestamp(&format!("{}:{}:{},{}", &caps[5], &caps[6], &caps[7], &caps[8]))?;

            let text: Vec<&str> = lines.collect();
            let Some((line1, rest)) = text.split_first() else {
                warn!("Skipping empty subtitle block {}", index.unwrap_or(cues.len() + 1));
                continue;
            };
            let line2 = if rest.is_empty() { None } else { Some(rest.join("\n")) };

            cues.push(Cue::new(index.unwrap_or(0), *line1, line2, start, end));
        }

        if cues.is_empty() {
            return Err(SubtitleError::Parse(
                "no valid subtitle blocks were found".to_string(),
            ));
        }

        // Check for out-of-order blocks
        let unordered = cues.windows(2).filter(|w| w[1].start < w[0].start).count();
        if unordered > 0 {
            warn!("Found {} cue(s) starting before their predecessor", unordered);
        }

        renumber(&mut cues);
        Ok(cues)
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Collection")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        if let (Some(first), Some(last)) = (self.cues.first(), self.cues.last()) {
            writeln!(
                f,
                "Span: {} --> {}",
                format_timestamp(first.start),
                format_timestamp(last.end)
            )?;
        }
        Ok(())
    }
}
