/*!
 * Error types for the telop library.
 *
 * This module contains custom error types for the segmentation pipeline, the cue
 * emitter and the command line application, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while segmenting and timing narration sections
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// Character and timestamp arrays disagree, or timestamps are out of order
    #[error("Malformed input in section {section}: {reason}")]
    MalformedInput {
        /// Identifier of the offending section
        section: String,
        /// What was wrong with it
        reason: String,
    },

    /// Normalization left nothing to display
    #[error("Section {section} produced no displayable text")]
    EmptyResult {
        /// Identifier of the empty section
        section: String,
    },

    /// No split window satisfies the minimum fragment length
    #[error("Chunk of {len} characters cannot honour the minimum fragment length, relaxed to {relaxed_to}")]
    UnsplittableChunk {
        /// Length of the chunk being divided
        len: usize,
        /// Minimum fragment length actually used for this split
        relaxed_to: usize,
    },

    /// Duration and gap adjustments left a cue with no positive duration
    #[error("Cue '{text}' has inverted timing: start {start:.3}s, end {end:.3}s")]
    TimingInversion {
        /// Display text of the dropped cue
        text: String,
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
    },

    /// Segmentation settings are out of range
    #[error("Invalid segmentation config: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while emitting or reading subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Nothing survived the pipeline, refusing to write an empty file
    #[error("No cues to emit")]
    EmptyOutput,

    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Caption content could not be parsed
    #[error("Failed to parse subtitle content: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the segmentation pipeline
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Error from subtitle emission
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
