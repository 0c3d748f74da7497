use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @const: Caption file written by the generate command
pub const SUBTITLE_FILE_NAME: &str = "subtitles.srt";

// @const: Timing record written next to the caption file
pub const TIMING_FILE_NAME: &str = "subtitle_timing.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Caption and timing record paths inside an output directory
    pub fn output_paths<P: AsRef<Path>>(output_dir: P) -> (PathBuf, PathBuf) {
        let output_dir = output_dir.as_ref();
        (
            output_dir.join(SUBTITLE_FILE_NAME),
            output_dir.join(TIMING_FILE_NAME),
        )
    }

    /// Subject name for the timing record, taken from the input file stem
    pub fn subject_from_path<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
