/*!
 * Common test utilities for the telop test suite
 */

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use telop::segmentation::chars::CharClass;
use telop::segmentation::{Cue, Section};

/// Route library logs to the test output, filtered by RUST_LOG
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Section timed at a fixed rate per character
pub fn uniform_section(id: &str, text: &str, offset: f64) -> Section {
    Section::with_uniform_timing(id, text, offset, 0.15)
}

/// Concatenated visible text of all cues
pub fn cue_text(cues: &[Cue]) -> String {
    cues.iter().map(|c| c.text()).collect()
}

/// What a reader should see of an unquoted text: no whitespace, no sentence enders
pub fn visible_text(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            let class = CharClass::of(c);
            !class.is_whitespace() && class != CharClass::SentenceEnd
        })
        .collect()
}

const WORDS: &[&str] = &[
    "信長", "尾張", "天下", "統一", "目指した", "戦国時代", "武将", "家臣",
    "テクノロジー", "インターネット", "コンピュータ", "ニュース",
    "は", "が", "を", "に", "で", "と", "から", "まで",
    "東京", "京都", "大阪", "歴史", "物語", "始まり", "終わり",
    "しかし", "そして", "ところが", "やがて", "すぐに",
    "2024年", "1560年", "100人",
];

/// Seeded generator of narration-like text without quotes
pub struct NarrationGenerator {
    rng: StdRng,
}

impl NarrationGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One sentence of 3 to 25 words, sometimes with commas
    pub fn sentence(&mut self) -> String {
        let words = self.rng.random_range(3..=25);
        let mut sentence = String::new();
        for i in 0..words {
            sentence.push_str(WORDS[self.rng.random_range(0..WORDS.len())]);
            if i + 1 < words && self.rng.random_range(0..6) == 0 {
                sentence.push('、');
            }
        }
        let ender = ["。", "！", "？", "。"][self.rng.random_range(0..4)];
        sentence.push_str(ender);
        sentence
    }

    /// A paragraph of 1 to 6 sentences
    pub fn paragraph(&mut self) -> String {
        let count = self.rng.random_range(1..=6);
        (0..count).map(|_| self.sentence()).collect()
    }
}
