/*!
 * Emphasis annotation of cues.
 *
 * The narration script may flag sentences that deserve a stronger visual
 * treatment. A cue whose whole text matches such a phrase gets the phrase's
 * level as its tag; the emitter writes the tag out without interpreting it.
 */

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::segmentation::chars::CharClass;
use crate::segmentation::Cue;

/// Phrases flagged by the script, per level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactPhrases {
    #[serde(default)]
    pub normal: Vec<String>,
    #[serde(default)]
    pub mega: Vec<String>,
}

impl ImpactPhrases {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.mega.is_empty()
    }

    pub fn extend(&mut self, other: ImpactPhrases) {
        self.normal.extend(other.normal);
        self.mega.extend(other.mega);
    }

    /// Collect the flagged phrases of every section of a narration script
    pub fn from_script_json(json: &str) -> Result<Self> {
        let script: ScriptDocument =
            serde_json::from_str(json).context("Failed to parse narration script")?;
        let mut phrases = Self::default();
        for section in script.sections {
            if let Some(sentences) = section.impact_sentences {
                phrases.extend(sentences);
            }
        }
        Ok(phrases)
    }

    pub fn from_script_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read narration script: {}", path.display()))?;
        Self::from_script_json(&content)
    }
}

// @struct: Narration script, only the parts the annotator reads
#[derive(Deserialize)]
struct ScriptDocument {
    #[serde(default)]
    sections: Vec<ScriptSection>,
}

#[derive(Deserialize)]
struct ScriptSection {
    #[serde(default)]
    impact_sentences: Option<ImpactPhrases>,
}

/// Emphasis level of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Normal,
    Mega,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Normal => "normal",
            Self::Mega => "mega",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Matches cue text against the flagged phrases
#[derive(Debug, Clone, Default)]
pub struct ImpactAnnotator {
    normal: HashSet<String>,
    mega: HashSet<String>,
}

impl ImpactAnnotator {
    pub fn new(phrases: &ImpactPhrases) -> Self {
        let keys = |list: &[String]| -> HashSet<String> {
            list.iter()
                .map(|p| match_key(p))
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            normal: keys(&phrases.normal),
            mega: keys(&phrases.mega),
        }
    }

    /// Level of a text, `mega` taking precedence
    pub fn classify(&self, text: &str) -> ImpactLevel {
        let key = match_key(text);
        if self.mega.contains(&key) {
            ImpactLevel::Mega
        } else if self.normal.contains(&key) {
            ImpactLevel::Normal
        } else {
            ImpactLevel::None
        }
    }

    /// Tag matching cues that carry no tag yet. Returns how many were tagged.
    pub fn annotate(&self, cues: &mut [Cue]) -> usize {
        let mut tagged = 0;
        for cue in cues.iter_mut().filter(|c| c.tag.is_none()) {
            let level = self.classify(&cue.text());
            if level != ImpactLevel::None {
                debug!("Cue {} marked as {} impact", cue.index, level);
                cue.tag = Some(level.as_str().to_string());
                tagged += 1;
            }
        }
        tagged
    }
}

/// Comparison form of a text: no whitespace, no sentence enders
fn match_key(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            let class = CharClass::of(c);
            !class.is_whitespace() && class != CharClass::SentenceEnd
        })
        .collect()
}
