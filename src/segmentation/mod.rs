/*!
 * Subtitle segmentation and timing.
 *
 * Turns narration sections with character-level timestamps into ordered,
 * non-overlapping subtitle cues. Stages, leaf first:
 * - `normalizer`: whitespace, line breaks and quotation handling
 * - `boundary`: scoring of candidate cut positions
 * - `sentence`: hard cuts at sentence enders and mandatory breaks
 * - `divider`: recursive division of chunks over the character budget
 * - `lines`: layout of a chunk into one or two display lines
 * - `timing`: start/end assignment with duration and gap rules
 *
 * Sections are independent and may be laid out in parallel; timing and
 * numbering run once over the merged list.
 */

pub mod boundary;
pub mod chars;
pub mod divider;
pub mod lines;
pub mod models;
pub mod normalizer;
pub mod sentence;
pub mod timing;

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::app_config::SegmentationConfig;
use crate::errors::SegmentationError;
use crate::validation::CueValidator;

use boundary::BoundaryClassifier;
use chars::CharClass;
use divider::ChunkDivider;
use lines::LineBalancer;
pub use models::{Chunk, Cue, CueKind, Section, SectionTitle, TimedCharacter};
use normalizer::{NormalizedText, TextNormalizer};
use sentence::SentenceSplitter;
use timing::{DraftCue, TimingAssigner};

/// Segment and time all sections into one ordered cue list.
///
/// A section that fails is logged and skipped unless it is the only one, in
/// which case its error is returned. Cues are numbered from 1 in section order.
pub fn segment_and_time(
    sections: &[Section],
    config: &SegmentationConfig,
) -> Result<Vec<Cue>, SegmentationError> {
    config
        .validate()
        .map_err(|e| SegmentationError::InvalidConfig(format!("{:#}", e)))?;

    if sections.is_empty() {
        return Err(SegmentationError::EmptyResult {
            section: "<none>".to_string(),
        });
    }

    let segmenter = SectionSegmenter::new(config);

    #[cfg(feature = "parallel")]
    let results: Vec<_> = sections.par_iter().map(|s| segmenter.segment(s)).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = sections.iter().map(|s| segmenter.segment(s)).collect();

    let mut drafts = Vec::new();
    let mut first_error = None;
    for (section, result) in sections.iter().zip(results) {
        match result {
            Ok(section_drafts) => drafts.extend(section_drafts),
            Err(e) if sections.len() == 1 => return Err(e),
            Err(e) => {
                warn!("Skipping section {}: {}", section.id, e);
                first_error.get_or_insert(e);
            }
        }
    }

    let mut cues = TimingAssigner::new(&config.timing).assign(drafts);
    if cues.is_empty() {
        return Err(first_error.unwrap_or_else(|| SegmentationError::EmptyResult {
            section: sections
                .iter()
                .map(|s| s.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }));
    }
    renumber(&mut cues);

    if log::log_enabled!(log::Level::Debug) {
        let report = CueValidator::new(config).validate(&cues);
        for issue in report.issues() {
            debug!("Cue check: {}", issue);
        }
    }

    info!("Segmented {} section(s) into {} cue(s)", sections.len(), cues.len());
    Ok(cues)
}

/// Number cues contiguously from 1
pub fn renumber(cues: &mut [Cue]) {
    for (i, cue) in cues.iter_mut().enumerate() {
        cue.index = i + 1;
    }
}

/// Lays out the cues of a single section
pub struct SectionSegmenter<'a> {
    config: &'a SegmentationConfig,
    normalizer: TextNormalizer,
}

impl<'a> SectionSegmenter<'a> {
    pub fn new(config: &'a SegmentationConfig) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(config.max_quote_length),
        }
    }

    /// Untimed cues of one section, title first
    pub fn segment(&self, section: &Section) -> Result<Vec<DraftCue>, SegmentationError> {
        section.validate()?;

        let mut drafts = Vec::new();
        if let Some(title) = &section.title {
            let normalized = self.normalizer.normalize(&title.characters(), &title.text);
            drafts.extend(self.layout(section, &normalized, CueKind::SectionTitle));
        }

        let normalized = self.normalizer.normalize(&section.characters, &section.text);
        let narration = self.layout(section, &normalized, CueKind::Narration);
        if narration.is_empty() && drafts.is_empty() {
            return Err(SegmentationError::EmptyResult {
                section: section.id.clone(),
            });
        }

        drafts.extend(narration);
        debug!(
            "Section {}: {} characters laid out as {} cue(s)",
            section.id,
            normalized.len(),
            drafts.len()
        );
        Ok(drafts)
    }

    fn layout(&self, section: &Section, normalized: &NormalizedText, kind: CueKind) -> Vec<DraftCue> {
        let config = self.config;
        let glyphs = normalized.glyphs();
        let classifier = BoundaryClassifier::new(&config.splitting);
        let divider = ChunkDivider::new(
            classifier.clone(),
            config.max_chars_per_chunk,
            config.min_fragment_length,
        );
        let balancer = LineBalancer::new(
            classifier,
            config.max_chars_per_line,
            config.max_lines,
            config.min_line_length,
            config.first_line_ratio,
        );

        let mut drafts = Vec::new();
        for sentence in SentenceSplitter::split(normalized) {
            for piece in divider.divide(&glyphs, sentence) {
                let mut pending = Some(piece);
                while let Some(chunk) = pending.take() {
                    let split = balancer.balance(&glyphs, chunk);
                    pending = split.deferred;
                    match Self::draft(section, normalized, &split.lines, kind) {
                        Some(draft) => drafts.push(draft),
                        None => debug!(
                            "Section {}: dropping cue without visible characters",
                            section.id
                        ),
                    }
                }
            }
        }
        drafts
    }

    /// Display lines and natural timing of laid-out lines, `None` when
    /// punctuation removal leaves nothing to show
    fn draft(
        section: &Section,
        normalized: &NormalizedText,
        lines: &[Chunk],
        kind: CueKind,
    ) -> Option<DraftCue> {
        let first = lines.first()?.start;
        let last = lines.last()?.end.checked_sub(1)?;

        let mut texts = lines
            .iter()
            .map(|line| normalized.display_text(*line))
            .filter(|text| !text.is_empty());
        let line1 = texts.next()?;
        let line2 = texts.next();

        let last_char = normalized.chars[last];
        Some(DraftCue {
            section_id: section.id.clone(),
            line1,
            line2,
            start: normalized.chars[first].start + section.offset,
            end: last_char.end + section.offset,
            ends_sentence: CharClass::of(last_char.ch) == CharClass::SentenceEnd,
            kind,
        })
    }
}
