/*!
 * Text normalization ahead of segmentation.
 *
 * The normalizer turns a section's raw timed character stream into the
 * sequence the splitters work on:
 * - whitespace is removed together with its timing
 * - line breaks outside quotations become mandatory cut points
 * - line breaks inside quotations are dropped so quoted speech stays in one piece
 * - overly long quotations get forced cut points, preferably after a comma
 *
 * Punctuation is kept in the stream so the boundary classifier can see it;
 * it is only removed from the display text of a finished line.
 */

use log::{debug, warn};

use super::chars::{CharClass, QuoteTracker};
use super::models::{Chunk, TimedCharacter};

/// Character stream ready for segmentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    pub chars: Vec<TimedCharacter>,

    // @field: Per character, whether it sits inside a quotation (glyphs included)
    pub quoted: Vec<bool>,

    // @field: Sorted indices before which a cut is mandatory
    pub breaks: Vec<usize>,
}

impl NormalizedText {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Bare characters, for the splitters
    pub fn glyphs(&self) -> Vec<char> {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Full normalized text, punctuation included
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Text of a chunk as it is displayed: sentence enders outside quotations
    /// are removed, everything else is kept verbatim
    pub fn display_text(&self, chunk: Chunk) -> String {
        chunk
            .range()
            .filter(|&i| is_displayed(self.chars[i].ch, self.quoted[i]))
            .map(|i| self.chars[i].ch)
            .collect()
    }
}

/// Brackets that alignment streams may omit
fn is_bracket(ch: char) -> bool {
    matches!(ch, '「' | '」' | '『' | '』' | '（' | '）' | '(' | ')' | '“' | '”')
}

/// Whether a character survives display punctuation removal
pub fn is_displayed(ch: char, quoted: bool) -> bool {
    quoted || CharClass::of(ch) != CharClass::SentenceEnd
}

/// Quotation-aware normalizer
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    max_quote_length: usize,
}

impl TextNormalizer {
    pub fn new(max_quote_length: usize) -> Self {
        Self {
            max_quote_length: max_quote_length.max(1),
        }
    }

    /// Normalize a timed character stream.
    ///
    /// `text` is the scripted narration. When the stream itself carries no
    /// line breaks, the breaks of the script are used as hints instead.
    pub fn normalize(&self, characters: &[TimedCharacter], text: &str) -> NormalizedText {
        let stream_has_breaks = characters.iter().any(|c| c.ch == '\n');
        let hints = if stream_has_breaks {
            Vec::new()
        } else {
            Self::break_hints(characters, text).unwrap_or_default()
        };

        let mut normalized = NormalizedText {
            chars: Vec::with_capacity(characters.len()),
            quoted: Vec::with_capacity(characters.len()),
            breaks: Vec::new(),
        };
        let mut tracker = QuoteTracker::new();
        let mut pending_break = false;
        let mut visible = 0usize;

        for tc in characters {
            let class = CharClass::of(tc.ch);
            match class {
                CharClass::LineBreak if tracker.inside() => {
                    debug!("Dropping line break inside quotation at {:.3}s", tc.start);
                    continue;
                }
                CharClass::LineBreak => {
                    pending_break = true;
                    continue;
                }
                CharClass::Space => continue,
                _ => {}
            }

            if hints.binary_search(&visible).is_ok() {
                pending_break = true;
            }
            visible += 1;

            let quoted = tracker.feed(class);
            if pending_break && !normalized.chars.is_empty() {
                normalized.breaks.push(normalized.chars.len());
            }
            pending_break = false;

            normalized.chars.push(*tc);
            normalized.quoted.push(quoted);
        }

        let quote_cuts = self.split_long_quotes(&normalized.chars, &normalized.quoted);
        normalized.breaks.extend(quote_cuts);
        normalized.breaks.sort_unstable();
        normalized.breaks.dedup();

        normalized
    }

    /// Positions, counted in non-whitespace characters, where the script has a
    /// line break outside a quotation. `None` when there are no hints or a
    /// script line cannot be found in the aligned characters.
    ///
    /// Aligners often drop bracket glyphs, so brackets are skipped on both
    /// sides while matching. Each script line is searched from where the
    /// previous one ended.
    fn break_hints(characters: &[TimedCharacter], text: &str) -> Option<Vec<usize>> {
        let mut lines: Vec<Vec<char>> = vec![Vec::new()];
        let mut tracker = QuoteTracker::new();

        for ch in text.chars() {
            let class = CharClass::of(ch);
            match class {
                CharClass::LineBreak if !tracker.inside() => lines.push(Vec::new()),
                CharClass::LineBreak | CharClass::Space => {}
                _ => {
                    tracker.feed(class);
                    if !is_bracket(ch) {
                        if let Some(line) = lines.last_mut() {
                            line.push(ch);
                        }
                    }
                }
            }
        }
        lines.retain(|line| !line.is_empty());
        if lines.len() < 2 {
            return None;
        }

        let visible: Vec<char> = characters
            .iter()
            .map(|c| c.ch)
            .filter(|&c| !CharClass::of(c).is_whitespace())
            .collect();
        // Positions in `visible` of everything but brackets
        let matchable: Vec<usize> = (0..visible.len()).filter(|&i| !is_bracket(visible[i])).collect();

        let mut hints = Vec::new();
        let mut cursor = 0;
        let mut previous_end = 0;
        for (n, line) in lines.iter().enumerate() {
            let found = (cursor..=matchable.len().saturating_sub(line.len())).find(|&k| {
                k + line.len() <= matchable.len()
                    && line.iter().zip(&matchable[k..]).all(|(c, &i)| visible[i] == *c)
            });
            let Some(found) = found else {
                warn!(
                    "Narration line {} not found in the aligned characters, ignoring line break hints",
                    n + 1
                );
                return None;
            };

            if n > 0 {
                // Keep opening brackets with the line they open
                let mut hint = matchable[found];
                while hint > previous_end && CharClass::of(visible[hint - 1]) == CharClass::QuoteOpen {
                    hint -= 1;
                }
                if hint > 0 {
                    hints.push(hint);
                }
            }
            cursor = found + line.len();
            previous_end = matchable[cursor - 1] + 1;
        }

        hints.dedup();
        Some(hints)
    }

    /// Forced cut points inside quotations longer than the limit. Each piece is
    /// cut just after the last comma that keeps it within the limit, or at the
    /// limit itself.
    fn split_long_quotes(&self, chars: &[TimedCharacter], quoted: &[bool]) -> Vec<usize> {
        let mut cuts = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if !(quoted[i] && CharClass::of(chars[i].ch) == CharClass::QuoteOpen) {
                i += 1;
                continue;
            }

            let start = i;
            let mut end = i;
            let mut tracker = QuoteTracker::new();
            while end < chars.len() {
                tracker.feed(CharClass::of(chars[end].ch));
                end += 1;
                if !tracker.inside() {
                    break;
                }
            }

            let mut pos = start;
            while end - pos > self.max_quote_length {
                let limit = pos + self.max_quote_length;
                let cut = (pos + 1..limit)
                    .rev()
                    .find(|&k| CharClass::of(chars[k].ch) == CharClass::Comma)
                    .map(|k| k + 1)
                    .unwrap_or(limit);
                debug!(
                    "Quotation of {} characters cut at {}",
                    end - start,
                    cut - start
                );
                cuts.push(cut);
                pos = cut;
            }

            i = end;
        }

        cuts
    }
}
