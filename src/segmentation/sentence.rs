/*!
 * Sentence-level chunking of a normalized section.
 */

use super::chars::CharClass;
use super::models::Chunk;
use super::normalizer::NormalizedText;

/// Cuts a normalized stream into sentence chunks.
///
/// Cuts happen after a run of sentence enders outside quotations and at every
/// mandatory break. Commas never cut here. The end of the stream always closes
/// the last chunk.
pub struct SentenceSplitter;

impl SentenceSplitter {
    pub fn split(text: &NormalizedText) -> Vec<Chunk> {
        let len = text.len();
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut breaks = text.breaks.iter().copied().peekable();

        for i in 0..len {
            let next = i + 1;

            let mut cut = next == len || Self::ends_sentence(text, i);
            while let Some(&b) = breaks.peek() {
                if b > next {
                    break;
                }
                if b == next {
                    cut = true;
                }
                breaks.next();
            }

            if cut && next > start {
                chunks.push(Chunk::new(start, next));
                start = next;
            }
        }

        chunks
    }

    fn ends_sentence(text: &NormalizedText, i: usize) -> bool {
        let is_end = |k: usize| CharClass::of(text.chars[k].ch) == CharClass::SentenceEnd;
        is_end(i) && !text.quoted[i] && (i + 1 == text.len() || !is_end(i + 1))
    }
}
