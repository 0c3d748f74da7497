/*!
 * Recursive division of chunks that exceed the character budget.
 *
 * Each split searches a window that keeps the left fragment within budget and
 * both fragments at least `min_fragment_length` long. When no such window
 * exists the minimum is relaxed one character at a time for that split only.
 * The best boundary in the window wins unless it scores at or below the
 * disqualifying floor, in which case the comma closest to the ideal cut is
 * used, and failing that the middle of the window.
 */

use log::warn;

use crate::errors::SegmentationError;

use super::boundary::{BoundaryClassifier, BoundaryCategory};
use super::models::Chunk;

pub struct ChunkDivider<'a> {
    classifier: BoundaryClassifier<'a>,
    max_chars: usize,
    min_fragment: usize,
}

impl<'a> ChunkDivider<'a> {
    pub fn new(classifier: BoundaryClassifier<'a>, max_chars: usize, min_fragment: usize) -> Self {
        Self {
            classifier,
            max_chars: max_chars.max(1),
            min_fragment,
        }
    }

    /// Split `chunk` of `chars` until every piece fits the budget
    pub fn divide(&self, chars: &[char], chunk: Chunk) -> Vec<Chunk> {
        let mut pieces = Vec::new();
        self.divide_into(chars, chunk, &mut pieces);
        pieces
    }

    fn divide_into(&self, chars: &[char], chunk: Chunk, pieces: &mut Vec<Chunk>) {
        if chunk.len() <= self.max_chars {
            if !chunk.is_empty() {
                pieces.push(chunk);
            }
            return;
        }

        let cut = self.find_cut(&chars[chunk.range()]);
        let (left, right) = chunk.split_at(cut);
        self.divide_into(chars, left, pieces);
        self.divide_into(chars, right, pieces);
    }

    /// Cut offset for a slice longer than the budget, always in `1..len`
    pub fn find_cut(&self, chars: &[char]) -> usize {
        let len = chars.len();
        let (low, high, min_fragment) = self.window(len);
        let ideal = (len / 2).clamp(low, high);

        let best = self.classifier.best(chars, low..=high, ideal, min_fragment);
        if best.score > self.classifier.floor() {
            return best.index;
        }

        let comma = (low..=high)
            .filter(|&i| self.classifier.category_at(chars, i) == BoundaryCategory::Comma)
            .min_by_key(|&i| i.abs_diff(ideal));
        comma.unwrap_or((low + high) / 2)
    }

    /// Search window `[low, high]` and the minimum fragment length it honours
    fn window(&self, len: usize) -> (usize, usize, usize) {
        let mut min_fragment = self.min_fragment.max(1);
        loop {
            let low = min_fragment;
            let high = self.max_chars.min(len.saturating_sub(min_fragment));
            if low <= high {
                if min_fragment < self.min_fragment {
                    warn!(
                        "{}",
                        SegmentationError::UnsplittableChunk {
                            len,
                            relaxed_to: min_fragment,
                        }
                    );
                }
                return (low, high, min_fragment);
            }
            if min_fragment == 1 {
                // Only reachable for a single character, which never needs a split
                return (1, len.saturating_sub(1).max(1), 1);
            }
            min_fragment -= 1;
        }
    }
}
