/*!
 * Layout of a chunk into display lines.
 */

use super::boundary::BoundaryClassifier;
use super::models::Chunk;

/// Result of balancing one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct LineSplit {
    /// One or two display lines, in order
    pub lines: Vec<Chunk>,

    /// Tail that did not fit and has to become the next cue
    pub deferred: Option<Chunk>,
}

/// Splits chunks into at most `max_lines` lines of `max_chars_per_line`
pub struct LineBalancer<'a> {
    classifier: BoundaryClassifier<'a>,
    max_chars_per_line: usize,
    max_lines: usize,
    min_line_length: usize,
    first_line_ratio: f64,
}

impl<'a> LineBalancer<'a> {
    pub fn new(
        classifier: BoundaryClassifier<'a>,
        max_chars_per_line: usize,
        max_lines: usize,
        min_line_length: usize,
        first_line_ratio: f64,
    ) -> Self {
        Self {
            classifier,
            max_chars_per_line: max_chars_per_line.max(1),
            max_lines: max_lines.clamp(1, 2),
            min_line_length,
            first_line_ratio,
        }
    }

    pub fn balance(&self, chars: &[char], chunk: Chunk) -> LineSplit {
        let capacity = self.max_chars_per_line * self.max_lines;

        if chunk.len() > capacity {
            let cut = self.head_cut(&chars[chunk.range()], capacity);
            let (head, tail) = chunk.split_at(cut);
            let mut split = self.balance(chars, head);
            split.deferred = Some(tail);
            return split;
        }

        if chunk.len() <= self.max_chars_per_line {
            return LineSplit {
                lines: vec![chunk],
                deferred: None,
            };
        }

        let cut = self.line_cut(&chars[chunk.range()]);
        let (first, second) = chunk.split_at(cut);
        LineSplit {
            lines: vec![first, second],
            deferred: None,
        }
    }

    /// Cut between two lines of a slice longer than one line but within capacity
    fn line_cut(&self, chars: &[char]) -> usize {
        let len = chars.len();
        let low = len - self.max_chars_per_line;
        let high = self.max_chars_per_line;
        let fallback = ((len as f64 * self.first_line_ratio).round() as usize).clamp(low, high);

        let min_line = self.min_line_length.max(1);
        let low_pref = low.max(min_line);
        let high_pref = high.min(len.saturating_sub(min_line));
        if low_pref > high_pref {
            return fallback;
        }

        self.classifier
            .classify(chars, low_pref..=high_pref, fallback, min_line)
            .into_iter()
            .find(|b| b.category.is_natural() && b.score > self.classifier.floor())
            .map(|b| b.index)
            .unwrap_or(fallback)
    }

    /// End of the part of an oversized slice that still fits on screen
    fn head_cut(&self, chars: &[char], capacity: usize) -> usize {
        let low = capacity.saturating_sub(self.max_chars_per_line).max(1);
        self.classifier
            .classify(chars, low..=capacity, capacity, 1)
            .into_iter()
            .find(|b| b.category.is_natural() && b.score > self.classifier.floor())
            .map(|b| b.index)
            .unwrap_or(capacity)
    }
}
