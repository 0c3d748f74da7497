/*!
 * Boundary classification.
 *
 * A boundary is a cut index `i` into a character window: the left fragment is
 * `chars[..i]`, the right fragment `chars[i..]`. Each candidate gets a category
 * (what makes it a natural cut) and a score built from the category priority
 * minus penalties for fragment length, distance from the ideal cut, balance and
 * cutting through numbers, latin words or inflected words.
 */

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use crate::app_config::SplittingConfig;

use super::chars::CharClass;

/// Why a cut index is a natural place to break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryCategory {
    SentenceEnd,
    Comma,
    Particle,
    HiraganaToKanji,
    KanjiToHiragana,
    Katakana,
    None,
}

impl BoundaryCategory {
    /// Ordering used to break score ties, higher wins
    pub fn rank(self) -> u8 {
        match self {
            Self::SentenceEnd => 6,
            Self::Comma => 5,
            Self::Particle => 4,
            Self::HiraganaToKanji => 3,
            Self::KanjiToHiragana => 2,
            Self::Katakana => 1,
            Self::None => 0,
        }
    }

    pub fn is_natural(self) -> bool {
        self != Self::None
    }
}

/// A scored cut candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub index: usize,
    pub category: BoundaryCategory,
    pub score: f64,
}

/// Scores cut candidates with the configured priorities and penalties
#[derive(Debug, Clone)]
pub struct BoundaryClassifier<'a> {
    config: &'a SplittingConfig,
}

impl<'a> BoundaryClassifier<'a> {
    pub fn new(config: &'a SplittingConfig) -> Self {
        Self { config }
    }

    /// Disqualifying floor of the configuration
    pub fn floor(&self) -> f64 {
        self.config.disqualify_floor
    }

    /// Score every cut index of `window` (clamped to `1..len`), best first.
    ///
    /// Never returns an empty list: if the window holds no valid index the
    /// exact midpoint of `chars` is returned unscored.
    pub fn classify(
        &self,
        chars: &[char],
        window: RangeInclusive<usize>,
        ideal: usize,
        min_fragment: usize,
    ) -> Vec<Boundary> {
        let len = chars.len();
        let low = (*window.start()).max(1);
        let high = (*window.end()).min(len.saturating_sub(1));

        let mut boundaries: Vec<Boundary> = (low..=high)
            .map(|index| self.score(chars, index, ideal, min_fragment))
            .collect();

        if boundaries.is_empty() {
            return vec![Boundary {
                index: len / 2,
                category: BoundaryCategory::None,
                score: 0.0,
            }];
        }

        boundaries.sort_by(|a, b| compare(a, b, ideal));
        boundaries
    }

    /// Highest-ranked boundary of the window
    pub fn best(
        &self,
        chars: &[char],
        window: RangeInclusive<usize>,
        ideal: usize,
        min_fragment: usize,
    ) -> Boundary {
        self.classify(chars, window, ideal, min_fragment)[0]
    }

    /// Score one cut index
    pub fn score(&self, chars: &[char], index: usize, ideal: usize, min_fragment: usize) -> Boundary {
        let scores = &self.config.priority_scores;
        let penalties = &self.config.penalties;
        let len = chars.len();
        let category = self.category_at(chars, index);

        let mut score = match category {
            BoundaryCategory::SentenceEnd => scores.sentence_end,
            BoundaryCategory::Comma => scores.comma,
            _ => 0.0,
        };
        // Punctuation adds to the script category it sits on
        score += match self.script_category_at(chars, index) {
            BoundaryCategory::Particle => scores.particle,
            BoundaryCategory::HiraganaToKanji => scores.hiragana_to_kanji,
            BoundaryCategory::KanjiToHiragana => scores.kanji_to_hiragana,
            BoundaryCategory::Katakana => scores.katakana_boundary,
            _ => 0.0,
        };

        if index < min_fragment {
            score -= penalties.min_fragment;
        }
        if len - index < min_fragment {
            score -= penalties.min_fragment;
        }

        score -= penalties.distance_from_ideal * index.abs_diff(ideal) as f64;
        score -= penalties.balance * (0.5 - index as f64 / len as f64).abs();

        let prev = CharClass::of(chars[index - 1]);
        let next = CharClass::of(chars[index]);
        if prev == CharClass::Digit && next == CharClass::Digit {
            score -= penalties.splits_number;
        }
        if prev == CharClass::Alphabet && next == CharClass::Alphabet {
            score -= penalties.splits_alphabet;
        }
        if matches!(chars[index - 1], 'ん' | 'っ') {
            score -= penalties.ends_with_n_tsu;
        }
        if category != BoundaryCategory::Particle && splits_inflection(chars, index) {
            score -= penalties.splits_conjugation;
        }

        Boundary {
            index,
            category,
            score,
        }
    }

    /// Category of the cut before `chars[index]`
    pub fn category_at(&self, chars: &[char], index: usize) -> BoundaryCategory {
        let prev = CharClass::of(chars[index - 1]);
        let next = CharClass::of(chars[index]);

        match prev {
            CharClass::SentenceEnd if next != CharClass::SentenceEnd => BoundaryCategory::SentenceEnd,
            CharClass::Comma => BoundaryCategory::Comma,
            _ => self.script_category_at(chars, index),
        }
    }

    /// First matching script category, ignoring punctuation
    fn script_category_at(&self, chars: &[char], index: usize) -> BoundaryCategory {
        let prev = CharClass::of(chars[index - 1]);
        let next = CharClass::of(chars[index]);

        if self.ends_with_particle(chars, index) {
            BoundaryCategory::Particle
        } else if prev == CharClass::Hiragana && next == CharClass::Kanji {
            BoundaryCategory::HiraganaToKanji
        } else if prev == CharClass::Kanji && next == CharClass::Hiragana {
            BoundaryCategory::KanjiToHiragana
        } else if (prev == CharClass::Katakana) != (next == CharClass::Katakana) {
            BoundaryCategory::Katakana
        } else {
            BoundaryCategory::None
        }
    }

    /// A particle closes the left fragment and is not glued into a longer
    /// hiragana word on both sides
    fn ends_with_particle(&self, chars: &[char], index: usize) -> bool {
        let left = &chars[..index];
        self.config.particles.iter().any(|particle| {
            let particle: Vec<char> = particle.chars().collect();
            if particle.is_empty() || !left.ends_with(&particle) {
                return false;
            }
            let before = left.len() - particle.len();
            let hiragana_before = before > 0 && CharClass::of(left[before - 1]) == CharClass::Hiragana;
            let hiragana_after = CharClass::of(chars[index]) == CharClass::Hiragana;
            !(hiragana_before && hiragana_after)
        })
    }
}

/// Whether cutting before `chars[index]` separates kanji from its okurigana or
/// splits the okurigana itself. Without morphological analysis an inflected
/// word is approximated as a kanji followed by a run of two or more hiragana.
pub fn splits_inflection(chars: &[char], index: usize) -> bool {
    let is_hiragana = |i: usize| CharClass::of(chars[i]) == CharClass::Hiragana;
    if !is_hiragana(index) {
        return false;
    }

    let mut run_start = index;
    while run_start > 0 && is_hiragana(run_start - 1) {
        run_start -= 1;
    }
    if run_start == 0 || CharClass::of(chars[run_start - 1]) != CharClass::Kanji {
        return false;
    }

    let mut run_end = index;
    while run_end < chars.len() && is_hiragana(run_end) {
        run_end += 1;
    }

    run_end - run_start >= 2
}

fn compare(a: &Boundary, b: &Boundary, ideal: usize) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.category.rank().cmp(&a.category.rank()))
        .then_with(|| a.index.abs_diff(ideal).cmp(&b.index.abs_diff(ideal)))
        .then_with(|| a.index.cmp(&b.index))
}
