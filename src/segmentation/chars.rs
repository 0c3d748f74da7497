/*!
 * Character categories used by the normalizer and the boundary classifier.
 */

/// Closed set of character categories the segmenter distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Hiragana,
    Katakana,
    Kanji,
    Digit,
    Alphabet,
    /// 。！？ and their half-width forms, plus the ellipsis
    SentenceEnd,
    /// 、，,
    Comma,
    QuoteOpen,
    QuoteClose,
    LineBreak,
    /// Any other whitespace
    Space,
    Other,
}

impl CharClass {
    /// Classify a single character
    pub fn of(c: char) -> Self {
        match c {
            '。' | '！' | '？' | '!' | '?' | '．' | '…' | '‥' => Self::SentenceEnd,
            '、' | '，' | ',' => Self::Comma,
            '「' | '『' | '“' => Self::QuoteOpen,
            '」' | '』' | '”' => Self::QuoteClose,
            '\n' => Self::LineBreak,
            c if c.is_whitespace() => Self::Space,
            '\u{3040}'..='\u{309F}' => Self::Hiragana,
            '\u{30A0}'..='\u{30FF}' => Self::Katakana,
            '\u{4E00}'..='\u{9FFF}' => Self::Kanji,
            '0'..='9' | '\u{FF10}'..='\u{FF19}' => Self::Digit,
            c if c.is_ascii_alphabetic() => Self::Alphabet,
            _ => Self::Other,
        }
    }

    /// Punctuation that is a natural cut point
    pub fn is_break_punctuation(self) -> bool {
        matches!(self, Self::SentenceEnd | Self::Comma)
    }

    /// Characters dropped from the stream before segmentation
    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::LineBreak | Self::Space)
    }
}

/// Tracks quotation nesting while walking a character sequence
#[derive(Debug, Default, Clone)]
pub struct QuoteTracker {
    depth: usize,
}

impl QuoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the walk is currently inside a quotation
    pub fn inside(&self) -> bool {
        self.depth > 0
    }

    /// Feed the next character. Returns true when the character belongs to a
    /// quotation, glyphs included.
    pub fn feed(&mut self, class: CharClass) -> bool {
        match class {
            CharClass::QuoteOpen => {
                self.depth += 1;
                true
            }
            CharClass::QuoteClose => {
                let was_inside = self.inside();
                self.depth = self.depth.saturating_sub(1);
                was_inside
            }
            _ => self.inside(),
        }
    }
}
