//! Turns an alternating stream of symbols into text: accumulates dots/dashes
//! into a pending letter, flushing it on a gap wide enough to mean "letter
//! done" or "word done".

use crate::codebook::Codebook;
use crate::symbol::MorseSymbol;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConvertMode {
    /// Decoded text: letters, punctuation, `" "` between words.
    Alphabet,
    /// Raw dot/dash patterns instead of letters, `/` between words.
    MorseView,
}

pub struct Converter {
    letter_buf: Vec<MorseSymbol>,
    mode: ConvertMode,
    /// `MorseView` only: true for the first letter of a word, which takes no
    /// leading separator; every later letter in the same word is prefixed
    /// with one. Unused in `Alphabet` mode, where letters simply concatenate.
    at_word_start: bool,
}

impl Converter {
    pub fn new(mode: ConvertMode) -> Self {
        Converter {
            letter_buf: Vec::new(),
            mode,
            at_word_start: true,
        }
    }

    /// Feed newly interleaved symbols (already in alternating mark/gap
    /// order). Returns the output chunks emitted along the way: letters (or
    /// patterns, in `MorseView`), and word-break tokens. A partial letter at
    /// the tail is held back until a later gap flushes it.
    pub fn feed(&mut self, symbols: &[MorseSymbol], codebook: &Codebook) -> Vec<String> {
        let mut out = Vec::new();
        for &symbol in symbols {
            match symbol {
                MorseSymbol::Dot | MorseSymbol::Dash => self.letter_buf.push(symbol),
                MorseSymbol::IntraGap => {}
                MorseSymbol::ShortGap => {
                    if let Some(chunk) = self.flush_letter(codebook) {
                        out.push(chunk);
                    }
                }
                MorseSymbol::MediumGap => {
                    if let Some(chunk) = self.flush_letter(codebook) {
                        out.push(chunk);
                    }
                    out.push(self.word_break().to_string());
                    self.at_word_start = true;
                }
            }
        }
        out
    }

    fn word_break(&self) -> &'static str {
        match self.mode {
            ConvertMode::Alphabet => " ",
            ConvertMode::MorseView => " / ",
        }
    }

    fn flush_letter(&mut self, codebook: &Codebook) -> Option<String> {
        if self.letter_buf.is_empty() {
            return None;
        }
        let pattern: String = self
            .letter_buf
            .drain(..)
            .filter_map(MorseSymbol::as_pattern_char)
            .collect();
        match self.mode {
            ConvertMode::MorseView => {
                let chunk = if self.at_word_start {
                    pattern
                } else {
                    format!(" {pattern}")
                };
                self.at_word_start = false;
                Some(chunk)
            }
            ConvertMode::Alphabet => match codebook.letter_of(&pattern) {
                Some(letter) => Some(letter.to_string()),
                None => {
                    tracing::debug!(pattern = %pattern, "no codebook entry for pattern, dropping");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn converts_sos_to_letters() {
        let book = Codebook::itu();
        let mut conv = Converter::new(ConvertMode::Alphabet);
        // S = ..., O = ---
        let symbols = [
            MorseSymbol::Dot,
            MorseSymbol::IntraGap,
            MorseSymbol::Dot,
            MorseSymbol::IntraGap,
            MorseSymbol::Dot,
            MorseSymbol::ShortGap,
            MorseSymbol::Dash,
            MorseSymbol::IntraGap,
            MorseSymbol::Dash,
            MorseSymbol::IntraGap,
            MorseSymbol::Dash,
        ];
        let out = conv.feed(&symbols, &book);
        assert_eq!(out, vec!["S".to_string(), "O".to_string()]);
    }

    #[test]
    fn medium_gap_emits_a_word_break() {
        let book = Codebook::itu();
        let mut conv = Converter::new(ConvertMode::Alphabet);
        let symbols = [MorseSymbol::Dot, MorseSymbol::MediumGap, MorseSymbol::Dash];
        let out = conv.feed(&symbols, &book);
        assert_eq!(out, vec!["E".to_string(), " ".to_string()]);
    }

    #[test]
    fn morse_view_emits_raw_patterns_and_slash() {
        let book = Codebook::itu();
        let mut conv = Converter::new(ConvertMode::MorseView);
        let symbols = [MorseSymbol::Dot, MorseSymbol::MediumGap, MorseSymbol::Dash];
        let out = conv.feed(&symbols, &book);
        assert_eq!(out, vec![".".to_string(), " / ".to_string()]);
    }

    #[test]
    fn morse_view_separates_letters_within_a_word_by_a_space() {
        let book = Codebook::itu();
        let mut conv = Converter::new(ConvertMode::MorseView);
        // S . . . / O - - -
        let symbols = [
            MorseSymbol::Dot,
            MorseSymbol::IntraGap,
            MorseSymbol::Dot,
            MorseSymbol::IntraGap,
            MorseSymbol::Dot,
            MorseSymbol::ShortGap,
            MorseSymbol::Dash,
            MorseSymbol::IntraGap,
            MorseSymbol::Dash,
            MorseSymbol::IntraGap,
            MorseSymbol::Dash,
        ];
        let out = conv.feed(&symbols, &book);
        assert_eq!(out.concat(), "... ---");
    }

    #[test]
    fn partial_letter_at_tail_is_held_back() {
        let book = Codebook::itu();
        let mut conv = Converter::new(ConvertMode::Alphabet);
        let out = conv.feed(&[MorseSymbol::Dot, MorseSymbol::Dash], &book);
        assert!(out.is_empty());
        assert_eq!(conv.letter_buf.len(), 2);
    }
}
