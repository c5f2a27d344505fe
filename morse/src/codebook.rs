//! Static, read-only bidirectional map between letters and dot/dash patterns.
//!
//! Patterns are represented as `&str` over `{'.', '-'}`. Word breaks are not part
//! of any single pattern; callers render them externally as `" "` or `/`.

use std::collections::HashMap;

use crate::error::{MorseError, Result};

pub type Table = &'static [(char, &'static str)];

/// International (ITU) dialect table, embedded so no filesystem access is needed
/// to decode or encode standard Morse.
pub const ITU_TABLE: Table = &[
    // Letters
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    // Numbers
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    // Punctuation
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('"', ".-..-."),
    ('@', ".--.-."),
];

/// A bidirectional letter <-> pattern map.
#[derive(Clone, Debug)]
pub struct Codebook {
    forward: HashMap<char, &'static str>,
    owned_forward: HashMap<char, String>,
    backward: HashMap<String, char>,
}

impl Codebook {
    /// The built-in International (ITU) dialect.
    pub fn itu() -> Self {
        Self::from_table(ITU_TABLE)
    }

    pub fn from_table(table: Table) -> Self {
        let mut forward = HashMap::with_capacity(table.len());
        let mut backward = HashMap::with_capacity(table.len());
        for &(letter, pattern) in table {
            forward.entry(letter.to_ascii_uppercase()).or_insert(pattern);
            backward
                .entry(pattern.to_string())
                .or_insert(letter.to_ascii_uppercase());
        }
        Codebook {
            forward,
            owned_forward: HashMap::new(),
            backward,
        }
    }

    /// Build a codebook from a JSON object mapping letters to dot/dash patterns,
    /// e.g. `{"A": ".-", "B": "-..."}` — the external resource format named in §6.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(text)
            .map_err(|e| MorseError::process(format!("invalid codebook JSON: {e}")))?;
        let mut owned_forward = HashMap::with_capacity(raw.len());
        let mut backward = HashMap::with_capacity(raw.len());
        for (letter, pattern) in raw {
            let ch = letter
                .chars()
                .next()
                .ok_or_else(|| MorseError::process("empty codebook letter key"))?
                .to_ascii_uppercase();
            if !pattern.chars().all(|c| c == '.' || c == '-') {
                return Err(MorseError::process(format!(
                    "codebook pattern for '{ch}' contains characters other than '.'/'-' "
                )));
            }
            owned_forward.insert(ch, pattern.clone());
            backward.insert(pattern, ch);
        }
        Ok(Codebook {
            forward: HashMap::new(),
            owned_forward,
            backward,
        })
    }

    /// Look up the letter encoded by `pattern`, if any.
    pub fn letter_of(&self, pattern: &str) -> Option<char> {
        self.backward.get(pattern).copied()
    }

    /// Look up the dot/dash pattern for `letter`, if known.
    pub fn pattern_of(&self, letter: char) -> Option<&str> {
        let upper = letter.to_ascii_uppercase();
        self.forward
            .get(&upper)
            .copied()
            .or_else(|| self.owned_forward.get(&upper).map(String::as_str))
    }
}
