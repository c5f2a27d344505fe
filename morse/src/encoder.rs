//! The encoding direction: text in, pulses out. A deliberately trivial
//! inverse of [`crate::decoder`] — there's nothing to learn when the ratios
//! are already known, so it paces itself from a [`RatioTable`] pair: the
//! textbook 1:3 mark / 1:3:7 gap defaults, or a snapshot handed over from a
//! [`crate::decoder::MorseDecoder`] that has already learned this operator's
//! timing. Runs through the same [`Translator`] host as the decoder so both
//! directions share one lifecycle.

use crate::codebook::Codebook;
use crate::config::MorseConfig;
use crate::error::{MorseError, Result};
use crate::pipeline::{Processor, Translator};
use crate::ratio::RatioTable;
use crate::symbol::{MorseSymbol, Sample};

pub struct EncodeProcessor {
    codebook: Codebook,
    unit: f64,
    marks: RatioTable,
    gaps: RatioTable,
}

impl EncodeProcessor {
    pub fn new(codebook: Codebook, unit: f64) -> Self {
        Self::with_ratios(codebook, unit, RatioTable::marks_default(), RatioTable::gaps_default())
    }

    /// Same as [`Self::new`], but paced by `marks`/`gaps` ratio tables —
    /// typically a snapshot pulled from a [`crate::decoder::MorseDecoder`]
    /// that has already learned this operator's timing — instead of the
    /// textbook 1:3 / 1:3:7 defaults.
    pub fn with_ratios(codebook: Codebook, unit: f64, marks: RatioTable, gaps: RatioTable) -> Self {
        EncodeProcessor {
            codebook,
            unit,
            marks,
            gaps,
        }
    }
}

impl Processor for EncodeProcessor {
    type Input = char;
    type Output = Sample;

    fn process(&mut self, letter: char) -> Result<Vec<Sample>> {
        if letter == ' ' {
            return Ok(vec![(false, self.gaps.mean(MorseSymbol::MediumGap) * self.unit)]);
        }
        let pattern = self
            .codebook
            .pattern_of(letter)
            .ok_or_else(|| MorseError::process(format!("no codebook entry for '{letter}'")))?;
        Ok(encode_pattern(pattern, self.unit, &self.marks, &self.gaps))
    }
}

/// Render one letter's dot/dash pattern as a stream of `(is_mark, duration)`
/// samples, with an intra-letter gap between consecutive marks but none
/// trailing the last one (callers append their own inter-letter/word gap).
/// Mark and intra-symbol gap durations are drawn from `marks`/`gaps`'
/// learned ratios rather than the textbook 1:3 constants.
fn encode_pattern(pattern: &str, unit: f64, marks: &RatioTable, gaps: &RatioTable) -> Vec<Sample> {
    let mut out = Vec::with_capacity(pattern.len() * 2);
    let intra = gaps.mean(MorseSymbol::IntraGap) * unit;
    for (i, glyph) in pattern.chars().enumerate() {
        if i > 0 {
            out.push((false, intra));
        }
        let ratio = if glyph == '.' {
            marks.mean(MorseSymbol::Dot)
        } else {
            marks.mean(MorseSymbol::Dash)
        };
        out.push((true, ratio * unit));
    }
    out
}

/// One-shot, non-streaming encode of a full line of text (uppercase
/// letters/digits/punctuation known to `codebook`, spaces as word breaks)
/// into a flat sample stream, using the textbook 1:3:7 ratios.
pub fn encode_text(text: &str, codebook: &Codebook, unit: f64) -> Result<Vec<Sample>> {
    encode_text_with_ratios(
        text,
        codebook,
        unit,
        &RatioTable::marks_default(),
        &RatioTable::gaps_default(),
    )
}

/// Same as [`encode_text`], but paced by `marks`/`gaps` ratio tables — e.g. a
/// snapshot handed over from [`crate::decoder::MorseDecoder::ratios`] —
/// instead of the textbook defaults.
pub fn encode_text_with_ratios(
    text: &str,
    codebook: &Codebook,
    unit: f64,
    marks: &RatioTable,
    gaps: &RatioTable,
) -> Result<Vec<Sample>> {
    let mut out = Vec::new();
    let inter_letter = gaps.mean(MorseSymbol::ShortGap) * unit;
    let inter_word = gaps.mean(MorseSymbol::MediumGap) * unit;
    // The gap due before the *next* letter, deferred rather than pushed
    // immediately: a space seen before that letter widens it from an
    // inter-letter to an inter-word gap instead of appending a separate
    // entry, so runs of spaces collapse into one gap and a trailing space
    // never leaves an unmatched gap dangling at the end of the stream.
    let mut pending_gap: Option<f64> = None;
    for ch in text.chars() {
        if ch == ' ' {
            if pending_gap.is_some() {
                pending_gap = Some(inter_word);
            }
            continue;
        }
        let pattern = codebook
            .pattern_of(ch)
            .ok_or_else(|| MorseError::process(format!("no codebook entry for '{ch}'")))?;
        if let Some(gap) = pending_gap {
            out.push((false, gap));
        }
        out.extend(encode_pattern(pattern, unit, marks, gaps));
        pending_gap = Some(inter_letter);
    }
    Ok(out)
}

/// Encoding pipeline: `put(char)`, `get()` a `(is_mark, duration_ms)` sample.
pub struct MorseEncoder {
    inner: Translator<EncodeProcessor>,
}

impl MorseEncoder {
    pub fn spawn(codebook: Codebook, config: &MorseConfig) -> Self {
        MorseEncoder {
            inner: Translator::spawn(EncodeProcessor::new(codebook, config.unit)),
        }
    }

    /// Spawn an encoder paced by a decoder's learned ratio tables (see
    /// [`crate::decoder::MorseDecoder::ratios`]) instead of the textbook
    /// defaults.
    pub fn spawn_with_ratios(
        codebook: Codebook,
        config: &MorseConfig,
        marks: RatioTable,
        gaps: RatioTable,
    ) -> Self {
        MorseEncoder {
            inner: Translator::spawn(EncodeProcessor::with_ratios(codebook, config.unit, marks, gaps)),
        }
    }

    pub fn put(&mut self, letter: char) -> Result<()> {
        self.inner.put(letter)
    }

    pub fn get(&mut self) -> Result<Sample> {
        self.inner.get()
    }

    pub fn try_get(&mut self) -> Result<Sample> {
        self.inner.try_get()
    }

    pub fn wait(&mut self) -> Result<()> {
        self.inner.wait()
    }

    pub fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    pub fn closed(&self) -> bool {
        self.inner.closed()
    }
}
