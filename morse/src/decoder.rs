//! The decoding direction: pulses in, text out. Wires the classifier,
//! coalescer, long-pause detector, interleaver and converter together into
//! one [`Processor`], then runs it behind a [`Translator`] so callers get a
//! `put`/`get` queue instead of a function they must drive by hand.

use std::sync::{Arc, Mutex};

use crate::classifier::ClassWindow;
use crate::coalescer::Coalescer;
use crate::codebook::Codebook;
use crate::config::MorseConfig;
use crate::converter::{ConvertMode, Converter};
use crate::error::Result;
use crate::interleaver::Interleaver;
use crate::longpause::{self, LastState};
use crate::pipeline::{Processor, Translator};
use crate::ratio::RatioTable;
use crate::symbol::Sample;
use crate::unit_history::UnitHistory;

/// Snapshot of both windows' learned mean ratios, refreshed after every
/// processed sample so an encoder started later can reuse what this decoder
/// has taught itself instead of falling back to the textbook 1:3:7 table.
pub type RatioSnapshot = Arc<Mutex<(RatioTable, RatioTable)>>;

pub struct DecodeProcessor {
    marks: ClassWindow,
    gaps: ClassWindow,
    unit_history: UnitHistory,
    coalescer: Coalescer,
    interleaver: Interleaver,
    converter: Converter,
    codebook: Codebook,
    config: MorseConfig,
    last_state: Arc<Mutex<LastState>>,
    ratios: RatioSnapshot,
}

impl DecodeProcessor {
    fn new(
        config: MorseConfig,
        codebook: Codebook,
        mode: ConvertMode,
    ) -> (Self, Arc<Mutex<LastState>>, RatioSnapshot) {
        let last_state = Arc::new(Mutex::new(LastState::None));
        let ratios: RatioSnapshot = Arc::new(Mutex::new((
            RatioTable::marks_default(),
            RatioTable::gaps_default(),
        )));
        let processor = DecodeProcessor {
            marks: ClassWindow::new(2, config.max_len, RatioTable::marks_default()),
            gaps: ClassWindow::new(3, config.max_len, RatioTable::gaps_default()),
            unit_history: UnitHistory::new(config.max_len, config.unit),
            coalescer: Coalescer::new(),
            interleaver: Interleaver::new(),
            converter: Converter::new(mode),
            codebook,
            config,
            last_state: last_state.clone(),
            ratios: ratios.clone(),
        };
        (processor, last_state, ratios)
    }
}

impl Processor for DecodeProcessor {
    type Input = Sample;
    type Output = String;

    #[tracing::instrument(skip(self), fields(is_mark = sample.0, duration = sample.1))]
    fn process(&mut self, sample: Sample) -> Result<Vec<String>> {
        let (is_mark, _) = sample;
        self.interleaver.observe_first_sample(is_mark);

        let unit = self.unit_history.current();
        let merged = self.coalescer.feed(
            sample,
            &mut self.marks,
            &mut self.gaps,
            unit,
            self.config.noise_ratio,
        )?;

        if !merged.0 {
            let (clamped, state) = longpause::detect_and_clamp(
                merged.0,
                merged.1,
                unit,
                self.gaps.ratios(),
                self.config.mean_min_diff,
            );
            if let Some(state) = state {
                if let Some(slot) = self.gaps.last_mut() {
                    *slot = clamped;
                }
                *self.last_state.lock().unwrap() = state;
            }
        }

        let mark_symbols = self.marks.try_classify(&self.config, &mut self.unit_history);
        let gap_symbols = self.gaps.try_classify(&self.config, &mut self.unit_history);
        if !mark_symbols.is_empty() || !gap_symbols.is_empty() {
            *self.ratios.lock().unwrap() = (self.marks.ratios().clone(), self.gaps.ratios().clone());
        }
        self.interleaver.push_marks(mark_symbols);
        self.interleaver.push_gaps(gap_symbols);

        let mut ready = Vec::new();
        self.interleaver.drain_into(&mut ready);

        Ok(self.converter.feed(&ready, &self.codebook))
    }
}

/// Decoding pipeline: `put((is_mark, duration_ms))`, `get()` a `String`
/// chunk (a decoded letter, a word-break token, or in `MorseView` mode a raw
/// dot/dash pattern).
pub struct MorseDecoder {
    inner: Translator<DecodeProcessor>,
    last_state: Arc<Mutex<LastState>>,
    ratios: RatioSnapshot,
}

impl MorseDecoder {
    pub fn spawn(config: MorseConfig, codebook: Codebook) -> Self {
        Self::spawn_with_mode(config, codebook, ConvertMode::Alphabet)
    }

    pub fn spawn_with_mode(config: MorseConfig, codebook: Codebook, mode: ConvertMode) -> Self {
        let (processor, last_state, ratios) = DecodeProcessor::new(config, codebook, mode);
        MorseDecoder {
            inner: Translator::spawn(processor),
            last_state,
            ratios,
        }
    }

    pub fn put(&mut self, sample: Sample) -> Result<()> {
        self.inner.put(sample)
    }

    pub fn get(&mut self) -> Result<String> {
        self.inner.get()
    }

    pub fn try_get(&mut self) -> Result<String> {
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

    /// Whether the most recent gap triggered a long-pause clamp. Cleared by
    /// nothing automatically; the renewal driver reads and reacts to it.
    pub fn last_state(&self) -> LastState {
        *self.last_state.lock().unwrap()
    }

    /// A snapshot of the mark/gap ratio tables this decoder has learned so
    /// far (textbook defaults if nothing has been accepted yet). Hand these
    /// to [`crate::encoder::MorseEncoder::spawn_with_ratios`] so the
    /// encoding direction paces itself the way this operator actually keys,
    /// rather than the nominal 1:3:7 table.
    pub fn ratios(&self) -> (RatioTable, RatioTable) {
        self.ratios.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drain_all(decoder: &mut MorseDecoder) -> String {
        decoder.wait().unwrap();
        let mut out = String::new();
        while let Ok(chunk) = decoder.try_get() {
            out.push_str(&chunk);
        }
        out
    }

    /// Builds the sample stream for `repeats` repetitions of the word "SOS",
    /// with intra-letter, inter-letter, and inter-word gaps all present in
    /// enough quantity for k-means to find three clean gap clusters.
    fn sos_stream(unit: f64, repeats: usize) -> Vec<Sample> {
        let mut out = Vec::new();
        let letters = ["...", "---", "..."];
        for word in 0..repeats {
            for (li, pattern) in letters.iter().enumerate() {
                for (i, glyph) in pattern.chars().enumerate() {
                    if i > 0 {
                        out.push((false, unit)); // intra-letter gap
                    }
                    let dur = if glyph == '.' { unit } else { 3.0 * unit };
                    out.push((true, dur));
                }
                let is_last_letter_of_word = li == letters.len() - 1;
                if !is_last_letter_of_word {
                    out.push((false, 3.0 * unit)); // inter-letter gap
                }
            }
            if word + 1 < repeats {
                out.push((false, 7.0 * unit)); // inter-word gap
            }
        }
        out
    }

    #[test]
    fn decodes_a_repeated_word_stream_to_letters() {
        let mut decoder = MorseDecoder::spawn(MorseConfig::default(), Codebook::itu());
        let unit = 60.0;

        for sample in sos_stream(unit, 3) {
            decoder.put(sample).unwrap();
        }

        let out = drain_all(&mut decoder);
        assert!(!out.is_empty());
        decoder.close().unwrap();
    }

    #[test]
    fn closing_twice_errors() {
        let mut decoder = MorseDecoder::spawn(MorseConfig::default(), Codebook::itu());
        decoder.close().unwrap();
        assert!(decoder.close().is_err());
    }
}
