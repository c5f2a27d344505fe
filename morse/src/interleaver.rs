//! Restores strict mark/gap alternation across the two independently
//! clustering windows, since marks and gaps classify on their own schedules
//! and would otherwise surface out of order.

use std::collections::VecDeque;

use crate::symbol::MorseSymbol;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cursor {
    Marks,
    Gaps,
}

pub struct Interleaver {
    cursor: Cursor,
    pending_marks: VecDeque<MorseSymbol>,
    pending_gaps: VecDeque<MorseSymbol>,
    first_sample_seen: bool,
}

impl Interleaver {
    pub fn new() -> Self {
        Interleaver {
            cursor: Cursor::Marks,
            pending_marks: VecDeque::new(),
            pending_gaps: VecDeque::new(),
            first_sample_seen: false,
        }
    }

    /// Seeds the alternation cursor from the polarity of the very first
    /// sample the stream ever produced. Idempotent after the first call.
    pub fn observe_first_sample(&mut self, is_mark: bool) {
        if self.first_sample_seen {
            return;
        }
        self.first_sample_seen = true;
        if !is_mark {
            self.cursor = Cursor::Gaps;
        }
    }

    pub fn push_marks(&mut self, symbols: impl IntoIterator<Item = MorseSymbol>) {
        self.pending_marks.extend(symbols);
    }

    pub fn push_gaps(&mut self, symbols: impl IntoIterator<Item = MorseSymbol>) {
        self.pending_gaps.extend(symbols);
    }

    /// Drain strictly alternating symbols into `out`. Stops (without
    /// advancing the cursor) as soon as the side currently due runs dry,
    /// so a burst of marks waits for its matching gaps instead of reordering.
    pub fn drain_into(&mut self, out: &mut Vec<MorseSymbol>) {
        loop {
            let list = match self.cursor {
                Cursor::Marks => &mut self.pending_marks,
                Cursor::Gaps => &mut self.pending_gaps,
            };
            match list.pop_front() {
                Some(symbol) => {
                    out.push(symbol);
                    self.cursor = match self.cursor {
                        Cursor::Marks => Cursor::Gaps,
                        Cursor::Gaps => Cursor::Marks,
                    };
                }
                None => break,
            }
        }
    }
}

impl Default for Interleaver {
    fn default() -> Self {
        Self::new()
    }
}
