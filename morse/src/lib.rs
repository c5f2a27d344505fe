//! Adaptive Morse code codec.
//!
//! Feed raw `(is_mark, duration_ms)` samples off a key or a radio's envelope
//! detector into a [`decoder::MorseDecoder`] and it learns its own unit
//! length and mark/gap ratios as it goes, with no fixed timing assumed up
//! front. The inverse direction, [`encoder::MorseEncoder`], turns text back
//! into a pulse stream using either the textbook ratios or a unit learned
//! elsewhere.
//!
//! Pipeline, roughly:
//!
//! ```text
//! samples -> coalescer -> {marks, gaps} ring windows -> stable k-means
//!         -> cluster validator -> ratio learner -> symbol classifier
//!         -> interleaver -> converter -> text
//! ```

pub mod classifier;
pub mod coalescer;
pub mod codebook;
pub mod config;
pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod interleaver;
pub mod kmeans;
pub mod longpause;
pub mod mor;
pub mod pipeline;
pub mod ratio;
pub mod renewal;
pub mod symbol;
pub mod unit_history;
pub mod validator;
pub mod window;

pub use codebook::Codebook;
pub use config::MorseConfig;
pub use converter::ConvertMode;
pub use decoder::MorseDecoder;
pub use encoder::{encode_text, encode_text_with_ratios, MorseEncoder};
pub use error::{exit_code, MorseError, Result};
pub use longpause::LastState;
pub use ratio::RatioTable;
pub use renewal::RenewingDecoder;
pub use symbol::{MorseSymbol, Sample};
