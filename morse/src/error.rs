//! Error kinds and their stable exit codes.

use thiserror::Error;

/// Top-level error type for every fallible operation in this crate.
///
/// Each variant carries a distinct, stable numeric code (see [`MorseError::code`]),
/// mirroring the exit-code contract of the original translator.
#[derive(Debug, Error)]
pub enum MorseError {
    /// Catch-all fallback for conditions that don't fit a more specific kind.
    #[error("{0}")]
    Generic(String),

    /// A processing-stage failure: invalid resource data, malformed `.mor` input,
    /// an unparseable codebook, or the k-means retry budget being exhausted.
    #[error("processing error: {0}")]
    Process(String),

    /// Input/output queue misuse (closed, full, empty), or a ring window evicting
    /// past its already-classified offset ("missing variation").
    #[error("translator error: {0}")]
    Translator(String),
}

impl MorseError {
    /// Generic catch-all code, used for unhandled/unclassified failures.
    pub const CODE_GENERIC: i32 = 1;
    /// Processing-stage failure code.
    pub const CODE_PROCESS: i32 = 11;
    /// Queue/translator misuse code.
    pub const CODE_TRANSLATOR: i32 = 21;

    /// Stable exit code for this error kind.
    pub fn code(&self) -> i32 {
        match self {
            MorseError::Generic(_) => Self::CODE_GENERIC,
            MorseError::Process(_) => Self::CODE_PROCESS,
            MorseError::Translator(_) => Self::CODE_TRANSLATOR,
        }
    }

    pub fn process<S: Into<String>>(reason: S) -> Self {
        MorseError::Process(reason.into())
    }

    pub fn translator<S: Into<String>>(reason: S) -> Self {
        MorseError::Translator(reason.into())
    }

    pub fn already_closed() -> Self {
        MorseError::translator("already closed")
    }

    pub fn missing_variation() -> Self {
        MorseError::translator("missing variation")
    }

    pub fn empty() -> Self {
        MorseError::translator("empty")
    }
}

/// Map an error (or success) to the stable process exit code from §7.
pub fn exit_code<T>(result: &Result<T, MorseError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}

pub type Result<T> = std::result::Result<T, MorseError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(MorseError::Generic("x".into()).code(), 1);
        assert_eq!(MorseError::process("x").code(), 11);
        assert_eq!(MorseError::translator("x").code(), 21);
    }

    #[test]
    fn exit_code_zero_on_success() {
        let ok: Result<()> = Ok(());
        assert_eq!(exit_code(&ok), 0);
    }
}
