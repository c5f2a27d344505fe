//! Reads and writes the line-oriented `.mor` resource format: one
//! `state duration_ms` pair per line, `#`-prefixed comments and blank lines
//! ignored.

use std::fs;
use std::path::Path;

use crate::error::{MorseError, Result};
use crate::symbol::Sample;

/// Parse `.mor` text into samples.
pub fn read_str(text: &str) -> Result<Vec<Sample>> {
    let mut out = Vec::new();
    for (lineno, raw_line) in text.lines().enumerate() {
        let line = match raw_line.find('#') {
            Some(idx) => &raw_line[..idx],
            None => raw_line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let state = parts
            .next()
            .ok_or_else(|| malformed(lineno, raw_line))?;
        let duration = parts
            .next()
            .ok_or_else(|| malformed(lineno, raw_line))?;
        if parts.next().is_some() {
            return Err(malformed(lineno, raw_line));
        }
        let is_mark = match state.parse::<i32>() {
            Ok(0) => false,
            Ok(_) => true,
            Err(_) => return Err(malformed(lineno, raw_line)),
        };
        let duration: f64 = duration
            .parse()
            .map_err(|_| malformed(lineno, raw_line))?;
        out.push((is_mark, duration));
    }
    Ok(out)
}

fn malformed(lineno: usize, line: &str) -> MorseError {
    MorseError::process(format!("malformed .mor line {}: {line:?}", lineno + 1))
}

/// Read a `.mor` file from disk.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| MorseError::process(format!("cannot read .mor file: {e}")))?;
    read_str(&text)
}

/// Render samples back to `.mor` text, one `state duration` pair per line.
pub fn write_str(samples: &[Sample]) -> String {
    let mut out = String::new();
    for &(is_mark, duration) in samples {
        out.push_str(if is_mark { "1" } else { "0" });
        out.push(' ');
        out.push_str(&duration.to_string());
        out.push('\n');
    }
    out
}

pub fn write(path: impl AsRef<Path>, samples: &[Sample]) -> Result<()> {
    fs::write(path.as_ref(), write_str(samples))
        .map_err(|e| MorseError::process(format!("cannot write .mor file: {e}")))
}
