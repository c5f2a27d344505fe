//! End-to-end decoding scenarios against the `.mor` fixtures in
//! `tests/fixtures/`, covering the round-trip and robustness properties.

use morse::{mor, Codebook, MorseConfig, MorseDecoder};

fn decode_all(samples: &[(bool, f64)]) -> String {
    let mut decoder = MorseDecoder::spawn(MorseConfig::default(), Codebook::itu());
    for &sample in samples {
        decoder.put(sample).unwrap();
    }
    decoder.wait().unwrap();
    let mut out = String::new();
    while let Ok(chunk) = decoder.try_get() {
        out.push_str(&chunk);
    }
    decoder.close().unwrap();
    out
}

fn basic() -> Vec<(bool, f64)> {
    mor::read("tests/fixtures/basic.mor").unwrap()
}

fn basic_noise() -> Vec<(bool, f64)> {
    mor::read("tests/fixtures/basic_noise.mor").unwrap()
}

#[test]
fn decodes_the_basic_message() {
    assert_eq!(decode_all(&basic()), "MORSE CODE");
}

#[test]
fn decodes_the_jittered_message_identically() {
    assert_eq!(decode_all(&basic_noise()), "MORSE CODE");
}

#[test]
fn decodes_correctly_without_leading_silence() {
    let samples = &basic()[1..];
    assert_eq!(decode_all(samples), "MORSE CODE");
}

#[test]
fn trailing_letter_is_left_unterminated_without_trailing_silence() {
    let all = basic();
    let samples = &all[..all.len() - 1];
    assert_eq!(decode_all(samples), "MORSE COD");
}

#[test]
fn trailing_letter_is_unterminated_with_silence_missing_at_both_ends() {
    let all = basic();
    let samples = &all[1..all.len() - 1];
    assert_eq!(decode_all(samples), "MORSE COD");
}

/// Several back-to-back copies of the message. Each copy's trailing gap
/// (which terminates its final "E") lands right next to the next copy's
/// leading gap; the coalescer merges the two consecutive same-polarity
/// samples into one, so the silence between repetitions collapses on its
/// own without any special-casing here.
#[test]
fn decodes_a_mixed_stream_of_repeated_messages() {
    for repeats in 4..=6 {
        let mut stream = Vec::new();
        for i in 0..repeats {
            stream.extend(if i % 2 == 0 { basic() } else { basic_noise() });
        }

        let expected = vec!["MORSE CODE"; repeats].join(" ");
        assert_eq!(decode_all(&stream), expected, "repeats = {repeats}");
    }
}

#[test]
fn morse_view_mode_reports_raw_patterns() {
    let mut decoder =
        MorseDecoder::spawn_with_mode(MorseConfig::default(), Codebook::itu(), morse::ConvertMode::MorseView);
    for sample in basic() {
        decoder.put(sample).unwrap();
    }
    decoder.wait().unwrap();
    let mut out = String::new();
    while let Ok(chunk) = decoder.try_get() {
        out.push_str(&chunk);
    }
    decoder.close().unwrap();
    assert_eq!(out, "-- --- .-. ... . / -.-. --- -.. .");
}
