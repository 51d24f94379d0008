//! LD-CELP Decoder Tests
//!
//! Protocol errors, postfilter behavior and session state of the decoder.

use super::utils::test_signals::*;
use crate::codecs::ldcelp::adapter::all_pass_synthesis;
use crate::codecs::ldcelp::tables::{IDIM, KPMAX, KPMIN, NFRSZ};
use crate::codecs::ldcelp::{LdCelpDecoder, LdCelpEncoder, StreamState};
use crate::error::CodecError;

fn encode_words(pcm: &[i16]) -> Vec<u16> {
    LdCelpEncoder::new()
        .encode(pcm)
        .unwrap()
        .into_iter()
        .map(u16::from)
        .collect()
}

/// Every in-range code decodes to one vector
#[test]
fn test_all_codes_decode() {
    let codes: Vec<u16> = (0..1024).collect();
    let mut decoder = LdCelpDecoder::new(false);
    let pcm = decoder.decode(&codes).unwrap();
    assert_eq!(pcm.len(), codes.len() * IDIM);
    assert_eq!(decoder.vectors_decoded(), 1024);
    assert_eq!(decoder.state(), StreamState::Running);
}

/// An out-of-range code is fatal and reports its position
#[test]
fn test_out_of_range_code_is_fatal() {
    let mut decoder = LdCelpDecoder::new(true);
    let err = decoder.decode(&[1, 2, 3, 0xffff, 4]).unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidIndex {
            index: 0xffff,
            position: Some(3)
        }
    ));
    assert!(!err.is_recoverable());
    assert_eq!(decoder.vectors_decoded(), 3);
    assert!(matches!(decoder.decode(&[1]), Err(CodecError::SessionFinished)));
}

/// A truncated byte stream is fatal
#[test]
fn test_truncated_bytes_are_fatal() {
    let mut decoder = LdCelpDecoder::new(false);
    decoder.decode_bytes(&[0x00, 0x10, 0x00, 0x20]).unwrap();
    let err = decoder.decode_bytes(&[0x00, 0x10, 0x00]).unwrap_err();
    assert!(matches!(err, CodecError::TruncatedStream { trailing_bytes: 1 }));
    assert_eq!(decoder.state(), StreamState::Finished);
    assert_eq!(decoder.vectors_decoded(), 2);
}

/// Empty input is not an error and leaves the session idle
#[test]
fn test_empty_input() {
    let mut decoder = LdCelpDecoder::new(false);
    assert!(decoder.decode_bytes(&[]).unwrap().is_empty());
    assert!(decoder.decode(&[]).unwrap().is_empty());
    assert_eq!(decoder.state(), StreamState::Idle);
}

/// Silence decodes to low-level, repeatable output with the filter
/// left at all-pass
#[test]
fn test_silence_decodes_bounded_and_deterministic() {
    let codes = encode_words(&[0i16; 2 * NFRSZ]);

    let mut first = LdCelpDecoder::new(false);
    let mut second = LdCelpDecoder::new(false);
    let a = first.decode(&codes).unwrap();
    let b = second.decode(&codes).unwrap();

    assert_eq!(a, b);
    assert!(a.iter().all(|s| s.unsigned_abs() < 1000));
    assert_eq!(*first.synthesis_coefficients(), all_pass_synthesis());
}

/// The postfilter changes the output but not the underlying synthesis
#[test]
fn test_postfilter_only_shapes_output() {
    let codes = encode_words(&generate_speech_like(1600, 21));

    let mut plain = LdCelpDecoder::new(false);
    let mut filtered = LdCelpDecoder::new(true);
    let mut outputs_differ = false;
    for &code in &codes {
        let p = plain.decode_vector(code).unwrap();
        let f = filtered.decode_vector(code).unwrap();
        assert_eq!(plain.last_synthesis(), filtered.last_synthesis());
        assert_eq!(plain.last_excitation(), filtered.last_excitation());
        outputs_differ |= p != f;
    }
    assert!(outputs_differ);
    assert_eq!(plain.synthesis_coefficients(), filtered.synthesis_coefficients());
}

/// The postfilter pitch estimate stays inside the search range
#[test]
fn test_postfilter_pitch_in_range() {
    let codes = encode_words(&generate_speech_like(2400, 8));
    let mut decoder = LdCelpDecoder::new(true);
    for &code in &codes {
        decoder.decode_vector(code).unwrap();
        let postfilter = decoder.postfilter().unwrap();
        assert!((KPMIN..=KPMAX).contains(&postfilter.pitch_period()));
        assert!((0.0..=1.0).contains(&postfilter.pitch_tap()));
    }
}

/// Disabled postfilter exposes no state
#[test]
fn test_postfilter_disabled() {
    let decoder = LdCelpDecoder::default();
    assert!(!decoder.postfilter_enabled());
    assert!(decoder.postfilter().is_none());
}
