//! LD-CELP Encoder Tests
//!
//! Session behavior, index range and backward adaptation of the encoder.

use super::utils::test_signals::*;
use crate::codecs::ldcelp::adapter::{all_pass_synthesis, WeightingCoeffs};
use crate::codecs::ldcelp::tables::{IDIM, MAX_INDEX, NFRSZ};
use crate::codecs::ldcelp::{LdCelpCodec, LdCelpEncoder, Phase, StreamState};
use crate::error::CodecError;
use crate::types::{AudioCodec, CodecConfig};

/// One frame of silence is four valid index words
#[test]
fn test_silent_frame_encodes_to_four_words() {
    let mut codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
    let encoded = codec.encode(&[0i16; NFRSZ]).unwrap();
    assert_eq!(encoded.len(), 8);
    for word in encoded.chunks_exact(2) {
        let index = u16::from_be_bytes([word[0], word[1]]);
        assert!(index <= MAX_INDEX);
    }
}

/// Indices stay in range for loud noise
#[test]
fn test_indices_in_range_for_noise() {
    let pcm = generate_white_noise(1600, i16::MAX, 7);
    let mut encoder = LdCelpEncoder::new();
    let indices = encoder.encode(&pcm).unwrap();
    assert_eq!(indices.len(), pcm.len() / IDIM);
    assert!(indices.iter().all(|i| i.value() <= MAX_INDEX));
}

/// Identical input gives identical indices
#[test]
fn test_encoder_is_deterministic() {
    let pcm = generate_speech_like(800, 3);
    let a = LdCelpEncoder::new().encode(&pcm).unwrap();
    let b = LdCelpEncoder::new().encode(&pcm).unwrap();
    assert_eq!(a, b);
}

/// Splitting the input does not change the result
#[test]
fn test_chunking_is_transparent() {
    let pcm = generate_speech_like(400, 11);

    let whole = LdCelpEncoder::new().encode(&pcm).unwrap();

    let mut encoder = LdCelpEncoder::new();
    let mut pieces = Vec::new();
    for chunk in pcm.chunks(35) {
        pieces.extend(encoder.encode(chunk).unwrap());
    }
    assert_eq!(whole, pieces);
}

/// Silence never moves the synthesis filter away from all-pass
#[test]
fn test_silence_keeps_all_pass_synthesis() {
    let mut encoder = LdCelpEncoder::new();
    encoder.encode(&[0i16; 2 * NFRSZ]).unwrap();
    assert_eq!(*encoder.synthesis_coefficients(), all_pass_synthesis());
    assert_eq!(*encoder.weighting_coefficients(), WeightingCoeffs::IDENTITY);
}

/// Speech moves every backward-adapted coefficient set
#[test]
fn test_speech_adapts_filters() {
    let mut encoder = LdCelpEncoder::new();
    encoder.encode(&generate_speech_like(1600, 5)).unwrap();
    assert_ne!(*encoder.synthesis_coefficients(), all_pass_synthesis());
    assert_ne!(*encoder.weighting_coefficients(), WeightingCoeffs::IDENTITY);
}

/// Phase advances once per vector and wraps every frame
#[test]
fn test_phase_follows_vectors() {
    let mut encoder = LdCelpEncoder::new();
    for n in 1..=9u8 {
        encoder.encode_vector(&[0; IDIM]).unwrap();
        assert_eq!(encoder.phase().get(), n % 4 + 1);
    }
    assert_eq!(encoder.vectors_encoded(), 9);
}

/// A finished encoder refuses input until reset
#[test]
fn test_finished_encoder() {
    let mut encoder = LdCelpEncoder::new();
    encoder.encode(&[0i16; 10]).unwrap();
    encoder.finish();
    assert_eq!(encoder.state(), StreamState::Finished);
    assert!(matches!(encoder.encode(&[0i16; 5]), Err(CodecError::SessionFinished)));

    encoder.reset();
    assert_eq!(encoder.phase(), Phase::FIRST);
    assert!(encoder.encode(&[0i16; 5]).is_ok());
}

/// A custom scale is kept across reset
#[test]
fn test_custom_scale() {
    let mut encoder = LdCelpEncoder::with_scale(0.25).unwrap();
    encoder.encode(&[100i16; 20]).unwrap();
    encoder.reset();
    assert_eq!(encoder.scaler().scale(), 0.25);
    assert!(LdCelpEncoder::with_scale(0.0).is_err());
}
