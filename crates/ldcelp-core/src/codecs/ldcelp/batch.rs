//! Parallel processing of independent streams
//!
//! Each stream gets its own encoder or decoder session; nothing is shared
//! between them, so streams are spread across the rayon pool.

use rayon::prelude::*;
use tracing::debug;

use super::codec::indices_to_bytes;
use super::decoder::LdCelpDecoder;
use super::encoder::LdCelpEncoder;
use crate::error::{CodecError, Result};
use crate::types::{CodecConfig, CodecType};

fn check_config(config: &CodecConfig) -> Result<()> {
    if config.codec_type != CodecType::G728 {
        return Err(CodecError::unsupported_codec(config.codec_type.name()));
    }
    config.validate()
}

/// Encode each PCM stream into big-endian index words
///
/// Results keep the input order. Any failing stream fails the batch.
pub fn encode_streams(streams: &[Vec<i16>], config: &CodecConfig) -> Result<Vec<Vec<u8>>> {
    check_config(config)?;
    let scale = config.parameters.ldcelp.input_scale;
    debug!("encoding {} streams in parallel", streams.len());

    streams
        .par_iter()
        .map(|pcm| {
            let mut encoder = LdCelpEncoder::with_scale(scale)?;
            let indices = encoder.encode(pcm)?;
            encoder.finish();
            Ok(indices_to_bytes(&indices))
        })
        .collect()
}

/// Decode each index stream into PCM
///
/// Results keep the input order. Any failing stream fails the batch.
pub fn decode_streams(streams: &[Vec<u8>], config: &CodecConfig) -> Result<Vec<Vec<i16>>> {
    check_config(config)?;
    let params = &config.parameters.ldcelp;
    debug!("decoding {} streams in parallel", streams.len());

    streams
        .par_iter()
        .map(|data| {
            let mut decoder = LdCelpDecoder::with_scale(params.postfilter, params.input_scale)?;
            let pcm = decoder.decode_bytes(data)?;
            decoder.finish();
            Ok(pcm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(period: usize, len: usize) -> Vec<i16> {
        (0..len)
            .map(|n| {
                let phase = 2.0 * std::f32::consts::PI * n as f32 / period as f32;
                (4000.0 * phase.sin()) as i16
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let config = CodecConfig::g728();
        let streams: Vec<Vec<i16>> = (0..6).map(|k| tone(20 + 7 * k, 400)).collect();

        let encoded = encode_streams(&streams, &config).unwrap();
        assert_eq!(encoded.len(), streams.len());
        for (pcm, bytes) in streams.iter().zip(&encoded) {
            let mut encoder = LdCelpEncoder::new();
            let expected = indices_to_bytes(&encoder.encode(pcm).unwrap());
            assert_eq!(bytes, &expected);
        }

        let decoded = decode_streams(&encoded, &config).unwrap();
        for (bytes, pcm) in encoded.iter().zip(&decoded) {
            let mut decoder = LdCelpDecoder::new(false);
            assert_eq!(pcm, &decoder.decode_bytes(bytes).unwrap());
        }
    }

    #[test]
    fn test_batch_fails_on_bad_stream() {
        let config = CodecConfig::g728();
        let streams = vec![vec![0u8, 1], vec![0u8, 1, 2]];
        assert!(matches!(
            decode_streams(&streams, &config),
            Err(CodecError::TruncatedStream { .. })
        ));

        let pcm = vec![vec![0i16; 10], vec![0i16; 11]];
        assert!(matches!(
            encode_streams(&pcm, &config),
            Err(CodecError::PartialVector { .. })
        ));
    }
}
