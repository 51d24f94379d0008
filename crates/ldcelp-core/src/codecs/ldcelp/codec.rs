//! G.728 codec interface
//!
//! Wraps an encoder and decoder session behind [`AudioCodec`]. Index codes
//! travel as big-endian 16-bit words, one per 5-sample vector.

use bytes::{Buf, BufMut, BytesMut};
use tracing::{debug, trace};

use super::decoder::{LdCelpDecoder, INDEX_BYTES};
use super::encoder::LdCelpEncoder;
use super::quantizer::CodebookIndex;
use super::tables::IDIM;
use crate::error::{CodecError, Result};
use crate::utils::validation::validate_buffer_size;
use crate::types::{AudioCodec, AudioCodecExt, CodecConfig, CodecInfo, CodecType};

/// G.728 LD-CELP codec
///
/// # Example
/// ```
/// use ldcelp_core::codecs::ldcelp::LdCelpCodec;
/// use ldcelp_core::types::{AudioCodec, CodecConfig};
///
/// let mut codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
///
/// // 20 samples are four vectors, four index words
/// let encoded = codec.encode(&[0i16; 20]).unwrap();
/// assert_eq!(encoded.len(), 8);
///
/// let decoded = codec.decode(&encoded).unwrap();
/// assert_eq!(decoded.len(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct LdCelpCodec {
    config: CodecConfig,
    frame_size: usize,
    encoder: LdCelpEncoder,
    decoder: LdCelpDecoder,
}

impl LdCelpCodec {
    /// Create a codec from configuration
    pub fn new(config: CodecConfig) -> Result<Self> {
        if config.codec_type != CodecType::G728 {
            return Err(CodecError::unsupported_codec(config.codec_type.name()));
        }
        config.validate()?;

        let params = &config.parameters.ldcelp;
        let encoder = LdCelpEncoder::with_scale(params.input_scale)?;
        let decoder = LdCelpDecoder::with_scale(params.postfilter, params.input_scale)?;
        let frame_size = config.frame_size_samples();

        debug!(
            "created G.728 codec: frame {} samples, postfilter {}",
            frame_size, params.postfilter
        );

        Ok(Self {
            config,
            frame_size,
            encoder,
            decoder,
        })
    }

    /// Configuration this codec was built from
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encoder session
    pub fn encoder(&self) -> &LdCelpEncoder {
        &self.encoder
    }

    /// Decoder session
    pub fn decoder(&self) -> &LdCelpDecoder {
        &self.decoder
    }

    fn encode_into(&mut self, samples: &[i16], out: &mut impl BufMut) -> Result<usize> {
        let indices = self.encoder.encode(samples)?;
        for index in &indices {
            out.put_u16(u16::from(*index));
        }
        Ok(indices.len() * INDEX_BYTES)
    }
}

impl AudioCodec for LdCelpCodec {
    fn encode(&mut self, samples: &[i16]) -> Result<Vec<u8>> {
        let mut out = BytesMut::with_capacity(self.max_encoded_size(samples.len()));
        self.encode_into(samples, &mut out)?;
        trace!("encoded {} samples into {} bytes", samples.len(), out.len());
        Ok(out.to_vec())
    }

    fn decode(&mut self, data: &[u8]) -> Result<Vec<i16>> {
        let samples = self.decoder.decode_bytes(data)?;
        trace!("decoded {} bytes into {} samples", data.len(), samples.len());
        Ok(samples)
    }

    fn info(&self) -> CodecInfo {
        let codec_type = self.config.codec_type;
        CodecInfo {
            name: codec_type.name(),
            sample_rate: self.config.sample_rate.hz(),
            channels: self.config.channels,
            bitrate: codec_type.default_bitrate(),
            frame_size: self.frame_size,
            payload_type: codec_type.payload_type(),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.encoder.reset();
        self.decoder.reset();
        Ok(())
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn supports_variable_frame_size(&self) -> bool {
        // Any whole number of vectors is accepted
        true
    }
}

impl AudioCodecExt for LdCelpCodec {
    fn encode_to_buffer(&mut self, samples: &[i16], output: &mut [u8]) -> Result<usize> {
        validate_buffer_size(self.max_encoded_size(samples.len()), output.len())?;
        let mut out = &mut output[..];
        self.encode_into(samples, &mut out)
    }

    fn decode_to_buffer(&mut self, data: &[u8], output: &mut [i16]) -> Result<usize> {
        validate_buffer_size(self.max_decoded_size(data.len()), output.len())?;
        if data.len() % INDEX_BYTES != 0 {
            // Let the decoder record the truncation
            return self.decoder.decode_bytes(data).map(|_| 0);
        }

        let mut data = data;
        let mut written = 0;
        while data.has_remaining() {
            let vector = self.decoder.decode_vector(data.get_u16())?;
            output[written..written + IDIM].copy_from_slice(&vector);
            written += IDIM;
        }
        Ok(written)
    }

    fn max_encoded_size(&self, input_samples: usize) -> usize {
        input_samples / IDIM * INDEX_BYTES
    }

    fn max_decoded_size(&self, input_bytes: usize) -> usize {
        input_bytes / INDEX_BYTES * IDIM
    }
}

/// Serialize indices as big-endian words
pub fn indices_to_bytes(indices: &[CodebookIndex]) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(indices.len() * INDEX_BYTES);
    for index in indices {
        out.put_u16(u16::from(*index));
    }
    out.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SampleRate;

    #[test]
    fn test_codec_creation() {
        let codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
        let info = codec.info();
        assert_eq!(info.name, "G728");
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.bitrate, 16000);
        assert_eq!(info.frame_size, IDIM);
        assert_eq!(info.payload_type, Some(15));
    }

    #[test]
    fn test_codec_rejects_bad_config() {
        let config = CodecConfig::g728().with_sample_rate(SampleRate::Rate16000);
        assert!(LdCelpCodec::new(config).is_err());
    }

    #[test]
    fn test_encode_size_and_partial_vector() {
        let mut codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
        let encoded = codec.encode(&[100i16; 40]).unwrap();
        assert_eq!(encoded.len(), 16);
        for word in encoded.chunks_exact(2) {
            assert!(u16::from_be_bytes([word[0], word[1]]) <= 1023);
        }

        assert!(matches!(
            codec.encode(&[0i16; 12]),
            Err(CodecError::PartialVector { samples: 12, .. })
        ));
    }

    #[test]
    fn test_buffer_apis_match_vec_apis() {
        let pcm: Vec<i16> = (0..80).map(|n| ((n * 377) % 2000 - 1000) as i16).collect();

        let mut a = LdCelpCodec::new(CodecConfig::g728()).unwrap();
        let mut b = LdCelpCodec::new(CodecConfig::g728()).unwrap();

        let encoded = a.encode(&pcm).unwrap();
        let mut buffer = vec![0u8; b.max_encoded_size(pcm.len())];
        let written = b.encode_to_buffer(&pcm, &mut buffer).unwrap();
        assert_eq!(&buffer[..written], &encoded[..]);

        let decoded = a.decode(&encoded).unwrap();
        let mut samples = vec![0i16; b.max_decoded_size(encoded.len())];
        let produced = b.decode_to_buffer(&encoded, &mut samples).unwrap();
        assert_eq!(&samples[..produced], &decoded[..]);
    }

    #[test]
    fn test_small_buffers_rejected() {
        let mut codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
        let mut out = [0u8; 2];
        assert!(matches!(
            codec.encode_to_buffer(&[0i16; 10], &mut out),
            Err(CodecError::BufferTooSmall { needed: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_reset_restores_determinism() {
        let pcm: Vec<i16> = (0..60).map(|n| (n * 50) as i16).collect();
        let mut codec = LdCelpCodec::new(CodecConfig::g728()).unwrap();
        let first = codec.encode(&pcm).unwrap();
        codec.reset().unwrap();
        let second = codec.encode(&pcm).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_indices_to_bytes() {
        let bytes = indices_to_bytes(&[CodebookIndex::new(127, 7), CodebookIndex::new(0, 1)]);
        assert_eq!(bytes, vec![0x03, 0xff, 0x00, 0x01]);
    }
}
