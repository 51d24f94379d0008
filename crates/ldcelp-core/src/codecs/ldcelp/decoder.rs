//! LD-CELP decoder
//!
//! Reconstructs speech from index codes through the shared
//! [`SynthesisPath`], optionally followed by the adaptive postfilter. Any
//! malformed input ends the session: once the index stream is out of step
//! there is no way to resynchronize the backward-adapted state.

use bytes::Buf;
use tracing::{debug, trace, warn};

use super::adapter::{scheduled_actions, Phase, SynthesisCoeffs, WeightingCoeffs};
use super::pcm::PcmScaler;
use super::postfilter::Postfilter;
use super::quantizer::CodebookIndex;
use super::synthesis::{StreamState, SynthesisPath};
use super::tables::IDIM;
use crate::error::{CodecError, Result};
use crate::utils::validation::validate_index_stream;

/// Bytes per serialized index word
pub const INDEX_BYTES: usize = 2;

/// Decoder session
#[derive(Debug, Clone)]
pub struct LdCelpDecoder {
    path: SynthesisPath,
    postfilter: Option<Box<Postfilter>>,
    scaler: PcmScaler,
    state: StreamState,
    vectors: u64,
}

impl LdCelpDecoder {
    /// Decoder with the default output scale
    pub fn new(postfilter: bool) -> Self {
        Self::with_scaler(postfilter, PcmScaler::default())
    }

    /// Decoder with a custom scale; must match the encoder's
    pub fn with_scale(postfilter: bool, scale: f32) -> Result<Self> {
        Ok(Self::with_scaler(postfilter, PcmScaler::new(scale)?))
    }

    fn with_scaler(postfilter: bool, scaler: PcmScaler) -> Self {
        Self {
            path: SynthesisPath::new(),
            postfilter: postfilter.then(|| Box::new(Postfilter::new())),
            scaler,
            state: StreamState::Idle,
            vectors: 0,
        }
    }

    fn fail(&mut self, error: CodecError) -> CodecError {
        warn!("decoder session terminated: {}", error);
        self.state = StreamState::Finished;
        error
    }

    /// Decode one index code into a vector of PCM
    pub fn decode_vector(&mut self, code: u16) -> Result<[i16; IDIM]> {
        self.state.begin_vector()?;

        let index = match CodebookIndex::try_from(code) {
            Ok(index) => index,
            Err(_) => {
                return Err(self.fail(CodecError::InvalidIndex {
                    index: code,
                    position: Some(self.vectors),
                }));
            }
        };

        let vector_phase = self.path.phase();
        // Only the synthesis memory matters here; the weighting memories
        // ring along unused
        self.path.ring(&WeightingCoeffs::IDENTITY);
        let gain = self.path.predict_gain();
        let synth = self.path.reconstruct(index, gain, &WeightingCoeffs::IDENTITY);

        let output = match self.postfilter.as_deref_mut() {
            Some(postfilter) => {
                postfilter.analyze(&synth);
                match vector_phase.get() {
                    3 => postfilter.adapt_pitch(),
                    1 => postfilter.refresh_short_term(),
                    _ => {}
                }
                postfilter.process(&synth)
            }
            None => synth,
        };

        let phase = self.path.advance();
        for &action in scheduled_actions(phase) {
            if action.encoder_only() {
                continue;
            }
            if let Some(update) = self.path.adapt(action) {
                if let Some(postfilter) = self.postfilter.as_deref_mut() {
                    postfilter.set_synthesis_analysis(&update.lpc10, update.first_reflection);
                }
            }
        }

        trace!("decoded vector {}: index {} gain {:.3}", self.vectors, index, gain);
        self.vectors += 1;
        Ok(self.scaler.vector_to_pcm(&output))
    }

    /// Decode a run of index codes, appending PCM to `out`
    ///
    /// Stops at the first out-of-range code, which ends the session. Vectors
    /// decoded before it stay in `out`.
    pub fn decode_into(&mut self, codes: &[u16], out: &mut Vec<i16>) -> Result<()> {
        out.reserve(codes.len() * IDIM);
        for &code in codes {
            out.extend_from_slice(&self.decode_vector(code)?);
        }
        Ok(())
    }

    /// Decode a run of index codes
    ///
    /// A failing call returns no samples even though the session has moved
    /// past the vectors before the bad code; use
    /// [`LdCelpDecoder::decode_into`] to keep them.
    pub fn decode(&mut self, codes: &[u16]) -> Result<Vec<i16>> {
        let mut pcm = Vec::new();
        self.decode_into(codes, &mut pcm)?;
        Ok(pcm)
    }

    /// Decode big-endian index words, appending PCM to `out`
    ///
    /// Whole words are decoded first and a trailing odd byte is then reported
    /// as a truncated word. Everything decoded before a failure stays in
    /// `out`.
    pub fn decode_bytes_into(&mut self, data: &[u8], out: &mut Vec<i16>) -> Result<()> {
        if self.state == StreamState::Finished {
            return Err(CodecError::SessionFinished);
        }

        let (mut words, rest) = data.split_at(data.len() - data.len() % INDEX_BYTES);
        out.reserve(words.len() / INDEX_BYTES * IDIM);
        while words.has_remaining() {
            out.extend_from_slice(&self.decode_vector(words.get_u16())?);
        }
        if let Err(error) = validate_index_stream(rest, INDEX_BYTES) {
            return Err(self.fail(error));
        }
        Ok(())
    }

    /// Decode big-endian index words
    ///
    /// A trailing odd byte is a truncated word and ends the session before
    /// anything is decoded. As with [`LdCelpDecoder::decode`], a failing call
    /// returns no samples; [`LdCelpDecoder::decode_bytes_into`] keeps them.
    pub fn decode_bytes(&mut self, data: &[u8]) -> Result<Vec<i16>> {
        if self.state == StreamState::Finished {
            return Err(CodecError::SessionFinished);
        }
        if let Err(error) = validate_index_stream(data, INDEX_BYTES) {
            return Err(self.fail(error));
        }

        let mut pcm = Vec::new();
        self.decode_bytes_into(data, &mut pcm)?;
        Ok(pcm)
    }

    /// End the session; later calls fail with `SessionFinished`
    pub fn finish(&mut self) {
        if self.state != StreamState::Finished {
            debug!("decoder finished after {} vectors", self.vectors);
        }
        self.state = StreamState::Finished;
    }

    /// Return to the initial state, keeping postfilter and scale settings
    pub fn reset(&mut self) {
        debug!("decoder reset after {} vectors", self.vectors);
        *self = Self::with_scaler(self.postfilter_enabled(), self.scaler);
    }

    /// Session state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Phase of the next vector
    pub fn phase(&self) -> Phase {
        self.path.phase()
    }

    /// Vectors decoded since creation or reset
    pub fn vectors_decoded(&self) -> u64 {
        self.vectors
    }

    /// Excitation reconstructed for the last vector
    pub fn last_excitation(&self) -> [f32; IDIM] {
        self.path.last_excitation()
    }

    /// Synthesized speech for the last vector before postfiltering, at
    /// codec scale
    pub fn last_synthesis(&self) -> [f32; IDIM] {
        self.path.last_synthesis()
    }

    /// Synthesis filter in use
    pub fn synthesis_coefficients(&self) -> &SynthesisCoeffs {
        self.path.synthesis_coefficients()
    }

    /// Whether the postfilter runs
    pub fn postfilter_enabled(&self) -> bool {
        self.postfilter.is_some()
    }

    /// Postfilter state, when enabled
    pub fn postfilter(&self) -> Option<&Postfilter> {
        self.postfilter.as_deref()
    }
}

impl Default for LdCelpDecoder {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_index_finishes_session() {
        let mut decoder = LdCelpDecoder::new(false);
        decoder.decode(&[5, 6]).unwrap();

        let err = decoder.decode_vector(1024).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidIndex {
                index: 1024,
                position: Some(2)
            }
        ));
        assert_eq!(decoder.state(), StreamState::Finished);
        assert!(matches!(decoder.decode_vector(5), Err(CodecError::SessionFinished)));
    }

    #[test]
    fn test_odd_byte_count_is_truncation() {
        let mut decoder = LdCelpDecoder::new(false);
        let err = decoder.decode_bytes(&[0x00, 0x05, 0x01]).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedStream { trailing_bytes: 1 }));
        assert_eq!(decoder.vectors_decoded(), 0);
        assert!(matches!(
            decoder.decode_bytes(&[0x00, 0x05]),
            Err(CodecError::SessionFinished)
        ));
    }

    #[test]
    fn test_failed_call_returns_nothing() {
        let mut decoder = LdCelpDecoder::new(false);
        let err = decoder.decode_bytes(&[0x00, 0x05, 0x04, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidIndex { index: 0x0400, .. }));
        // The first word was decoded but its samples went with the error
        assert_eq!(decoder.vectors_decoded(), 1);
        assert_eq!(decoder.state(), StreamState::Finished);
    }

    #[test]
    fn test_decode_into_keeps_prefix_on_bad_index() {
        let mut expected = LdCelpDecoder::new(false);
        let prefix = expected.decode(&[5, 6]).unwrap();

        let mut decoder = LdCelpDecoder::new(false);
        let mut pcm = Vec::new();
        let err = decoder.decode_into(&[5, 6, 2000, 7], &mut pcm).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidIndex {
                index: 2000,
                position: Some(2)
            }
        ));
        assert_eq!(pcm, prefix);
    }

    #[test]
    fn test_decode_bytes_into_keeps_words_before_truncation() {
        let mut expected = LdCelpDecoder::new(false);
        let prefix = expected.decode(&[5, 6]).unwrap();

        let mut decoder = LdCelpDecoder::new(false);
        let mut pcm = vec![42];
        let err = decoder
            .decode_bytes_into(&[0x00, 0x05, 0x00, 0x06, 0x01], &mut pcm)
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedStream { trailing_bytes: 1 }));
        assert_eq!(pcm[0], 42);
        assert_eq!(&pcm[1..], &prefix[..]);
        assert_eq!(decoder.state(), StreamState::Finished);
        assert!(matches!(
            decoder.decode_bytes_into(&[0x00, 0x05], &mut pcm),
            Err(CodecError::SessionFinished)
        ));
    }

    #[test]
    fn test_bytes_are_big_endian() {
        let mut by_bytes = LdCelpDecoder::new(false);
        let mut by_codes = LdCelpDecoder::new(false);
        let from_bytes = by_bytes.decode_bytes(&[0x01, 0x2c, 0x03, 0xff]).unwrap();
        let from_codes = by_codes.decode(&[0x012c, 0x03ff]).unwrap();
        assert_eq!(from_bytes, from_codes);
        assert_eq!(from_bytes.len(), 2 * IDIM);
    }

    #[test]
    fn test_reset_keeps_settings() {
        let mut decoder = LdCelpDecoder::with_scale(true, 0.25).unwrap();
        decoder.decode(&[1, 2, 3, 4, 5]).unwrap();
        decoder.finish();
        decoder.reset();
        assert!(decoder.postfilter_enabled());
        assert_eq!(decoder.state(), StreamState::Idle);
        assert_eq!(decoder.phase(), Phase::FIRST);
        assert_eq!(decoder.decode_vector(0).unwrap().len(), IDIM);
    }
}
