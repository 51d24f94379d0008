//! LD-CELP encoder
//!
//! Per vector the encoder weights the input, removes the cascade's ringing to
//! get the target, normalizes by the predicted gain and searches the
//! codebook. The chosen index is then run through the shared
//! [`SynthesisPath`] exactly as the decoder will run it.

use tracing::{debug, trace};

use super::adapter::{
    scheduled_actions, AdaptAction, Phase, SynthesisCoeffs, WeightingAdapter, WeightingCoeffs,
};
use super::filter::WeightingFilter;
use super::pcm::PcmScaler;
use super::quantizer::{CodebookIndex, VectorQuantizer};
use super::ring::RingBuffer;
use super::synthesis::{StreamState, SynthesisPath};
use super::tables::{IDIM, NFRSZ, QSIZE};
use crate::error::Result;
use crate::utils::validation::validate_vector_alignment;

/// Encoder session
#[derive(Debug, Clone)]
pub struct LdCelpEncoder {
    path: SynthesisPath,
    weighting: WeightingCoeffs,
    weighting_adapter: WeightingAdapter,
    weighting_filter: WeightingFilter,
    quantizer: VectorQuantizer,
    /// Scaled input speech
    input: RingBuffer,
    scaler: PcmScaler,
    state: StreamState,
    vectors: u64,
}

impl LdCelpEncoder {
    /// Encoder with the default input scale
    pub fn new() -> Self {
        Self::with_scaler(PcmScaler::default())
    }

    /// Encoder with a custom input scale
    pub fn with_scale(scale: f32) -> Result<Self> {
        Ok(Self::with_scaler(PcmScaler::new(scale)?))
    }

    fn with_scaler(scaler: PcmScaler) -> Self {
        Self {
            path: SynthesisPath::new(),
            weighting: WeightingCoeffs::IDENTITY,
            weighting_adapter: WeightingAdapter::new(),
            weighting_filter: WeightingFilter::new(),
            quantizer: VectorQuantizer::new(),
            input: RingBuffer::new(QSIZE),
            scaler,
            state: StreamState::Idle,
            vectors: 0,
        }
    }

    /// Encode one vector of PCM
    pub fn encode_vector(&mut self, pcm: &[i16; IDIM]) -> Result<CodebookIndex> {
        self.state.begin_vector()?;

        let input = self.scaler.vector_to_codec(pcm);
        let weighted = self.weighting_filter.process(&input, &self.weighting);
        let ringing = self.path.ring(&self.weighting);

        let gain = self.path.predict_gain();
        let target: [f32; IDIM] = std::array::from_fn(|k| (weighted[k] - ringing[k]) / gain);
        let index = self.quantizer.select_codeword(&target);

        self.path.reconstruct(index, gain, &self.weighting);
        self.input.write_vector(&input);

        let phase = self.path.advance();
        for &action in scheduled_actions(phase) {
            match action {
                AdaptAction::AdaptWeighting => {
                    let frame = self.input.read_window(NFRSZ, 0);
                    if let Some(weighting) = self.weighting_adapter.adapt(&frame) {
                        self.weighting = weighting;
                    }
                }
                AdaptAction::RefreshCodebook => {
                    self.quantizer
                        .refresh(self.path.synthesis_coefficients(), &self.weighting);
                }
                AdaptAction::ComputeSynthesis
                | AdaptAction::AdaptGain
                | AdaptAction::CommitSynthesis => {
                    // Synthesis analysis only feeds the decoder postfilter
                    let _ = self.path.adapt(action);
                }
            }
        }

        trace!("encoded vector {}: index {} gain {:.3}", self.vectors, index, gain);
        self.vectors += 1;
        Ok(index)
    }

    /// Encode whole vectors of PCM
    ///
    /// Fails without touching the session state if `pcm` does not hold a
    /// whole number of vectors.
    pub fn encode(&mut self, pcm: &[i16]) -> Result<Vec<CodebookIndex>> {
        validate_vector_alignment(pcm, IDIM)?;

        let mut indices = Vec::with_capacity(pcm.len() / IDIM);
        for chunk in pcm.chunks_exact(IDIM) {
            let mut vector = [0; IDIM];
            vector.copy_from_slice(chunk);
            indices.push(self.encode_vector(&vector)?);
        }
        Ok(indices)
    }

    /// End the session; later calls fail with `SessionFinished`
    pub fn finish(&mut self) {
        if self.state != StreamState::Finished {
            debug!("encoder finished after {} vectors", self.vectors);
        }
        self.state = StreamState::Finished;
    }

    /// Return to the initial state, keeping the input scale
    pub fn reset(&mut self) {
        debug!("encoder reset after {} vectors", self.vectors);
        *self = Self::with_scaler(self.scaler);
    }

    /// Session state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Phase of the next vector
    pub fn phase(&self) -> Phase {
        self.path.phase()
    }

    /// Vectors encoded since creation or reset
    pub fn vectors_encoded(&self) -> u64 {
        self.vectors
    }

    /// Excitation reconstructed for the last vector
    pub fn last_excitation(&self) -> [f32; IDIM] {
        self.path.last_excitation()
    }

    /// Locally synthesized speech for the last vector, at codec scale
    pub fn last_synthesis(&self) -> [f32; IDIM] {
        self.path.last_synthesis()
    }

    /// Synthesis filter in use
    pub fn synthesis_coefficients(&self) -> &SynthesisCoeffs {
        self.path.synthesis_coefficients()
    }

    /// Perceptual weighting filter in use
    pub fn weighting_coefficients(&self) -> &WeightingCoeffs {
        &self.weighting
    }

    /// Input scaling in use
    pub fn scaler(&self) -> PcmScaler {
        self.scaler
    }
}

impl Default for LdCelpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::ldcelp::adapter::all_pass_synthesis;
    use crate::error::CodecError;

    #[test]
    fn test_state_lifecycle() {
        let mut encoder = LdCelpEncoder::new();
        assert_eq!(encoder.state(), StreamState::Idle);

        encoder.encode_vector(&[0; IDIM]).unwrap();
        assert_eq!(encoder.state(), StreamState::Running);
        assert_eq!(encoder.phase().get(), 2);

        encoder.finish();
        assert!(matches!(
            encoder.encode_vector(&[0; IDIM]),
            Err(CodecError::SessionFinished)
        ));

        encoder.reset();
        assert_eq!(encoder.state(), StreamState::Idle);
        assert_eq!(encoder.phase(), Phase::FIRST);
        assert_eq!(encoder.vectors_encoded(), 0);
    }

    #[test]
    fn test_partial_vector_rejected() {
        let mut encoder = LdCelpEncoder::new();
        let err = encoder.encode(&[0; 7]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::PartialVector {
                samples: 7,
                vector_size: IDIM
            }
        ));
        assert_eq!(encoder.state(), StreamState::Idle);
    }

    #[test]
    fn test_weighting_adapts_on_speech_like_input() {
        let mut encoder = LdCelpEncoder::new();
        let pcm: Vec<i16> = (0..200)
            .map(|n| (3000.0 * (n as f32 * 0.3).sin()) as i16)
            .collect();
        encoder.encode(&pcm).unwrap();
        assert_ne!(*encoder.weighting_coefficients(), WeightingCoeffs::IDENTITY);
    }

    #[test]
    fn test_shared_actions_reach_synthesis_path() {
        let mut encoder = LdCelpEncoder::new();
        let mut reference = SynthesisPath::new();
        let pcm: Vec<i16> = (0..400)
            .map(|n| (2500.0 * (n as f32 * 0.21).sin() + 800.0 * (n as f32 * 1.3).cos()) as i16)
            .collect();

        for chunk in pcm.chunks_exact(IDIM) {
            let vector: [i16; IDIM] = std::array::from_fn(|k| chunk[k]);
            let index = encoder.encode_vector(&vector).unwrap();

            reference.ring(&WeightingCoeffs::IDENTITY);
            let gain = reference.predict_gain();
            reference.reconstruct(index, gain, &WeightingCoeffs::IDENTITY);
            let phase = reference.advance();
            for &action in scheduled_actions(phase) {
                if !action.encoder_only() {
                    reference.adapt(action);
                }
            }

            assert_eq!(encoder.synthesis_coefficients(), reference.synthesis_coefficients());
            assert_eq!(encoder.path.predict_gain(), reference.predict_gain());
            assert_eq!(encoder.last_synthesis(), reference.last_synthesis());
        }
        assert_ne!(*encoder.synthesis_coefficients(), all_pass_synthesis());
    }
}
