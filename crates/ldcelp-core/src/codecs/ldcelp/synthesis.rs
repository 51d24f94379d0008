//! Backward-adapted synthesis path
//!
//! Everything the encoder and decoder must compute identically lives here:
//! the gain predictor, the synthesis filter memories, the synthesis and gain
//! adapters and the histories they read. The encoder runs this path as its
//! local decoder, so both sides stay in lockstep without side information.

use tracing::trace;

use super::adapter::{
    all_pass_synthesis, initial_gain_coeffs, AdaptAction, CoeffSlot, GainAdapter, GainCoeffs,
    Phase, SynthesisAdapter, SynthesisCoeffs, SynthesisUpdate, WeightingCoeffs,
};
use super::filter::FilterState;
use super::gain::GainPredictor;
use super::quantizer::CodebookIndex;
use super::ring::RingBuffer;
use super::tables::{GOFF, IDIM, LOG_GAIN_SLOTS, NFRSZ, NUPDATE, QSIZE};
use crate::error::{CodecError, Result};

/// Lifecycle of an encode or decode session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamState {
    /// Created or reset, nothing processed yet
    #[default]
    Idle,
    /// At least one vector processed
    Running,
    /// Finished by the caller or by a fatal stream error
    Finished,
}

impl StreamState {
    /// Move to `Running` unless finished
    pub(crate) fn begin_vector(&mut self) -> Result<()> {
        match self {
            Self::Finished => Err(CodecError::SessionFinished),
            _ => {
                *self = Self::Running;
                Ok(())
            }
        }
    }
}

/// Shared per-vector reconstruction state
#[derive(Debug, Clone)]
pub struct SynthesisPath {
    phase: Phase,
    filter: FilterState,
    synthesis: CoeffSlot<SynthesisCoeffs>,
    synthesis_adapter: SynthesisAdapter,
    predictor: GainPredictor,
    gain: CoeffSlot<GainCoeffs>,
    gain_adapter: GainAdapter,
    /// Scaled excitation, one vector per step
    excitation: RingBuffer,
    /// Synthesized speech before any postfilter
    synthesized: RingBuffer,
    /// Offset-removed log-gains, one per vector, starting at 0 dB excitation
    log_gains: RingBuffer,
}

impl SynthesisPath {
    /// Initial state: all-pass synthesis, unity gain, silent histories
    pub fn new() -> Self {
        Self {
            phase: Phase::FIRST,
            filter: FilterState::new(),
            synthesis: CoeffSlot::new(all_pass_synthesis()),
            synthesis_adapter: SynthesisAdapter::new(),
            predictor: GainPredictor::new(),
            gain: CoeffSlot::new(initial_gain_coeffs()),
            gain_adapter: GainAdapter::new(),
            excitation: RingBuffer::new(QSIZE),
            synthesized: RingBuffer::new(QSIZE),
            log_gains: RingBuffer::filled(LOG_GAIN_SLOTS, -GOFF),
        }
    }

    /// Phase of the vector about to be processed
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Committed synthesis filter
    pub fn synthesis_coefficients(&self) -> &SynthesisCoeffs {
        self.synthesis.current()
    }

    /// Excitation gain predicted for the next vector
    pub fn predict_gain(&self) -> f32 {
        self.predictor.predict_gain(self.gain.current())
    }

    /// Weighted zero input response of the cascade for the next vector
    pub fn ring(&mut self, weighting: &WeightingCoeffs) -> [f32; IDIM] {
        self.filter.zero_response(self.synthesis.current(), weighting)
    }

    /// Reconstruct a vector from its index and predicted gain
    ///
    /// Updates the gain history and filter memories and returns the
    /// synthesized vector. Must follow [`SynthesisPath::ring`].
    pub fn reconstruct(
        &mut self,
        index: CodebookIndex,
        gain: f32,
        weighting: &WeightingCoeffs,
    ) -> [f32; IDIM] {
        let excitation = index.excitation().map(|e| gain * e);

        let log_gain = self.predictor.update_gain(&excitation);
        self.log_gains.write_vector(&[log_gain]);

        let synth = self.filter.update(&excitation, self.synthesis.current(), weighting);
        self.excitation.write_vector(&excitation);
        self.synthesized.write_vector(&synth);
        synth
    }

    /// Step to the next vector phase and return it
    pub fn advance(&mut self) -> Phase {
        self.phase = self.phase.next();
        self.phase
    }

    /// Perform one scheduled action
    ///
    /// Returns the synthesis analysis when the synthesis adapter ran
    /// successfully; encoder-only actions are left to the caller.
    pub fn adapt(&mut self, action: AdaptAction) -> Option<SynthesisUpdate> {
        match action {
            AdaptAction::ComputeSynthesis => {
                let frame = self.synthesized.read_window(NFRSZ, 0);
                let update = self.synthesis_adapter.adapt(&frame)?;
                self.synthesis.stage(update.coeffs);
                Some(update)
            }
            AdaptAction::AdaptGain => {
                let recent = self.log_gains.read_window(NUPDATE, 0);
                if let Some(coeffs) = self.gain_adapter.adapt(&recent) {
                    self.gain.stage(coeffs);
                    self.gain.commit();
                }
                None
            }
            AdaptAction::CommitSynthesis => {
                if self.synthesis.commit() {
                    trace!("synthesis coefficients committed");
                }
                None
            }
            AdaptAction::AdaptWeighting | AdaptAction::RefreshCodebook => None,
        }
    }

    /// Most recent scaled excitation vector
    pub fn last_excitation(&self) -> [f32; IDIM] {
        self.excitation.latest::<IDIM>()
    }

    /// Most recent synthesized vector
    pub fn last_synthesis(&self) -> [f32; IDIM] {
        self.synthesized.latest::<IDIM>()
    }
}

impl Default for SynthesisPath {
    fn default() -> Self {
        Self::new()
    }
}
