//! Backward coefficient adapters
//!
//! Each adapter turns one frame of reconstructed history into a new
//! coefficient set using the hybrid window and Levinson-Durbin. Results are
//! staged in a [`CoeffSlot`] and committed on the vector phase given by
//! [`scheduled_actions`], which is what keeps encoder and decoder in lockstep.

use tracing::trace;

use super::lpc::{bandwidth_expand, levinson_durbin, levinson_durbin_with_prefix, HybridWindow};
use super::tables::{
    GAIN_DECAY, GAIN_EXPANSION, GAIN_WINDOW, GOFF, LPC, LPCLG, LPCW, NFRSZ, NONR, NONRLG, NONRW,
    NUPDATE, SPORDER, SYNTHESIS_DECAY, SYNTHESIS_EXPANSION, SYNTHESIS_WINDOW, WEIGHTING_DECAY,
    WEIGHTING_POLE_EXPANSION, WEIGHTING_WINDOW, WEIGHTING_ZERO_EXPANSION,
};

/// Synthesis filter polynomial `1 + a1 z^-1 + ... + a50 z^-50`
pub type SynthesisCoeffs = [f32; LPC + 1];

/// Log-gain predictor polynomial
pub type GainCoeffs = [f32; LPCLG + 1];

/// All-pass synthesis filter
pub const fn all_pass_synthesis() -> SynthesisCoeffs {
    let mut c = [0.0; LPC + 1];
    c[0] = 1.0;
    c
}

/// Initial gain predictor: repeat the previous log-gain
pub const fn initial_gain_coeffs() -> GainCoeffs {
    let mut c = [0.0; LPCLG + 1];
    c[0] = 1.0;
    c[1] = -1.0;
    c
}

/// Perceptual weighting filter `A(z/0.9) / A(z/0.6)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingCoeffs {
    /// Numerator polynomial
    pub zeros: [f32; LPCW + 1],
    /// Denominator polynomial
    pub poles: [f32; LPCW + 1],
}

impl WeightingCoeffs {
    /// Unity weighting
    pub const IDENTITY: Self = {
        let mut zeros = [0.0; LPCW + 1];
        zeros[0] = 1.0;
        Self { zeros, poles: zeros }
    };
}

impl Default for WeightingCoeffs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Committed coefficients plus an optional staged replacement
#[derive(Debug, Clone, PartialEq)]
pub struct CoeffSlot<T> {
    committed: T,
    pending: Option<T>,
}

impl<T> CoeffSlot<T> {
    /// Slot with `initial` committed and nothing staged
    pub fn new(initial: T) -> Self {
        Self {
            committed: initial,
            pending: None,
        }
    }

    /// Coefficients in use
    pub fn current(&self) -> &T {
        &self.committed
    }

    /// Staged coefficients, if any
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Stage a replacement, superseding any earlier staged value
    pub fn stage(&mut self, next: T) {
        self.pending = Some(next);
    }

    /// Promote the staged value; returns whether anything changed hands
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(next) => {
                self.committed = next;
                true
            }
            None => false,
        }
    }
}

/// Position of a vector within its frame, 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase(u8);

impl Phase {
    /// Phase of the first vector of a session
    pub const FIRST: Self = Self(1);

    /// Phase of the following vector
    pub fn next(self) -> Self {
        if self.0 as usize == NUPDATE {
            Self::FIRST
        } else {
            Self(self.0 + 1)
        }
    }

    /// Numeric value
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Work performed after a vector completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdaptAction {
    /// Run the synthesis adapter over the last frame of synthesized speech
    /// and stage the result
    ComputeSynthesis,
    /// Run the gain adapter and commit immediately
    AdaptGain,
    /// Commit staged synthesis coefficients
    CommitSynthesis,
    /// Run the weighting adapter over the last frame of input and commit
    AdaptWeighting,
    /// Recompute the impulse response and codeword energies
    RefreshCodebook,
}

impl AdaptAction {
    /// Whether only the encoder performs this action
    pub fn encoder_only(self) -> bool {
        matches!(self, Self::AdaptWeighting | Self::RefreshCodebook)
    }
}

/// Adaptation schedule, keyed by the phase reached after a vector completes
pub fn scheduled_actions(phase: Phase) -> &'static [AdaptAction] {
    match phase.get() {
        1 => &[AdaptAction::ComputeSynthesis],
        2 => &[AdaptAction::AdaptGain],
        3 => &[
            AdaptAction::CommitSynthesis,
            AdaptAction::AdaptWeighting,
            AdaptAction::RefreshCodebook,
        ],
        _ => &[],
    }
}

/// Synthesis adapter output
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisUpdate {
    /// Bandwidth-expanded order-50 coefficients
    pub coeffs: SynthesisCoeffs,
    /// Unexpanded order-10 prefix for the postfilter
    pub lpc10: [f32; SPORDER + 1],
    /// First reflection coefficient
    pub first_reflection: f32,
}

/// Order-50 adapter over synthesized speech
#[derive(Debug, Clone)]
pub struct SynthesisAdapter {
    window: HybridWindow,
}

impl SynthesisAdapter {
    /// Create an adapter with empty history
    pub fn new() -> Self {
        Self {
            window: HybridWindow::new(LPC, NFRSZ, NONR, &SYNTHESIS_WINDOW, SYNTHESIS_DECAY, 0.0),
        }
    }

    /// Analyze one frame; `None` keeps the previous coefficients
    pub fn adapt(&mut self, frame: &[f32]) -> Option<SynthesisUpdate> {
        let autocorr = self.window.update(frame);
        let Some(lpc) = levinson_durbin_with_prefix(&autocorr, LPC, SPORDER) else {
            trace!("synthesis adapter: ill-conditioned frame, keeping coefficients");
            return None;
        };

        let mut coeffs = [0.0; LPC + 1];
        bandwidth_expand(&lpc.coeffs, &SYNTHESIS_EXPANSION[..], &mut coeffs);

        let mut lpc10 = [0.0; SPORDER + 1];
        if let Some(prefix) = &lpc.prefix {
            lpc10.copy_from_slice(prefix);
        }

        Some(SynthesisUpdate {
            coeffs,
            lpc10,
            first_reflection: lpc.first_reflection(),
        })
    }
}

impl Default for SynthesisAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-10 adapter over input speech
#[derive(Debug, Clone)]
pub struct WeightingAdapter {
    window: HybridWindow,
}

impl WeightingAdapter {
    /// Create an adapter with empty history
    pub fn new() -> Self {
        Self {
            window: HybridWindow::new(LPCW, NFRSZ, NONRW, &WEIGHTING_WINDOW, WEIGHTING_DECAY, 0.0),
        }
    }

    /// Analyze one frame; `None` keeps the previous coefficients
    pub fn adapt(&mut self, frame: &[f32]) -> Option<WeightingCoeffs> {
        let autocorr = self.window.update(frame);
        let Some(lpc) = levinson_durbin(&autocorr, LPCW) else {
            trace!("weighting adapter: ill-conditioned frame, keeping coefficients");
            return None;
        };

        let mut weighting = WeightingCoeffs::IDENTITY;
        bandwidth_expand(&lpc.coeffs, &WEIGHTING_ZERO_EXPANSION[..], &mut weighting.zeros);
        bandwidth_expand(&lpc.coeffs, &WEIGHTING_POLE_EXPANSION[..], &mut weighting.poles);
        Some(weighting)
    }
}

impl Default for WeightingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Order-10 adapter over the log-gain history
#[derive(Debug, Clone)]
pub struct GainAdapter {
    window: HybridWindow,
}

impl GainAdapter {
    /// Create an adapter whose history starts at the log-gain offset
    pub fn new() -> Self {
        Self {
            window: HybridWindow::new(LPCLG, NUPDATE, NONRLG, &GAIN_WINDOW, GAIN_DECAY, -GOFF),
        }
    }

    /// Analyze the latest log-gains; `None` keeps the previous coefficients
    pub fn adapt(&mut self, log_gains: &[f32]) -> Option<GainCoeffs> {
        let autocorr = self.window.update(log_gains);
        let Some(lpc) = levinson_durbin(&autocorr, LPCLG) else {
            trace!("gain adapter: ill-conditioned frame, keeping coefficients");
            return None;
        };

        let mut coeffs = initial_gain_coeffs();
        bandwidth_expand(&lpc.coeffs, &GAIN_EXPANSION, &mut coeffs);
        Some(coeffs)
    }
}

impl Default for GainAdapter {
    fn default() -> Self {
        Self::new()
    }
}
