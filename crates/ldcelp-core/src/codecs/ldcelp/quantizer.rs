//! Shape-gain vector quantizer
//!
//! Codewords are searched against the target through the impulse response of
//! the weighted synthesis cascade. The codeword energies through that response
//! are cached and refreshed once per frame.

use std::fmt;

use super::adapter::{SynthesisCoeffs, WeightingCoeffs};
use super::filter::impulse_response;
use super::tables::{
    BIG, CODEBOOK_SHAPES, GAIN_DOUBLED, GAIN_LEVELS, GAIN_MIDPOINTS, GAIN_SQUARED, IDIM, MAX_INDEX,
    NCWD, NG,
};
use crate::error::{CodecError, Result};

/// 10-bit codebook index: shape in the upper 7 bits, gain in the lower 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodebookIndex(u16);

impl CodebookIndex {
    /// Compose from a shape (0..128) and gain (0..8) index
    pub fn new(shape: usize, gain: usize) -> Self {
        debug_assert!(shape < NCWD && gain < NG);
        Self(((shape << 3) | gain) as u16)
    }

    /// Shape codeword index
    pub fn shape(self) -> usize {
        usize::from(self.0 >> 3)
    }

    /// Gain level index
    pub fn gain(self) -> usize {
        usize::from(self.0 & 0x7)
    }

    /// Raw 10-bit value
    pub fn value(self) -> u16 {
        self.0
    }

    /// Unscaled excitation: gain level times shape codeword
    pub fn excitation(self) -> [f32; IDIM] {
        let gain = GAIN_LEVELS[self.gain()];
        CODEBOOK_SHAPES[self.shape()].map(|s| gain * s)
    }
}

impl TryFrom<u16> for CodebookIndex {
    type Error = CodecError;

    fn try_from(value: u16) -> Result<Self> {
        if value > MAX_INDEX {
            return Err(CodecError::InvalidIndex {
                index: value,
                position: None,
            });
        }
        Ok(Self(value))
    }
}

impl From<CodebookIndex> for u16 {
    fn from(index: CodebookIndex) -> Self {
        index.0
    }
}

impl fmt::Display for CodebookIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (shape {}, gain {})", self.0, self.shape(), self.gain())
    }
}

/// Time-reversed convolution `pn[k] = sum_{j>=k} target[j] * h[j-k]`
pub fn time_reversed_convolution(impulse: &[f32; IDIM], target: &[f32; IDIM]) -> [f32; IDIM] {
    let mut out = [0.0; IDIM];
    for (k, o) in out.iter_mut().enumerate() {
        *o = target[k..].iter().zip(impulse).map(|(t, h)| t * h).sum();
    }
    out
}

/// Energy of a codeword after filtering by `impulse`, first `IDIM` outputs
pub fn filtered_energy(impulse: &[f32; IDIM], shape: &[f32; IDIM]) -> f32 {
    (0..IDIM)
        .map(|n| {
            let y: f32 = (0..=n).map(|i| impulse[i] * shape[n - i]).sum();
            y * y
        })
        .sum()
}

/// Distortion of a (shape, gain) pair, up to a target-only constant
pub fn distortion(energy: f32, correlation: f32, gain: usize) -> f32 {
    GAIN_SQUARED[gain] * energy - GAIN_DOUBLED[gain] * correlation
}

/// Codebook search state
#[derive(Debug, Clone)]
pub struct VectorQuantizer {
    impulse: [f32; IDIM],
    energies: [f32; NCWD],
}

impl VectorQuantizer {
    /// Quantizer for a unit impulse response
    pub fn new() -> Self {
        let mut impulse = [0.0; IDIM];
        impulse[0] = 1.0;
        Self::with_impulse_response(impulse)
    }

    /// Quantizer for an arbitrary impulse response
    pub fn with_impulse_response(impulse: [f32; IDIM]) -> Self {
        let mut vq = Self {
            impulse,
            energies: [0.0; NCWD],
        };
        vq.refresh_energies();
        vq
    }

    /// Recompute the impulse response from new filter coefficients
    pub fn refresh(&mut self, synthesis: &SynthesisCoeffs, weighting: &WeightingCoeffs) {
        self.impulse = impulse_response(synthesis, weighting);
        self.refresh_energies();
    }

    fn refresh_energies(&mut self) {
        for (energy, shape) in self.energies.iter_mut().zip(CODEBOOK_SHAPES.iter()) {
            *energy = filtered_energy(&self.impulse, shape);
        }
    }

    /// Current impulse response
    pub fn impulse_response(&self) -> &[f32; IDIM] {
        &self.impulse
    }

    /// Cached codeword energies
    pub fn energies(&self) -> &[f32; NCWD] {
        &self.energies
    }

    /// Correlation of every codeword with a gain-normalized target
    pub fn correlations(&self, target: &[f32; IDIM]) -> [f32; NCWD] {
        let pn = time_reversed_convolution(&self.impulse, target);
        CODEBOOK_SHAPES.map(|shape| shape.iter().zip(&pn).map(|(s, p)| s * p).sum::<f32>())
    }

    /// Best codeword for a gain-normalized target
    ///
    /// The gain level is classified against the energy-scaled midpoints with
    /// strict comparisons; ties between shapes keep the lower shape index.
    pub fn select_codeword(&self, target: &[f32; IDIM]) -> CodebookIndex {
        let correlations = self.correlations(target);

        let mut best = BIG;
        let mut best_index = CodebookIndex::new(0, 0);
        for (shape, (&energy, &cor)) in self.energies.iter().zip(&correlations).enumerate() {
            let (magnitude, mut gain) = if cor < 0.0 { (-cor, 4) } else { (cor, 0) };
            for mid in GAIN_MIDPOINTS {
                if magnitude > mid * energy {
                    gain += 1;
                }
            }

            let d = distortion(energy, cor, gain);
            if d < best {
                best = d;
                best_index = CodebookIndex::new(shape, gain);
            }
        }
        best_index
    }
}

impl Default for VectorQuantizer {
    fn default() -> Self {
        Self::new()
    }
}
