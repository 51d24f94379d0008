//! PCM sample scaling
//!
//! The codec works on samples scaled down from 16-bit PCM. Decoded samples
//! are scaled back, rounded half away from zero and saturated.

use super::tables::{DEFAULT_INPUT_SCALE, IDIM};
use crate::error::Result;
use crate::utils::validation::validate_scale;

/// Conversion between 16-bit PCM and the codec's working scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcmScaler {
    scale: f32,
}

impl PcmScaler {
    /// Scaler with an explicit factor; must be finite and positive
    pub fn new(scale: f32) -> Result<Self> {
        validate_scale(scale)?;
        Ok(Self { scale })
    }

    /// Scale factor applied to encoder input
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// PCM sample to codec scale
    pub fn to_codec(&self, sample: i16) -> f32 {
        f32::from(sample) * self.scale
    }

    /// Codec sample back to saturated PCM
    pub fn to_pcm(&self, sample: f32) -> i16 {
        let value = (sample / self.scale).round();
        // `as` saturates, and NaN maps to zero
        value as i16
    }

    /// Scale one vector of PCM
    pub fn vector_to_codec(&self, pcm: &[i16; IDIM]) -> [f32; IDIM] {
        pcm.map(|s| self.to_codec(s))
    }

    /// Scale one vector back to PCM
    pub fn vector_to_pcm(&self, samples: &[f32; IDIM]) -> [i16; IDIM] {
        samples.map(|s| self.to_pcm(s))
    }
}

impl Default for PcmScaler {
    fn default() -> Self {
        Self {
            scale: DEFAULT_INPUT_SCALE,
        }
    }
}
