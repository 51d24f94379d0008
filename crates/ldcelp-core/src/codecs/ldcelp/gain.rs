//! Backward log-gain prediction

use super::adapter::GainCoeffs;
use super::tables::{GOFF, IDIM, LPCLG, MAX_GAIN_DB};

/// Log-RMS of a vector in dB, with the mean square floored at 1
pub fn log_rms(vector: &[f32; IDIM]) -> f32 {
    let mean_square = vector.iter().map(|x| x * x).sum::<f32>() / IDIM as f32;
    10.0 * mean_square.max(1.0).log10()
}

/// Ten-tap log-gain history and predictor
#[derive(Debug, Clone)]
pub struct GainPredictor {
    /// Offset-removed log-gains, oldest first
    history: [f32; LPCLG],
}

impl GainPredictor {
    /// Predictor whose history sits at the offset (0 dB excitation)
    pub fn new() -> Self {
        Self {
            history: [-GOFF; LPCLG],
        }
    }

    /// Linear excitation gain for the next vector, in `[1, 1000]`
    pub fn predict_gain(&self, coeffs: &GainCoeffs) -> f32 {
        let db = self
            .history
            .iter()
            .rev()
            .zip(&coeffs[1..])
            .fold(GOFF, |acc, (g, c)| acc - c * g);
        10f32.powf(0.05 * db.clamp(0.0, MAX_GAIN_DB))
    }

    /// Push the offset-removed log-gain of a reconstructed excitation
    /// vector and return it
    pub fn update_gain(&mut self, excitation: &[f32; IDIM]) -> f32 {
        let log_gain = log_rms(excitation) - GOFF;
        self.history.copy_within(1.., 0);
        self.history[LPCLG - 1] = log_gain;
        log_gain
    }

    /// History, oldest first
    pub fn history(&self) -> &[f32; LPCLG] {
        &self.history
    }
}

impl Default for GainPredictor {
    fn default() -> Self {
        Self::new()
    }
}
