//! Filter memories
//!
//! The synthesis filter `1/A(z)` is cascaded with the perceptual weighting
//! filter `W(z)`. Per vector the encoder first takes the cascade's ringing
//! (zero input response), then adds the zero state response of the chosen
//! excitation back into the memories. Memories are kept newest first.

use super::adapter::{SynthesisCoeffs, WeightingCoeffs};
use super::tables::{IDIM, LPC, LPCW, SYNTH_CLAMP};

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Zero state response of the synthesis filter and of the weighted cascade
/// to `excitation`, both chronological
pub fn zero_state_response(
    excitation: &[f32; IDIM],
    synthesis: &SynthesisCoeffs,
    weighting: &WeightingCoeffs,
) -> ([f32; IDIM], [f32; IDIM]) {
    let mut synth = [0.0f32; IDIM];
    let mut weighted = [0.0f32; IDIM];

    for n in 0..IDIM {
        let mut s = excitation[n];
        for i in 1..=n {
            s -= synthesis[i] * synth[n - i];
        }
        let mut w = s;
        for i in 1..=n {
            w += weighting.zeros[i] * synth[n - i] - weighting.poles[i] * weighted[n - i];
        }
        synth[n] = s;
        weighted[n] = w;
    }

    (synth, weighted)
}

/// Impulse response of the weighted synthesis cascade over one vector
pub fn impulse_response(synthesis: &SynthesisCoeffs, weighting: &WeightingCoeffs) -> [f32; IDIM] {
    let mut impulse = [0.0; IDIM];
    impulse[0] = 1.0;
    zero_state_response(&impulse, synthesis, weighting).1
}

/// Memories of the synthesis and weighting cascade
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Synthesized speech, newest first; the head `IDIM` entries hold the
    /// vector in progress
    synth: [f32; LPC + IDIM],
    /// Weighting filter input history, newest first
    weight_fir: [f32; LPCW],
    /// Weighting filter output history, newest first
    weight_iir: [f32; LPCW],
}

impl FilterState {
    /// Silent memories
    pub fn new() -> Self {
        Self {
            synth: [0.0; LPC + IDIM],
            weight_fir: [0.0; LPCW],
            weight_iir: [0.0; LPCW],
        }
    }

    /// Ring the cascade for one vector with no excitation
    ///
    /// Returns the weighted ringing in chronological order. The synthesis
    /// ringing is left in the memory head for [`FilterState::update`].
    pub fn zero_response(
        &mut self,
        synthesis: &SynthesisCoeffs,
        weighting: &WeightingCoeffs,
    ) -> [f32; IDIM] {
        self.synth.copy_within(..LPC, IDIM);
        for k in 0..IDIM {
            let slot = IDIM - 1 - k;
            self.synth[slot] = -dot(&synthesis[1..], &self.synth[slot + 1..slot + 1 + LPC]);
        }

        let mut out = [0.0; IDIM];
        for k in 0..IDIM {
            let x = self.synth[IDIM - 1 - k];
            let y = x + dot(&weighting.zeros[1..], &self.weight_fir)
                - dot(&weighting.poles[1..], &self.weight_iir);
            self.weight_fir.copy_within(..LPCW - 1, 1);
            self.weight_fir[0] = x;
            self.weight_iir.copy_within(..LPCW - 1, 1);
            self.weight_iir[0] = y;
            out[k] = y;
        }
        out
    }

    /// Add the zero state response of `excitation` to the memories
    ///
    /// Synthesis memory is saturated to `±4095`. Returns the synthesized
    /// vector in chronological order.
    pub fn update(
        &mut self,
        excitation: &[f32; IDIM],
        synthesis: &SynthesisCoeffs,
        weighting: &WeightingCoeffs,
    ) -> [f32; IDIM] {
        let (synth, weighted) = zero_state_response(excitation, synthesis, weighting);

        for k in 0..IDIM {
            let n = IDIM - 1 - k;
            self.synth[k] = (self.synth[k] + synth[n]).clamp(-SYNTH_CLAMP, SYNTH_CLAMP);
            self.weight_iir[k] += weighted[n];
        }
        self.weight_fir.copy_from_slice(&self.synth[..LPCW]);

        let mut out = [0.0; IDIM];
        for (n, o) in out.iter_mut().enumerate() {
            *o = self.synth[IDIM - 1 - n];
        }
        out
    }

    /// Synthesis memory, newest first
    pub fn synthesis_memory(&self) -> &[f32] {
        &self.synth
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighting filter applied to the encoder input
#[derive(Debug, Clone, Default)]
pub struct WeightingFilter {
    /// Input history, newest first
    fir: [f32; LPCW],
    /// Output history, newest first
    iir: [f32; LPCW],
}

impl WeightingFilter {
    /// Silent filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one input vector
    pub fn process(&mut self, input: &[f32; IDIM], weighting: &WeightingCoeffs) -> [f32; IDIM] {
        let mut out = [0.0; IDIM];
        for (x, o) in input.iter().zip(out.iter_mut()) {
            let y = x + dot(&weighting.zeros[1..], &self.fir) - dot(&weighting.poles[1..], &self.iir);
            self.fir.copy_within(..LPCW - 1, 1);
            self.fir[0] = *x;
            self.iir.copy_within(..LPCW - 1, 1);
            self.iir[0] = y;
            *o = y;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::ldcelp::adapter::all_pass_synthesis;

    fn first_order(a1: f32) -> SynthesisCoeffs {
        let mut c = all_pass_synthesis();
        c[1] = a1;
        c
    }

    /// Direct-form reference: s[n] = e[n] - a1 s[n-1]
    fn reference_synthesis(excitation: &[f32], a1: f32) -> Vec<f32> {
        let mut prev = 0.0;
        excitation
            .iter()
            .map(|e| {
                prev = e - a1 * prev;
                prev
            })
            .collect()
    }

    #[test]
    fn test_ringing_plus_update_matches_direct_form() {
        let coeffs = first_order(-0.9);
        let mut state = FilterState::new();
        let excitation: Vec<f32> = (0..20).map(|n| if n % 7 == 0 { 10.0 } else { -1.0 }).collect();
        let expected = reference_synthesis(&excitation, -0.9);

        let mut produced = Vec::new();
        for chunk in excitation.chunks_exact(IDIM) {
            let mut e = [0.0; IDIM];
            e.copy_from_slice(chunk);
            state.zero_response(&coeffs, &WeightingCoeffs::IDENTITY);
            produced.extend(state.update(&e, &coeffs, &WeightingCoeffs::IDENTITY));
        }

        for (p, e) in produced.iter().zip(&expected) {
            assert!((p - e).abs() < 1e-4, "{} vs {}", p, e);
        }
    }

    #[test]
    fn test_weighted_ringing_matches_input_filter() {
        // Weighting the synthesized signal directly must agree with the
        // cascade's weighted ringing + zero state split.
        let coeffs = first_order(-0.5);
        let mut weighting = WeightingCoeffs::IDENTITY;
        weighting.zeros[1] = -0.3;
        weighting.poles[1] = -0.2;

        let mut state = FilterState::new();
        let mut direct = WeightingFilter::new();
        for v in 0..4 {
            let e = [1.0 + v as f32, -2.0, 0.5, 0.0, 3.0];
            let ringing = state.zero_response(&coeffs, &weighting);
            let (_, forced) = zero_state_response(&e, &coeffs, &weighting);
            let synth = state.update(&e, &coeffs, &weighting);
            let weighted = direct.process(&synth, &weighting);
            for k in 0..IDIM {
                assert!((ringing[k] + forced[k] - weighted[k]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_synthesis_memory_saturates() {
        let coeffs = first_order(-1.0);
        let mut state = FilterState::new();
        for _ in 0..10 {
            state.zero_response(&coeffs, &WeightingCoeffs::IDENTITY);
            state.update(&[1000.0; IDIM], &coeffs, &WeightingCoeffs::IDENTITY);
        }
        assert!(state.synthesis_memory().iter().all(|s| s.abs() <= SYNTH_CLAMP));
        assert_eq!(state.synthesis_memory()[0], SYNTH_CLAMP);
    }

    #[test]
    fn test_impulse_response_of_identity() {
        let h = impulse_response(&all_pass_synthesis(), &WeightingCoeffs::IDENTITY);
        assert_eq!(h, [1.0, 0.0, 0.0, 0.0, 0.0]);

        let h = impulse_response(&first_order(-0.5), &WeightingCoeffs::IDENTITY);
        assert_eq!(h, [1.0, 0.5, 0.25, 0.125, 0.0625]);
    }
}
