//! Adaptive postfilter
//!
//! Decoder-side enhancement: a long-term (pitch) comb filter, a short-term
//! pole-zero filter built from the order-10 synthesis prefix with a spectral
//! tilt term, and an AGC that keeps the output level at the input level.
//!
//! Pitch is tracked on the LPC residual of the decoded speech: the residual
//! is lowpassed and decimated by 4 for a coarse search, refined at full rate,
//! checked against its submultiples, and biased toward the previous period
//! to avoid octave jumps.

use super::ring::RingBuffer;
use super::tables::{
    AGCFAC, DECIM, DECIMATION_A, DECIMATION_B, DPERMAX, DPERMIN, EPSILON, IDIM, KPDELTA, KPMAX,
    KPMIN, NFRSZ, NPWSZ, PDMSIZE, PMSIZE, POSTFILTER_POLE_SCALE, POSTFILTER_ZERO_SCALE, PPFTH,
    PPFZCF, SPORDER, SUBMULTIPLE_TH, TAPTH, TILTF,
};

/// Decimated samples produced per frame
const DECIMATED_FRAME: usize = NFRSZ / DECIM;

/// Decoded speech kept for the pitch tap computation
const TAP_HISTORY: usize = KPMAX + NPWSZ + IDIM;

/// Frames needed to fill the residual history
const WARMUP_FRAMES: usize = PMSIZE / NFRSZ;

/// Lags searched on each side of a submultiple period
const SUBMULTIPLE_SPREAD: usize = DECIM / 2;

/// Normalized correlation of two windows, `None` when either is silent
fn normalized(corr: f32, energy: f32, lagged_energy: f32) -> Option<f32> {
    let denom = energy.sqrt() * lagged_energy.sqrt();
    if denom < EPSILON {
        None
    } else {
        Some(corr / denom)
    }
}

/// Correlation of the newest `NPWSZ` samples against the window `lag` back
#[derive(Debug, Clone, Copy)]
struct LagScore {
    lag: usize,
    corr: f32,
    /// Energy of the lagged window
    lagged_energy: f32,
    score: f32,
}

impl LagScore {
    fn measure(residual: &[f32], lag: usize) -> Option<Self> {
        let end = residual.len();
        let recent = &residual[end - NPWSZ..];
        let lagged = &residual[end - NPWSZ - lag..end - lag];

        let corr: f32 = recent.iter().zip(lagged).map(|(a, b)| a * b).sum();
        let energy: f32 = recent.iter().map(|x| x * x).sum();
        let lagged_energy: f32 = lagged.iter().map(|x| x * x).sum();
        normalized(corr, energy, lagged_energy).map(|score| Self {
            lag,
            corr,
            lagged_energy,
            score,
        })
    }

    /// Optimal one-tap predictor coefficient, clamped to `[0, 1]`
    fn tap(&self) -> f32 {
        if self.lagged_energy < EPSILON {
            0.0
        } else {
            (self.corr / self.lagged_energy).clamp(0.0, 1.0)
        }
    }
}

/// Lag with the largest normalized correlation, first one wins ties
fn best_lag(residual: &[f32], lags: std::ops::RangeInclusive<usize>) -> Option<LagScore> {
    lags.filter_map(|lag| LagScore::measure(residual, lag))
        .fold(None, |best: Option<LagScore>, candidate| match best {
            Some(b) if candidate.score <= b.score => Some(b),
            _ => Some(candidate),
        })
}

/// Pitch period tracker over the LPC residual
#[derive(Debug, Clone)]
pub struct PitchExtractor {
    /// Full-rate residual history
    residual: RingBuffer,
    /// Lowpass filter memory, oldest first
    lowpass: [f32; 3],
    /// Decimated residual, oldest first
    decimated: [f32; PDMSIZE],
    /// Period chosen on the previous frame
    previous: usize,
    /// Frames that carried enough signal to estimate a period
    informed_frames: usize,
}

impl PitchExtractor {
    /// Tracker with silent history
    pub fn new() -> Self {
        Self {
            residual: RingBuffer::new(PMSIZE),
            lowpass: [0.0; 3],
            decimated: [0.0; PDMSIZE],
            previous: (KPMIN + KPMAX) / 2,
            informed_frames: 0,
        }
    }

    /// Append one vector of residual
    pub fn push_residual(&mut self, residual: &[f32; IDIM]) {
        self.residual.write_vector(residual);
    }

    /// Period the next jump is checked against, settled once the history
    /// has filled
    pub fn previous_period(&self) -> usize {
        self.previous
    }

    /// Lowpass and decimate the newest frame into the decimated history
    fn decimate(&mut self, frame: &[f32]) {
        self.decimated.copy_within(DECIMATED_FRAME.., 0);
        let [a1, a2, a3] = DECIMATION_A;
        let [b0, b1, b2, b3] = DECIMATION_B;
        let mut produced = 0;
        for (k, x) in frame.iter().enumerate() {
            let [m0, m1, m2] = self.lowpass;
            let tmp = x - a1 * m2 - a2 * m1 - a3 * m0;
            if (k + 1) % DECIM == 0 {
                self.decimated[PDMSIZE - DECIMATED_FRAME + produced] =
                    b0 * tmp + b1 * m2 + b2 * m1 + b3 * m0;
                produced += 1;
            }
            self.lowpass = [m1, m2, tmp];
        }
    }

    /// Decimated lag with the largest normalized correlation
    fn coarse_period(&self) -> usize {
        let d = &self.decimated;
        let mut best = (DPERMIN, f32::NEG_INFINITY);
        for per in DPERMIN..=DPERMAX {
            let (mut corr, mut energy, mut lagged) = (0.0f32, 0.0f32, 0.0f32);
            for i in per..PDMSIZE {
                corr += d[i] * d[i - per];
                energy += d[i] * d[i];
                lagged += d[i - per] * d[i - per];
            }
            if let Some(score) = normalized(corr, energy, lagged) {
                if score > best.1 {
                    best = (per, score);
                }
            }
        }
        best.0
    }

    /// Estimate the pitch period from the latest frame of residual
    ///
    /// A frame whose newest window is silent keeps the previous period.
    pub fn extract(&mut self) -> usize {
        let residual = self.residual.read_window(PMSIZE, 0);
        self.decimate(&residual[PMSIZE - NFRSZ..]);

        // Refine at full rate around the coarse lag and its neighbours
        let dper = self.coarse_period();
        let lo = (DECIM * (dper - 1)).max(KPMIN);
        let hi = (DECIM * (dper + 1)).min(KPMAX);
        let Some(mut best) = best_lag(&residual, lo..=hi) else {
            return self.previous;
        };

        // Fall back to the shortest submultiple that correlates nearly as well
        for divisor in (2..=best.lag / KPMIN).rev() {
            let centre = best.lag / divisor;
            let lags = centre.saturating_sub(SUBMULTIPLE_SPREAD).max(KPMIN)
                ..=(centre + SUBMULTIPLE_SPREAD).min(KPMAX);
            if let Some(candidate) = best_lag(&residual, lags) {
                if candidate.score > 0.0 && candidate.score >= SUBMULTIPLE_TH * best.score {
                    best = candidate;
                    break;
                }
            }
        }

        if self.informed_frames < WARMUP_FRAMES {
            self.informed_frames += 1;
            return best.lag;
        }

        // Resist jumps well above the previous period
        let old_hi = self.previous + KPDELTA;
        if best.lag > old_hi {
            let old_lo = self.previous.saturating_sub(KPDELTA).max(KPMIN);
            if let Some(old) = best_lag(&residual, old_lo..=old_hi) {
                if old.tap() > TAPTH * best.tap() {
                    best = old;
                }
            }
        }

        self.previous = best.lag;
        best.lag
    }
}

impl Default for PitchExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder postfilter state
#[derive(Debug, Clone)]
pub struct Postfilter {
    /// Order-10 LPC prefix from the synthesis adapter
    lpc10: [f32; SPORDER + 1],
    /// First reflection coefficient from the synthesis adapter
    first_reflection: f32,

    /// Inverse filter input memory, oldest first
    inverse_memory: [f32; SPORDER],
    pitch: PitchExtractor,
    /// Decoded speech for the pitch tap
    speech: RingBuffer,

    pitch_period: usize,
    pitch_tap: f32,
    pitch_gain: f32,
    /// Long-term filter input memory, oldest first
    long_memory: [f32; KPMAX],

    zero_coeffs: [f32; SPORDER + 1],
    pole_coeffs: [f32; SPORDER + 1],
    tilt: f32,
    /// Short-term FIR memory, newest first
    short_zero_memory: [f32; SPORDER],
    /// Short-term IIR memory, newest first
    short_pole_memory: [f32; SPORDER],

    /// Smoothed AGC scale
    agc_scale: f32,
}

impl Postfilter {
    /// Transparent postfilter
    pub fn new() -> Self {
        let mut lpc10 = [0.0; SPORDER + 1];
        lpc10[0] = 1.0;
        Self {
            lpc10,
            first_reflection: 0.0,
            inverse_memory: [0.0; SPORDER],
            pitch: PitchExtractor::new(),
            speech: RingBuffer::new(TAP_HISTORY),
            pitch_period: 50,
            pitch_tap: 0.0,
            pitch_gain: 1.0,
            long_memory: [0.0; KPMAX],
            zero_coeffs: [0.0; SPORDER + 1],
            pole_coeffs: [0.0; SPORDER + 1],
            tilt: 0.0,
            short_zero_memory: [0.0; SPORDER],
            short_pole_memory: [0.0; SPORDER],
            agc_scale: 1.0,
        }
    }

    /// Accept fresh analysis results from the synthesis adapter
    pub fn set_synthesis_analysis(&mut self, lpc10: &[f32; SPORDER + 1], first_reflection: f32) {
        self.lpc10 = *lpc10;
        self.first_reflection = first_reflection;
    }

    /// LPC-inverse filter a decoded vector into the pitch tracker
    pub fn analyze(&mut self, speech: &[f32; IDIM]) {
        let mut residual = [0.0; IDIM];
        for (k, r) in residual.iter_mut().enumerate() {
            let mut acc = speech[k];
            for j in 1..=SPORDER {
                let past = if j <= k {
                    speech[k - j]
                } else {
                    self.inverse_memory[SPORDER + k - j]
                };
                acc += past * self.lpc10[j];
            }
            *r = acc;
        }
        self.inverse_memory.copy_within(IDIM.., 0);
        self.inverse_memory[SPORDER - IDIM..].copy_from_slice(speech);

        self.pitch.push_residual(&residual);
        self.speech.write_vector(speech);
    }

    /// Re-estimate pitch period and tap from the latest frame
    pub fn adapt_pitch(&mut self) {
        self.pitch_period = self.pitch.extract();

        let history = self.speech.read_window(TAP_HISTORY, 0);
        let start = KPMAX - self.pitch_period;
        let mut corr = 0.0f32;
        let mut corr_per = 0.0f32;
        for i in start..start + NPWSZ {
            corr += history[i] * history[i];
            corr_per += history[i] * history[i + self.pitch_period];
        }

        let tap = if corr.abs() < EPSILON {
            0.0
        } else {
            (corr_per / corr).min(1.0)
        };
        let tap = if tap < PPFTH { 0.0 } else { tap };
        self.pitch_tap = PPFZCF * tap;
        self.pitch_gain = 1.0 / (1.0 + self.pitch_tap);
    }

    /// Rebuild the short-term filter from the latest analysis
    pub fn refresh_short_term(&mut self) {
        for i in 1..=SPORDER {
            self.zero_coeffs[i] = POSTFILTER_ZERO_SCALE[i] * self.lpc10[i];
            self.pole_coeffs[i] = POSTFILTER_POLE_SCALE[i] * self.lpc10[i];
        }
        self.tilt = TILTF * self.first_reflection;
    }

    /// Current pitch period
    pub fn pitch_period(&self) -> usize {
        self.pitch_period
    }

    /// Current long-term tap, already scaled
    pub fn pitch_tap(&self) -> f32 {
        self.pitch_tap
    }

    fn long_term(&mut self, input: &[f32; IDIM]) -> [f32; IDIM] {
        let mut out = [0.0; IDIM];
        for (i, o) in out.iter_mut().enumerate() {
            let delayed = self.long_memory[KPMAX + i - self.pitch_period];
            *o = self.pitch_gain * (input[i] + self.pitch_tap * delayed);
        }
        self.long_memory.copy_within(IDIM.., 0);
        self.long_memory[KPMAX - IDIM..].copy_from_slice(input);
        out
    }

    fn short_term(&mut self, input: &[f32; IDIM]) -> [f32; IDIM] {
        let mut out = [0.0; IDIM];
        for (x, o) in input.iter().zip(out.iter_mut()) {
            let mut y = *x;
            for j in 0..SPORDER {
                y += self.short_zero_memory[j] * self.zero_coeffs[j + 1];
            }
            self.short_zero_memory.copy_within(..SPORDER - 1, 1);
            self.short_zero_memory[0] = *x;

            for j in 0..SPORDER {
                y -= self.short_pole_memory[j] * self.pole_coeffs[j + 1];
            }
            self.short_pole_memory.copy_within(..SPORDER - 1, 1);
            self.short_pole_memory[0] = y;

            *o = y + self.tilt * self.short_pole_memory[1];
        }
        out
    }

    /// Filter one decoded vector
    pub fn process(&mut self, input: &[f32; IDIM]) -> [f32; IDIM] {
        let long = self.long_term(input);
        let filtered = self.short_term(&long);

        let filtered_level: f32 = filtered.iter().map(|x| x.abs()).sum();
        let scale = if filtered_level > 1.0 {
            input.iter().map(|x| x.abs()).sum::<f32>() / filtered_level
        } else {
            1.0
        };

        let mut out = [0.0; IDIM];
        for (o, f) in out.iter_mut().zip(&filtered) {
            self.agc_scale = AGCFAC * self.agc_scale + (1.0 - AGCFAC) * scale;
            *o = self.agc_scale * f;
        }
        out
    }
}

impl Default for Postfilter {
    fn default() -> Self {
        Self::new()
    }
}
