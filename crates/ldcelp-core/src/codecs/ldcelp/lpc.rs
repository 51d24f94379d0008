//! Linear prediction core
//!
//! Hybrid-window autocorrelation, Levinson-Durbin recursion and bandwidth
//! expansion. These are shared by all three backward adapters.

use super::tables::WNCF;

/// Autocorrelation `r[lag] = sum x[n] * x[n - lag]` for `n` in `from..to`
fn autocorrelation(x: &[f32], out: &mut [f32], from: usize, to: usize) {
    for (lag, r) in out.iter_mut().enumerate() {
        *r = x[from..to]
            .iter()
            .zip(&x[from - lag..to - lag])
            .map(|(a, b)| a * b)
            .sum();
    }
}

/// Hybrid-window autocorrelation
///
/// Shifts `new_frame` into `history`, windows the whole history, decays and
/// accumulates the recursive span into `recursive`, then adds the
/// autocorrelation of the most recent `nonrecursive_size` samples. The lag-0
/// term is scaled by the white noise correction factor.
///
/// `history` and `window` hold `order + frame_size + nonrecursive_size`
/// samples; `recursive` and the returned vector hold `order + 1` lags.
pub fn hybrid_window(
    order: usize,
    frame_size: usize,
    nonrecursive_size: usize,
    history: &mut [f32],
    new_frame: &[f32],
    window: &[f32],
    recursive: &mut [f32],
    decay: f32,
) -> Vec<f32> {
    let recent_end = order + frame_size;
    let total = order + frame_size + nonrecursive_size;
    debug_assert_eq!(history.len(), total);
    debug_assert_eq!(window.len(), total);
    debug_assert_eq!(new_frame.len(), frame_size);
    debug_assert_eq!(recursive.len(), order + 1);

    history.copy_within(frame_size.., 0);
    history[total - frame_size..].copy_from_slice(new_frame);

    let windowed: Vec<f32> = history.iter().zip(window).map(|(x, w)| x * w).collect();

    let mut span = vec![0.0; order + 1];
    autocorrelation(&windowed, &mut span, order, recent_end);
    for (rec, r) in recursive.iter_mut().zip(&span) {
        *rec = decay * *rec + r;
    }

    autocorrelation(&windowed, &mut span, recent_end, total);
    let mut out: Vec<f32> = recursive.iter().zip(&span).map(|(a, b)| a + b).collect();
    out[0] *= WNCF;
    out
}

/// Stateful hybrid window owning its history and recursive accumulator
#[derive(Debug, Clone)]
pub struct HybridWindow {
    order: usize,
    frame_size: usize,
    nonrecursive_size: usize,
    window: &'static [f32],
    decay: f32,
    history: Vec<f32>,
    recursive: Vec<f32>,
}

impl HybridWindow {
    /// Create a window; the history starts filled with `initial`
    pub fn new(
        order: usize,
        frame_size: usize,
        nonrecursive_size: usize,
        window: &'static [f32],
        decay: f32,
        initial: f32,
    ) -> Self {
        assert_eq!(window.len(), order + frame_size + nonrecursive_size);
        Self {
            order,
            frame_size,
            nonrecursive_size,
            window,
            decay,
            history: vec![initial; window.len()],
            recursive: vec![0.0; order + 1],
        }
    }

    /// Analysis order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Shift in one frame and return the windowed autocorrelation
    pub fn update(&mut self, frame: &[f32]) -> Vec<f32> {
        hybrid_window(
            self.order,
            self.frame_size,
            self.nonrecursive_size,
            &mut self.history,
            frame,
            self.window,
            &mut self.recursive,
            self.decay,
        )
    }
}

/// Successful Levinson-Durbin solution
#[derive(Debug, Clone, PartialEq)]
pub struct LpcSolution {
    /// Predictor polynomial `1 + a1 z^-1 + ...`, `coeffs[0] == 1`
    pub coeffs: Vec<f32>,
    /// Reflection coefficient of every recursion step
    pub reflection: Vec<f32>,
    /// Residual energy after every recursion step
    pub energies: Vec<f32>,
    /// Order-`prefix_order` polynomial captured mid-recursion, if requested
    pub prefix: Option<Vec<f32>>,
}

impl LpcSolution {
    /// First-order reflection coefficient
    pub fn first_reflection(&self) -> f32 {
        self.reflection[0]
    }
}

/// Levinson-Durbin recursion
///
/// Returns `None` when the autocorrelation is degenerate: lag-0 energy is not
/// positive, the highest lag is exactly zero, or the residual energy becomes
/// non-positive at some order. Callers keep their previous coefficients then.
pub fn levinson_durbin(autocorr: &[f32], order: usize) -> Option<LpcSolution> {
    recursion(autocorr, order, None)
}

/// Levinson-Durbin recursion that also captures the order-`prefix_order`
/// polynomial on the way to the full order
pub fn levinson_durbin_with_prefix(
    autocorr: &[f32],
    order: usize,
    prefix_order: usize,
) -> Option<LpcSolution> {
    recursion(autocorr, order, Some(prefix_order))
}

fn recursion(autocorr: &[f32], order: usize, prefix_order: Option<usize>) -> Option<LpcSolution> {
    debug_assert!(autocorr.len() > order);

    if autocorr[0] <= 0.0 || autocorr[order] == 0.0 {
        return None;
    }

    let mut a = vec![0.0f32; order + 1];
    a[0] = 1.0;
    let mut reflection = Vec::with_capacity(order);
    let mut energies = Vec::with_capacity(order);
    let mut prefix = None;
    let mut error = autocorr[0];

    for m in 1..=order {
        let acc = autocorr[m]
            + (1..m).map(|i| a[i] * autocorr[m - i]).sum::<f32>();
        let k = -acc / error;

        for i in 1..=m / 2 {
            let (lo, hi) = (a[i], a[m - i]);
            a[i] = lo + k * hi;
            a[m - i] = hi + k * lo;
        }
        a[m] = k;

        error += k * acc;
        reflection.push(k);
        energies.push(error);

        if error <= 0.0 {
            return None;
        }
        if prefix_order == Some(m) {
            prefix = Some(a[..=m].to_vec());
        }
    }

    Some(LpcSolution {
        coeffs: a,
        reflection,
        energies,
        prefix,
    })
}

/// Multiply coefficient `i` by `decay[i]`
pub fn bandwidth_expand(coeffs: &[f32], decay: &[f32], out: &mut [f32]) {
    for ((o, c), d) in out.iter_mut().zip(coeffs).zip(decay) {
        *o = c * d;
    }
}
