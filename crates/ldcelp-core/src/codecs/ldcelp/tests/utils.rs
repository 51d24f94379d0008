//! LD-CELP Test Utilities
//!
//! Signal generators and quality measures shared by the codec suites.

/// Test signal generators
pub mod test_signals {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Sine wave at 8 kHz
    pub fn generate_sine_wave(frequency: f32, len: usize, amplitude: i16) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let t = i as f32 / 8000.0;
                let sample = amplitude as f32 * (2.0 * std::f32::consts::PI * frequency * t).sin();
                sample.round() as i16
            })
            .collect()
    }

    /// Uniform white noise from a fixed seed
    pub fn generate_white_noise(len: usize, amplitude: i16, seed: u64) -> Vec<i16> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen_range(-amplitude..=amplitude)).collect()
    }

    /// Voiced-speech stand-in: a 125 Hz harmonic series under a slow
    /// syllable envelope, plus a little noise
    pub fn generate_speech_like(len: usize, seed: u64) -> Vec<i16> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|i| {
                let t = i as f32 / 8000.0;
                let envelope = 0.6 + 0.4 * (2.0 * std::f32::consts::PI * 3.0 * t).sin();
                let voiced: f32 = (1..=6)
                    .map(|h| {
                        let f = 125.0 * h as f32;
                        (2.0 * std::f32::consts::PI * f * t).sin() / h as f32
                    })
                    .sum();
                let noise = rng.gen_range(-200.0f32..200.0);
                (3000.0 * envelope * voiced + noise).round() as i16
            })
            .collect()
    }

    /// Signal to noise ratio in dB over the common length
    pub fn snr_db(reference: &[i16], decoded: &[i16]) -> f64 {
        let (signal, noise) = reference
            .iter()
            .zip(decoded)
            .fold((0.0f64, 0.0f64), |(s, n), (&r, &d)| {
                let r = f64::from(r);
                let e = r - f64::from(d);
                (s + r * r, n + e * e)
            });
        if noise == 0.0 {
            return f64::INFINITY;
        }
        10.0 * (signal / noise).log10()
    }
}
