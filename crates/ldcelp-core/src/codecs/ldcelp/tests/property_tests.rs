//! LD-CELP Property Tests
//!
//! Randomized checks of the numerical stages and of decoder robustness.

use proptest::prelude::*;

use crate::codecs::ldcelp::lpc::levinson_durbin;
use crate::codecs::ldcelp::quantizer::{distortion, CodebookIndex, VectorQuantizer};
use crate::codecs::ldcelp::tables::{IDIM, NCWD, NG};
use crate::codecs::ldcelp::LdCelpDecoder;

fn autocorrelation(signal: &[f32], order: usize) -> Vec<f32> {
    (0..=order)
        .map(|lag| signal[lag..].iter().zip(signal).map(|(a, b)| a * b).sum())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Prediction error energy never grows with the order
    #[test]
    fn prop_levinson_energies_non_increasing(
        signal in prop::collection::vec(-1000.0f32..1000.0, 40..120),
    ) {
        let autocorr = autocorrelation(&signal, 10);
        prop_assume!(autocorr[0] > 0.0);

        if let Some(solution) = levinson_durbin(&autocorr, 10) {
            prop_assert_eq!(solution.coeffs[0], 1.0);
            let mut previous = autocorr[0];
            for &energy in &solution.energies {
                prop_assert!(energy <= previous);
                prop_assert!(energy > 0.0);
                previous = energy;
            }
        }
    }

    /// The codebook search finds the best (shape, gain) pair
    #[test]
    fn prop_codebook_search_is_exhaustive(
        head in 0.5f32..2.0,
        tail in prop::array::uniform4(-1.0f32..1.0),
        target in prop::array::uniform5(-5.0f32..5.0),
    ) {
        let impulse = [head, tail[0], tail[1], tail[2], tail[3]];
        let vq = VectorQuantizer::with_impulse_response(impulse);
        let energies = vq.energies();
        let correlations = vq.correlations(&target);

        let chosen = vq.select_codeword(&target);
        let chosen_distortion =
            distortion(energies[chosen.shape()], correlations[chosen.shape()], chosen.gain());

        let mut best = f32::MAX;
        for shape in 0..NCWD {
            for gain in 0..NG {
                best = best.min(distortion(energies[shape], correlations[shape], gain));
            }
        }
        prop_assert!(
            chosen_distortion <= best + 1e-3 * (1.0 + best.abs()),
            "chosen {} best {}", chosen_distortion, best
        );
    }

    /// Index packing round trips through the wire word
    #[test]
    fn prop_index_packing(shape in 0usize..NCWD, gain in 0usize..NG) {
        let index = CodebookIndex::new(shape, gain);
        let back = CodebookIndex::try_from(u16::from(index)).unwrap();
        prop_assert_eq!(back.shape(), shape);
        prop_assert_eq!(back.gain(), gain);
    }

    /// Any in-range code sequence decodes without failing
    #[test]
    fn prop_decoder_accepts_any_valid_codes(
        codes in prop::collection::vec(0u16..1024, 1..200),
        postfilter in any::<bool>(),
    ) {
        let mut decoder = LdCelpDecoder::new(postfilter);
        let pcm = decoder.decode(&codes).unwrap();
        prop_assert_eq!(pcm.len(), codes.len() * IDIM);
    }

    /// Codes past the last codeword are always rejected
    #[test]
    fn prop_out_of_range_codes_rejected(code in 1024u16..) {
        prop_assert!(CodebookIndex::try_from(code).is_err());
        let mut decoder = LdCelpDecoder::new(false);
        prop_assert!(decoder.decode_vector(code).is_err());
    }
}
