//! Positional agreement between fingerprints.

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;

/// Fraction of positions at which `src` and `dst` agree, in `[0.0, 1.0]`.
///
/// Fingerprints of different lengths score `0.0` rather than failing, as do
/// two empty fingerprints. Callers that must distinguish a malformed pair from
/// a truly dissimilar one should use [`try_similarity`].
pub fn similarity(src: &Fingerprint, dst: &Fingerprint) -> f32 {
    try_similarity(src, dst).unwrap_or(0.0)
}

/// Like [`similarity`], but a length mismatch is reported as
/// [`Error::LengthMismatch`].
pub fn try_similarity(src: &Fingerprint, dst: &Fingerprint) -> Result<f32> {
    if src.len() != dst.len() {
        return Err(Error::LengthMismatch {
            expected: src.len(),
            actual: dst.len(),
        });
    }
    if src.is_empty() {
        return Ok(0.0);
    }
    Ok(src.agreements(dst) as f32 / src.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> Fingerprint {
        s.parse().unwrap()
    }

    #[test]
    fn test_reflexive() {
        for s in ["1", "0", "0110", "1111111100000000"] {
            assert_eq!(similarity(&fp(s), &fp(s)), 1.0);
        }
        let all_ones = Fingerprint::from_bits([true; 64]);
        assert_eq!(similarity(&all_ones, &all_ones), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("1100", "1010"), ("111000", "000111"), ("1", "0")];
        for (a, b) in pairs {
            assert_eq!(similarity(&fp(a), &fp(b)), similarity(&fp(b), &fp(a)));
        }
    }

    #[test]
    fn test_partial_agreement() {
        assert_eq!(similarity(&fp("1100"), &fp("1010")), 0.5);
        assert_eq!(similarity(&fp("1100"), &fp("1101")), 0.75);
        assert_eq!(similarity(&fp("1100"), &fp("0011")), 0.0);
    }

    #[test]
    fn test_monotonic_in_agreement() {
        let base = fp("00000000");
        let mut previous = 1.0;
        for flipped in 1..=8 {
            let other = Fingerprint::from_bits((0..8).map(|i| i < flipped));
            let score = similarity(&base, &other);
            assert!(score < previous);
            previous = score;
        }
    }

    #[test]
    fn test_length_mismatch_scores_zero() {
        assert_eq!(similarity(&fp("1111"), &fp("111")), 0.0);
        assert_eq!(similarity(&fp(""), &fp("1")), 0.0);
    }

    #[test]
    fn test_empty_pair_scores_zero() {
        assert_eq!(similarity(&Fingerprint::default(), &Fingerprint::default()), 0.0);
    }

    #[test]
    fn test_try_similarity_reports_mismatch() {
        assert!(matches!(
            try_similarity(&fp("10"), &fp("101")),
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert_eq!(try_similarity(&fp("10"), &fp("11")).unwrap(), 0.5);
    }
}
