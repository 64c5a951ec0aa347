//! Packed 64-bit fingerprint codes.

use crate::error::Error;
use crate::fingerprint::Fingerprint;
use std::fmt;

/// Number of bits in a packed code.
pub const CODE_BITS: usize = 64;

/// A 64-bit fingerprint packed most-significant-bit first.
///
/// Only fingerprints of exactly [`CODE_BITS`] bits convert into a code, so
/// holding a `FingerprintCode` means the length has already been checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerprintCode(u64);

impl FingerprintCode {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Number of bits that differ between the two codes.
    pub fn hamming_distance(self, other: FingerprintCode) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Fraction of agreeing bits, in `[0.0, 1.0]`.
    pub fn similarity(self, other: FingerprintCode) -> f32 {
        let agreeing = CODE_BITS as u32 - self.hamming_distance(other);
        agreeing as f32 / CODE_BITS as f32
    }
}

impl TryFrom<&Fingerprint> for FingerprintCode {
    type Error = Error;

    fn try_from(fp: &Fingerprint) -> Result<Self, Self::Error> {
        if fp.len() != CODE_BITS {
            return Err(Error::LengthMismatch {
                expected: CODE_BITS,
                actual: fp.len(),
            });
        }

        let mut value = 0u64;
        for (n, &bit) in fp.bits().iter().enumerate() {
            if bit {
                value |= 1 << (CODE_BITS - 1 - n);
            }
        }
        Ok(Self(value))
    }
}

impl From<u64> for FingerprintCode {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<FingerprintCode> for u64 {
    fn from(code: FingerprintCode) -> Self {
        code.0
    }
}

impl fmt::Display for FingerprintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for FingerprintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_distance() {
        let zero = FingerprintCode::new(0);
        assert_eq!(zero.hamming_distance(FingerprintCode::new(0b0000)), 0);
        assert_eq!(zero.hamming_distance(FingerprintCode::new(0b0001)), 1);
        assert_eq!(zero.hamming_distance(FingerprintCode::new(0b1111)), 4);
        assert_eq!(zero.hamming_distance(FingerprintCode::new(0xFF)), 8);
        assert_eq!(zero.hamming_distance(FingerprintCode::new(u64::MAX)), 64);
    }

    #[test]
    fn test_similarity() {
        let a = FingerprintCode::new(0xF0F0_F0F0_F0F0_F0F0);
        assert_eq!(a.similarity(a), 1.0);
        assert_eq!(a.similarity(FingerprintCode::new(!a.value())), 0.0);
        assert_eq!(a.similarity(FingerprintCode::new(a.value() ^ 0xFFFF_FFFF)), 0.5);
    }

    #[test]
    fn test_code_similarity_matches_fingerprint_similarity() {
        let a = FingerprintCode::new(0x0123_4567_89AB_CDEF);
        let b = FingerprintCode::new(0xFEDC_BA98_7654_3210);
        let score = crate::similarity::similarity(&Fingerprint::from(a), &Fingerprint::from(b));
        assert_eq!(a.similarity(b), score);
    }

    #[test]
    fn test_formatting() {
        let code = FingerprintCode::new(0x8000_0000_0000_0000);
        assert_eq!(code.to_string(), "9223372036854775808");
        assert_eq!(format!("{:016x}", code), "8000000000000000");
    }
}
