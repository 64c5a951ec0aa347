//! Mean-threshold fingerprints.
//!
//! A [`Fingerprint`] holds one bit per luminance sample: set when the sample
//! is at or above the mean of the whole map. The `Display` form is the
//! canonical human-readable rendering, one `1`/`0` character per bit.

use crate::code::{CODE_BITS, FingerprintCode};
use crate::error::{Error, Result};
use crate::luma::LuminanceMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    bits: Vec<bool>,
}

impl Fingerprint {
    /// Thresholds every sample against the truncated mean of the map.
    ///
    /// Samples equal to the mean produce a set bit, so a uniform map yields
    /// an all-ones fingerprint. An empty map yields an empty fingerprint.
    pub fn from_luminance(map: &LuminanceMap) -> Self {
        let Some(mean) = map.mean() else {
            return Self::default();
        };
        Self {
            bits: map.values().iter().map(|&v| v >= mean).collect(),
        }
    }

    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Packs the fingerprint into a 64-bit code, first bit most significant.
    ///
    /// Returns `0` for any length other than 64. Use [`Self::try_to_code`]
    /// to tell a malformed fingerprint apart from an all-zero one.
    pub fn to_code(&self) -> u64 {
        self.try_to_code().map(u64::from).unwrap_or(0)
    }

    pub fn try_to_code(&self) -> Result<FingerprintCode> {
        FingerprintCode::try_from(self)
    }

    /// Number of positions where both fingerprints agree.
    ///
    /// Only positions present in both are compared.
    pub fn agreements(&self, other: &Fingerprint) -> usize {
        self.bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self
            .bits
            .iter()
            .map(|&bit| if bit { '1' } else { '0' })
            .collect();
        f.write_str(&rendered)
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(index, found)| match found {
                '1' => Ok(true),
                '0' => Ok(false),
                _ => Err(Error::InvalidBitChar { index, found }),
            })
            .collect::<Result<Vec<_>>>()
            .map(|bits| Self { bits })
    }
}

impl From<FingerprintCode> for Fingerprint {
    fn from(code: FingerprintCode) -> Self {
        let value = u64::from(code);
        Self::from_bits((0..CODE_BITS).map(|i| value & (1 << (CODE_BITS - 1 - i)) != 0))
    }
}
