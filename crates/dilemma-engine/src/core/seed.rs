use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic random grid generation.
///
/// A 128-bit (16-byte) seed used to initialize the random number generator
/// behind [`Grid::random`](crate::Grid::random). The textual form is a
/// 32-digit hex string, used both by serde and by [`FromStr`]/[`Display`](fmt::Display),
/// so a seed printed by one run can be passed back to reproduce the same grid.
///
/// # Example
///
/// ```
/// use dilemma_engine::GridSeed;
/// use rand::Rng as _;
///
/// let seed: GridSeed = rand::rng().random();
/// let parsed: GridSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct ParseSeedError {
    input: String,
    reason: String,
}

impl GridSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for GridSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for GridSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                input: s.to_owned(),
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GridSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GridSeed` values with `rng.random()`.
impl Distribution<GridSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GridSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GridSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = GridSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        // Big-endian: first byte first
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        assert_eq!(
            serde_json::to_string(&seed).unwrap(),
            "\"0123456789abcdeffedcba9876543210\""
        );
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        let mut bytes = [0; 16];
        bytes[15] = 1;
        let seed = GridSeed::from_bytes(bytes);
        assert_eq!(seed.to_string(), "00000000000000000000000000000001");
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let seed: GridSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.as_bytes()[0], 0x01);
        assert_eq!(seed.as_bytes()[15], 0x10);
    }

    #[test]
    fn test_parse_errors() {
        for input in [
            "",
            "0123456789abcdef0123456789abcde",
            "0123456789abcdef0123456789abcdef0",
            "ghijklmnopqrstuvwxyzghijklmnopqr",
        ] {
            let err = input.parse::<GridSeed>().unwrap_err();
            assert!(err.to_string().contains("invalid hex seed"), "{err}");
        }
    }

    #[test]
    fn test_deserialize_rejects_invalid_hex() {
        let result: Result<GridSeed, _> = serde_json::from_str("\"xyz\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_known_value() {
        let seed: GridSeed = serde_json::from_str("\"ffffffffffffffffffffffffffffffff\"").unwrap();
        assert_eq!(seed, GridSeed::from_bytes([0xFF; 16]));
    }
}
