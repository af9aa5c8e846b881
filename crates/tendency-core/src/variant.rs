//! The two array transformations and the tendency delta each one carries.
//!
//! A step draws one bit: `false` selects [`Operation::ResetToZero`], `true`
//! selects [`Operation::FillRandom`]. The [`Variant`] then decides whether
//! that operation pushes the tendency up or down:
//!
//! | variant    | reset-to-zero | fill-random |
//! |------------|---------------|-------------|
//! | `original` | −1            | +1          |
//! | `alt`      | +1            | −1          |

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;

/// Default inclusive upper bound for random fill values (`i64::MAX`, the
/// largest non-negative signed machine integer).
pub const DEFAULT_FILL_UPPER_BOUND: u64 = i64::MAX as u64;

/// One of the two mutually exclusive array transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Every element becomes 0.
    ResetToZero,
    /// Every element becomes an independent draw from `0..=upper_bound`.
    FillRandom,
}

impl Operation {
    /// Fixed bit mapping: 0 → reset, 1 → fill.
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::FillRandom } else { Self::ResetToZero }
    }

    /// Overwrite every element of `array` according to this operation.
    pub fn apply<R: Rng>(self, array: &mut [u64], upper_bound: u64, rng: &mut R) {
        match self {
            Self::ResetToZero => array.fill(0),
            Self::FillRandom => {
                for value in array.iter_mut() {
                    *value = rng.random_range(0..=upper_bound);
                }
            }
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResetToZero => write!(f, "reset_to_zero"),
            Self::FillRandom => write!(f, "fill_random"),
        }
    }
}

/// Which operation raises the tendency and which lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Reset lowers, fill raises.
    #[default]
    #[serde(alias = "a")]
    Original,
    /// Reset raises, fill lowers.
    #[serde(alias = "b")]
    Alt,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Original, Variant::Alt];

    /// Tendency delta applied together with `op`.
    pub fn delta(self, op: Operation) -> i64 {
        match (self, op) {
            (Self::Original, Operation::ResetToZero) => -1,
            (Self::Original, Operation::FillRandom) => 1,
            (Self::Alt, Operation::ResetToZero) => 1,
            (Self::Alt, Operation::FillRandom) => -1,
        }
    }

    /// The variant with both deltas swapped.
    pub fn mirror(self) -> Self {
        match self {
            Self::Original => Self::Alt,
            Self::Alt => Self::Original,
        }
    }

    /// Apply `op` to the array and return the updated tendency.
    pub fn step<R: Rng>(
        self,
        op: Operation,
        array: &mut [u64],
        tendency: i64,
        upper_bound: u64,
        rng: &mut R,
    ) -> i64 {
        op.apply(array, upper_bound, rng);
        tendency + self.delta(op)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Alt => write!(f, "alt"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" | "a" => Ok(Self::Original),
            "alt" | "b" => Ok(Self::Alt),
            other => Err(ExperimentError::invalid(
                "variant",
                format!("unknown variant '{other}' (expected original or alt)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bit_mapping_is_fixed() {
        assert_eq!(Operation::from_bit(false), Operation::ResetToZero);
        assert_eq!(Operation::from_bit(true), Operation::FillRandom);
    }

    #[test]
    fn test_delta_table() {
        assert_eq!(Variant::Original.delta(Operation::ResetToZero), -1);
        assert_eq!(Variant::Original.delta(Operation::FillRandom), 1);
        assert_eq!(Variant::Alt.delta(Operation::ResetToZero), 1);
        assert_eq!(Variant::Alt.delta(Operation::FillRandom), -1);
    }

    #[test]
    fn test_mirror_negates_every_delta() {
        for variant in Variant::ALL {
            assert_eq!(variant.mirror().mirror(), variant);
            for op in [Operation::ResetToZero, Operation::FillRandom] {
                assert_eq!(variant.delta(op), -variant.mirror().delta(op));
            }
        }
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut array = vec![5u64, 9, 13];
        let t = Variant::Original.step(Operation::ResetToZero, &mut array, 0, 100, &mut rng);
        assert_eq!(array, vec![0, 0, 0]);
        assert_eq!(t, -1);
    }

    #[test]
    fn test_fill_respects_upper_bound_and_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut array = vec![0u64; 1000];
        let t = Variant::Alt.step(Operation::FillRandom, &mut array, 4, 3, &mut rng);
        assert_eq!(array.len(), 1000);
        assert!(array.iter().all(|&v| v <= 3));
        assert!(array.iter().any(|&v| v != 0));
        assert_eq!(t, 3);
    }

    #[test]
    fn test_fill_accepts_full_u64_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut array = vec![0u64; 64];
        Operation::FillRandom.apply(&mut array, u64::MAX, &mut rng);
        assert!(array.iter().any(|&v| v > DEFAULT_FILL_UPPER_BOUND));
    }

    #[test]
    fn test_parse_variant_names() {
        assert_eq!("original".parse::<Variant>().unwrap(), Variant::Original);
        assert_eq!("A".parse::<Variant>().unwrap(), Variant::Original);
        assert_eq!(" alt ".parse::<Variant>().unwrap(), Variant::Alt);
        assert_eq!("b".parse::<Variant>().unwrap(), Variant::Alt);
        assert!("both".parse::<Variant>().unwrap_err().is_configuration());
    }

    #[test]
    fn test_variant_serde_lowercase_with_aliases() {
        assert_eq!(serde_json::to_string(&Variant::Alt).unwrap(), "\"alt\"");
        let v: Variant = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(v, Variant::Original);
    }
}
