//! Single-trial state machine.
//!
//! A trial owns one array of `size` elements, starting all zero, and a
//! tendency counter starting at 0. Each of `iterations` steps draws a bit,
//! maps it to an [`Operation`], overwrites the array and moves the tendency
//! by the variant's delta. The array is dropped when the trial ends.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::bits::{OsBitSource, RandomBitSource};
use crate::error::ExperimentError;
use crate::variant::{DEFAULT_FILL_UPPER_BOUND, Operation, Variant};

/// Upper limit on up-front trace allocation; longer traces grow on demand.
const MAX_PREALLOCATED_STEPS: usize = 1 << 16;

/// Runs trials against a bit source and a fill-value generator.
///
/// The bit source decides every branch; the generator `R` only produces the
/// values written by [`Operation::FillRandom`] and never affects tendency.
pub struct TrialEngine<B, R = ThreadRng> {
    bits: B,
    rng: R,
    fill_upper_bound: u64,
}

impl TrialEngine<OsBitSource, ThreadRng> {
    /// Engine backed by the OS entropy source.
    pub fn os() -> Self {
        Self::new(OsBitSource::new())
    }
}

impl<B: RandomBitSource> TrialEngine<B, ThreadRng> {
    pub fn new(bits: B) -> Self {
        Self::with_rng(bits, rand::rng())
    }
}

impl<B, R> TrialEngine<B, R> {
    pub fn with_rng(bits: B, rng: R) -> Self {
        Self {
            bits,
            rng,
            fill_upper_bound: DEFAULT_FILL_UPPER_BOUND,
        }
    }

    /// Inclusive upper bound for fill values.
    pub fn with_fill_upper_bound(mut self, upper_bound: u64) -> Self {
        self.fill_upper_bound = upper_bound;
        self
    }

    pub fn set_fill_upper_bound(&mut self, upper_bound: u64) {
        self.fill_upper_bound = upper_bound;
    }

    pub fn fill_upper_bound(&self) -> u64 {
        self.fill_upper_bound
    }

    pub fn bits(&self) -> &B {
        &self.bits
    }

    pub fn into_bits(self) -> B {
        self.bits
    }
}

impl<B: RandomBitSource, R: Rng> TrialEngine<B, R> {
    /// Run one trial and return the final tendency.
    ///
    /// `|result| <= iterations`, and `iterations == 0` always yields 0.
    pub fn run_trial(
        &mut self,
        size: usize,
        iterations: usize,
        variant: Variant,
    ) -> Result<i64, ExperimentError> {
        self.drive(size, iterations, variant, |_| {})
    }

    /// Run one trial and return the tendency after every step.
    pub fn run_trial_traced(
        &mut self,
        size: usize,
        iterations: usize,
        variant: Variant,
    ) -> Result<Vec<i64>, ExperimentError> {
        let mut trace = Vec::with_capacity(iterations.min(MAX_PREALLOCATED_STEPS));
        self.drive(size, iterations, variant, |t| trace.push(t))?;
        Ok(trace)
    }

    fn drive(
        &mut self,
        size: usize,
        iterations: usize,
        variant: Variant,
        mut on_step: impl FnMut(i64),
    ) -> Result<i64, ExperimentError> {
        let mut array = vec![0u64; size];
        let mut tendency = 0i64;
        for _ in 0..iterations {
            let op = Operation::from_bit(self.bits.next_bit()?);
            tendency = variant.step(op, &mut array, tendency, self.fill_upper_bound, &mut self.rng);
            on_step(tendency);
        }
        log::debug!("trial size={size} iterations={iterations} variant={variant} -> {tendency}");
        Ok(tendency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ScriptedBitSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scripted(digits: &str) -> TrialEngine<ScriptedBitSource, StdRng> {
        TrialEngine::with_rng(
            ScriptedBitSource::from_digits(digits),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_zero_iterations_yield_zero() {
        let mut engine = scripted("");
        for size in [0, 1, 500] {
            assert_eq!(engine.run_trial(size, 0, Variant::Original).unwrap(), 0);
        }
        assert_eq!(engine.bits().bits_consumed(), 0);
    }

    #[test]
    fn test_scripted_trial_is_exact() {
        // Original: fill +1, reset -1.
        let mut engine = scripted("1101 0111");
        assert_eq!(engine.run_trial(10, 4, Variant::Original).unwrap(), 2);
        assert_eq!(engine.run_trial(10, 4, Variant::Original).unwrap(), 2);
        assert_eq!(engine.bits().remaining(), 0);
    }

    #[test]
    fn test_scripted_trial_reproducible_across_engines() {
        let script = "0110100111010001";
        let a = scripted(script).run_trial_traced(64, 16, Variant::Alt).unwrap();
        let b = scripted(script).run_trial_traced(64, 16, Variant::Alt).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_variants_are_stepwise_negations() {
        let script = "1110010110001011";
        let original = scripted(script)
            .run_trial_traced(8, 16, Variant::Original)
            .unwrap();
        let alt = scripted(script).run_trial_traced(8, 16, Variant::Alt).unwrap();
        assert_eq!(original.len(), 16);
        for (o, a) in original.iter().zip(&alt) {
            assert_eq!(*o, -*a);
        }
    }

    #[test]
    fn test_trace_steps_move_by_one() {
        let trace = scripted("10011").run_trial_traced(3, 5, Variant::Original).unwrap();
        assert_eq!(trace, vec![1, 0, -1, 0, 1]);
    }

    #[test]
    fn test_exhausted_source_aborts_trial() {
        let mut engine = scripted("101");
        let err = engine.run_trial(4, 5, Variant::Original).unwrap_err();
        assert!(matches!(err, ExperimentError::EntropyUnavailable(_)));
    }

    #[test]
    fn test_huge_traced_trial_fails_on_entropy_not_allocation() {
        let mut engine = scripted("101");
        let err = engine
            .run_trial_traced(4, usize::MAX / 4, Variant::Original)
            .unwrap_err();
        assert!(matches!(err, ExperimentError::EntropyUnavailable(_)));
        assert_eq!(engine.bits().bits_consumed(), 3);
    }

    #[test]
    fn test_os_engine_bound_holds() {
        let mut engine = TrialEngine::os().with_fill_upper_bound(1_000);
        for iterations in [1, 7, 50] {
            let t = engine.run_trial(16, iterations, Variant::Original).unwrap();
            assert!(t.unsigned_abs() <= iterations as u64);
            // Parity: an even number of ±1 steps lands on an even value.
            assert_eq!(t.rem_euclid(2), (iterations % 2) as i64);
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn tendency_never_exceeds_iterations(
                script in proptest::collection::vec(any::<bool>(), 0..200),
                size in 0usize..32,
            ) {
                let iterations = script.len();
                let mut engine = TrialEngine::with_rng(
                    ScriptedBitSource::new(script),
                    StdRng::seed_from_u64(3),
                );
                let t = engine.run_trial(size, iterations, Variant::Original).unwrap();
                prop_assert!(t.unsigned_abs() <= iterations as u64);
            }

            #[test]
            fn mirror_variant_negates_final_tendency(
                script in proptest::collection::vec(any::<bool>(), 0..100),
            ) {
                let n = script.len();
                let mut a = TrialEngine::with_rng(ScriptedBitSource::new(script.clone()), StdRng::seed_from_u64(0));
                let mut b = TrialEngine::with_rng(ScriptedBitSource::new(script), StdRng::seed_from_u64(0));
                let ta = a.run_trial(2, n, Variant::Original).unwrap();
                let tb = b.run_trial(2, n, Variant::Alt).unwrap();
                prop_assert_eq!(ta, -tb);
            }
        }
    }
}
