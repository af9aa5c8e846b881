//! Random bit sources for the per-step branch decision.
//!
//! Every trial step asks a [`RandomBitSource`] for one bit and picks the
//! transformation from it. Two implementations exist:
//!
//! - [`OsBitSource`]: bits from the operating system CSPRNG via `getrandom`.
//!   This is the only source used for real experiments.
//! - [`ScriptedBitSource`]: replays a fixed bit sequence. Used to make trials
//!   exactly reproducible in tests.
//!
//! There is no seeded-PRNG source. A failing OS source surfaces as
//! [`ExperimentError::EntropyUnavailable`] instead of degrading silently.

use crate::error::ExperimentError;

/// Supplier of independent, uniformly distributed bits.
pub trait RandomBitSource {
    /// Draw the next bit.
    fn next_bit(&mut self) -> Result<bool, ExperimentError>;

    /// Number of bits handed out so far.
    fn bits_consumed(&self) -> u64;
}

impl<S: RandomBitSource + ?Sized> RandomBitSource for &mut S {
    fn next_bit(&mut self) -> Result<bool, ExperimentError> {
        (**self).next_bit()
    }

    fn bits_consumed(&self) -> u64 {
        (**self).bits_consumed()
    }
}

// ---------------------------------------------------------------------------
// OS-backed source
// ---------------------------------------------------------------------------

const OS_BUFFER_BYTES: usize = 64;
const OS_BUFFER_BITS: usize = OS_BUFFER_BYTES * 8;

/// Bits from the OS CSPRNG.
///
/// Random bytes are fetched in blocks of 64 and split into bits, LSB first.
/// Each bit of an OS random byte is uniform and independent of the others,
/// so this matches drawing one byte per decision while making far fewer
/// syscalls.
#[derive(Debug)]
pub struct OsBitSource {
    buffer: [u8; OS_BUFFER_BYTES],
    cursor: usize,
    consumed: u64,
}

impl OsBitSource {
    pub fn new() -> Self {
        Self {
            buffer: [0u8; OS_BUFFER_BYTES],
            // Force a refill on first use.
            cursor: OS_BUFFER_BITS,
            consumed: 0,
        }
    }

    fn refill(&mut self) -> Result<(), ExperimentError> {
        getrandom::fill(&mut self.buffer)?;
        self.cursor = 0;
        log::trace!("refilled {OS_BUFFER_BYTES} bytes from the OS entropy source");
        Ok(())
    }
}

impl Default for OsBitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBitSource for OsBitSource {
    fn next_bit(&mut self) -> Result<bool, ExperimentError> {
        if self.cursor >= OS_BUFFER_BITS {
            self.refill()?;
        }
        let byte = self.buffer[self.cursor / 8];
        let bit = (byte >> (self.cursor % 8)) & 1 == 1;
        self.cursor += 1;
        self.consumed += 1;
        Ok(bit)
    }

    fn bits_consumed(&self) -> u64 {
        self.consumed
    }
}

// ---------------------------------------------------------------------------
// Scripted source
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of bits, then reports exhaustion as
/// [`ExperimentError::EntropyUnavailable`].
#[derive(Debug, Clone)]
pub struct ScriptedBitSource {
    bits: Vec<bool>,
    cursor: usize,
}

impl ScriptedBitSource {
    pub fn new(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Build a script from a string of `0` and `1` characters.
    /// Any other character (spaces, underscores) is skipped.
    pub fn from_digits(digits: &str) -> Self {
        Self::new(digits.chars().filter_map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        }))
    }

    /// Bits left before the script runs dry.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.cursor
    }
}

impl RandomBitSource for ScriptedBitSource {
    fn next_bit(&mut self) -> Result<bool, ExperimentError> {
        let bit = self.bits.get(self.cursor).copied().ok_or_else(|| {
            ExperimentError::EntropyUnavailable(format!(
                "scripted source exhausted after {} bits",
                self.bits.len()
            ))
        })?;
        self.cursor += 1;
        Ok(bit)
    }

    fn bits_consumed(&self) -> u64 {
        self.cursor as u64
    }
}
