//! Information-content analysis of a batch of repetition sums.
//!
//! The batch is treated as a multiset of integers. Its Shannon entropy is
//! compared against `log2(k)`, the entropy of a uniform distribution over the
//! `k` distinct values actually observed.
//!
//! ```text
//! H     = -Σ p_i · log2(p_i)
//! H_max = log2(k)              (0 when k <= 1)
//! ratio = H / H_max            (0 when H_max == 0)
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::statistics::Statistics;

pub const MSG_EMPTY: &str = "empty input";
pub const MSG_SINGLE_VALUE: &str = "single distinct value";
pub const MSG_OK: &str = "calculation successful";

/// How often one value occurs in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueFrequency {
    pub value: i64,
    pub count: usize,
}

/// Summary of a batch. Built by [`analyze`], never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformationContentReport {
    pub samples: usize,
    /// Number of distinct values (`k`).
    pub distinct_values: usize,
    /// Sum of all values, widened so any batch of `i64` sums without overflow.
    pub total: i128,
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two samples.
    pub std_dev: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
    /// `log2(k)` in bits.
    pub max_entropy: f64,
    /// `entropy / max_entropy`, always within `[0, 1]`.
    pub normalized_information_content: f64,
    pub message: &'static str,
    /// Observed frequencies, ascending by value.
    pub frequencies: Vec<ValueFrequency>,
}

/// Analyze a batch of repetition sums. Never fails.
pub fn analyze(values: &[i64]) -> InformationContentReport {
    if values.is_empty() {
        return InformationContentReport {
            samples: 0,
            distinct_values: 0,
            total: 0,
            mean: 0.0,
            std_dev: 0.0,
            entropy: 0.0,
            max_entropy: 0.0,
            normalized_information_content: 0.0,
            message: MSG_EMPTY,
            frequencies: Vec::new(),
        };
    }

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let n = values.len() as f64;
    let mut entropy = 0.0;
    for &c in counts.values() {
        let p = c as f64 / n;
        entropy -= p * p.log2();
    }

    let k = counts.len();
    let max_entropy = if k > 1 { (k as f64).log2() } else { 0.0 };
    let normalized = if max_entropy > 0.0 {
        // Equal frequencies can round a hair above 1.
        (entropy / max_entropy).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mean = as_f64.iter().mean();
    let std_dev = if as_f64.len() > 1 {
        as_f64.iter().std_dev()
    } else {
        0.0
    };

    InformationContentReport {
        samples: values.len(),
        distinct_values: k,
        total: values.iter().map(|&v| i128::from(v)).sum(),
        mean,
        std_dev,
        entropy,
        max_entropy,
        normalized_information_content: normalized,
        message: if k == 1 { MSG_SINGLE_VALUE } else { MSG_OK },
        frequencies: counts
            .into_iter()
            .map(|(value, count)| ValueFrequency { value, count })
            .collect(),
    }
}

impl std::fmt::Display for InformationContentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Sum of repetition sums:          {}", self.total)?;
        writeln!(f, "  Mean:                            {}", self.mean)?;
        writeln!(f, "  Entropy:                         {:.4} bits", self.entropy)?;
        writeln!(f, "  Max Entropy:                     {:.4} bits", self.max_entropy)?;
        writeln!(
            f,
            "  Normalized Information Content:  {:.4}",
            self.normalized_information_content
        )?;
        write!(f, "  Message:                         {}", self.message)
    }
}
