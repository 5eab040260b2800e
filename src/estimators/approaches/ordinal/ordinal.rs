// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::Result;
use crate::estimators::approaches::ordinal::ordinal_utils::{
    PatternDistribution, ordinal_patterns, pattern_space_size,
};
use crate::estimators::config::{LogBase, PermutationEntropyConfig};
use crate::estimators::traits::{GlobalValue, LocalValues};

/// Permutation entropy estimator (Bandt & Pompe).
///
/// The series is delay-embedded with dimension `dim` and delay `tau`, every window is
/// replaced by its ordinal pattern and the Shannon entropy of the empirical pattern
/// distribution is computed in the configured base:
///
/// H = -Σ p log p
///
/// Patterns never observed do not enter the sum. When `normalized` is set the value is
/// divided by `log(dim!)`, the entropy of the uniform distribution over all patterns,
/// so it lies in [0, 1].
///
/// Local values correspond to -log p(pattern_t) for each window t (with the same
/// normalization), so their mean equals the global value.
pub struct PermutationEntropy {
    pub config: PermutationEntropyConfig,
    patterns: Array2<usize>,
    distribution: PatternDistribution,
}

impl PermutationEntropy {
    /// Build from a single 1D series.
    pub fn new(series: ArrayView1<'_, f64>, config: PermutationEntropyConfig) -> Result<Self> {
        config.validate()?;
        let patterns = ordinal_patterns(series, config.dim, config.tau)?;
        let distribution = PatternDistribution::from_patterns(patterns.view());
        Ok(Self {
            config,
            patterns,
            distribution,
        })
    }

    /// Ordinal pattern of every window, shape `(n_windows, dim)`.
    pub fn patterns(&self) -> &Array2<usize> {
        &self.patterns
    }

    pub fn distribution(&self) -> &PatternDistribution {
        &self.distribution
    }

    fn scale(&self) -> f64 {
        normalization(self.config.dim, self.config.base, self.config.normalized)
    }
}

impl GlobalValue for PermutationEntropy {
    fn global_value(&self) -> f64 {
        shannon_entropy(self.distribution.probs.iter().copied(), self.config.base) / self.scale()
    }
}

impl LocalValues for PermutationEntropy {
    fn local_values(&self) -> Array1<f64> {
        let base = self.config.base;
        let scale = self.scale();
        self.distribution
            .inverse
            .iter()
            .map(|&k| -base.log(self.distribution.probs[k]) / scale)
            .collect()
    }
}

/// Permutation entropy of a single series.
pub fn permutation_entropy(series: ArrayView1<'_, f64>, config: &PermutationEntropyConfig) -> Result<f64> {
    Ok(PermutationEntropy::new(series, *config)?.global_value())
}

/// -Σ p log p over strictly positive probabilities.
pub fn shannon_entropy(probs: impl IntoIterator<Item = f64>, base: LogBase) -> f64 {
    let h: f64 = probs
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * base.log(p))
        .sum();
    -h
}

/// Divisor applied to entropies: `log(dim!)` when normalized, 1 otherwise.
pub fn normalization(dim: usize, base: LogBase, normalized: bool) -> f64 {
    if normalized {
        base.log(pattern_space_size(dim))
    } else {
        1.0
    }
}
