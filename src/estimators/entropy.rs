// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, ArrayViewD};

use crate::error::Result;
use crate::estimators::approaches::gaussian::gaussian::{GaussianEntropy, entropy_gauss_nd};
use crate::estimators::approaches::ordinal::ordinal::PermutationEntropy;
use crate::estimators::approaches::ordinal::ordinal_map::{
    PermutationEntropyMap, permutation_entropy_map,
};
use crate::estimators::config::{PermutationEntropyConfig, PermutationEntropyMapConfig};
pub use crate::estimators::traits::{GlobalValue, LocalValues};

/// Entropy estimation methods for various data types
///
/// This struct provides static methods for creating entropy estimators
/// for continuous Gaussian samples and for ordinal patterns of time series.
pub struct Entropy;

impl Entropy {
    /// Creates a Gaussian entropy estimator for a (n_vars, n_trials) sample
    ///
    /// # Arguments
    ///
    /// * `data` - Sample with variables as rows and trials as columns; it is demeaned
    ///   across trials before the covariance is estimated
    ///
    /// # Errors
    ///
    /// `NonPositiveDefiniteCovariance` when the sample covariance is singular, e.g. for
    /// collinear variables or fewer trials than variables.
    pub fn new_gaussian(data: Array2<f64>) -> Result<GaussianEntropy> {
        GaussianEntropy::new(data)
    }

    /// Gaussian entropies of a batch of demeaned samples shaped (..., n_vars, n_trials)
    ///
    /// Returns one value per leading batch index.
    pub fn gaussian_nd(data: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
        entropy_gauss_nd(data)
    }

    /// Creates a permutation entropy estimator for a 1D series
    ///
    /// # Arguments
    ///
    /// * `series` - Scalar time series
    /// * `config` - Embedding dimension, delay, logarithm base and normalization
    pub fn new_permutation(
        series: ArrayView1<'_, f64>,
        config: PermutationEntropyConfig,
    ) -> Result<PermutationEntropy> {
        PermutationEntropy::new(series, config)
    }

    /// Windowed permutation entropy map of a batch of series (one per row)
    ///
    /// The output has the shape of `data`; every sample of a window holds that
    /// window's entropy.
    pub fn permutation_map(
        data: ArrayView2<'_, f64>,
        config: &PermutationEntropyMapConfig,
    ) -> Result<PermutationEntropyMap> {
        permutation_entropy_map(data, config)
    }
}
