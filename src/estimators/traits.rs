// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array3, ArrayView3};

use crate::error::Result;

pub trait GlobalValue {
    /// Compute and return the global value of the measure.
    fn global_value(&self) -> f64;
}

pub trait LocalValues: GlobalValue {
    /// Compute and return the local values of the measure.
    fn local_values(&self) -> Array1<f64>;

    /// Derive global_value as the mean of local values.
    /// Returns NaN when there are no local values.
    fn global_from_local(&self) -> f64 {
        self.local_values().mean().unwrap_or(f64::NAN)
    }
}

/// Pre-transform applied to raw samples before Gaussian entropy estimation.
///
/// Input and output are shaped `(n_trials, n_vars, n_times)`; the transform acts
/// along the trials axis and must preserve the shape.
pub trait Normalizer {
    fn normalize(&self, x: ArrayView3<'_, f64>) -> Result<Array3<f64>>;
}
