// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::f64::consts::SQRT_2;

use ndarray::{Array3, ArrayView3, Axis};
use statrs::function::erf::erf_inv;

use crate::error::Result;
use crate::estimators::approaches::ordinal::ordinal_utils::argsort;
use crate::estimators::traits::Normalizer;

/// Gaussian-copula transform along the trials axis.
///
/// Every (variable, time) lane is replaced by the standard normal quantiles of its
/// ranks, `Φ⁻¹((rank + 1) / (n_trials + 1))`. Marginals become approximately standard
/// Gaussian while the rank dependence between variables is preserved. Ties keep their
/// trial order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianCopula;

impl Normalizer for GaussianCopula {
    fn normalize(&self, x: ArrayView3<'_, f64>) -> Result<Array3<f64>> {
        let n_trials = x.len_of(Axis(0));
        let mut out = Array3::<f64>::zeros(x.raw_dim());
        let mut values = vec![0.0; n_trials];
        let mut order: Vec<usize> = (0..n_trials).collect();
        let denom = (n_trials + 1) as f64;

        for (src, mut dst) in x.lanes(Axis(0)).into_iter().zip(out.lanes_mut(Axis(0))) {
            for (v, &s) in values.iter_mut().zip(src.iter()) {
                *v = s;
            }
            argsort(&values, &mut order);
            for (rank, &trial) in order.iter().enumerate() {
                dst[trial] = standard_normal_quantile((rank + 1) as f64 / denom);
            }
        }
        Ok(out)
    }
}

/// Pass-through for samples that are already normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    fn normalize(&self, x: ArrayView3<'_, f64>) -> Result<Array3<f64>> {
        Ok(x.to_owned())
    }
}

fn standard_normal_quantile(p: f64) -> f64 {
    SQRT_2 * erf_inv(2.0 * p - 1.0)
}
