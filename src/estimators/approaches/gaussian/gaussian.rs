// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::f64::consts::PI;

use nalgebra::{Cholesky, DMatrix};
use ndarray::{Array1, Array2, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, IxDyn};

use crate::error::{InfoError, Result};
use crate::estimators::traits::GlobalValue;

/// Entropy (nats) of a jointly Gaussian sample of shape (..., n_vars, n_trials).
///
/// The covariance is estimated as `C = X Xᵀ / (n_trials - 1)`, i.e. the trials are
/// assumed to be demeaned already. With the Cholesky factor `C = L Lᵀ`,
///
/// H = Σ ln L_ii + n_vars / 2 · (ln 2π + 1)
///
/// which avoids forming the determinant explicitly. One value is returned per
/// leading batch index, so the output has shape `x.shape()[..ndim - 2]`.
pub fn entropy_gauss_nd(x: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
    let shape = x.shape().to_vec();
    let (batch_shape, n_vars, n_trials) = split_sample_shape(&shape)?;
    let n_batch: usize = batch_shape.iter().product();

    let flat = x
        .to_shape((n_batch, n_vars, n_trials))
        .map_err(|_| InfoError::ShapeMismatch {
            expected: "(..., n_vars, n_trials)",
            found: shape.clone(),
        })?;

    let constant = gaussian_constant(n_vars);
    let mut out = Vec::with_capacity(n_batch);
    for (b, sample) in flat.outer_iter().enumerate() {
        let half_log_det =
            half_log_det(sample).ok_or_else(|| InfoError::NonPositiveDefiniteCovariance {
                shape: shape.clone(),
                batch_index: unravel_index(b, batch_shape),
            })?;
        out.push(half_log_det + constant);
    }

    ArrayD::from_shape_vec(IxDyn(batch_shape), out).map_err(|_| InfoError::ShapeMismatch {
        expected: "(..., n_vars, n_trials)",
        found: shape,
    })
}

/// Entropy (nats) of a single Gaussian sample of shape (n_vars, n_trials).
pub fn entropy_gauss(x: ArrayView2<'_, f64>) -> Result<f64> {
    let (n_vars, n_trials) = x.dim();
    split_sample_shape(&[n_vars, n_trials])?;
    let half_log_det = half_log_det(x).ok_or_else(|| InfoError::NonPositiveDefiniteCovariance {
        shape: vec![n_vars, n_trials],
        batch_index: Vec::new(),
    })?;
    Ok(half_log_det + gaussian_constant(n_vars))
}

/// Reference implementation of [`entropy_gauss_nd`] for a single batch axis:
/// loops over axis 0 and evaluates every slice independently.
pub fn entropy_gauss_loop(x: ArrayView3<'_, f64>) -> Result<Array1<f64>> {
    let mut out = Vec::with_capacity(x.len_of(Axis(0)));
    for (k, slice) in x.outer_iter().enumerate() {
        let h = entropy_gauss(slice).map_err(|e| match e {
            InfoError::NonPositiveDefiniteCovariance { .. } => {
                InfoError::NonPositiveDefiniteCovariance {
                    shape: x.shape().to_vec(),
                    batch_index: vec![k],
                }
            }
            other => other,
        })?;
        out.push(h);
    }
    Ok(Array1::from(out))
}

/// Gaussian differential entropy estimator for a single (n_vars, n_trials) sample.
///
/// The value is computed eagerly so that a singular covariance is reported at
/// construction instead of through [`GlobalValue`].
pub struct GaussianEntropy {
    pub n_vars: usize,
    pub n_trials: usize,
    value: f64,
}

impl GaussianEntropy {
    /// Build from a (n_vars, n_trials) sample. The sample is demeaned across trials first.
    pub fn new(data: Array2<f64>) -> Result<Self> {
        let (n_vars, n_trials) = data.dim();
        split_sample_shape(&[n_vars, n_trials])?;
        let centered = demean_rows(data);
        let value = entropy_gauss(centered.view())?;
        Ok(Self {
            n_vars,
            n_trials,
            value,
        })
    }
}

impl GlobalValue for GaussianEntropy {
    fn global_value(&self) -> f64 {
        self.value
    }
}

fn demean_rows(mut data: Array2<f64>) -> Array2<f64> {
    for mut row in data.rows_mut() {
        if let Some(mean) = row.mean() {
            row -= mean;
        }
    }
    data
}

fn gaussian_constant(n_vars: usize) -> f64 {
    0.5 * n_vars as f64 * ((2.0 * PI).ln() + 1.0)
}

/// Relative pivot tolerance, scaled by the number of variables.
const PIVOT_RTOL: f64 = 1e-12;

/// Σ ln diag(L) for the Cholesky factor of the sample covariance; None if the
/// covariance is not positive definite.
///
/// A pivot with `L_ii² <= n_vars · PIVOT_RTOL · C_ii` counts as zero: it is what
/// rounding leaves of an exactly singular covariance (e.g. a duplicated variable).
fn half_log_det(sample: ArrayView2<'_, f64>) -> Option<f64> {
    let (n_vars, n_trials) = sample.dim();
    let cov = sample.dot(&sample.t()) / (n_trials as f64 - 1.0);
    let cov = DMatrix::from_fn(n_vars, n_vars, |i, j| cov[[i, j]]);
    let variances = cov.diagonal();
    let chol = Cholesky::new(cov)?;
    let diag = chol.l_dirty().diagonal();

    let tol = n_vars as f64 * PIVOT_RTOL;
    if diag
        .iter()
        .zip(variances.iter())
        .any(|(&l, &c)| l * l <= tol * c)
    {
        return None;
    }
    let sum: f64 = diag.iter().map(|d| d.ln()).sum();
    sum.is_finite().then_some(sum)
}

fn split_sample_shape(shape: &[usize]) -> Result<(&[usize], usize, usize)> {
    let ndim = shape.len();
    if ndim < 2 || shape[ndim - 2] == 0 {
        return Err(InfoError::ShapeMismatch {
            expected: "(..., n_vars, n_trials) with n_vars >= 1",
            found: shape.to_vec(),
        });
    }
    let n_trials = shape[ndim - 1];
    if n_trials < 2 {
        return Err(InfoError::InsufficientTrials { n_trials });
    }
    Ok((&shape[..ndim - 2], shape[ndim - 2], n_trials))
}

/// Row-major multi-index of a flat position.
pub(crate) fn unravel_index(mut flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut index = vec![0; dims.len()];
    for (slot, &d) in index.iter_mut().zip(dims).rev() {
        *slot = flat % d;
        flat /= d;
    }
    index
}
