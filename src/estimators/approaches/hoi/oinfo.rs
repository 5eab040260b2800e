// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array2, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, IxDyn};

use crate::error::{InfoError, Result};
use crate::estimators::approaches::gaussian::gaussian::{
    entropy_gauss, entropy_gauss_nd, unravel_index,
};

/// O-information (nats) of a multiplet sample of shape (..., m, n_trials).
///
/// Ω = (m - 2) H(X) + Σ_j [ H(X_j) - H(X_{-j}) ]
///
/// Positive values mean the multiplet is redundancy-dominated, negative values mean
/// it is synergy-dominated. `ind` is the leave-one-out matrix for `m` (see
/// [`leave_one_out_indices`](super::indexer::leave_one_out_indices)); the `m`
/// single-variable and the `m` leave-one-out entropies are each evaluated in one
/// batched call. One value is returned per leading batch index.
pub fn compute_oinfo(x: ArrayViewD<'_, f64>, ind: &Array2<usize>) -> Result<ArrayD<f64>> {
    let shape = x.shape().to_vec();
    let ndim = shape.len();
    if ndim < 2 {
        return Err(InfoError::ShapeMismatch {
            expected: "(..., m, n_trials)",
            found: shape,
        });
    }
    let (m, n_trials) = (shape[ndim - 2], shape[ndim - 1]);
    if m < 2 {
        return Err(InfoError::InvalidMultipletSize { size: m });
    }
    if ind.dim() != (m, m - 1) || ind.iter().any(|&i| i >= m) {
        return Err(InfoError::ShapeMismatch {
            expected: "leave-one-out indices of shape (m, m - 1)",
            found: ind.shape().to_vec(),
        });
    }
    let batch_shape = &shape[..ndim - 2];
    let n_batch: usize = batch_shape.iter().product();

    let x3 = x
        .to_shape((n_batch, m, n_trials))
        .map_err(|_| InfoError::ShapeMismatch {
            expected: "(..., m, n_trials)",
            found: shape.clone(),
        })?;
    let locate = |e: InfoError| relocate_error(e, &shape, batch_shape);

    // (B,)
    let h_joint = entropy_gauss_nd(x3.view().into_dyn()).map_err(locate)?;
    // (B, m, 1, T) -> (B, m)
    let h_single = entropy_gauss_nd(x3.view().insert_axis(Axis(2)).into_dyn()).map_err(locate)?;
    // (B, m, m - 1, T) -> (B, m)
    let h_rest = entropy_gauss_nd(gather_leave_one_out(x3.view(), ind)?.view().into_dyn())
        .map_err(locate)?;

    let o = h_joint * (m as f64 - 2.0) + &(h_single - &h_rest).sum_axis(Axis(1));
    o.into_shape_with_order(IxDyn(batch_shape))
        .map_err(|_| InfoError::ShapeMismatch {
            expected: "(..., m, n_trials)",
            found: shape,
        })
}

/// Stack the leave-one-out subsets of a (B, m, T) sample into (B, m, m - 1, T).
fn gather_leave_one_out(x: ArrayView3<'_, f64>, ind: &Array2<usize>) -> Result<ndarray::Array4<f64>> {
    let subsets: Vec<_> = ind
        .rows()
        .into_iter()
        .map(|row| x.select(Axis(1), &row.to_vec()))
        .collect();
    let views: Vec<_> = subsets.iter().map(|s| s.view()).collect();
    ndarray::stack(Axis(1), &views).map_err(|_| InfoError::ShapeMismatch {
        expected: "(B, m, T)",
        found: x.shape().to_vec(),
    })
}

/// Report covariance failures against the caller's shape and leading batch index.
fn relocate_error(err: InfoError, shape: &[usize], batch_shape: &[usize]) -> InfoError {
    match err {
        InfoError::NonPositiveDefiniteCovariance { batch_index, .. } => {
            let flat = batch_index.first().copied().unwrap_or(0);
            InfoError::NonPositiveDefiniteCovariance {
                shape: shape.to_vec(),
                batch_index: unravel_index(flat, batch_shape),
            }
        }
        other => other,
    }
}

/// Reference implementation of [`compute_oinfo`] for one (m, n_trials) sample,
/// deleting each variable explicitly.
pub fn compute_oinfo_loop(x: ArrayView2<'_, f64>) -> Result<f64> {
    let m = x.nrows();
    if m < 2 {
        return Err(InfoError::InvalidMultipletSize { size: m });
    }
    let mut o = (m as f64 - 2.0) * entropy_gauss(x)?;
    for j in 0..m {
        let rest: Vec<usize> = (0..m).filter(|&i| i != j).collect();
        let single = x.select(Axis(0), &[j]);
        let others = x.select(Axis(0), &rest);
        o += entropy_gauss(single.view())? - entropy_gauss(others.view())?;
    }
    Ok(o)
}
