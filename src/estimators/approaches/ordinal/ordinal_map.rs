// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Range;

use ndarray::{Array2, ArrayView1, ArrayView2, s};
use tracing::{debug, warn};

use crate::error::{InfoError, Result};
use crate::estimators::approaches::ordinal::ordinal::permutation_entropy;
use crate::estimators::config::{FailurePolicy, PermutationEntropyMapConfig};

/// Windowed permutation entropy of a batch of series.
///
/// `values` has the shape of the input; every sample of a window carries the entropy
/// of that window, samples of the trailing remainder stay 0 and skipped windows are NaN.
#[derive(Debug, Clone)]
pub struct PermutationEntropyMap {
    pub values: Array2<f64>,
    /// Sample range of each window, shared by all rows.
    pub windows: Vec<Range<usize>>,
    /// `(row, window)` pairs skipped under [`FailurePolicy::Skip`].
    pub skipped: Vec<(usize, usize)>,
}

/// Sample ranges of the non-overlapping windows of `window_samples` samples each.
///
/// Window k covers `floor(k·w) .. floor((k+1)·w)`; a trailing remainder shorter than
/// one window is dropped.
pub fn window_ranges(n_times: usize, window_samples: f64) -> Vec<Range<usize>> {
    let n_windows = (n_times as f64 / window_samples).floor() as usize;
    (0..n_windows)
        .map(|k| {
            let start = (k as f64 * window_samples) as usize;
            let end = (((k + 1) as f64 * window_samples) as usize).min(n_times);
            start..end
        })
        .collect()
}

/// Compute the permutation entropy map of `x` (rows = independent series).
///
/// Windows are independent; a failing window either aborts the call or is filled with
/// NaN, depending on `config.on_failure`.
pub fn permutation_entropy_map(
    x: ArrayView2<'_, f64>,
    config: &PermutationEntropyMapConfig,
) -> Result<PermutationEntropyMap> {
    config.validate()?;
    let (n_rows, n_times) = x.dim();
    let windows = window_ranges(n_times, config.window_samples());
    debug!(
        n_rows,
        n_times,
        n_windows = windows.len(),
        dim = config.entropy.dim,
        tau = config.entropy.tau,
        "Computing permutation entropy map"
    );

    let mut values = Array2::<f64>::zeros((n_rows, n_times));

    #[cfg(feature = "gpu_support")]
    {
        if let Some(per_window) =
            crate::estimators::approaches::ordinal::ordinal_gpu::gpu_window_entropies(x, &windows, config)
        {
            for (row, row_values) in per_window.iter().enumerate() {
                for (range, &h) in windows.iter().zip(row_values) {
                    values.slice_mut(s![row, range.clone()]).fill(h);
                }
            }
            return Ok(PermutationEntropyMap {
                values,
                windows,
                skipped: Vec::new(),
            });
        }
    }

    let rows = map_rows(x, &windows, config);

    let mut skipped = Vec::new();
    for (row, outcome) in rows.into_iter().enumerate() {
        for (window, (range, h)) in windows.iter().zip(outcome?).enumerate() {
            let h = match h {
                Some(h) => h,
                None => {
                    skipped.push((row, window));
                    f64::NAN
                }
            };
            values.slice_mut(s![row, range.clone()]).fill(h);
        }
    }

    Ok(PermutationEntropyMap {
        values,
        windows,
        skipped,
    })
}

#[cfg(not(feature = "parallel"))]
fn map_rows(
    x: ArrayView2<'_, f64>,
    windows: &[Range<usize>],
    config: &PermutationEntropyMapConfig,
) -> Vec<Result<Vec<Option<f64>>>> {
    x.outer_iter()
        .enumerate()
        .map(|(row, series)| row_entropies(row, series, windows, config))
        .collect()
}

#[cfg(feature = "parallel")]
fn map_rows(
    x: ArrayView2<'_, f64>,
    windows: &[Range<usize>],
    config: &PermutationEntropyMapConfig,
) -> Vec<Result<Vec<Option<f64>>>> {
    use rayon::prelude::*;
    (0..x.nrows())
        .into_par_iter()
        .map(|row| row_entropies(row, x.row(row), windows, config))
        .collect()
}

/// Entropy of every window of one row; `None` marks a skipped window.
fn row_entropies(
    row: usize,
    series: ArrayView1<'_, f64>,
    windows: &[Range<usize>],
    config: &PermutationEntropyMapConfig,
) -> Result<Vec<Option<f64>>> {
    let mut out = Vec::with_capacity(windows.len());
    for (window, range) in windows.iter().enumerate() {
        let segment = series.slice(s![range.clone()]);
        match permutation_entropy(segment, &config.entropy) {
            Ok(h) => out.push(Some(h)),
            Err(source) => {
                let err = InfoError::Window {
                    row,
                    window,
                    source: Box::new(source),
                };
                match config.on_failure {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Skip => {
                        warn!(row, window, error = %err, "Skipping permutation entropy window");
                        out.push(None);
                    }
                }
            }
        }
    }
    Ok(out)
}
