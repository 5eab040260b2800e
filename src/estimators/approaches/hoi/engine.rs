// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic, optionally task-related, higher-order interactions.
//!
//! The engine walks every multiplet size in `[minsize, maxsize]`, enumerates the
//! multiplets of that size and evaluates their O-information at every time point in
//! one batched call per multiplet. Results keep the enumeration order: increasing
//! size, then lexicographic order of the variable indices.
//!
//! Failure handling is explicit through [`FailurePolicy`]: with `Abort` the first
//! failing multiplet ends the run, with `Skip` its row is filled with NaN, the
//! failure is logged and recorded in [`OInfoTable::skipped`].

use std::ops::Range;

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView3, Axis, Ix1};
use tracing::{debug, info, warn};

use crate::error::{InfoError, Result};
use crate::estimators::approaches::gaussian::copnorm::GaussianCopula;
use crate::estimators::approaches::hoi::combinations::{Multiplet, get_combinations};
use crate::estimators::approaches::hoi::indexer::LeaveOneOutCache;
use crate::estimators::approaches::hoi::oinfo::compute_oinfo;
use crate::estimators::config::{FailurePolicy, HoiConfig};
use crate::estimators::traits::Normalizer;

/// Default name of the appended target variable.
pub const DEFAULT_TARGET_NAME: &str = "beh";

/// Samples and labels fed to [`HoiEngine::compute`].
#[derive(Debug, Clone)]
pub struct HoiInput<'a> {
    /// Raw samples, shape `(n_trials, n_vars, n_times)`.
    pub data: ArrayView3<'a, f64>,
    /// Task variable, one value per trial.
    pub target: Option<ArrayView1<'a, f64>>,
    pub names: Option<Vec<String>>,
    pub target_name: Option<String>,
    pub times: Option<Vec<f64>>,
}

impl<'a> HoiInput<'a> {
    pub fn new(data: ArrayView3<'a, f64>) -> Self {
        Self {
            data,
            target: None,
            names: None,
            target_name: None,
            times: None,
        }
    }

    pub fn with_target(mut self, target: ArrayView1<'a, f64>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    pub fn with_times(mut self, times: Vec<f64>) -> Self {
        self.times = Some(times);
        self
    }
}

/// A multiplet left out under [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMultiplet {
    pub label: String,
    pub time: Option<usize>,
    pub reason: String,
}

/// O-information per multiplet (rows) and time point (columns).
#[derive(Debug, Clone)]
pub struct OInfoTable {
    /// Shape `(n_multiplets, n_times)`, in nats.
    pub values: Array2<f64>,
    pub multiplets: Vec<Multiplet>,
    /// Multiplet size of every row, not counting the target.
    pub sizes: Vec<usize>,
    pub times: Vec<f64>,
    pub task_related: bool,
    pub minsize: usize,
    pub maxsize: usize,
    pub skipped: Vec<SkippedMultiplet>,
}

impl OInfoTable {
    pub fn n_multiplets(&self) -> usize {
        self.multiplets.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.multiplets.iter().map(|m| m.label.as_str())
    }

    /// O-information time course of the multiplet with this label.
    pub fn row(&self, label: &str) -> Option<ArrayView1<'_, f64>> {
        let i = self.multiplets.iter().position(|m| m.label == label)?;
        Some(self.values.row(i))
    }

    /// Rows holding the multiplets of size `k`.
    pub fn rows_of_size(&self, k: usize) -> Range<usize> {
        let start = self.sizes.partition_point(|&s| s < k);
        let end = self.sizes.partition_point(|&s| s <= k);
        start..end
    }
}

/// Higher-order interactions engine.
///
/// The normalizer is applied to the raw samples once, along the trials axis, before
/// demeaning; use [`Identity`](crate::estimators::approaches::gaussian::copnorm::Identity)
/// for samples that are already normalized.
pub struct HoiEngine<N = GaussianCopula> {
    config: HoiConfig,
    normalizer: N,
}

impl HoiEngine<GaussianCopula> {
    pub fn new(config: HoiConfig) -> Self {
        Self::with_normalizer(config, GaussianCopula)
    }
}

impl<N: Normalizer> HoiEngine<N> {
    pub fn with_normalizer(config: HoiConfig, normalizer: N) -> Self {
        Self { config, normalizer }
    }

    pub fn config(&self) -> &HoiConfig {
        &self.config
    }

    pub fn compute(&self, input: &HoiInput<'_>) -> Result<OInfoTable> {
        let (n_trials, n_vars, n_times) = input.data.dim();
        if n_trials < 2 {
            return Err(InfoError::InsufficientTrials { n_trials });
        }
        check_finite(input.data.indexed_iter().map(|((a, b, c), &v)| (vec![a, b, c], v)))?;
        if let Some(target) = input.target {
            if target.len() != n_trials {
                return Err(InfoError::ShapeMismatch {
                    expected: "target of shape (n_trials,)",
                    found: target.shape().to_vec(),
                });
            }
            check_finite(target.indexed_iter().map(|(i, &v)| (vec![i], v)))?;
        }
        let task_related = input.target.is_some();

        let mut names = match &input.names {
            Some(names) if names.len() != n_vars => {
                return Err(InfoError::NameCountMismatch {
                    expected: n_vars,
                    found: names.len(),
                });
            }
            Some(names) => names.clone(),
            None => (0..n_vars).map(|i| format!("roi{i}")).collect(),
        };
        if task_related {
            names.push(
                input
                    .target_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TARGET_NAME.to_string()),
            );
        }
        let times = match &input.times {
            Some(times) if times.len() != n_times => {
                return Err(InfoError::ShapeMismatch {
                    expected: "times of shape (n_times,)",
                    found: vec![times.len()],
                });
            }
            Some(times) => times.clone(),
            None => (0..n_times).map(|t| t as f64).collect(),
        };

        let (minsize, maxsize) = self.config.size_range(n_vars, task_related)?;
        info!(
            task_related,
            minsize,
            maxsize,
            n_trials,
            n_vars,
            n_times,
            "Compute the HOI"
        );

        let x = self.prepare(input.data, input.target)?;
        let xt = x.view().permuted_axes([2, 1, 0]);

        let mut cache = LeaveOneOutCache::new();
        let mut rows: Vec<Array1<f64>> = Vec::new();
        let mut multiplets = Vec::new();
        let mut sizes = Vec::new();
        let mut skipped = Vec::new();

        for k in minsize..=maxsize {
            let ind = cache.get(k + usize::from(task_related))?;
            let combs = get_combinations(n_vars, k, &names, task_related)?;
            debug!(size = k, n_multiplets = combs.len(), "Multiplets of size {k}");

            let outcomes = oinfo_per_multiplet(xt, &combs, ind, self.config.on_failure);
            for (mult, outcome) in combs.into_iter().zip(outcomes) {
                let row = match outcome {
                    Ok(row) => row,
                    Err(source) => {
                        let time = failing_time(&source);
                        let err = InfoError::Multiplet {
                            label: mult.label.clone(),
                            time,
                            source: Box::new(source),
                        };
                        match self.config.on_failure {
                            FailurePolicy::Abort => return Err(err),
                            FailurePolicy::Skip => {
                                warn!(multiplet = %mult.label, ?time, error = %err, "Skipping multiplet");
                                skipped.push(SkippedMultiplet {
                                    label: mult.label.clone(),
                                    time,
                                    reason: err.to_string(),
                                });
                                Array1::from_elem(n_times, f64::NAN)
                            }
                        }
                    }
                };
                rows.push(row);
                multiplets.push(mult);
                sizes.push(k);
            }
        }

        let mut values = Array2::<f64>::zeros((rows.len(), n_times));
        for (mut dst, row) in values.rows_mut().into_iter().zip(&rows) {
            dst.assign(row);
        }
        info!(
            n_multiplets = multiplets.len(),
            n_skipped = skipped.len(),
            "HOI computed"
        );

        Ok(OInfoTable {
            values,
            multiplets,
            sizes,
            times,
            task_related,
            minsize,
            maxsize,
            skipped,
        })
    }

    /// Append the target, normalize and demean across trials.
    fn prepare(
        &self,
        data: ArrayView3<'_, f64>,
        target: Option<ArrayView1<'_, f64>>,
    ) -> Result<Array3<f64>> {
        let (n_trials, _, n_times) = data.dim();
        let raw = match target {
            Some(y) => {
                let tiled = Array3::from_shape_fn((n_trials, 1, n_times), |(i, _, _)| y[i]);
                ndarray::concatenate(Axis(1), &[data.view(), tiled.view()]).map_err(|_| {
                    InfoError::ShapeMismatch {
                        expected: "(n_trials, n_vars, n_times)",
                        found: data.shape().to_vec(),
                    }
                })?
            }
            None => data.to_owned(),
        };

        debug!("Copnorm the data");
        let mut x = self.normalizer.normalize(raw.view())?;
        if x.dim() != raw.dim() {
            return Err(InfoError::ShapeMismatch {
                expected: "normalized samples with the input shape",
                found: x.shape().to_vec(),
            });
        }
        if let Some(mean) = x.mean_axis(Axis(0)) {
            x -= &mean.insert_axis(Axis(0));
        }
        Ok(x)
    }
}

fn check_finite(values: impl Iterator<Item = (Vec<usize>, f64)>) -> Result<()> {
    for (index, v) in values {
        if !v.is_finite() {
            return Err(InfoError::NonFiniteInput { index });
        }
    }
    Ok(())
}

/// Time index of a covariance failure, when there is one.
fn failing_time(err: &InfoError) -> Option<usize> {
    match err {
        InfoError::NonPositiveDefiniteCovariance { batch_index, .. } => batch_index.first().copied(),
        _ => None,
    }
}

/// O-information time course of one multiplet; `xt` is `(n_times, n_vars, n_trials)`.
fn multiplet_oinfo(
    xt: ArrayView3<'_, f64>,
    mult: &Multiplet,
    ind: &Array2<usize>,
) -> Result<Array1<f64>> {
    let sub = xt.select(Axis(1), &mult.indices);
    let o = compute_oinfo(sub.view().into_dyn(), ind)?;
    o.into_dimensionality::<Ix1>()
        .map_err(|_| InfoError::ShapeMismatch {
            expected: "(n_times,)",
            found: sub.shape().to_vec(),
        })
}

/// Outcomes in enumeration order. Under `Abort` the first error is the last entry.
#[cfg(not(feature = "parallel"))]
fn oinfo_per_multiplet(
    xt: ArrayView3<'_, f64>,
    combs: &[Multiplet],
    ind: &Array2<usize>,
    policy: FailurePolicy,
) -> Vec<Result<Array1<f64>>> {
    let mut out = Vec::with_capacity(combs.len());
    for m in combs {
        let outcome = multiplet_oinfo(xt, m, ind);
        let stop = outcome.is_err() && policy == FailurePolicy::Abort;
        out.push(outcome);
        if stop {
            break;
        }
    }
    out
}

/// Outcomes in enumeration order; every multiplet of the size is evaluated.
#[cfg(feature = "parallel")]
fn oinfo_per_multiplet(
    xt: ArrayView3<'_, f64>,
    combs: &[Multiplet],
    ind: &Array2<usize>,
    _policy: FailurePolicy,
) -> Vec<Result<Array1<f64>>> {
    use rayon::prelude::*;
    combs.par_iter().map(|m| multiplet_oinfo(xt, m, ind)).collect()
}
