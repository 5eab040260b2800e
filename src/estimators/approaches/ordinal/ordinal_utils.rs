// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{InfoError, Result};
use crate::estimators::config::validate_embedding;

/// Stable argsort for f64 values.
///
/// Writes into `idx` the indices that sort `window` ascending. Ties keep their
/// original index order (earlier index first). NaN compares greater than every
/// number.
pub fn argsort(window: &[f64], idx: &mut [usize]) {
    debug_assert_eq!(window.len(), idx.len());
    for (i, val) in idx.iter_mut().enumerate() {
        *val = i;
    }
    idx.sort_by(|&i, &j| {
        let (a, b) = (window[i], window[j]);
        match a.partial_cmp(&b) {
            Some(Ordering::Equal) => i.cmp(&j),
            Some(ord) => ord,
            None => match (a.is_nan(), b.is_nan()) {
                (true, true) => i.cmp(&j),
                (true, false) => Ordering::Greater,
                _ => Ordering::Less,
            },
        }
    });
}

/// Invert a sorting order: `ranks[order[r]] = r`.
///
/// Applied to the output of [`argsort`] this gives the rank of every position,
/// which is the ordinal pattern of the window.
pub fn ranks_from_order(order: &[usize], ranks: &mut [usize]) {
    for (r, &i) in order.iter().enumerate() {
        ranks[i] = r;
    }
}

/// Ordinal pattern (rank vector) of a single window.
pub fn ordinal_pattern(window: &[f64]) -> Vec<usize> {
    let mut order = vec![0; window.len()];
    let mut ranks = vec![0; window.len()];
    argsort(window, &mut order);
    ranks_from_order(&order, &mut ranks);
    ranks
}

/// Factorials 0!, 1!, ..., (n-1)!.
fn factorials(n: usize) -> Vec<u64> {
    let mut fact = vec![1u64; n.max(1)];
    for i in 1..n {
        fact[i] = fact[i - 1] * i as u64;
    }
    fact
}

/// `dim!` as a float, the size of the pattern space.
pub fn pattern_space_size(dim: usize) -> f64 {
    (1..=dim).map(|i| i as f64).product()
}

/// Lehmer code (factoradic rank) of a permutation of 0..m-1.
///
/// Distinct permutations map to distinct codes in `0..m!`. Panics for m > 20
/// since 21! overflows a u64.
pub fn lehmer_code(perm: &[usize]) -> u64 {
    assert!(
        perm.len() <= 20,
        "For embedding dimensions larger than 20, the integer will be too large for u64."
    );
    lehmer_code_with_fact(perm, &factorials(perm.len()))
}

fn lehmer_code_with_fact(perm: &[usize], fact: &[u64]) -> u64 {
    let n = perm.len();
    let mut acc = 0u64;
    for i in 0..n {
        let smaller_after = perm[i + 1..].iter().filter(|&&p| p < perm[i]).count() as u64;
        acc += smaller_after * fact[n - 1 - i];
    }
    acc
}

/// Number of delay-embedded windows of a series of length `len`.
pub fn window_count(len: usize, dim: usize, tau: usize) -> Result<usize> {
    validate_embedding(dim, tau)?;
    let span = (dim - 1) * tau;
    if len <= span {
        return Err(InfoError::SeriesTooShort { len, dim, tau });
    }
    Ok(len - span)
}

/// Visit the ordinal pattern of every window `i, i+tau, ..., i+(dim-1)tau`.
fn for_each_pattern<F>(series: ArrayView1<'_, f64>, dim: usize, tau: usize, mut f: F) -> Result<usize>
where
    F: FnMut(usize, &[usize]),
{
    let n_windows = window_count(series.len(), dim, tau)?;

    // Reused buffers
    let mut w = vec![0.0; dim];
    let mut order = vec![0usize; dim];
    let mut ranks = vec![0usize; dim];

    for t in 0..n_windows {
        for (j, slot) in w.iter_mut().enumerate() {
            *slot = series[t + j * tau];
        }
        argsort(&w, &mut order);
        ranks_from_order(&order, &mut ranks);
        f(t, &ranks);
    }
    Ok(n_windows)
}

/// Ordinal patterns of a series, one row per window start.
///
/// Returns an array of shape `(n - (dim-1)·tau, dim)`; row `i` holds the rank of each
/// of the `dim` sampled values of window `i`.
pub fn ordinal_patterns(series: ArrayView1<'_, f64>, dim: usize, tau: usize) -> Result<Array2<usize>> {
    let n_windows = window_count(series.len(), dim, tau)?;
    let mut out = Array2::<usize>::zeros((n_windows, dim));
    for_each_pattern(series, dim, tau, |t, ranks| {
        for (dst, &r) in out.row_mut(t).iter_mut().zip(ranks) {
            *dst = r;
        }
    })?;
    Ok(out)
}

/// Lehmer codes of the ordinal patterns of a series.
pub fn symbolize_series(series: ArrayView1<'_, f64>, dim: usize, tau: usize) -> Result<Array1<u64>> {
    let fact = factorials(dim);
    let mut out = Vec::new();
    for_each_pattern(series, dim, tau, |_, ranks| {
        out.push(lehmer_code_with_fact(ranks, &fact));
    })?;
    Ok(Array1::from(out))
}

/// Empirical distribution of the patterns observed in one series.
///
/// Only observed patterns are listed; they are sorted lexicographically, so
/// `patterns.row(k)` has probability `probs[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDistribution {
    /// Distinct observed patterns, shape `(n_distinct, dim)`.
    pub patterns: Array2<usize>,
    pub counts: Vec<usize>,
    pub probs: Array1<f64>,
    /// For every window, the row of `patterns` it belongs to.
    pub inverse: Vec<usize>,
    pub n_windows: usize,
}

impl PatternDistribution {
    pub fn from_patterns(patterns: ArrayView2<'_, usize>) -> Self {
        let (n_windows, dim) = patterns.dim();
        let mut counts: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for row in patterns.rows() {
            *counts.entry(row.to_vec()).or_insert(0) += 1;
        }

        let n_distinct = counts.len();
        let mut distinct = Array2::<usize>::zeros((n_distinct, dim));
        let mut count_vec = Vec::with_capacity(n_distinct);
        for (k, (pattern, &count)) in counts.iter().enumerate() {
            for (dst, &r) in distinct.row_mut(k).iter_mut().zip(pattern) {
                *dst = r;
            }
            count_vec.push(count);
        }

        let slot: BTreeMap<&[usize], usize> = counts
            .keys()
            .enumerate()
            .map(|(k, p)| (p.as_slice(), k))
            .collect();
        let inverse = patterns
            .rows()
            .into_iter()
            .map(|row| slot[row.to_vec().as_slice()])
            .collect();

        let n_f = n_windows as f64;
        let probs = count_vec.iter().map(|&c| c as f64 / n_f).collect();

        Self {
            patterns: distinct,
            counts: count_vec,
            probs,
            inverse,
            n_windows,
        }
    }

    pub fn n_distinct(&self) -> usize {
        self.counts.len()
    }
}

/// Ordinal patterns together with their empirical distribution.
pub fn ordinal_patterns_with_probs(
    series: ArrayView1<'_, f64>,
    dim: usize,
    tau: usize,
) -> Result<(Array2<usize>, PatternDistribution)> {
    let patterns = ordinal_patterns(series, dim, tau)?;
    let dist = PatternDistribution::from_patterns(patterns.view());
    Ok((patterns, dist))
}
