// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::{InfoError, Result};

/// Separator between variable names in a multiplet label.
pub const LABEL_SEPARATOR: &str = "-";

/// A group of variable indices analysed jointly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiplet {
    /// Ascending variable indices, followed by the target index when task-related.
    pub indices: Vec<usize>,
    pub label: String,
}

impl Multiplet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Iterator over the k-combinations of `0..n` in lexicographic order.
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let current = (k <= n).then(|| (0..k).collect());
        Self { n, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let out = self.current.take()?;
        let k = out.len();
        let mut next = out.clone();
        // Rightmost position that can still be incremented.
        let pivot = (0..k).rev().find(|&i| next[i] < self.n - k + i);
        if let Some(i) = pivot {
            next[i] += 1;
            for j in i + 1..k {
                next[j] = next[j - 1] + 1;
            }
            self.current = Some(next);
        }
        Some(out)
    }
}

/// Number of k-combinations of n elements, None if it does not fit into a `usize`.
pub fn n_combinations(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    // Partial products are binomial coefficients no larger than the result.
    let count = (0..k).try_fold(1u128, |acc, i| {
        acc.checked_mul((n - i) as u128).map(|p| p / (i + 1) as u128)
    })?;
    usize::try_from(count).ok()
}

/// All size-`k` multiplets of `n` variables with their labels.
///
/// `names` holds one name per variable, plus the target name as its last entry when
/// `task_related` is set; the target (index `n`) is then appended to every multiplet.
pub fn get_combinations(
    n: usize,
    k: usize,
    names: &[String],
    task_related: bool,
) -> Result<Vec<Multiplet>> {
    let expected = n + usize::from(task_related);
    if names.len() != expected {
        return Err(InfoError::NameCountMismatch {
            expected,
            found: names.len(),
        });
    }

    let multiplets = Combinations::new(n, k)
        .map(|mut indices| {
            if task_related {
                indices.push(n);
            }
            let label = indices
                .iter()
                .map(|&i| names[i].as_str())
                .collect::<Vec<_>>()
                .join(LABEL_SEPARATOR);
            Multiplet { indices, label }
        })
        .collect();
    Ok(multiplets)
}
