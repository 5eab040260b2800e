// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use ndarray::Array2;

use crate::error::{InfoError, Result};

/// Leave-one-out index matrix for multiplets of `m` variables.
///
/// Row `r` is `(0, ..., m-1)` rotated left by `r` positions with the first column
/// dropped: it lists every position except `r`. Gathering a multiplet with row `r`
/// selects the `m-1` variables that remain after removing variable `r`.
pub fn leave_one_out_indices(m: usize) -> Result<Array2<usize>> {
    if m < 2 {
        return Err(InfoError::InvalidMultipletSize { size: m });
    }
    Ok(Array2::from_shape_fn((m, m - 1), |(r, c)| (r + c + 1) % m))
}

/// Memoized [`leave_one_out_indices`], keyed by multiplet size.
#[derive(Debug, Default)]
pub struct LeaveOneOutCache {
    by_size: HashMap<usize, Array2<usize>>,
}

impl LeaveOneOutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, m: usize) -> Result<&Array2<usize>> {
        if !self.by_size.contains_key(&m) {
            let ind = leave_one_out_indices(m)?;
            self.by_size.insert(m, ind);
        }
        self.by_size
            .get(&m)
            .ok_or(InfoError::InvalidMultipletSize { size: m })
    }

    pub fn len(&self) -> usize {
        self.by_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_size.is_empty()
    }
}
