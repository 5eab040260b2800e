// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{ArrayD, ArrayViewD};

use crate::error::Result;
use crate::estimators::approaches::gaussian::copnorm::GaussianCopula;
use crate::estimators::approaches::hoi::engine::{HoiEngine, HoiInput, OInfoTable};
use crate::estimators::approaches::hoi::indexer::leave_one_out_indices;
use crate::estimators::approaches::hoi::oinfo::compute_oinfo;
use crate::estimators::config::HoiConfig;

/// O-information entry points.
pub struct OInformation;

impl OInformation {
    /// O-information of one multiplet sample shaped (..., m, n_trials).
    ///
    /// The sample is expected to be normalized and demeaned across trials already.
    pub fn multiplet(data: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>> {
        let m = data.shape().iter().rev().nth(1).copied().unwrap_or(0);
        let ind = leave_one_out_indices(m)?;
        compute_oinfo(data, &ind)
    }

    /// Dynamic O-information of every multiplet in the configured size range,
    /// using the Gaussian-copula normalizer.
    pub fn dynamic(input: &HoiInput<'_>, config: HoiConfig) -> Result<OInfoTable> {
        HoiEngine::<GaussianCopula>::new(config).compute(input)
    }
}
