// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Ordinal (permutation) estimators module
// This module contains the permutation entropy estimator, its windowed map and utilities.

pub mod ordinal;
#[cfg(feature = "gpu_support")]
pub mod ordinal_gpu;
pub mod ordinal_map;
pub mod ordinal_utils;
