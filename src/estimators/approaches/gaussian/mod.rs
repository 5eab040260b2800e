// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Gaussian (parametric) entropy estimation and the copula pre-transform it relies on.

pub mod copnorm;
pub mod gaussian;
