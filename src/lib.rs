// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # hoinfo
//!
//! Information-theoretic measures for multivariate time series: Gaussian differential
//! entropy, O-information of groups of variables ("multiplets") and permutation
//! entropy of scalar series.
//!
//! ## Quick Start
//!
//! ```rust
//! use hoinfo::estimators::config::{LogBase, PermutationEntropyConfig};
//! use hoinfo::estimators::entropy::Entropy;
//! use hoinfo::estimators::traits::GlobalValue;
//! use ndarray::array;
//!
//! let series = array![4.0, 7.0, 9.0, 10.0, 6.0, 11.0, 3.0];
//! let config = PermutationEntropyConfig::new(3, 1)
//!     .with_base(LogBase::Two)
//!     .with_normalized(false);
//! let pe = Entropy::new_permutation(series.view(), config)?.global_value();
//! assert!((pe - 1.5219).abs() < 1e-3);
//! # Ok::<(), hoinfo::InfoError>(())
//! ```
//!
//! ## Measures
//!
//! | Measure | Input | Output |
//! |---------|-------|--------|
//! | Gaussian entropy | (..., n_vars, n_trials) | one value per batch index (nats) |
//! | O-information | (n_trials, n_vars, n_times) | multiplet × time table (nats) |
//! | Permutation entropy | 1D series | scalar, or per-window map for 2D input |
//!
//! ## O-information
//!
//! For a multiplet of `m` variables,
//! Ω = (m - 2) H(X) + Σ_j [ H(X_j) - H(X_{-j}) ].
//! Positive values indicate redundancy-dominated, negative values synergy-dominated
//! interactions. The [`HoiEngine`](estimators::approaches::hoi::engine::HoiEngine)
//! evaluates every multiplet of a size range at every time point, optionally with a
//! task variable appended to every multiplet.
//!
//! ## Feature Flags
//!
//! - `parallel`: evaluate multiplets and map rows with rayon
//! - `gpu_support`: count ordinal patterns of the permutation entropy map on the GPU

pub mod error;
pub mod estimators;

pub use error::{ErrorKind, InfoError, Result};
