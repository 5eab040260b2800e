// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InfoError>;

/// Broad category of an [`InfoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid parameters, rejected before any numeric work starts.
    Configuration,
    /// Wrong input representation (e.g. a numeric log base, non-finite samples).
    Type,
    /// Array shapes that cannot be processed.
    Shape,
    /// Cholesky factorization failed on a sample covariance.
    NonPositiveDefiniteCovariance,
}

#[derive(Debug, Error)]
pub enum InfoError {
    #[error("invalid multiplet size range: minsize={minsize} must be < maxsize={maxsize}")]
    InvalidSizeRange { minsize: usize, maxsize: usize },

    #[error("multiplets must hold at least 2 variables, got {size}")]
    InvalidMultipletSize { size: usize },

    #[error("invalid embedding: dim={dim}, tau={tau} (need 2 <= dim <= 20 and tau >= 1)")]
    InvalidEmbedding { dim: usize, tau: usize },

    #[error("base parameter should be \"2\" or \"e\", got {0:?}")]
    InvalidBase(String),

    #[error("base parameter should be a string, got the number {value}")]
    BaseNotString { value: String },

    #[error("invalid time window: fs={fs}, tw={tw} ({reason})")]
    InvalidWindow { fs: f64, tw: f64, reason: &'static str },

    #[error("expected {expected} variable names, got {found}")]
    NameCountMismatch { expected: usize, found: usize },

    #[error("input contains a non-finite value at {index:?}")]
    NonFiniteInput { index: Vec<usize> },

    #[error("shape mismatch: expected {expected}, found {found:?}")]
    ShapeMismatch {
        expected: &'static str,
        found: Vec<usize>,
    },

    #[error("need at least 2 trials to estimate a covariance, got {n_trials}")]
    InsufficientTrials { n_trials: usize },

    #[error("series of length {len} is too short for dim={dim}, tau={tau}")]
    SeriesTooShort { len: usize, dim: usize, tau: usize },

    #[error(
        "covariance is not positive definite for input of shape {shape:?} at batch index {batch_index:?}"
    )]
    NonPositiveDefiniteCovariance {
        shape: Vec<usize>,
        batch_index: Vec<usize>,
    },

    #[error("multiplet {label} failed (time index {time:?})")]
    Multiplet {
        label: String,
        time: Option<usize>,
        #[source]
        source: Box<InfoError>,
    },

    #[error("permutation entropy failed in row {row}, window {window}")]
    Window {
        row: usize,
        window: usize,
        #[source]
        source: Box<InfoError>,
    },
}

impl InfoError {
    /// Category of the error; wrapped errors report the kind of their cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InfoError::InvalidSizeRange { .. }
            | InfoError::InvalidMultipletSize { .. }
            | InfoError::InvalidEmbedding { .. }
            | InfoError::InvalidBase(_)
            | InfoError::InvalidWindow { .. }
            | InfoError::NameCountMismatch { .. } => ErrorKind::Configuration,
            InfoError::BaseNotString { .. } | InfoError::NonFiniteInput { .. } => ErrorKind::Type,
            InfoError::ShapeMismatch { .. }
            | InfoError::InsufficientTrials { .. }
            | InfoError::SeriesTooShort { .. } => ErrorKind::Shape,
            InfoError::NonPositiveDefiniteCovariance { .. } => {
                ErrorKind::NonPositiveDefiniteCovariance
            }
            InfoError::Multiplet { source, .. } | InfoError::Window { source, .. } => source.kind(),
        }
    }
}
