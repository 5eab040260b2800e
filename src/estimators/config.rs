// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration objects passed explicitly into the estimators and the HOI engine.
//!
//! All structs implement `serde::Deserialize`, so they can be read from any serde
//! format. Validation happens once, before numeric work starts.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{InfoError, Result};

/// Largest embedding dimension whose Lehmer code fits into a `u64`.
pub const MAX_EMBEDDING_DIM: usize = 20;

/// Upper bound on the multiplet size.
///
/// Serialized as an integer, or as `"auto"` (also accepted: `null`) for [`MaxSize::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxSize {
    /// Use every available variable.
    #[default]
    Auto,
    /// Explicit bound, clipped to the number of variables.
    Bounded(usize),
}

impl MaxSize {
    /// Resolve against `n_vars` variables.
    pub fn resolve(self, n_vars: usize) -> usize {
        match self {
            MaxSize::Auto => n_vars,
            MaxSize::Bounded(m) => m.max(1).min(n_vars),
        }
    }
}

impl From<usize> for MaxSize {
    fn from(value: usize) -> Self {
        MaxSize::Bounded(value)
    }
}

impl Serialize for MaxSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MaxSize::Auto => serializer.serialize_str("auto"),
            MaxSize::Bounded(m) => serializer.serialize_u64(*m as u64),
        }
    }
}

struct MaxSizeVisitor;

impl<'de> Visitor<'de> for MaxSizeVisitor {
    type Value = MaxSize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or \"auto\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<MaxSize, E> {
        usize::try_from(v)
            .map(MaxSize::Bounded)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<MaxSize, E> {
        usize::try_from(v)
            .map(MaxSize::Bounded)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<MaxSize, E> {
        match v {
            "auto" => Ok(MaxSize::Auto),
            other => Err(E::invalid_value(Unexpected::Str(other), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<MaxSize, E> {
        Ok(MaxSize::Auto)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<MaxSize, E> {
        Ok(MaxSize::Auto)
    }
}

impl<'de> Deserialize<'de> for MaxSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(MaxSizeVisitor)
    }
}

/// What to do when one multiplet or one window fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the first error; no partial result.
    #[default]
    Abort,
    /// Fill the failing unit with NaN, record it and continue.
    Skip,
}

/// Configuration of the higher-order interaction (O-information) engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoiConfig {
    pub minsize: usize,
    pub maxsize: MaxSize,
    pub on_failure: FailurePolicy,
}

impl Default for HoiConfig {
    fn default() -> Self {
        Self {
            minsize: 3,
            maxsize: MaxSize::Bounded(5),
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl HoiConfig {
    pub fn new(minsize: usize, maxsize: impl Into<MaxSize>) -> Self {
        Self {
            minsize,
            maxsize: maxsize.into(),
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Validate against `n_vars` variables and return the effective `(minsize, maxsize)`.
    ///
    /// `task_related` adds the target to every multiplet, so a multiplet of size 1 is
    /// only meaningful in that mode.
    pub fn size_range(&self, n_vars: usize, task_related: bool) -> Result<(usize, usize)> {
        let maxsize = self.maxsize.resolve(n_vars);
        if maxsize <= self.minsize {
            return Err(InfoError::InvalidSizeRange {
                minsize: self.minsize,
                maxsize,
            });
        }
        let smallest = self.minsize + usize::from(task_related);
        if smallest < 2 {
            return Err(InfoError::InvalidMultipletSize { size: smallest });
        }
        Ok((self.minsize, maxsize))
    }
}

/// Logarithm base of Shannon entropies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogBase {
    #[default]
    Two,
    E,
}

impl LogBase {
    pub fn log(self, x: f64) -> f64 {
        match self {
            LogBase::Two => x.log2(),
            LogBase::E => x.ln(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogBase::Two => "2",
            LogBase::E => "e",
        }
    }
}

impl fmt::Display for LogBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogBase {
    type Err = InfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "2" => Ok(LogBase::Two),
            "e" => Ok(LogBase::E),
            other => Err(InfoError::InvalidBase(other.to_string())),
        }
    }
}

impl TryFrom<&str> for LogBase {
    type Error = InfoError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

// Numeric selectors are never coerced, not even 2.
impl TryFrom<i64> for LogBase {
    type Error = InfoError;

    fn try_from(value: i64) -> Result<Self> {
        Err(InfoError::BaseNotString {
            value: value.to_string(),
        })
    }
}

impl TryFrom<f64> for LogBase {
    type Error = InfoError;

    fn try_from(value: f64) -> Result<Self> {
        Err(InfoError::BaseNotString {
            value: value.to_string(),
        })
    }
}

impl Serialize for LogBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct LogBaseVisitor;

impl<'de> Visitor<'de> for LogBaseVisitor {
    type Value = LogBase;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the string \"2\" or \"e\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<LogBase, E> {
        v.parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<LogBase, E> {
        Err(E::invalid_type(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<LogBase, E> {
        Err(E::invalid_type(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<LogBase, E> {
        Err(E::invalid_type(Unexpected::Float(v), &self))
    }
}

impl<'de> Deserialize<'de> for LogBase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(LogBaseVisitor)
    }
}

/// Parameters of the permutation entropy of a single series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationEntropyConfig {
    /// Embedding dimension.
    pub dim: usize,
    /// Embedding delay.
    pub tau: usize,
    pub base: LogBase,
    /// Divide by `log(dim!)`.
    pub normalized: bool,
}

impl Default for PermutationEntropyConfig {
    fn default() -> Self {
        Self {
            dim: 3,
            tau: 1,
            base: LogBase::Two,
            normalized: true,
        }
    }
}

impl PermutationEntropyConfig {
    pub fn new(dim: usize, tau: usize) -> Self {
        Self {
            dim,
            tau,
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: LogBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_embedding(self.dim, self.tau)
    }
}

/// Parameters of the windowed permutation-entropy map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermutationEntropyMapConfig {
    /// Sampling rate.
    pub fs: f64,
    /// Window length, in the time unit of `fs`.
    #[serde(default = "default_tw")]
    pub tw: f64,
    #[serde(flatten)]
    pub entropy: PermutationEntropyConfig,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_tw() -> f64 {
    1.0
}

impl PermutationEntropyMapConfig {
    pub fn new(fs: f64, tw: f64) -> Self {
        Self {
            fs,
            tw,
            entropy: PermutationEntropyConfig::default(),
            on_failure: FailurePolicy::Abort,
        }
    }

    pub fn with_entropy(mut self, entropy: PermutationEntropyConfig) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Samples per window as a real number (`tw * fs`).
    pub fn window_samples(&self) -> f64 {
        self.tw * self.fs
    }

    pub fn validate(&self) -> Result<()> {
        self.entropy.validate()?;
        if !(self.fs.is_finite() && self.fs > 0.0) {
            return Err(InfoError::InvalidWindow {
                fs: self.fs,
                tw: self.tw,
                reason: "sampling rate must be positive",
            });
        }
        if !(self.tw.is_finite() && self.tw > 0.0) {
            return Err(InfoError::InvalidWindow {
                fs: self.fs,
                tw: self.tw,
                reason: "window length must be positive",
            });
        }
        if self.window_samples() < 1.0 {
            return Err(InfoError::InvalidWindow {
                fs: self.fs,
                tw: self.tw,
                reason: "window holds less than one sample",
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_embedding(dim: usize, tau: usize) -> Result<()> {
    if dim < 2 || dim > MAX_EMBEDDING_DIM || tau < 1 {
        return Err(InfoError::InvalidEmbedding { dim, tau });
    }
    Ok(())
}
