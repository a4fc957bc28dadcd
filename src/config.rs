// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoder configuration.
//!
//! A [`DecoderConfig`] can be written by hand, loaded from TOML or built
//! through [`DecoderBuilder`](crate::io::DecoderBuilder). Every field has a
//! default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! strategy = "parallel"
//! num_threads = 4
//! strict_constants = false
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pd0::DecodeOptions;
use crate::{CodecError, Result};

/// Default candidate frame count at which `Auto` switches to parallel decoding.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Default capacity of the bounded channel between workers and the aggregator.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Decode strategy selector.
///
/// - Sequential: scan, validate, decode and append in a single pass
/// - Parallel: prescan frames, decode them on a worker pool, merge in order
/// - Auto: prescan, then go parallel for large inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    Sequential,
    Parallel,
    #[default]
    Auto,
}

impl DecodeStrategy {
    /// Resolve `Auto` to a concrete strategy for `candidates` prescanned frames.
    pub fn resolve(&self, candidates: usize, parallel_threshold: usize) -> DecodeStrategy {
        match self {
            DecodeStrategy::Auto if candidates >= parallel_threshold => DecodeStrategy::Parallel,
            DecodeStrategy::Auto => DecodeStrategy::Sequential,
            other => *other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeStrategy::Sequential => "sequential",
            DecodeStrategy::Parallel => "parallel",
            DecodeStrategy::Auto => "auto",
        }
    }

    /// Check if this is the sequential strategy.
    pub fn is_sequential(&self) -> bool {
        matches!(self, DecodeStrategy::Sequential)
    }

    /// Check if this is the parallel strategy.
    pub fn is_parallel(&self) -> bool {
        matches!(self, DecodeStrategy::Parallel)
    }

    /// Check if this is the auto strategy.
    pub fn is_auto(&self) -> bool {
        matches!(self, DecodeStrategy::Auto)
    }
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodeStrategy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(DecodeStrategy::Sequential),
            "parallel" => Ok(DecodeStrategy::Parallel),
            "auto" => Ok(DecodeStrategy::Auto),
            other => Err(CodecError::config(format!(
                "unknown strategy '{other}', expected auto, sequential or parallel"
            ))),
        }
    }
}

/// Settings for one decode run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Decode strategy
    pub strategy: DecodeStrategy,
    /// Worker threads for parallel decoding (None = number of CPUs)
    pub num_threads: Option<usize>,
    /// Candidate frame count at which `Auto` goes parallel
    pub parallel_threshold: usize,
    /// Capacity of the bounded merge channel
    pub channel_capacity: usize,
    /// Enforce the fixed leader constant fields
    pub strict_constants: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strategy: DecodeStrategy::Auto,
            num_threads: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            strict_constants: true,
        }
    }
}

impl DecoderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CodecError::config(format!("invalid decoder config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodecError::config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CodecError::config(e.to_string()))
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(CodecError::config("num_threads must be at least 1"));
        }
        if self.channel_capacity == 0 {
            return Err(CodecError::config("channel_capacity must be at least 1"));
        }
        Ok(())
    }

    /// Worker thread count, falling back to the number of CPUs.
    pub fn threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Per-ensemble decode options derived from this config.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            strict_constants: self.strict_constants,
        }
    }
}
