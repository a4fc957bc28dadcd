// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder pattern for creating configured readers.

use std::path::Path;

use crate::config::{DecodeStrategy, DecoderConfig};
use crate::Result;

use super::DvlReader;

/// Builder for [`DvlReader`].
///
/// # Example
///
/// ```rust,no_run
/// use dvlcodec::io::DecoderBuilder;
/// use dvlcodec::DecodeStrategy;
///
/// let reader = DecoderBuilder::new()
///     .strategy(DecodeStrategy::Parallel)
///     .num_threads(4)
///     .build()?;
/// let decoded = reader.decode_file("glider.pd0")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecoderBuilder {
    config: DecoderConfig,
}

impl DecoderBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Start from a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_config(DecoderConfig::from_file(path)?))
    }

    /// Set the decode strategy.
    pub fn strategy(mut self, strategy: DecodeStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the number of worker threads.
    ///
    /// This only has an effect on parallel runs.
    pub fn num_threads(mut self, count: usize) -> Self {
        self.config.num_threads = Some(count);
        self
    }

    /// Set the candidate frame count at which `Auto` goes parallel.
    pub fn parallel_threshold(mut self, frames: usize) -> Self {
        self.config.parallel_threshold = frames;
        self
    }

    /// Set the capacity of the bounded merge channel.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Enforce or relax the fixed leader constant fields.
    pub fn strict_constants(mut self, strict: bool) -> Self {
        self.config.strict_constants = strict;
        self
    }

    /// Validate the configuration and build the reader.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Config`](crate::CodecError::Config) if
    /// `num_threads` or `channel_capacity` is zero.
    pub fn build(self) -> Result<DvlReader> {
        self.config.validate()?;
        Ok(DvlReader {
            config: self.config,
        })
    }
}
