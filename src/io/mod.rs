// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode runs over whole buffers and files.
//!
//! # Strategy Selection
//!
//! - **Sequential**: one pass on the calling thread
//! - **Parallel**: prescan on the calling thread, decode on a worker pool
//! - **Auto**: prescan, then parallel when at least `parallel_threshold`
//!   candidate frames were found
//!
//! Every strategy produces the same [`AggregateStore`] for the same input.
//!
//! # Example
//!
//! ```rust,no_run
//! use dvlcodec::io::DvlReader;
//!
//! let decoded = DvlReader::open("glider.pd0")?;
//! println!("{} ensembles", decoded.store.len());
//! for warning in &decoded.report.warnings {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
mod parallel;
pub mod report;
mod sequential;

pub use builder::DecoderBuilder;
pub use report::DecodeReport;

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::config::{DecodeStrategy, DecoderConfig};
use crate::store::AggregateStore;
use crate::{CodecError, Result};

use parallel::PoolConfig;
use report::Collector;
use sequential::Steps;

/// Result of a decode run.
#[derive(Debug)]
pub struct Decoded {
    /// Columns of every accepted ensemble
    pub store: AggregateStore,
    /// Run statistics and per-ensemble warnings
    pub report: DecodeReport,
}

/// PD0 decoder bound to a validated [`DecoderConfig`].
#[derive(Debug, Clone, Default)]
pub struct DvlReader {
    pub(crate) config: DecoderConfig,
}

impl DvlReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader from a configuration, validating it first.
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        DecoderBuilder::from_config(config).build()
    }

    /// Map `path` and decode it with the default configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Decoded> {
        Self::new().decode_file(path)
    }

    /// Decode an in-memory buffer with the default configuration.
    pub fn from_bytes(buffer: &[u8]) -> Result<Decoded> {
        Self::new().decode(buffer)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Map `path` and decode it.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Decoded> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CodecError::config(format!("cannot open '{}': {e}", path.display()))
        })?;
        let len = file.metadata()?.len();
        if len == 0 {
            // Zero-length files cannot be mapped on every platform.
            return Err(CodecError::EmptyBuffer);
        }

        // SAFETY: the map is read-only and dropped before this call returns.
        // Concurrent truncation of the file by another process is outside
        // what this reader defends against.
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;
        debug!(path = %path.display(), bytes = mmap.len(), "mapped PD0 file");
        self.decode(&mmap)
    }

    /// Decode a buffer holding back-to-back PD0 ensembles.
    ///
    /// Per-ensemble failures are skipped and reported in
    /// [`DecodeReport::warnings`].
    ///
    /// # Errors
    ///
    /// - [`CodecError::EmptyBuffer`] for an empty buffer
    /// - [`CodecError::NoEnsembles`] when no ensemble marker is found
    /// - [`CodecError::Config`] when the worker pool cannot be started
    pub fn decode(&self, buffer: &[u8]) -> Result<Decoded> {
        if buffer.is_empty() {
            return Err(CodecError::EmptyBuffer);
        }

        let start = Instant::now();
        let options = self.config.decode_options();
        let collector = match self.config.strategy {
            DecodeStrategy::Sequential => sequential::decode(buffer, &options),
            strategy => {
                let steps: Vec<_> = Steps::new(buffer).collect();
                let resolved = strategy.resolve(steps.len(), self.config.parallel_threshold);
                debug!(
                    context = "strategy",
                    requested = strategy.as_str(),
                    resolved = resolved.as_str(),
                    candidates = steps.len(),
                    "selected decode strategy"
                );
                match resolved {
                    DecodeStrategy::Parallel => parallel::decode_steps(
                        steps,
                        &options,
                        PoolConfig {
                            num_threads: self.config.threads(),
                            channel_capacity: self.config.channel_capacity,
                        },
                    )?,
                    _ => sequential::decode_steps(steps, &options),
                }
            }
        };

        let (store, report) = Collector::finish(collector, start.elapsed());
        if report.frames_found == 0 {
            return Err(CodecError::NoEnsembles {
                buffer_len: buffer.len(),
            });
        }

        debug!(
            strategy = report.strategy.as_str(),
            frames = report.frames_found,
            accepted = report.accepted,
            rejected = report.rejected_total(),
            truncated = report.is_truncated(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "decode run complete"
        );
        Ok(Decoded { store, report })
    }
}
