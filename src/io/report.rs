// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-run decode statistics and the shared accept/reject bookkeeping.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use crate::config::DecodeStrategy;
use crate::core::{CodecError, ErrorKind};
use crate::pd0::Ensemble;
use crate::store::AggregateStore;

/// Summary of one decode run.
#[derive(Debug, Default)]
pub struct DecodeReport {
    /// Strategy the run actually used (never `Auto`)
    pub strategy: DecodeStrategy,
    /// Candidate frames matched by the scanner, truncated frame included
    pub frames_found: usize,
    /// Ensembles appended to the store
    pub accepted: usize,
    /// Rejected ensembles per error class
    pub rejections: HashMap<ErrorKind, usize>,
    /// Offset of the truncated ensemble that stopped the scan
    pub truncated_at: Option<usize>,
    /// Every per-ensemble error, in buffer order
    pub warnings: Vec<CodecError>,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl DecodeReport {
    /// Rejected ensembles of one error class.
    pub fn rejected(&self, kind: ErrorKind) -> usize {
        self.rejections.get(&kind).copied().unwrap_or(0)
    }

    /// Rejected ensembles of every class.
    pub fn rejected_total(&self) -> usize {
        self.rejections.values().sum()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_at.is_some()
    }
}

/// Store and report under construction.
///
/// Both strategies feed outcomes through here in buffer order, which is
/// what keeps their output identical.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    pub store: AggregateStore,
    pub report: DecodeReport,
}

impl Collector {
    pub fn new(strategy: DecodeStrategy) -> Self {
        Self {
            store: AggregateStore::new(),
            report: DecodeReport {
                strategy,
                ..DecodeReport::default()
            },
        }
    }

    pub fn frame_found(&mut self) {
        self.report.frames_found += 1;
    }

    pub fn accept(&mut self, ensemble: Ensemble) {
        self.store.append(ensemble);
        self.report.accepted += 1;
    }

    /// Record a decode outcome for one frame.
    pub fn outcome(&mut self, outcome: crate::Result<Ensemble>) {
        match outcome {
            Ok(ensemble) => self.accept(ensemble),
            Err(err) => self.reject(err),
        }
    }

    /// Skip one ensemble.
    pub fn reject(&mut self, err: CodecError) {
        warn!(
            context = "pd0_decode",
            kind = err.kind().as_str(),
            offset = err.offset(),
            details = ?err.log_fields(),
            "skipping ensemble: {err}"
        );
        *self.report.rejections.entry(err.kind()).or_insert(0) += 1;
        self.report.warnings.push(err);
    }

    /// Stop at a truncated ensemble.
    pub fn truncate(&mut self, err: CodecError) {
        warn!(
            context = "pd0_scan",
            offset = err.offset(),
            details = ?err.log_fields(),
            "stopping scan: {err}"
        );
        self.report.frames_found += 1;
        self.report.truncated_at = err.offset();
        self.report.warnings.push(err);
    }

    pub fn finish(mut self, elapsed: Duration) -> (AggregateStore, DecodeReport) {
        self.report.elapsed = elapsed;
        (self.store, self.report)
    }
}
