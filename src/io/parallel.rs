// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Parallel decoding.
//!
//! ```text
//!  prescan (caller thread)        rayon pool               aggregator
//! ┌──────────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ scan + checksum      │──▶│ decode sections  │──▶│ reorder by seq   │
//! │ Vec<Step>            │    │ (seq, result)    │    │ append in order  │
//! └──────────────────────┘    └──────────────────┘    └──────────────────┘
//!                               bounded channel
//! ```
//!
//! Framing and checksums are cheap and decide where the scan resumes, so
//! they stay sequential. Section decoding is independent per ensemble and
//! runs on the pool. Results are re-sequenced before they reach the
//! [`Collector`], which makes the output identical to a sequential run.

use std::collections::BTreeMap;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver};
use rayon::prelude::*;
use tracing::debug;

use super::report::Collector;
use super::sequential::Step;
use crate::config::DecodeStrategy;
use crate::pd0::{DecodeOptions, Ensemble, Frame};
use crate::{CodecError, Result};

/// Worker pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolConfig {
    pub num_threads: usize,
    pub channel_capacity: usize,
}

type Outcome = (usize, Result<Ensemble>);

/// Decode prescanned steps on a worker pool.
pub(crate) fn decode_steps(
    steps: Vec<Step<'_>>,
    options: &DecodeOptions,
    pool_config: PoolConfig,
) -> Result<Collector> {
    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_config.num_threads)
        .thread_name(|index| format!("pd0-decoder-{index}"))
        .build()
        .map_err(|e| CodecError::config(format!("failed to create thread pool: {e}")))?;

    let jobs: Vec<(usize, Frame<'_>, u16)> = steps
        .iter()
        .enumerate()
        .filter_map(|(seq, step)| match step {
            Step::Decode { frame, checksum } => Some((seq, *frame, *checksum)),
            _ => None,
        })
        .collect();
    let job_count = jobs.len();

    debug!(
        context = "parallel_decode",
        threads = pool_config.num_threads,
        frames = steps.len(),
        jobs = job_count,
        "starting parallel decode"
    );

    let mut collector = Collector::new(DecodeStrategy::Parallel);
    let (sender, receiver) = bounded::<Outcome>(pool_config.channel_capacity);

    let complete = std::thread::scope(|scope| {
        let jobs = &jobs;
        let pool = &pool;
        scope.spawn(move || {
            pool.install(|| {
                jobs.par_iter()
                    .for_each_with(sender, |sender, (seq, frame, checksum)| {
                        let outcome = Ensemble::decode_validated(frame, *checksum, options);
                        // The receiver outlives every worker.
                        let _ = sender.send((*seq, outcome));
                    });
            });
        });

        let mut pending = BTreeMap::new();
        for (seq, step) in steps.into_iter().enumerate() {
            match step {
                Step::Decode { .. } => {
                    let Some(outcome) = next_in_order(seq, &mut pending, &receiver) else {
                        return false;
                    };
                    collector.frame_found();
                    collector.outcome(outcome);
                }
                Step::Reject(err) => {
                    collector.frame_found();
                    collector.reject(err);
                }
                Step::Truncated(err) => collector.truncate(err),
            }
        }
        true
    });

    if !complete {
        return Err(CodecError::config(
            "worker pool stopped before every frame was decoded",
        ));
    }

    debug!(
        context = "parallel_decode",
        accepted = collector.report.accepted,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "parallel decode complete"
    );
    Ok(collector)
}

/// Wait for the outcome of frame `seq`, parking earlier arrivals.
fn next_in_order(
    seq: usize,
    pending: &mut BTreeMap<usize, Result<Ensemble>>,
    receiver: &Receiver<Outcome>,
) -> Option<Result<Ensemble>> {
    loop {
        if let Some(outcome) = pending.remove(&seq) {
            return Some(outcome);
        }
        let (arrived, outcome) = receiver.recv().ok()?;
        pending.insert(arrived, outcome);
    }
}
