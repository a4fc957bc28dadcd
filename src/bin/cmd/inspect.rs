// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show run summary and raw frame listing.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{decode_file, format_duration, format_timestamp, DecodeArgs, Result};
use dvlcodec::pd0::{checksum, FrameScanner};
use dvlcodec::ErrorKind;

/// Inspect file contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show decode summary: counts, time span, cell counts, bottom track coverage
    Info {
        /// Input PD0 file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// List candidate frames with their checksum status
    Frames {
        /// Input PD0 file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum number of frames to list
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input, decode } => cmd_info(input, decode),
            InspectCmd::Frames { input, limit } => cmd_frames(input, limit),
        }
    }
}

/// Cmd: Show decode summary
fn cmd_info(input: PathBuf, args: DecodeArgs) -> Result<()> {
    let decoded = decode_file(&input, &args)?;
    let store = &decoded.store;
    let report = &decoded.report;

    println!("=== {} ===", input.display());
    println!("Strategy: {}", report.strategy);
    println!("Frames found: {}", report.frames_found);
    println!("Ensembles accepted: {}", report.accepted);
    println!(
        "Rejected: {} (checksum {}, structural {})",
        report.rejected_total(),
        report.rejected(ErrorKind::Integrity),
        report.rejected(ErrorKind::Structural)
    );
    if let Some(offset) = report.truncated_at {
        println!("Truncated ensemble at offset {offset}");
    }
    println!("Decode time: {}", format_duration(report.elapsed));

    let times = &store.variable_leader().ensemble_start_time;
    if let (Some(&start), Some(&end)) = (times.first(), times.last()) {
        println!();
        println!("Start: {}", format_timestamp(start));
        println!("End: {}", format_timestamp(end));
        if end >= start {
            println!(
                "Duration: {}",
                format_duration(std::time::Duration::from_secs_f64(end - start))
            );
        }
    }

    let cells: BTreeSet<u8> = store.fixed_leader().num_cells.iter().copied().collect();
    let cells: Vec<String> = cells.iter().map(u8::to_string).collect();
    println!("Depth cells: {}", cells.join(", "));

    let with_bottom = store
        .bottom_track()
        .bottom_track_id
        .iter()
        .filter(|id| !id.is_nan())
        .count();
    if !store.is_empty() {
        println!(
            "Bottom track: {}/{} ensembles ({:.1}%)",
            with_bottom,
            store.len(),
            100.0 * with_bottom as f64 / store.len() as f64
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  {warning}");
        }
    }

    Ok(())
}

/// Cmd: List frames
fn cmd_frames(input: PathBuf, limit: Option<usize>) -> Result<()> {
    let data = std::fs::read(&input)?;
    let mut scanner = FrameScanner::new(&data);
    let limit = limit.unwrap_or(usize::MAX);

    println!("{:>10}  {:>6}  {:<8}  HEADER", "OFFSET", "BYTES", "CHECKSUM");

    let mut listed = 0;
    while listed < limit {
        let Some(next) = scanner.next() else {
            break;
        };
        listed += 1;
        match next {
            Ok(frame) => {
                let status = match checksum::validate(&frame) {
                    Ok(_) => {
                        scanner.resume_at(frame.end());
                        "ok"
                    }
                    Err(_) => "MISMATCH",
                };
                println!(
                    "{:>10}  {:>6}  {:<8}  {}",
                    frame.offset,
                    frame.declared_len(),
                    status,
                    hex::encode(frame.header_bytes())
                );
            }
            Err(err) => println!("{err}"),
        }
    }

    println!();
    println!("{listed} frame(s) listed");
    Ok(())
}
