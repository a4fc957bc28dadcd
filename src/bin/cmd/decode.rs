// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - write the decoded columns as JSON or CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::common::{decode_file, DecodeArgs, Result};
use dvlcodec::export;

/// Output format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One object mapping every field to its column
    #[default]
    Json,
    /// Scalar columns, one row per ensemble
    Csv,
}

/// Decode a PD0 file.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Input PD0 file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    decode: DecodeArgs,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let decoded = decode_file(&self.input, &self.decode)?;

        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(std::io::stdout().lock()),
        };
        let mut writer = BufWriter::new(sink);

        match self.format {
            OutputFormat::Json => {
                export::to_json_writer(&decoded.store, &mut writer, self.pretty)?;
                writeln!(writer)?;
            }
            OutputFormat::Csv => export::to_csv_writer(&decoded.store, &mut writer)?,
        }
        writer.flush()?;

        let report = &decoded.report;
        if report.rejected_total() > 0 || report.is_truncated() {
            eprintln!(
                "{} ensembles decoded, {} rejected{}",
                report.accepted,
                report.rejected_total(),
                if report.is_truncated() {
                    ", input truncated"
                } else {
                    ""
                }
            );
        }
        Ok(())
    }
}
