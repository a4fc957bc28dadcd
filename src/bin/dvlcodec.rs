// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # dvlcodec CLI
//!
//! Command-line tool for glider DVL PD0 files.
//!
//! ## Usage
//!
//! ```sh
//! # Show decode summary
//! dvlcodec inspect info glider.pd0
//!
//! # List raw frames
//! dvlcodec inspect frames glider.pd0 --limit 20
//!
//! # Decode to JSON or CSV
//! dvlcodec decode glider.pd0 -o glider.json
//! dvlcodec decode glider.pd0 --format csv --strategy parallel --threads 4
//!
//! # List output columns
//! dvlcodec fields
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, FieldsCmd, InspectCmd};
use common::Result;

/// dvlcodec - glider DVL PD0 decoder
///
/// Decode Teledyne RDI PD0 ensembles into named columns.
#[derive(Parser, Clone)]
#[command(name = "dvlcodec")]
#[command(about = "Decoder for glider DVL PD0 ensemble files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Log decode details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect file contents (info, frames)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Decode ensembles to JSON or CSV
    Decode(DecodeCmd),

    /// List output column names
    Fields(FieldsCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Decode(cmd) => cmd.run(),
        Commands::Fields(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
