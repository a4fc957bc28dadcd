// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # dvlcodec
//!
//! Decoder for Teledyne RDI PD0 ensembles written by the ExplorerDVL aboard
//! Slocum gliders.
//!
//! A recorded DVL file is a stream of back-to-back ensembles, each carrying
//! its own length, offset table and checksum. This library frames them,
//! validates them, decodes every section and aggregates the results into
//! one column per named field.
//!
//! ## Architecture
//!
//! - `core/` - Error taxonomy, column views and section identifiers
//! - `pd0/` - Wire format: scanner, checksum, header, sections, writer
//! - `store/` - Columnar aggregate of accepted ensembles
//! - `io/` - Decode runs with sequential or parallel strategies
//! - `config` - Decoder settings, loadable from TOML
//! - `export` - JSON and CSV output
//!
//! ## Example: Decoding a file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dvlcodec::io::DvlReader;
//!
//! let decoded = DvlReader::open("glider.pd0")?;
//! let store = &decoded.store;
//! println!("{} ensembles, {} rejected", store.len(), decoded.report.rejected_total());
//!
//! if let Some(depth) = store.column("transducer_depth") {
//!     println!("first depth: {:?}", depth.get_f64(0));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Parallel decoding of a buffer
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dvlcodec::io::DecoderBuilder;
//! use dvlcodec::DecodeStrategy;
//!
//! let bytes = std::fs::read("glider.pd0")?;
//! let reader = DecoderBuilder::new()
//!     .strategy(DecodeStrategy::Parallel)
//!     .num_threads(4)
//!     .build()?;
//! let decoded = reader.decode(&bytes)?;
//! dvlcodec::export::to_json_writer(&decoded.store, std::io::stdout(), false)?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{CodecError, ColumnRef, ErrorKind, Result, SectionKind};

// PD0 wire format
pub mod pd0;

pub use pd0::{DecodeOptions, Ensemble, EnsembleWriter};

// Columnar output
pub mod store;

pub use store::{AggregateStore, BOTTOM_TRACK_FIELDS};

// Decoder settings
pub mod config;

pub use config::{DecodeStrategy, DecoderConfig};

// Decode runs
pub mod io;

pub use io::{DecodeReport, Decoded, DecoderBuilder, DvlReader};

// JSON / CSV output
pub mod export;
