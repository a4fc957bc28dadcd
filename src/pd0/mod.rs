// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Teledyne RDI PD0 ensemble format, as written by the glider-mounted
//! ExplorerDVL.
//!
//! ```text
//! ┌────────┬──────────────┬──────────┬─────┬──────────┬──────────┐
//! │ header │ offset table │ section  │ ... │ section  │ checksum │
//! │ 6 B    │ 2 B × n      │          │     │          │ 2 B      │
//! └────────┴──────────────┴──────────┴─────┴──────────┴──────────┘
//! ```
//!
//! Decoding one ensemble runs scan → checksum → header → sections.
//! [`scanner`] frames candidates, [`checksum`] validates them, [`header`]
//! reads the offset table and [`sections`] decodes the sections it points at.
//! [`Ensemble`] ties these together; [`writer`] is the inverse.

pub mod bits;
pub mod checksum;
pub mod constants;
pub mod cursor;
pub mod ensemble;
pub mod header;
pub mod scanner;
pub mod sections;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use ensemble::Ensemble;
pub use header::EnsembleHeader;
pub use scanner::{Frame, FrameScanner};
pub use writer::EnsembleWriter;

/// Per-ensemble decode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject fixed leaders whose data flag, signal processing mode or beam
    /// count differ from the supported configuration
    pub strict_constants: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_constants: true,
        }
    }
}
