// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout dvlcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error taxonomy for decode runs
//! - [`ColumnRef`] - Borrowed view of one output column
//! - [`SectionKind`] - PD0 data section identifier

pub mod column;
pub mod error;

pub use column::{ColumnData, ColumnRef};
pub use error::{CodecError, ErrorKind, Result};

/// PD0 data section identifier.
///
/// Each section starts with a little-endian 16-bit type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    /// Instrument configuration, type id 0x0000
    FixedLeader,
    /// Per-ensemble status and environment, type id 0x0080
    VariableLeader,
    /// Water velocity per depth cell, type id 0x0100
    Velocity,
    /// Correlation magnitude per depth cell, type id 0x0200
    CorrelationMagnitude,
    /// Echo intensity per depth cell, type id 0x0300
    EchoIntensity,
    /// Percent good per depth cell, type id 0x0400
    PercentGood,
    /// Bottom track, type id 0x0600
    BottomTrack,
}

impl SectionKind {
    /// All section kinds, in the order the instrument writes them.
    pub const ALL: [SectionKind; 7] = [
        SectionKind::FixedLeader,
        SectionKind::VariableLeader,
        SectionKind::Velocity,
        SectionKind::CorrelationMagnitude,
        SectionKind::EchoIntensity,
        SectionKind::PercentGood,
        SectionKind::BottomTrack,
    ];

    /// Wire type id of this section.
    pub fn type_id(&self) -> u16 {
        match self {
            SectionKind::FixedLeader => 0,
            SectionKind::VariableLeader => 128,
            SectionKind::Velocity => 256,
            SectionKind::CorrelationMagnitude => 512,
            SectionKind::EchoIntensity => 768,
            SectionKind::PercentGood => 1024,
            SectionKind::BottomTrack => 1536,
        }
    }

    /// Look up a section kind by its wire type id.
    pub fn from_type_id(type_id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == type_id)
    }

    /// Whether the section carries one record per depth cell.
    pub fn is_cell_indexed(&self) -> bool {
        matches!(
            self,
            SectionKind::Velocity
                | SectionKind::CorrelationMagnitude
                | SectionKind::EchoIntensity
                | SectionKind::PercentGood
        )
    }

    /// Whether every accepted ensemble must contain this section.
    pub fn is_required(&self) -> bool {
        !matches!(self, SectionKind::BottomTrack)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::FixedLeader => "fixed leader",
            SectionKind::VariableLeader => "variable leader",
            SectionKind::Velocity => "velocity",
            SectionKind::CorrelationMagnitude => "correlation magnitude",
            SectionKind::EchoIntensity => "echo intensity",
            SectionKind::PercentGood => "percent good",
            SectionKind::BottomTrack => "bottom track",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_lookup() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(SectionKind::from_type_id(0x0500), None);
        assert_eq!(SectionKind::from_type_id(1536), Some(SectionKind::BottomTrack));
    }

    #[test]
    fn test_cell_indexed() {
        assert!(SectionKind::Velocity.is_cell_indexed());
        assert!(SectionKind::PercentGood.is_cell_indexed());
        assert!(!SectionKind::FixedLeader.is_cell_indexed());
        assert!(!SectionKind::BottomTrack.is_cell_indexed());
    }

    #[test]
    fn test_only_bottom_track_is_optional() {
        let optional: Vec<_> = SectionKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_required())
            .collect();
        assert_eq!(optional, vec![SectionKind::BottomTrack]);
    }
}
