// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Section decoders.
//!
//! Each offset-table entry points at a little-endian type id that selects
//! the decoder. A section may use every byte up to the next greater offset
//! (or the end of the ensemble); a layout that needs more than that is a
//! [`CodecError::SectionLength`] error.
//!
//! Cell-indexed sections depend on the depth cell count from the fixed
//! leader of the same ensemble, so [`locate`] only resolves where each
//! section lives and the caller decodes the fixed leader first.

pub mod bottom_track;
pub mod cells;
pub mod fixed_leader;
pub mod variable_leader;

pub use bottom_track::{BottomTrack, BottomTrackColumns};
pub use cells::{
    CorrelationMagnitude, CorrelationMagnitudeColumns, EchoIntensity, EchoIntensityColumns,
    PercentGood, PercentGoodColumns, Velocity, VelocityColumns,
};
pub use fixed_leader::{FixedLeader, FixedLeaderColumns};
pub use variable_leader::{VariableLeader, VariableLeaderColumns};

use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use super::constants::SECTION_ID_LEN;
use super::cursor::Pd0Cursor;
use super::header::EnsembleHeader;
use super::DecodeOptions;
use crate::core::SectionKind;
use crate::{CodecError, Result};

/// Bytes of one section inside an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSlice<'a> {
    /// Section kind resolved from the type id
    pub kind: SectionKind,
    /// Absolute offset of the owning ensemble
    pub ensemble_offset: usize,
    /// Section start relative to the ensemble
    pub position: usize,
    /// Section bytes, type id first, up to the next section
    pub bytes: &'a [u8],
}

impl<'a> SectionSlice<'a> {
    /// Cursor over exactly `needed` bytes, after checking the section id.
    pub fn cursor(&self, needed: usize) -> Result<Pd0Cursor<'a>> {
        let needed = needed.max(SECTION_ID_LEN);
        if self.bytes.len() < needed {
            return Err(CodecError::SectionLength {
                offset: self.ensemble_offset,
                section: self.kind,
                needed,
                available: self.bytes.len(),
            });
        }
        let found = LittleEndian::read_u16(&self.bytes[..SECTION_ID_LEN]);
        if found != self.kind.type_id() {
            return Err(CodecError::SectionIdMismatch {
                offset: self.ensemble_offset,
                section: self.kind,
                expected: self.kind.type_id(),
                found,
            });
        }
        Ok(Pd0Cursor::new(&self.bytes[..needed]))
    }
}

/// Resolve the offset table of `ensemble` into section slices, in table order.
///
/// Unknown type ids, repeated sections and missing required sections are
/// structural errors.
pub fn locate<'a>(
    ensemble: &'a [u8],
    header: &EnsembleHeader,
    ensemble_offset: usize,
) -> Result<Vec<SectionSlice<'a>>> {
    let mut slices: Vec<SectionSlice<'a>> = Vec::with_capacity(header.offset_data_types.len());

    for (index, &start) in header.offset_data_types.iter().enumerate() {
        let position = usize::from(start);
        let extent = header.section_extent(index).unwrap_or(0);
        let (id_bytes, bytes) = match (
            ensemble.get(position..position + SECTION_ID_LEN),
            ensemble.get(position..position + extent),
        ) {
            (Some(id_bytes), Some(bytes)) => (id_bytes, bytes),
            _ => {
                return Err(CodecError::invalid_field(
                    ensemble_offset,
                    "offset_data_types",
                    format!("section at {position} lies outside the {}-byte ensemble", ensemble.len()),
                ))
            }
        };

        let type_id = LittleEndian::read_u16(id_bytes);
        let kind = SectionKind::from_type_id(type_id).ok_or(CodecError::UnknownSection {
            offset: ensemble_offset,
            position,
            type_id,
        })?;
        if slices.iter().any(|slice| slice.kind == kind) {
            return Err(CodecError::DuplicateSection {
                offset: ensemble_offset,
                section: kind,
            });
        }

        trace!(offset = ensemble_offset, position, extent, section = %kind, "located section");
        slices.push(SectionSlice {
            kind,
            ensemble_offset,
            position,
            bytes,
        });
    }

    if let Some(missing) = SectionKind::ALL
        .into_iter()
        .filter(SectionKind::is_required)
        .find(|kind| !slices.iter().any(|slice| slice.kind == *kind))
    {
        return Err(CodecError::MissingSection {
            offset: ensemble_offset,
            section: missing,
        });
    }

    Ok(slices)
}

/// One decoded section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    FixedLeader(FixedLeader),
    VariableLeader(VariableLeader),
    Velocity(Velocity),
    CorrelationMagnitude(CorrelationMagnitude),
    EchoIntensity(EchoIntensity),
    PercentGood(PercentGood),
    BottomTrack(BottomTrack),
}

impl Section {
    /// Decode `slice` with the decoder its kind selects.
    ///
    /// `num_cells` is the depth cell count from this ensemble's fixed leader;
    /// it is ignored when decoding the fixed leader itself.
    pub fn decode(slice: &SectionSlice<'_>, num_cells: usize, options: &DecodeOptions) -> Result<Self> {
        trace!(
            offset = slice.ensemble_offset,
            position = slice.position,
            section = %slice.kind,
            "decoding section"
        );
        Ok(match slice.kind {
            SectionKind::FixedLeader => Section::FixedLeader(FixedLeader::decode(slice, options)?),
            SectionKind::VariableLeader => Section::VariableLeader(VariableLeader::decode(slice)?),
            SectionKind::Velocity => Section::Velocity(Velocity::decode(slice, num_cells)?),
            SectionKind::CorrelationMagnitude => {
                Section::CorrelationMagnitude(CorrelationMagnitude::decode(slice, num_cells)?)
            }
            SectionKind::EchoIntensity => {
                Section::EchoIntensity(EchoIntensity::decode(slice, num_cells)?)
            }
            SectionKind::PercentGood => Section::PercentGood(PercentGood::decode(slice, num_cells)?),
            SectionKind::BottomTrack => Section::BottomTrack(BottomTrack::decode(slice)?),
        })
    }

    /// Kind of this section.
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::FixedLeader(_) => SectionKind::FixedLeader,
            Section::VariableLeader(_) => SectionKind::VariableLeader,
            Section::Velocity(_) => SectionKind::Velocity,
            Section::CorrelationMagnitude(_) => SectionKind::CorrelationMagnitude,
            Section::EchoIntensity(_) => SectionKind::EchoIntensity,
            Section::PercentGood(_) => SectionKind::PercentGood,
            Section::BottomTrack(_) => SectionKind::BottomTrack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensemble_with_sections(sections: &[(u16, usize)]) -> (Vec<u8>, EnsembleHeader) {
        let table_end = 6 + 2 * sections.len();
        let mut offsets = Vec::new();
        let mut bytes = vec![0u8; table_end];
        for &(type_id, len) in sections {
            offsets.push(bytes.len() as u16);
            bytes.extend_from_slice(&type_id.to_le_bytes());
            bytes.resize(bytes.len() + len - 2, 0);
        }
        let header = EnsembleHeader {
            header_id: 0x7F,
            data_source_id: 0x7F,
            num_bytes: bytes.len() as u16,
            num_data_types: sections.len() as u8,
            offset_data_types: offsets,
        };
        (bytes, header)
    }

    const SIX: [(u16, usize); 6] = [(0, 58), (128, 60), (256, 18), (512, 10), (768, 10), (1024, 10)];

    #[test]
    fn test_locate_all_required() {
        let (bytes, header) = ensemble_with_sections(&SIX);
        let slices = locate(&bytes, &header, 0).unwrap();
        assert_eq!(slices.len(), 6);
        assert_eq!(slices[0].kind, SectionKind::FixedLeader);
        assert_eq!(slices[0].position, 18);
        assert_eq!(slices[0].bytes.len(), 58);
        assert_eq!(slices[5].kind, SectionKind::PercentGood);
        assert_eq!(slices[5].bytes.len(), 10);
    }

    #[test]
    fn test_locate_unknown_type() {
        let mut sections = SIX.to_vec();
        sections.push((0x0500, 4));
        let (bytes, header) = ensemble_with_sections(&sections);
        let err = locate(&bytes, &header, 40).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownSection {
                offset: 40,
                type_id: 0x0500,
                ..
            }
        ));
    }

    #[test]
    fn test_locate_duplicate() {
        let mut sections = SIX.to_vec();
        sections[5] = (768, 10);
        let (bytes, header) = ensemble_with_sections(&sections);
        let err = locate(&bytes, &header, 0).unwrap_err();
        assert!(matches!(
            err,
            CodecError::DuplicateSection {
                section: SectionKind::EchoIntensity,
                ..
            }
        ));
    }

    #[test]
    fn test_locate_missing_required() {
        let mut sections = SIX.to_vec();
        sections[1] = (1536, 81);
        let (bytes, header) = ensemble_with_sections(&sections);
        let err = locate(&bytes, &header, 0).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingSection {
                section: SectionKind::VariableLeader,
                ..
            }
        ));
    }

    #[test]
    fn test_cursor_checks_length_and_id() {
        let bytes = [0x80, 0x00, 1, 2, 3];
        let slice = SectionSlice {
            kind: SectionKind::VariableLeader,
            ensemble_offset: 9,
            position: 20,
            bytes: &bytes,
        };
        assert!(slice.cursor(5).is_ok());
        assert!(matches!(
            slice.cursor(60).unwrap_err(),
            CodecError::SectionLength {
                offset: 9,
                needed: 60,
                available: 5,
                ..
            }
        ));

        let wrong = SectionSlice {
            kind: SectionKind::Velocity,
            ..slice
        };
        assert!(matches!(
            wrong.cursor(2).unwrap_err(),
            CodecError::SectionIdMismatch {
                expected: 256,
                found: 128,
                ..
            }
        ));
    }
}
