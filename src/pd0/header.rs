// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Ensemble header and offset table.
//!
//! ```text
//! 0      1      2..4        4      5         6..6+2n
//! 0x7F   0x7F   num_bytes   spare  n_types   offsets (u16 LE each)
//! ```

use byteorder::{LittleEndian, WriteBytesExt};

use super::constants::{
    ALLOWED_DATA_TYPE_COUNTS, HEADER_LEN, PD0_MARKER, SECTION_ID_LEN,
};
use super::cursor::Pd0Cursor;
use crate::core::column::columnar_record;
use crate::{CodecError, Result};

columnar_record! {
    /// Parsed ensemble header.
    pub struct EnsembleHeader => HeaderColumns {
        header_id: u8,
        data_source_id: u8,
        /// Declared ensemble length, excluding the checksum
        num_bytes: u16,
        num_data_types: u8,
        /// Section offsets, relative to the ensemble start, in table order
        offset_data_types: Vec<u16>,
    }
}

impl EnsembleHeader {
    /// Parse the header and offset table of the ensemble in `bytes`.
    ///
    /// `offset` is the absolute position of the ensemble, used in errors.
    /// Every section offset must leave room for a section id inside the
    /// declared length and must not overlap the header itself.
    pub fn parse(bytes: &[u8], offset: usize) -> Result<Self> {
        let mut cursor = Pd0Cursor::new(bytes);
        let header_id = cursor.read_u8()?;
        let data_source_id = cursor.read_u8()?;
        if header_id != PD0_MARKER || data_source_id != PD0_MARKER {
            return Err(CodecError::HeaderMismatch {
                offset,
                found: u16::from_be_bytes([header_id, data_source_id]),
            });
        }

        let num_bytes = cursor.read_u16()?;
        cursor.skip(1)?;
        let num_data_types = cursor.read_u8()?;
        if !ALLOWED_DATA_TYPE_COUNTS.contains(&num_data_types) {
            return Err(CodecError::invalid_field(
                offset,
                "num_data_types",
                format!("expected one of {ALLOWED_DATA_TYPE_COUNTS:?}, found {num_data_types}"),
            ));
        }

        let table_end = HEADER_LEN + 2 * usize::from(num_data_types);
        let mut offset_data_types = Vec::with_capacity(usize::from(num_data_types));
        for _ in 0..num_data_types {
            let section = cursor.read_u16()?;
            let start = usize::from(section);
            if start < table_end || start + SECTION_ID_LEN > usize::from(num_bytes) {
                return Err(CodecError::invalid_field(
                    offset,
                    "offset_data_types",
                    format!(
                        "section offset {start} outside {table_end}..{}",
                        usize::from(num_bytes).saturating_sub(SECTION_ID_LEN)
                    ),
                ));
            }
            offset_data_types.push(section);
        }

        Ok(Self {
            header_id,
            data_source_id,
            num_bytes,
            num_data_types,
            offset_data_types,
        })
    }

    /// Length of the header plus offset table.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + 2 * self.offset_data_types.len()
    }

    /// Bytes available to the section starting at table entry `index`: up to
    /// the next greater offset, or to the end of the ensemble.
    pub fn section_extent(&self, index: usize) -> Option<usize> {
        let start = *self.offset_data_types.get(index)?;
        let end = self
            .offset_data_types
            .iter()
            .copied()
            .filter(|&other| other > start)
            .min()
            .unwrap_or(self.num_bytes);
        Some(usize::from(end - start))
    }

    /// Append the header and offset table to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.write_u8(self.header_id)?;
        buf.write_u8(self.data_source_id)?;
        buf.write_u16::<LittleEndian>(self.num_bytes)?;
        buf.write_u8(0)?;
        buf.write_u8(self.num_data_types)?;
        for &section in &self.offset_data_types {
            buf.write_u16::<LittleEndian>(section)?;
        }
        Ok(())
    }
}
