// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! PD0 ensemble writer.
//!
//! Re-encodes decoded ensembles: header, offset table, sections and
//! checksum. The header and offset table are rebuilt from the sections
//! being written, so the header stored in an [`Ensemble`] is not consulted.
//! Spare and reserved bytes are written as zero and the high byte of the
//! sysconfig word is cleared.

use tracing::debug;

use super::checksum;
use super::constants::{CHECKSUM_LEN, HEADER_LEN, PD0_MARKER};
use super::ensemble::Ensemble;
use super::header::EnsembleHeader;
use crate::core::SectionKind;
use crate::{CodecError, Result};

/// Encodes [`Ensemble`]s to PD0 bytes.
///
/// # Example
///
/// ```no_run
/// # fn main() -> dvlcodec::Result<()> {
/// use dvlcodec::pd0::{DecodeOptions, Ensemble, EnsembleWriter, FrameScanner};
///
/// let data = std::fs::read("glider.pd0")?;
/// let frame = FrameScanner::new(&data).next().unwrap()?;
/// let ensemble = Ensemble::decode(&frame, &DecodeOptions::default())?;
/// let bytes = EnsembleWriter::new().encode(&ensemble)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnsembleWriter {
    order: Option<Vec<SectionKind>>,
}

impl EnsembleWriter {
    /// Writer using the instrument's section order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer laying sections out in `order`.
    ///
    /// Every section present in an encoded ensemble must appear in `order`
    /// exactly once; kinds the ensemble lacks are skipped.
    pub fn with_section_order(order: impl IntoIterator<Item = SectionKind>) -> Self {
        Self {
            order: Some(order.into_iter().collect()),
        }
    }

    /// Encode one ensemble, checksum included.
    pub fn encode(&self, ensemble: &Ensemble) -> Result<Vec<u8>> {
        let kinds = self.layout(ensemble)?;

        let mut bodies = Vec::with_capacity(kinds.len());
        for &kind in &kinds {
            let mut body = Vec::new();
            write_section(ensemble, kind, &mut body)?;
            bodies.push(body);
        }

        let table_end = HEADER_LEN + 2 * kinds.len();
        let mut offsets = Vec::with_capacity(kinds.len());
        let mut position = table_end;
        for body in &bodies {
            offsets.push(to_u16("offset_data_types", position)?);
            position += body.len();
        }
        let num_bytes = to_u16("num_bytes", position)?;

        let header = EnsembleHeader {
            header_id: PD0_MARKER,
            data_source_id: PD0_MARKER,
            num_bytes,
            num_data_types: kinds.len() as u8,
            offset_data_types: offsets,
        };

        let mut out = Vec::with_capacity(position + CHECKSUM_LEN);
        header.write_to(&mut out)?;
        for body in &bodies {
            out.extend_from_slice(body);
        }
        let sum = checksum::compute(&out);
        out.extend_from_slice(&sum.to_le_bytes());
        Ok(out)
    }

    /// Encode ensembles back to back into one buffer.
    pub fn encode_all<'a>(&self, ensembles: impl IntoIterator<Item = &'a Ensemble>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut count = 0usize;
        for ensemble in ensembles {
            out.extend(self.encode(ensemble)?);
            count += 1;
        }
        debug!(ensembles = count, bytes = out.len(), "encoded PD0 ensembles");
        Ok(out)
    }

    fn layout(&self, ensemble: &Ensemble) -> Result<Vec<SectionKind>> {
        let present = ensemble.section_kinds();
        let Some(order) = &self.order else {
            return Ok(present);
        };

        let kinds: Vec<SectionKind> = order
            .iter()
            .copied()
            .filter(|kind| present.contains(kind))
            .collect();
        let complete = present
            .iter()
            .all(|kind| kinds.iter().filter(|k| *k == kind).count() == 1);
        if !complete || kinds.len() != present.len() {
            return Err(CodecError::encode(
                "section_order",
                format!("{order:?} must list each of {present:?} exactly once"),
            ));
        }
        Ok(kinds)
    }
}

fn write_section(ensemble: &Ensemble, kind: SectionKind, buf: &mut Vec<u8>) -> Result<()> {
    match kind {
        SectionKind::FixedLeader => ensemble.fixed_leader.write_to(buf),
        SectionKind::VariableLeader => ensemble.variable_leader.write_to(buf),
        SectionKind::Velocity => ensemble.velocity.write_to(buf),
        SectionKind::CorrelationMagnitude => ensemble.correlation_magnitude.write_to(buf),
        SectionKind::EchoIntensity => ensemble.echo_intensity.write_to(buf),
        SectionKind::PercentGood => ensemble.percent_good.write_to(buf),
        SectionKind::BottomTrack => match &ensemble.bottom_track {
            Some(track) => track.write_to(buf),
            None => Ok(()),
        },
    }
}

fn to_u16(field: &'static str, value: usize) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| CodecError::encode(field, format!("{value} exceeds the 16-bit length field")))
}
