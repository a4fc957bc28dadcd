// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! One decoded ensemble.
//!
//! Sections are dispatched in two phases. The fixed leader is decoded first,
//! wherever the offset table puts it, because its depth cell count sizes the
//! four cell-indexed sections. Everything else is decoded in table order
//! afterwards. An ensemble either decodes completely or not at all.

use tracing::trace;

use super::checksum;
use super::header::EnsembleHeader;
use super::scanner::Frame;
use super::sections::{
    self, BottomTrack, CorrelationMagnitude, EchoIntensity, FixedLeader, PercentGood, Section,
    VariableLeader, Velocity,
};
use super::DecodeOptions;
use crate::core::SectionKind;
use crate::{CodecError, Result};

/// A fully decoded ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    /// Absolute offset of the ensemble in the decoded buffer
    pub offset: usize,
    /// Stored (and verified) checksum
    pub checksum: u16,
    pub header: EnsembleHeader,
    pub fixed_leader: FixedLeader,
    pub variable_leader: VariableLeader,
    pub velocity: Velocity,
    pub correlation_magnitude: CorrelationMagnitude,
    pub echo_intensity: EchoIntensity,
    pub percent_good: PercentGood,
    /// Present only when the bottom was in range
    pub bottom_track: Option<BottomTrack>,
}

impl Ensemble {
    /// Validate the checksum of `frame` and decode it.
    pub fn decode(frame: &Frame<'_>, options: &DecodeOptions) -> Result<Self> {
        let checksum = checksum::validate(frame)?;
        Self::decode_validated(frame, checksum, options)
    }

    /// Decode a frame whose checksum has already been validated.
    pub fn decode_validated(frame: &Frame<'_>, checksum: u16, options: &DecodeOptions) -> Result<Self> {
        let offset = frame.offset;
        let header = EnsembleHeader::parse(frame.bytes, offset)?;
        let slices = sections::locate(frame.body(), &header, offset)?;

        // Phase 1: fixed leader, for the depth cell count.
        let fixed_slice = slices
            .iter()
            .find(|slice| slice.kind == SectionKind::FixedLeader)
            .ok_or(CodecError::MissingSection {
                offset,
                section: SectionKind::FixedLeader,
            })?;
        let fixed_leader = FixedLeader::decode(fixed_slice, options)?;
        let num_cells = usize::from(fixed_leader.num_cells);
        trace!(offset, num_cells, "decoded fixed leader");

        // Phase 2: everything else, in table order.
        let mut variable_leader = None;
        let mut velocity = None;
        let mut correlation_magnitude = None;
        let mut echo_intensity = None;
        let mut percent_good = None;
        let mut bottom_track = None;

        for slice in slices
            .iter()
            .filter(|slice| slice.kind != SectionKind::FixedLeader)
        {
            match Section::decode(slice, num_cells, options)? {
                Section::VariableLeader(section) => variable_leader = Some(section),
                Section::Velocity(section) => velocity = Some(section),
                Section::CorrelationMagnitude(section) => correlation_magnitude = Some(section),
                Section::EchoIntensity(section) => echo_intensity = Some(section),
                Section::PercentGood(section) => percent_good = Some(section),
                Section::BottomTrack(section) => bottom_track = Some(section),
                Section::FixedLeader(_) => {}
            }
        }

        let required = |section: SectionKind| CodecError::MissingSection { offset, section };
        Ok(Self {
            offset,
            checksum,
            header,
            fixed_leader,
            variable_leader: variable_leader.ok_or_else(|| required(SectionKind::VariableLeader))?,
            velocity: velocity.ok_or_else(|| required(SectionKind::Velocity))?,
            correlation_magnitude: correlation_magnitude
                .ok_or_else(|| required(SectionKind::CorrelationMagnitude))?,
            echo_intensity: echo_intensity.ok_or_else(|| required(SectionKind::EchoIntensity))?,
            percent_good: percent_good.ok_or_else(|| required(SectionKind::PercentGood))?,
            bottom_track,
        })
    }

    /// Depth cell count from the fixed leader.
    pub fn num_cells(&self) -> usize {
        usize::from(self.fixed_leader.num_cells)
    }

    /// Whether the ensemble carried a bottom track section.
    pub fn has_bottom_track(&self) -> bool {
        self.bottom_track.is_some()
    }

    /// Kinds of the sections present, in instrument order.
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| *kind != SectionKind::BottomTrack || self.has_bottom_track())
            .collect()
    }

    /// Ensemble start as UTC epoch seconds.
    pub fn start_time(&self) -> f64 {
        self.variable_leader.ensemble_start_time
    }
}
