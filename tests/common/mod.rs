// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use dvlcodec::pd0::checksum;
use dvlcodec::pd0::sections::variable_leader::clock_to_epoch;
use dvlcodec::pd0::sections::{
    BottomTrack, CorrelationMagnitude, EchoIntensity, FixedLeader, PercentGood, VariableLeader,
    Velocity,
};
use dvlcodec::pd0::EnsembleHeader;
use dvlcodec::{Ensemble, EnsembleWriter, SectionKind};

// ============================================================================
// Ensemble Builder
// ============================================================================

/// Builds plausible glider DVL ensembles.
#[derive(Debug, Clone)]
pub struct EnsembleBuilder {
    ensemble_number: u16,
    num_cells: u8,
    bottom_track: bool,
    second: u8,
}

impl EnsembleBuilder {
    pub fn new(ensemble_number: u16) -> Self {
        Self {
            ensemble_number,
            num_cells: 8,
            bottom_track: true,
            second: (ensemble_number % 60) as u8,
        }
    }

    pub fn num_cells(mut self, num_cells: u8) -> Self {
        self.num_cells = num_cells;
        self
    }

    pub fn bottom_track(mut self, present: bool) -> Self {
        self.bottom_track = present;
        self
    }

    pub fn build(&self) -> Ensemble {
        let n = self.ensemble_number;
        let cells = usize::from(self.num_cells);
        let beam = |offset: i16| -> Vec<i16> {
            (0..cells)
                .map(|c| (n as i16).wrapping_add(offset).wrapping_sub(c as i16 * 7))
                .collect()
        };
        let bytes = |offset: u8| -> Vec<u8> {
            (0..cells)
                .map(|c| (c as u8).wrapping_mul(5).wrapping_add(offset))
                .collect()
        };
        let clock = [15, 8, 2, 13, 45, self.second, 50];

        Ensemble {
            offset: 0,
            checksum: 0,
            header: EnsembleHeader::default(),
            fixed_leader: FixedLeader {
                firmware_version: 51,
                firmware_revision: 30,
                sysconfig_frequency: 600,
                sysconfig_head_attached: true,
                lag_length: 8,
                num_beams: 4,
                num_cells: self.num_cells,
                pings_per_ensemble: 1,
                depth_cell_length: 100,
                blank_after_transmit: 44,
                signal_processing_mode: 1,
                low_corr_threshold: 64,
                time_per_ping_seconds: 1.0,
                coord_transform_type: 3,
                coord_transform_tilts: true,
                bin_1_distance: 200,
                serial_number: 16_000,
                ..FixedLeader::default()
            },
            variable_leader: VariableLeader {
                variable_leader_id: 128,
                ensemble_number: n,
                real_time_clock: clock,
                ensemble_start_time: clock_to_epoch(&clock).unwrap_or_default(),
                speed_of_sound: 1490,
                transducer_depth: 250 + n,
                heading: 18_000,
                pitch: 120,
                roll: -35,
                salinity: 34,
                temperature: 980,
                pinging: true,
                pressure: 250_000 + u32::from(n),
                ..VariableLeader::default()
            },
            velocity: Velocity {
                velocity_data_id: 256,
                water_velocity_east: beam(0),
                water_velocity_north: beam(100),
                water_velocity_up: beam(-100),
                error_velocity: beam(3),
            },
            correlation_magnitude: CorrelationMagnitude {
                correlation_magnitude_id: 512,
                correlation_magnitude_beam1: bytes(100),
                correlation_magnitude_beam2: bytes(101),
                correlation_magnitude_beam3: bytes(102),
                correlation_magnitude_beam4: bytes(103),
            },
            echo_intensity: EchoIntensity {
                echo_intensity_id: 768,
                echo_intensity_beam1: bytes(60),
                echo_intensity_beam2: bytes(61),
                echo_intensity_beam3: bytes(62),
                echo_intensity_beam4: bytes(63),
            },
            percent_good: PercentGood {
                percent_good_id: 1024,
                percent_good_3beam: bytes(0),
                percent_transforms_reject: bytes(0),
                percent_bad_beams: bytes(0),
                percent_good_4beam: bytes(90),
            },
            bottom_track: self.bottom_track.then(|| BottomTrack {
                bottom_track_id: 1536,
                bt_pings_per_ensemble: 1,
                beam1_bt_range_lsb: 3000 + n,
                beam2_bt_range_lsb: 3010,
                beam3_bt_range_lsb: 2990,
                beam4_bt_range_lsb: 3005,
                eastward_bt_velocity: 210,
                northward_bt_velocity: -40,
                bt_max_depth: 6500,
                ..BottomTrack::default()
            }),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(&self.build())
    }
}

/// Encode one ensemble in the instrument's section order.
pub fn encode(ensemble: &Ensemble) -> Vec<u8> {
    EnsembleWriter::new()
        .encode(ensemble)
        .expect("encode ensemble")
}

/// Encode one ensemble with sections laid out in `order`.
pub fn encode_ordered(ensemble: &Ensemble, order: &[SectionKind]) -> Vec<u8> {
    EnsembleWriter::with_section_order(order.iter().copied())
        .encode(ensemble)
        .expect("encode ensemble")
}

/// `count` back-to-back ensembles; every `gap`-th one lacks bottom track.
pub fn pd0_stream(count: u16, num_cells: u8, gap: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    for n in 0..count {
        let bottom_track = gap == 0 || n % gap != 0;
        bytes.extend(
            EnsembleBuilder::new(n)
                .num_cells(num_cells)
                .bottom_track(bottom_track)
                .encode(),
        );
    }
    bytes
}

// ============================================================================
// Byte Patching
// ============================================================================

/// Offset of `kind` inside an encoded ensemble, from its offset table.
pub fn section_offset(ensemble: &[u8], kind: SectionKind) -> usize {
    let count = usize::from(ensemble[5]);
    (0..count)
        .map(|i| usize::from(u16::from_le_bytes([ensemble[6 + 2 * i], ensemble[7 + 2 * i]])))
        .find(|&offset| u16::from_le_bytes([ensemble[offset], ensemble[offset + 1]]) == kind.type_id())
        .expect("section present")
}

/// Recompute the trailing checksum after patching ensemble bytes.
pub fn reseal(ensemble: &mut [u8]) {
    let declared = usize::from(u16::from_le_bytes([ensemble[2], ensemble[3]]));
    let sum = checksum::compute(&ensemble[..declared]);
    ensemble[declared..declared + 2].copy_from_slice(&sum.to_le_bytes());
}

// ============================================================================
// Temporary Files
// ============================================================================

static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

/// Write `bytes` to a fresh file under the system temp directory.
pub fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let unique = NEXT_FILE.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "dvlcodec-{}-{unique}-{name}",
        std::process::id()
    ));
    std::fs::write(&path, bytes).expect("write temp file");
    path
}
