// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sample ensembles for unit tests.

use super::ensemble::Ensemble;
use super::header::EnsembleHeader;
use super::sections::variable_leader::clock_to_epoch;
use super::sections::{
    BottomTrack, CorrelationMagnitude, EchoIntensity, FixedLeader, PercentGood, VariableLeader,
    Velocity,
};

/// A plausible ensemble with `num_cells` depth cells.
pub(crate) fn sample_ensemble(ensemble_number: u16, num_cells: u8, bottom_track: bool) -> Ensemble {
    let cells = usize::from(num_cells);
    let seed = ensemble_number as i16;
    let ramp = |beam: i16| -> Vec<i16> {
        (0..cells as i16)
            .map(|c| seed.wrapping_mul(100).wrapping_sub(c * 4).wrapping_add(beam))
            .collect()
    };
    let bytes = |beam: u8| -> Vec<u8> {
        (0..num_cells)
            .map(|c| c.wrapping_mul(3).wrapping_add(beam))
            .collect()
    };
    let real_time_clock = [14, 5, 17, 21, 3, (ensemble_number % 60) as u8, 25];

    Ensemble {
        offset: 0,
        checksum: 0,
        header: EnsembleHeader::default(),
        fixed_leader: FixedLeader {
            firmware_version: 51,
            firmware_revision: 27,
            sysconfig_frequency: 600,
            sysconfig_head_attached: true,
            lag_length: 8,
            num_beams: 4,
            num_cells,
            pings_per_ensemble: 1,
            depth_cell_length: 200,
            blank_after_transmit: 44,
            signal_processing_mode: 1,
            low_corr_threshold: 64,
            time_per_ping_seconds: 0.5,
            coord_transform_type: 3,
            coord_transform_tilts: true,
            sensor_source_heading: true,
            sensor_source_pitch: true,
            sensor_source_roll: true,
            sensor_available_heading: true,
            sensor_available_pitch: true,
            sensor_available_roll: true,
            sensor_available_temperature: true,
            bin_1_distance: 300,
            serial_number: 1234,
            ..FixedLeader::default()
        },
        variable_leader: VariableLeader {
            variable_leader_id: 128,
            ensemble_number,
            real_time_clock,
            ensemble_start_time: clock_to_epoch(&real_time_clock).unwrap_or_default(),
            speed_of_sound: 1500,
            transducer_depth: 100 + ensemble_number,
            heading: 9000,
            pitch: -250,
            roll: 40,
            salinity: 35,
            temperature: 1150,
            pinging: true,
            pressure: 90_000 + u32::from(ensemble_number),
            ..VariableLeader::default()
        },
        velocity: Velocity {
            velocity_data_id: 256,
            water_velocity_east: ramp(0),
            water_velocity_north: ramp(1),
            water_velocity_up: ramp(2),
            error_velocity: ramp(3),
        },
        correlation_magnitude: CorrelationMagnitude {
            correlation_magnitude_id: 512,
            correlation_magnitude_beam1: bytes(1),
            correlation_magnitude_beam2: bytes(2),
            correlation_magnitude_beam3: bytes(3),
            correlation_magnitude_beam4: bytes(4),
        },
        echo_intensity: EchoIntensity {
            echo_intensity_id: 768,
            echo_intensity_beam1: bytes(10),
            echo_intensity_beam2: bytes(11),
            echo_intensity_beam3: bytes(12),
            echo_intensity_beam4: bytes(13),
        },
        percent_good: PercentGood {
            percent_good_id: 1024,
            percent_good_3beam: bytes(0),
            percent_transforms_reject: bytes(0),
            percent_bad_beams: bytes(0),
            percent_good_4beam: bytes(100),
        },
        bottom_track: bottom_track.then(|| BottomTrack {
            bottom_track_id: 1536,
            bt_pings_per_ensemble: 1,
            beam1_bt_range_lsb: 2000 + ensemble_number,
            beam2_bt_range_lsb: 2010,
            beam3_bt_range_lsb: 1990,
            beam4_bt_range_lsb: 2005,
            eastward_bt_velocity: -120,
            northward_bt_velocity: 85,
            bt_max_depth: 6500,
            beam1_bt_range_msb: 1,
            ..BottomTrack::default()
        }),
    }
}
