// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed leader: instrument configuration, 58 bytes.

use byteorder::{LittleEndian, WriteBytesExt};

use super::SectionSlice;
use crate::core::column::columnar_record;
use crate::pd0::bits::{self, BitFlag};
use crate::pd0::constants::{
    BEAM_COUNT, DATA_FLAG, FIXED_LEADER_LEN, FREQUENCIES_KHZ, SIGNAL_PROCESSING_MODE,
};
use crate::pd0::DecodeOptions;
use crate::{CodecError, Result};

/// Acoustic frequency index, low three bits of sysconfig.
pub const SYSCONFIG_FREQUENCY_MASK: u8 = 0b0000_0111;
/// Sensor configuration, bits 4-5 of sysconfig.
pub const SYSCONFIG_SENSOR_CONFIG_MASK: u8 = 0b0011_0000;
/// Coordinate transform type, bits 3-4 of the coordinate transform byte.
pub const COORD_TRANSFORM_TYPE_MASK: u8 = 0b0001_1000;

/// Single-bit sysconfig flags.
pub const SYSCONFIG_FLAGS: [BitFlag; 3] = [
    BitFlag::new(3, "sysconfig_beam_pattern"),
    BitFlag::new(6, "sysconfig_head_attached"),
    BitFlag::new(7, "sysconfig_vertical_orientation"),
];

/// Single-bit coordinate transform flags.
pub const COORD_TRANSFORM_FLAGS: [BitFlag; 3] = [
    BitFlag::new(2, "coord_transform_tilts"),
    BitFlag::new(1, "coord_transform_beams"),
    BitFlag::new(0, "coord_transform_mapping"),
];

/// Sources of environmental sensor data.
pub const SENSOR_SOURCE_FLAGS: [BitFlag; 7] = [
    BitFlag::new(6, "sensor_source_speed"),
    BitFlag::new(5, "sensor_source_depth"),
    BitFlag::new(4, "sensor_source_heading"),
    BitFlag::new(3, "sensor_source_pitch"),
    BitFlag::new(2, "sensor_source_roll"),
    BitFlag::new(1, "sensor_source_conductivity"),
    BitFlag::new(0, "sensor_source_temperature"),
];

/// Sensors fitted to the instrument.
pub const SENSOR_AVAILABLE_FLAGS: [BitFlag; 6] = [
    BitFlag::new(5, "sensor_available_depth"),
    BitFlag::new(4, "sensor_available_heading"),
    BitFlag::new(3, "sensor_available_pitch"),
    BitFlag::new(2, "sensor_available_roll"),
    BitFlag::new(1, "sensor_available_conductivity"),
    BitFlag::new(0, "sensor_available_temperature"),
];

columnar_record! {
    /// Decoded fixed leader.
    pub struct FixedLeader => FixedLeaderColumns {
        fixed_leader_id: u16,
        firmware_version: u8,
        firmware_revision: u8,
        /// Acoustic frequency in kHz
        sysconfig_frequency: u16,
        sysconfig_beam_pattern: bool,
        sysconfig_sensor_config: u8,
        sysconfig_head_attached: bool,
        sysconfig_vertical_orientation: bool,
        data_flag: u8,
        lag_length: u8,
        num_beams: u8,
        /// Depth cell count shared by every cell-indexed section
        num_cells: u8,
        pings_per_ensemble: u16,
        depth_cell_length: u16,
        blank_after_transmit: u16,
        signal_processing_mode: u8,
        low_corr_threshold: u8,
        num_code_repetitions: u8,
        percent_good_min: u8,
        error_vel_threshold: u16,
        time_per_ping_minutes: u8,
        /// Seconds plus hundredths
        time_per_ping_seconds: f64,
        coord_transform_type: u8,
        coord_transform_tilts: bool,
        /// Three-beam solution used
        coord_transform_beams: bool,
        coord_transform_mapping: bool,
        heading_alignment: i16,
        heading_bias: i16,
        sensor_source_speed: bool,
        sensor_source_depth: bool,
        sensor_source_heading: bool,
        sensor_source_pitch: bool,
        sensor_source_roll: bool,
        sensor_source_conductivity: bool,
        sensor_source_temperature: bool,
        sensor_available_depth: bool,
        sensor_available_heading: bool,
        sensor_available_pitch: bool,
        sensor_available_roll: bool,
        sensor_available_conductivity: bool,
        sensor_available_temperature: bool,
        bin_1_distance: u16,
        transmit_pulse_length: u16,
        reference_layer_start: u8,
        reference_layer_stop: u8,
        false_target_threshold: u8,
        transmit_lag_distance: u16,
        system_bandwidth: u16,
        serial_number: u32,
    }
}

impl FixedLeader {
    /// Decode a fixed leader section.
    ///
    /// With `strict_constants`, the data flag, signal processing mode and
    /// beam count must match the single supported instrument configuration.
    pub fn decode(slice: &SectionSlice<'_>, options: &DecodeOptions) -> Result<Self> {
        let offset = slice.ensemble_offset;
        let mut c = slice.cursor(FIXED_LEADER_LEN)?;

        let fixed_leader_id = c.read_u16()?;
        let firmware_version = c.read_u8()?;
        let firmware_revision = c.read_u8()?;
        let sysconfig = c.read_u16()?.to_le_bytes()[0];
        let data_flag = c.read_u8()?;
        let lag_length = c.read_u8()?;
        let num_beams = c.read_u8()?;
        let num_cells = c.read_u8()?;
        let pings_per_ensemble = c.read_u16()?;
        let depth_cell_length = c.read_u16()?;
        let blank_after_transmit = c.read_u16()?;
        let signal_processing_mode = c.read_u8()?;
        let low_corr_threshold = c.read_u8()?;
        let num_code_repetitions = c.read_u8()?;
        let percent_good_min = c.read_u8()?;
        let error_vel_threshold = c.read_u16()?;
        let [tpp_minutes, tpp_seconds, tpp_hundredths] = c.read_array::<3>()?;
        let coord_transform = c.read_u8()?;
        let heading_alignment = c.read_i16()?;
        let heading_bias = c.read_i16()?;
        let sensor_source = c.read_u8()?;
        let sensor_available = c.read_u8()?;
        let bin_1_distance = c.read_u16()?;
        let transmit_pulse_length = c.read_u16()?;
        let reference_layer_start = c.read_u8()?;
        let reference_layer_stop = c.read_u8()?;
        let false_target_threshold = c.read_u8()?;
        c.skip(1)?;
        let transmit_lag_distance = c.read_u16()?;
        c.skip(8)?;
        let system_bandwidth = c.read_u16()?;
        c.skip(2)?;
        let serial_number = c.read_u32()?;

        if options.strict_constants {
            check_constant(offset, "data_flag", DATA_FLAG, data_flag)?;
            check_constant(
                offset,
                "signal_processing_mode",
                SIGNAL_PROCESSING_MODE,
                signal_processing_mode,
            )?;
            check_constant(offset, "num_beams", BEAM_COUNT as u8, num_beams)?;
        }

        let frequency_index = bits::field(sysconfig, SYSCONFIG_FREQUENCY_MASK, 0);
        let sysconfig_frequency = *FREQUENCIES_KHZ
            .get(usize::from(frequency_index))
            .ok_or_else(|| {
                CodecError::invalid_field(
                    offset,
                    "sysconfig_frequency",
                    format!("frequency index {frequency_index} has no table entry"),
                )
            })?;

        let [beam_pattern, head_attached, vertical_orientation] =
            bits::unpack(sysconfig, &SYSCONFIG_FLAGS);
        let [tilts, beams, mapping] = bits::unpack(coord_transform, &COORD_TRANSFORM_FLAGS);
        let [src_speed, src_depth, src_heading, src_pitch, src_roll, src_conductivity, src_temperature] =
            bits::unpack(sensor_source, &SENSOR_SOURCE_FLAGS);
        let [av_depth, av_heading, av_pitch, av_roll, av_conductivity, av_temperature] =
            bits::unpack(sensor_available, &SENSOR_AVAILABLE_FLAGS);

        Ok(Self {
            fixed_leader_id,
            firmware_version,
            firmware_revision,
            sysconfig_frequency,
            sysconfig_beam_pattern: beam_pattern,
            sysconfig_sensor_config: bits::field(sysconfig, SYSCONFIG_SENSOR_CONFIG_MASK, 4),
            sysconfig_head_attached: head_attached,
            sysconfig_vertical_orientation: vertical_orientation,
            data_flag,
            lag_length,
            num_beams,
            num_cells,
            pings_per_ensemble,
            depth_cell_length,
            blank_after_transmit,
            signal_processing_mode,
            low_corr_threshold,
            num_code_repetitions,
            percent_good_min,
            error_vel_threshold,
            time_per_ping_minutes: tpp_minutes,
            time_per_ping_seconds: f64::from(tpp_seconds) + f64::from(tpp_hundredths) / 100.0,
            coord_transform_type: bits::field(coord_transform, COORD_TRANSFORM_TYPE_MASK, 3),
            coord_transform_tilts: tilts,
            coord_transform_beams: beams,
            coord_transform_mapping: mapping,
            heading_alignment,
            heading_bias,
            sensor_source_speed: src_speed,
            sensor_source_depth: src_depth,
            sensor_source_heading: src_heading,
            sensor_source_pitch: src_pitch,
            sensor_source_roll: src_roll,
            sensor_source_conductivity: src_conductivity,
            sensor_source_temperature: src_temperature,
            sensor_available_depth: av_depth,
            sensor_available_heading: av_heading,
            sensor_available_pitch: av_pitch,
            sensor_available_roll: av_roll,
            sensor_available_conductivity: av_conductivity,
            sensor_available_temperature: av_temperature,
            bin_1_distance,
            transmit_pulse_length,
            reference_layer_start,
            reference_layer_stop,
            false_target_threshold,
            transmit_lag_distance,
            system_bandwidth,
            serial_number,
        })
    }

    /// Append the 58-byte wire form to `buf`. Spare bytes are written as zero.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        let frequency_index = FREQUENCIES_KHZ
            .iter()
            .position(|&khz| khz == self.sysconfig_frequency)
            .ok_or_else(|| {
                CodecError::encode(
                    "sysconfig_frequency",
                    format!("{} kHz is not a supported frequency", self.sysconfig_frequency),
                )
            })? as u8;
        let sysconfig = frequency_index
            | ((self.sysconfig_sensor_config << 4) & SYSCONFIG_SENSOR_CONFIG_MASK)
            | bits::pack(
                &[
                    self.sysconfig_beam_pattern,
                    self.sysconfig_head_attached,
                    self.sysconfig_vertical_orientation,
                ],
                &SYSCONFIG_FLAGS,
            );
        let coord_transform = ((self.coord_transform_type << 3) & COORD_TRANSFORM_TYPE_MASK)
            | bits::pack(
                &[
                    self.coord_transform_tilts,
                    self.coord_transform_beams,
                    self.coord_transform_mapping,
                ],
                &COORD_TRANSFORM_FLAGS,
            );
        let sensor_source = bits::pack(
            &[
                self.sensor_source_speed,
                self.sensor_source_depth,
                self.sensor_source_heading,
                self.sensor_source_pitch,
                self.sensor_source_roll,
                self.sensor_source_conductivity,
                self.sensor_source_temperature,
            ],
            &SENSOR_SOURCE_FLAGS,
        );
        let sensor_available = bits::pack(
            &[
                self.sensor_available_depth,
                self.sensor_available_heading,
                self.sensor_available_pitch,
                self.sensor_available_roll,
                self.sensor_available_conductivity,
                self.sensor_available_temperature,
            ],
            &SENSOR_AVAILABLE_FLAGS,
        );
        let (tpp_seconds, tpp_hundredths) =
            split_hundredths("time_per_ping_seconds", self.time_per_ping_seconds)?;

        buf.write_u16::<LittleEndian>(self.fixed_leader_id)?;
        buf.write_u8(self.firmware_version)?;
        buf.write_u8(self.firmware_revision)?;
        buf.write_u16::<LittleEndian>(u16::from(sysconfig))?;
        buf.write_u8(self.data_flag)?;
        buf.write_u8(self.lag_length)?;
        buf.write_u8(self.num_beams)?;
        buf.write_u8(self.num_cells)?;
        buf.write_u16::<LittleEndian>(self.pings_per_ensemble)?;
        buf.write_u16::<LittleEndian>(self.depth_cell_length)?;
        buf.write_u16::<LittleEndian>(self.blank_after_transmit)?;
        buf.write_u8(self.signal_processing_mode)?;
        buf.write_u8(self.low_corr_threshold)?;
        buf.write_u8(self.num_code_repetitions)?;
        buf.write_u8(self.percent_good_min)?;
        buf.write_u16::<LittleEndian>(self.error_vel_threshold)?;
        buf.write_u8(self.time_per_ping_minutes)?;
        buf.write_u8(tpp_seconds)?;
        buf.write_u8(tpp_hundredths)?;
        buf.write_u8(coord_transform)?;
        buf.write_i16::<LittleEndian>(self.heading_alignment)?;
        buf.write_i16::<LittleEndian>(self.heading_bias)?;
        buf.write_u8(sensor_source)?;
        buf.write_u8(sensor_available)?;
        buf.write_u16::<LittleEndian>(self.bin_1_distance)?;
        buf.write_u16::<LittleEndian>(self.transmit_pulse_length)?;
        buf.write_u8(self.reference_layer_start)?;
        buf.write_u8(self.reference_layer_stop)?;
        buf.write_u8(self.false_target_threshold)?;
        buf.write_u8(0)?;
        buf.write_u16::<LittleEndian>(self.transmit_lag_distance)?;
        buf.write_u64::<LittleEndian>(0)?;
        buf.write_u16::<LittleEndian>(self.system_bandwidth)?;
        buf.write_u16::<LittleEndian>(0)?;
        buf.write_u32::<LittleEndian>(self.serial_number)?;
        Ok(())
    }
}

fn check_constant(offset: usize, field: &'static str, expected: u8, found: u8) -> Result<()> {
    if found != expected {
        return Err(CodecError::ConstantViolation {
            offset,
            field,
            expected: u32::from(expected),
            found: u32::from(found),
        });
    }
    Ok(())
}

/// Split `seconds` into whole seconds and hundredths for the wire.
pub(crate) fn split_hundredths(field: &'static str, seconds: f64) -> Result<(u8, u8)> {
    let total = (seconds * 100.0).round();
    if !(0.0..=f64::from(u8::MAX) * 100.0 + 99.0).contains(&total) {
        return Err(CodecError::encode(field, format!("{seconds} s does not fit the wire format")));
    }
    let total = total as u32;
    Ok(((total / 100) as u8, (total % 100) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SectionKind;

    fn sample() -> FixedLeader {
        FixedLeader {
            firmware_version: 51,
            firmware_revision: 27,
            sysconfig_frequency: 600,
            sysconfig_sensor_config: 1,
            sysconfig_head_attached: true,
            num_beams: 4,
            num_cells: 20,
            pings_per_ensemble: 1,
            depth_cell_length: 200,
            signal_processing_mode: 1,
            time_per_ping_seconds: 1.25,
            coord_transform_type: 3,
            coord_transform_beams: true,
            heading_alignment: -450,
            sensor_source_heading: true,
            sensor_source_temperature: true,
            sensor_available_depth: true,
            serial_number: 0xDEAD_BEEF,
            ..FixedLeader::default()
        }
    }

    fn decode(bytes: &[u8], strict: bool) -> Result<FixedLeader> {
        let slice = SectionSlice {
            kind: SectionKind::FixedLeader,
            ensemble_offset: 0,
            position: 18,
            bytes,
        };
        FixedLeader::decode(
            &slice,
            &DecodeOptions {
                strict_constants: strict,
            },
        )
    }

    #[test]
    fn test_round_trip() {
        let leader = sample();
        let mut bytes = Vec::new();
        leader.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), FIXED_LEADER_LEN);
        assert_eq!(decode(&bytes, true).unwrap(), leader);
    }

    #[test]
    fn test_sysconfig_600_khz() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[4] = 0b0000_0011;
        bytes[5] = 0;

        let leader = decode(&bytes, true).unwrap();
        assert_eq!(leader.sysconfig_frequency, 600);
        assert!(!leader.sysconfig_beam_pattern);
        assert!(!leader.sysconfig_head_attached);
        assert_eq!(leader.sysconfig_sensor_config, 0);
    }

    #[test]
    fn test_packed_fields_are_shifted() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[4] = 0b1011_0100;
        bytes[25] = 0b0001_0010;

        let leader = decode(&bytes, true).unwrap();
        assert_eq!(leader.sysconfig_frequency, 1200);
        assert_eq!(leader.sysconfig_sensor_config, 3);
        assert!(!leader.sysconfig_beam_pattern);
        assert!(leader.sysconfig_vertical_orientation);
        assert_eq!(leader.coord_transform_type, 2);
        assert!(leader.coord_transform_beams);
        assert!(!leader.coord_transform_tilts);
        assert!(!leader.coord_transform_mapping);
    }

    #[test]
    fn test_invalid_frequency_index() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[4] = 0b0000_0110;
        assert!(matches!(
            decode(&bytes, true).unwrap_err(),
            CodecError::InvalidField {
                field: "sysconfig_frequency",
                ..
            }
        ));
    }

    #[test]
    fn test_constant_violations() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[6] = 1;
        assert!(matches!(
            decode(&bytes, true).unwrap_err(),
            CodecError::ConstantViolation {
                field: "data_flag",
                expected: 0,
                found: 1,
                ..
            }
        ));
        assert_eq!(decode(&bytes, false).unwrap().data_flag, 1);

        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[16] = 2;
        assert!(matches!(
            decode(&bytes, true).unwrap_err(),
            CodecError::ConstantViolation {
                field: "signal_processing_mode",
                ..
            }
        ));
    }

    #[test]
    fn test_short_section() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        assert!(matches!(
            decode(&bytes[..40], true).unwrap_err(),
            CodecError::SectionLength {
                needed: 58,
                available: 40,
                ..
            }
        ));
    }

    #[test]
    fn test_split_hundredths() {
        assert_eq!(split_hundredths("t", 1.25).unwrap(), (1, 25));
        assert_eq!(split_hundredths("t", 5.37).unwrap(), (5, 37));
        assert_eq!(split_hundredths("t", 0.0).unwrap(), (0, 0));
        assert!(split_hundredths("t", -1.0).is_err());
        assert!(split_hundredths("t", 300.0).is_err());
    }
}
