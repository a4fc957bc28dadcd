// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable leader: per-ensemble status and environment, 60 bytes.
//!
//! The real-time clock is stored as `[yy, mm, dd, hh, mm, ss, hundredths]`
//! with a two-digit year counted from 2000. `ensemble_start_time` is the
//! same instant as UTC epoch seconds, hundredths included.

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::NaiveDate;

use super::fixed_leader::split_hundredths;
use super::SectionSlice;
use crate::core::column::columnar_record;
use crate::pd0::bits::{self, BitFlag};
use crate::pd0::constants::{CLOCK_YEAR_BASE, VARIABLE_LEADER_LEN};
use crate::{CodecError, Result};

/// Built-in test result byte.
pub const BIT_RESULT_FLAGS: [BitFlag; 3] = [
    BitFlag::new(3, "bit_result_demod_1"),
    BitFlag::new(4, "bit_result_demod_2"),
    BitFlag::new(1, "bit_result_timing"),
];

/// Error status word 1: processor exceptions.
pub const ERROR_STATUS_WORD_1_FLAGS: [BitFlag; 8] = [
    BitFlag::new(0, "bus_error_exception"),
    BitFlag::new(1, "address_error_exception"),
    BitFlag::new(2, "illegal_instruction_exception"),
    BitFlag::new(3, "zero_divide_instruction"),
    BitFlag::new(4, "emulator_exception"),
    BitFlag::new(5, "unassigned_exception"),
    BitFlag::new(6, "watchdog_restart_occurred"),
    BitFlag::new(7, "battery_saver_power"),
];

/// Error status word 2: ping and wakeup state.
pub const ERROR_STATUS_WORD_2_FLAGS: [BitFlag; 3] = [
    BitFlag::new(0, "pinging"),
    BitFlag::new(6, "cold_wakeup_occurred"),
    BitFlag::new(7, "unknown_wakeup_occurred"),
];

/// Error status word 3: clock anomalies.
pub const ERROR_STATUS_WORD_3_FLAGS: [BitFlag; 4] = [
    BitFlag::new(0, "clock_read_error"),
    BitFlag::new(1, "unexpected_alarm"),
    BitFlag::new(2, "clock_jump_forward"),
    BitFlag::new(3, "clock_jump_backward"),
];

/// Error status word 4: power and interrupt faults.
pub const ERROR_STATUS_WORD_4_FLAGS: [BitFlag; 5] = [
    BitFlag::new(3, "power_fail"),
    BitFlag::new(4, "spurious_dsp_interrupt"),
    BitFlag::new(5, "spurious_uart_interrupt"),
    BitFlag::new(6, "spurious_clock_interrupt"),
    BitFlag::new(7, "level_7_interrupt"),
];

columnar_record! {
    /// Decoded variable leader.
    pub struct VariableLeader => VariableLeaderColumns {
        variable_leader_id: u16,
        ensemble_number: u16,
        real_time_clock: [u8; 7],
        /// UTC epoch seconds
        ensemble_start_time: f64,
        ensemble_number_increment: u8,
        bit_result_demod_1: bool,
        bit_result_demod_2: bool,
        bit_result_timing: bool,
        speed_of_sound: u16,
        transducer_depth: u16,
        heading: u16,
        pitch: i16,
        roll: i16,
        salinity: u16,
        temperature: i16,
        mpt_minutes: u8,
        /// Minimum pre-ping wait, seconds plus hundredths
        mpt_seconds: f64,
        heading_stdev: u8,
        pitch_stdev: u8,
        roll_stdev: u8,
        adc_transmit_current: u8,
        adc_transmit_voltage: u8,
        adc_ambient_temp: u8,
        adc_pressure_plus: u8,
        adc_pressure_minus: u8,
        adc_attitude_temp: u8,
        adc_attitude: u8,
        adc_contamination_sensor: u8,
        bus_error_exception: bool,
        address_error_exception: bool,
        illegal_instruction_exception: bool,
        zero_divide_instruction: bool,
        emulator_exception: bool,
        unassigned_exception: bool,
        watchdog_restart_occurred: bool,
        battery_saver_power: bool,
        pinging: bool,
        cold_wakeup_occurred: bool,
        unknown_wakeup_occurred: bool,
        clock_read_error: bool,
        unexpected_alarm: bool,
        clock_jump_forward: bool,
        clock_jump_backward: bool,
        power_fail: bool,
        spurious_dsp_interrupt: bool,
        spurious_uart_interrupt: bool,
        spurious_clock_interrupt: bool,
        level_7_interrupt: bool,
        pressure: u32,
        pressure_variance: u32,
    }
}

/// UTC epoch seconds of a real-time clock reading, or `None` if the
/// reading is not a calendar date and time.
pub fn clock_to_epoch(clock: &[u8; 7]) -> Option<f64> {
    let [year, month, day, hour, minute, second, hundredths] = *clock;
    let seconds = NaiveDate::from_ymd_opt(
        CLOCK_YEAR_BASE + i32::from(year),
        u32::from(month),
        u32::from(day),
    )?
    .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))?
    .and_utc()
    .timestamp();
    Some(seconds as f64 + f64::from(hundredths) / 100.0)
}

impl VariableLeader {
    /// Decode a variable leader section.
    pub fn decode(slice: &SectionSlice<'_>) -> Result<Self> {
        let offset = slice.ensemble_offset;
        let mut c = slice.cursor(VARIABLE_LEADER_LEN)?;

        let variable_leader_id = c.read_u16()?;
        let ensemble_number = c.read_u16()?;
        let real_time_clock = c.read_array::<7>()?;
        let ensemble_start_time = clock_to_epoch(&real_time_clock).ok_or_else(|| {
            CodecError::invalid_field(
                offset,
                "real_time_clock",
                format!("{real_time_clock:?} is not a valid date and time"),
            )
        })?;
        let ensemble_number_increment = c.read_u8()?;
        let bit_result = c.read_u8()?;
        c.skip(1)?;
        let speed_of_sound = c.read_u16()?;
        let transducer_depth = c.read_u16()?;
        let heading = c.read_u16()?;
        let pitch = c.read_i16()?;
        let roll = c.read_i16()?;
        let salinity = c.read_u16()?;
        let temperature = c.read_i16()?;
        let [mpt_minutes, mpt_secs, mpt_hundredths] = c.read_array::<3>()?;
        let [heading_stdev, pitch_stdev, roll_stdev] = c.read_array::<3>()?;
        let adc = c.read_array::<8>()?;
        let [esw1, esw2, esw3, esw4] = c.read_array::<4>()?;
        c.skip(2)?;
        let pressure = c.read_u32()?;
        let pressure_variance = c.read_u32()?;

        let [demod_1, demod_2, timing] = bits::unpack(bit_result, &BIT_RESULT_FLAGS);
        let [bus, address, illegal, zero_divide, emulator, unassigned, watchdog, battery] =
            bits::unpack(esw1, &ERROR_STATUS_WORD_1_FLAGS);
        let [pinging, cold_wakeup, unknown_wakeup] = bits::unpack(esw2, &ERROR_STATUS_WORD_2_FLAGS);
        let [clock_read, alarm, jump_forward, jump_backward] =
            bits::unpack(esw3, &ERROR_STATUS_WORD_3_FLAGS);
        let [power_fail, dsp, uart, clock, level_7] = bits::unpack(esw4, &ERROR_STATUS_WORD_4_FLAGS);

        Ok(Self {
            variable_leader_id,
            ensemble_number,
            real_time_clock,
            ensemble_start_time,
            ensemble_number_increment,
            bit_result_demod_1: demod_1,
            bit_result_demod_2: demod_2,
            bit_result_timing: timing,
            speed_of_sound,
            transducer_depth,
            heading,
            pitch,
            roll,
            salinity,
            temperature,
            mpt_minutes,
            mpt_seconds: f64::from(mpt_secs) + f64::from(mpt_hundredths) / 100.0,
            heading_stdev,
            pitch_stdev,
            roll_stdev,
            adc_transmit_current: adc[0],
            adc_transmit_voltage: adc[1],
            adc_ambient_temp: adc[2],
            adc_pressure_plus: adc[3],
            adc_pressure_minus: adc[4],
            adc_attitude_temp: adc[5],
            adc_attitude: adc[6],
            adc_contamination_sensor: adc[7],
            bus_error_exception: bus,
            address_error_exception: address,
            illegal_instruction_exception: illegal,
            zero_divide_instruction: zero_divide,
            emulator_exception: emulator,
            unassigned_exception: unassigned,
            watchdog_restart_occurred: watchdog,
            battery_saver_power: battery,
            pinging,
            cold_wakeup_occurred: cold_wakeup,
            unknown_wakeup_occurred: unknown_wakeup,
            clock_read_error: clock_read,
            unexpected_alarm: alarm,
            clock_jump_forward: jump_forward,
            clock_jump_backward: jump_backward,
            power_fail,
            spurious_dsp_interrupt: dsp,
            spurious_uart_interrupt: uart,
            spurious_clock_interrupt: clock,
            level_7_interrupt: level_7,
            pressure,
            pressure_variance,
        })
    }

    /// Append the 60-byte wire form to `buf`.
    ///
    /// The clock is written from `real_time_clock`; `ensemble_start_time` is
    /// derived from it and not encoded separately.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        let (mpt_secs, mpt_hundredths) = split_hundredths("mpt_seconds", self.mpt_seconds)?;
        let bit_result = bits::pack(
            &[
                self.bit_result_demod_1,
                self.bit_result_demod_2,
                self.bit_result_timing,
            ],
            &BIT_RESULT_FLAGS,
        );
        let esw1 = bits::pack(
            &[
                self.bus_error_exception,
                self.address_error_exception,
                self.illegal_instruction_exception,
                self.zero_divide_instruction,
                self.emulator_exception,
                self.unassigned_exception,
                self.watchdog_restart_occurred,
                self.battery_saver_power,
            ],
            &ERROR_STATUS_WORD_1_FLAGS,
        );
        let esw2 = bits::pack(
            &[
                self.pinging,
                self.cold_wakeup_occurred,
                self.unknown_wakeup_occurred,
            ],
            &ERROR_STATUS_WORD_2_FLAGS,
        );
        let esw3 = bits::pack(
            &[
                self.clock_read_error,
                self.unexpected_alarm,
                self.clock_jump_forward,
                self.clock_jump_backward,
            ],
            &ERROR_STATUS_WORD_3_FLAGS,
        );
        let esw4 = bits::pack(
            &[
                self.power_fail,
                self.spurious_dsp_interrupt,
                self.spurious_uart_interrupt,
                self.spurious_clock_interrupt,
                self.level_7_interrupt,
            ],
            &ERROR_STATUS_WORD_4_FLAGS,
        );

        buf.write_u16::<LittleEndian>(self.variable_leader_id)?;
        buf.write_u16::<LittleEndian>(self.ensemble_number)?;
        buf.extend_from_slice(&self.real_time_clock);
        buf.write_u8(self.ensemble_number_increment)?;
        buf.write_u8(bit_result)?;
        buf.write_u8(0)?;
        buf.write_u16::<LittleEndian>(self.speed_of_sound)?;
        buf.write_u16::<LittleEndian>(self.transducer_depth)?;
        buf.write_u16::<LittleEndian>(self.heading)?;
        buf.write_i16::<LittleEndian>(self.pitch)?;
        buf.write_i16::<LittleEndian>(self.roll)?;
        buf.write_u16::<LittleEndian>(self.salinity)?;
        buf.write_i16::<LittleEndian>(self.temperature)?;
        buf.extend_from_slice(&[
            self.mpt_minutes,
            mpt_secs,
            mpt_hundredths,
            self.heading_stdev,
            self.pitch_stdev,
            self.roll_stdev,
            self.adc_transmit_current,
            self.adc_transmit_voltage,
            self.adc_ambient_temp,
            self.adc_pressure_plus,
            self.adc_pressure_minus,
            self.adc_attitude_temp,
            self.adc_attitude,
            self.adc_contamination_sensor,
            esw1,
            esw2,
            esw3,
            esw4,
        ]);
        buf.write_u16::<LittleEndian>(0)?;
        buf.write_u32::<LittleEndian>(self.pressure)?;
        buf.write_u32::<LittleEndian>(self.pressure_variance)?;
        buf.write_u32::<LittleEndian>(0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SectionKind;

    fn sample() -> VariableLeader {
        let real_time_clock = [14, 5, 17, 21, 3, 9, 45];
        VariableLeader {
            variable_leader_id: 128,
            ensemble_number: 812,
            real_time_clock,
            ensemble_start_time: clock_to_epoch(&real_time_clock).unwrap(),
            ensemble_number_increment: 0,
            bit_result_timing: true,
            speed_of_sound: 1500,
            transducer_depth: 125,
            heading: 27_000,
            pitch: -120,
            roll: 35,
            salinity: 35,
            temperature: 1250,
            mpt_seconds: 0.5,
            adc_transmit_voltage: 160,
            watchdog_restart_occurred: true,
            pinging: true,
            cold_wakeup_occurred: true,
            clock_jump_backward: true,
            level_7_interrupt: true,
            pressure: 123_456,
            pressure_variance: 12,
            ..VariableLeader::default()
        }
    }

    fn decode(bytes: &[u8]) -> Result<VariableLeader> {
        VariableLeader::decode(&SectionSlice {
            kind: SectionKind::VariableLeader,
            ensemble_offset: 100,
            position: 76,
            bytes,
        })
    }

    #[test]
    fn test_clock_to_epoch() {
        // 2014-05-17 21:03:09 UTC
        assert_eq!(clock_to_epoch(&[14, 5, 17, 21, 3, 9, 0]), Some(1_400_360_589.0));
        assert_eq!(clock_to_epoch(&[14, 5, 17, 21, 3, 9, 50]), Some(1_400_360_589.5));
        assert_eq!(clock_to_epoch(&[14, 2, 30, 0, 0, 0, 0]), None);
        assert_eq!(clock_to_epoch(&[14, 1, 1, 24, 0, 0, 0]), None);
    }

    #[test]
    fn test_round_trip() {
        let leader = sample();
        let mut bytes = Vec::new();
        leader.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), VARIABLE_LEADER_LEN);
        assert_eq!(decode(&bytes).unwrap(), leader);
    }

    #[test]
    fn test_error_status_words() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        // esw1 has the watchdog bit only; esw2 carries pinging and cold wakeup.
        assert_eq!(bytes[42], 0b0100_0000);
        assert_eq!(bytes[43], 0b0100_0001);
        assert_eq!(bytes[44], 0b0000_1000);
        assert_eq!(bytes[45], 0b1000_0000);
        assert_eq!(bytes[12], 0b0000_0010);

        bytes[42] = 0b0000_0001;
        bytes[43] = 0b1000_0000;
        let leader = decode(&bytes).unwrap();
        assert!(leader.bus_error_exception);
        assert!(!leader.watchdog_restart_occurred);
        assert!(!leader.pinging);
        assert!(!leader.cold_wakeup_occurred);
        assert!(leader.unknown_wakeup_occurred);
    }

    #[test]
    fn test_invalid_clock() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[5] = 13;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            CodecError::InvalidField {
                offset: 100,
                field: "real_time_clock",
                ..
            }
        ));
    }

    #[test]
    fn test_id_mismatch() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        bytes[0] = 0x81;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            CodecError::SectionIdMismatch {
                expected: 128,
                found: 129,
                ..
            }
        ));
    }
}
