// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bottom track: velocity and range over a detected sea floor, 81 bytes.
//!
//! Only present when the glider is close enough to the bottom. Its column
//! group is NaN-filled so ensembles without it keep every column aligned.
//! Per-beam range is split on the wire into a 16-bit low part and an 8-bit
//! high part; [`BottomTrack::range`] reassembles it.

use byteorder::{LittleEndian, WriteBytesExt};

use super::SectionSlice;
use crate::core::column::columnar_record;
use crate::pd0::constants::{BEAM_COUNT, BOTTOM_TRACK_LEN};
use crate::{CodecError, Result};

columnar_record! {
    /// Decoded bottom track.
    pub struct BottomTrack => nan_filled BottomTrackColumns {
        bottom_track_id: u16,
        bt_pings_per_ensemble: u16,
        bt_delay_before_reacquire: u16,
        bt_corr_magnitude_min: u8,
        bt_eval_magnitude_min: u8,
        bt_percent_good_min: u8,
        bt_mode: u8,
        bt_error_velocity_max: u16,
        beam1_bt_range_lsb: u16,
        beam2_bt_range_lsb: u16,
        beam3_bt_range_lsb: u16,
        beam4_bt_range_lsb: u16,
        eastward_bt_velocity: i16,
        northward_bt_velocity: i16,
        upward_bt_velocity: i16,
        error_bt_velocity: i16,
        beam1_bt_correlation: u8,
        beam2_bt_correlation: u8,
        beam3_bt_correlation: u8,
        beam4_bt_correlation: u8,
        beam1_eval_amp: u8,
        beam2_eval_amp: u8,
        beam3_eval_amp: u8,
        beam4_eval_amp: u8,
        beam1_bt_percent_good: u8,
        beam2_bt_percent_good: u8,
        beam3_bt_percent_good: u8,
        beam4_bt_percent_good: u8,
        ref_layer_min: u16,
        ref_layer_near: u16,
        ref_layer_far: u16,
        beam1_ref_layer_velocity: i16,
        beam2_ref_layer_velocity: i16,
        beam3_ref_layer_velocity: i16,
        beam4_ref_layer_velocity: i16,
        beam1_ref_correlation: u8,
        beam2_ref_correlation: u8,
        beam3_ref_correlation: u8,
        beam4_ref_correlation: u8,
        beam1_ref_intensity: u8,
        beam2_ref_intensity: u8,
        beam3_ref_intensity: u8,
        beam4_ref_intensity: u8,
        beam1_ref_percent_good: u8,
        beam2_ref_percent_good: u8,
        beam3_ref_percent_good: u8,
        beam4_ref_percent_good: u8,
        bt_max_depth: u16,
        beam1_rssi_amplitude: u8,
        beam2_rssi_amplitude: u8,
        beam3_rssi_amplitude: u8,
        beam4_rssi_amplitude: u8,
        bt_gain: u8,
        beam1_bt_range_msb: u8,
        beam2_bt_range_msb: u8,
        beam3_bt_range_msb: u8,
        beam4_bt_range_msb: u8,
    }
}

/// Names of every NaN-filled bottom track column.
pub const BOTTOM_TRACK_FIELDS: &[&str] = BottomTrack::FIELD_NAMES;

impl BottomTrack {
    /// Decode a bottom track section.
    pub fn decode(slice: &SectionSlice<'_>) -> Result<Self> {
        let mut c = slice.cursor(BOTTOM_TRACK_LEN)?;

        let bottom_track_id = c.read_u16()?;
        let bt_pings_per_ensemble = c.read_u16()?;
        let bt_delay_before_reacquire = c.read_u16()?;
        let [bt_corr_magnitude_min, bt_eval_magnitude_min, bt_percent_good_min, bt_mode] =
            c.read_array::<4>()?;
        let bt_error_velocity_max = c.read_u16()?;
        // reserved
        c.skip(4)?;

        Ok(Self {
            bottom_track_id,
            bt_pings_per_ensemble,
            bt_delay_before_reacquire,
            bt_corr_magnitude_min,
            bt_eval_magnitude_min,
            bt_percent_good_min,
            bt_mode,
            bt_error_velocity_max,
            beam1_bt_range_lsb: c.read_u16()?,
            beam2_bt_range_lsb: c.read_u16()?,
            beam3_bt_range_lsb: c.read_u16()?,
            beam4_bt_range_lsb: c.read_u16()?,
            eastward_bt_velocity: c.read_i16()?,
            northward_bt_velocity: c.read_i16()?,
            upward_bt_velocity: c.read_i16()?,
            error_bt_velocity: c.read_i16()?,
            beam1_bt_correlation: c.read_u8()?,
            beam2_bt_correlation: c.read_u8()?,
            beam3_bt_correlation: c.read_u8()?,
            beam4_bt_correlation: c.read_u8()?,
            beam1_eval_amp: c.read_u8()?,
            beam2_eval_amp: c.read_u8()?,
            beam3_eval_amp: c.read_u8()?,
            beam4_eval_amp: c.read_u8()?,
            beam1_bt_percent_good: c.read_u8()?,
            beam2_bt_percent_good: c.read_u8()?,
            beam3_bt_percent_good: c.read_u8()?,
            beam4_bt_percent_good: c.read_u8()?,
            ref_layer_min: c.read_u16()?,
            ref_layer_near: c.read_u16()?,
            ref_layer_far: c.read_u16()?,
            beam1_ref_layer_velocity: c.read_i16()?,
            beam2_ref_layer_velocity: c.read_i16()?,
            beam3_ref_layer_velocity: c.read_i16()?,
            beam4_ref_layer_velocity: c.read_i16()?,
            beam1_ref_correlation: c.read_u8()?,
            beam2_ref_correlation: c.read_u8()?,
            beam3_ref_correlation: c.read_u8()?,
            beam4_ref_correlation: c.read_u8()?,
            beam1_ref_intensity: c.read_u8()?,
            beam2_ref_intensity: c.read_u8()?,
            beam3_ref_intensity: c.read_u8()?,
            beam4_ref_intensity: c.read_u8()?,
            beam1_ref_percent_good: c.read_u8()?,
            beam2_ref_percent_good: c.read_u8()?,
            beam3_ref_percent_good: c.read_u8()?,
            beam4_ref_percent_good: c.read_u8()?,
            bt_max_depth: c.read_u16()?,
            beam1_rssi_amplitude: c.read_u8()?,
            beam2_rssi_amplitude: c.read_u8()?,
            beam3_rssi_amplitude: c.read_u8()?,
            beam4_rssi_amplitude: c.read_u8()?,
            bt_gain: c.read_u8()?,
            beam1_bt_range_msb: c.read_u8()?,
            beam2_bt_range_msb: c.read_u8()?,
            beam3_bt_range_msb: c.read_u8()?,
            beam4_bt_range_msb: c.read_u8()?,
        })
    }

    /// Bottom range of `beam` (1-4), `lsb + msb * 65536`.
    pub fn range(&self, beam: usize) -> Option<u32> {
        let (lsb, msb) = match beam {
            1 => (self.beam1_bt_range_lsb, self.beam1_bt_range_msb),
            2 => (self.beam2_bt_range_lsb, self.beam2_bt_range_msb),
            3 => (self.beam3_bt_range_lsb, self.beam3_bt_range_msb),
            4 => (self.beam4_bt_range_lsb, self.beam4_bt_range_msb),
            _ => return None,
        };
        Some(u32::from(lsb) + u32::from(msb) * 65_536)
    }

    /// Append the 81-byte wire form to `buf`. Reserved bytes are written as zero.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.write_u16::<LittleEndian>(self.bottom_track_id)?;
        buf.write_u16::<LittleEndian>(self.bt_pings_per_ensemble)?;
        buf.write_u16::<LittleEndian>(self.bt_delay_before_reacquire)?;
        buf.extend_from_slice(&[
            self.bt_corr_magnitude_min,
            self.bt_eval_magnitude_min,
            self.bt_percent_good_min,
            self.bt_mode,
        ]);
        buf.write_u16::<LittleEndian>(self.bt_error_velocity_max)?;
        buf.write_u32::<LittleEndian>(0)?;
        for lsb in [
            self.beam1_bt_range_lsb,
            self.beam2_bt_range_lsb,
            self.beam3_bt_range_lsb,
            self.beam4_bt_range_lsb,
        ] {
            buf.write_u16::<LittleEndian>(lsb)?;
        }
        for velocity in [
            self.eastward_bt_velocity,
            self.northward_bt_velocity,
            self.upward_bt_velocity,
            self.error_bt_velocity,
        ] {
            buf.write_i16::<LittleEndian>(velocity)?;
        }
        buf.extend_from_slice(&[
            self.beam1_bt_correlation,
            self.beam2_bt_correlation,
            self.beam3_bt_correlation,
            self.beam4_bt_correlation,
            self.beam1_eval_amp,
            self.beam2_eval_amp,
            self.beam3_eval_amp,
            self.beam4_eval_amp,
            self.beam1_bt_percent_good,
            self.beam2_bt_percent_good,
            self.beam3_bt_percent_good,
            self.beam4_bt_percent_good,
        ]);
        for layer in [self.ref_layer_min, self.ref_layer_near, self.ref_layer_far] {
            buf.write_u16::<LittleEndian>(layer)?;
        }
        for velocity in [
            self.beam1_ref_layer_velocity,
            self.beam2_ref_layer_velocity,
            self.beam3_ref_layer_velocity,
            self.beam4_ref_layer_velocity,
        ] {
            buf.write_i16::<LittleEndian>(velocity)?;
        }
        buf.extend_from_slice(&[
            self.beam1_ref_correlation,
            self.beam2_ref_correlation,
            self.beam3_ref_correlation,
            self.beam4_ref_correlation,
            self.beam1_ref_intensity,
            self.beam2_ref_intensity,
            self.beam3_ref_intensity,
            self.beam4_ref_intensity,
            self.beam1_ref_percent_good,
            self.beam2_ref_percent_good,
            self.beam3_ref_percent_good,
            self.beam4_ref_percent_good,
        ]);
        buf.write_u16::<LittleEndian>(self.bt_max_depth)?;
        buf.extend_from_slice(&[
            self.beam1_rssi_amplitude,
            self.beam2_rssi_amplitude,
            self.beam3_rssi_amplitude,
            self.beam4_rssi_amplitude,
            self.bt_gain,
            self.beam1_bt_range_msb,
            self.beam2_bt_range_msb,
            self.beam3_bt_range_msb,
            self.beam4_bt_range_msb,
        ]);
        Ok(())
    }
}

impl BottomTrackColumns {
    /// Reassembled bottom range of `beam` (1-4) for every row, NaN where
    /// the ensemble had no bottom track.
    pub fn range(&self, beam: usize) -> Result<Vec<f64>> {
        let (lsb, msb) = match beam {
            1 => (&self.beam1_bt_range_lsb, &self.beam1_bt_range_msb),
            2 => (&self.beam2_bt_range_lsb, &self.beam2_bt_range_msb),
            3 => (&self.beam3_bt_range_lsb, &self.beam3_bt_range_msb),
            4 => (&self.beam4_bt_range_lsb, &self.beam4_bt_range_msb),
            _ => {
                return Err(CodecError::config(format!(
                    "beam must be 1..={BEAM_COUNT}, got {beam}"
                )))
            }
        };
        Ok(lsb
            .iter()
            .zip(msb)
            .map(|(lsb, msb)| lsb + msb * 65_536.0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SectionKind;

    fn sample() -> BottomTrack {
        BottomTrack {
            bottom_track_id: 1536,
            bt_pings_per_ensemble: 1,
            bt_corr_magnitude_min: 220,
            bt_mode: 5,
            beam1_bt_range_lsb: 0x1234,
            beam3_bt_range_lsb: 500,
            eastward_bt_velocity: -250,
            error_bt_velocity: -32_768,
            beam2_eval_amp: 77,
            ref_layer_far: 320,
            beam4_ref_layer_velocity: 12,
            bt_max_depth: 6500,
            bt_gain: 1,
            beam1_bt_range_msb: 2,
            beam4_bt_range_msb: 9,
            ..BottomTrack::default()
        }
    }

    fn decode(bytes: &[u8]) -> Result<BottomTrack> {
        BottomTrack::decode(&SectionSlice {
            kind: SectionKind::BottomTrack,
            ensemble_offset: 0,
            position: 300,
            bytes,
        })
    }

    #[test]
    fn test_field_count() {
        assert_eq!(BOTTOM_TRACK_FIELDS.len(), 57);
        assert_eq!(BOTTOM_TRACK_FIELDS[0], "bottom_track_id");
        assert_eq!(BOTTOM_TRACK_FIELDS[56], "beam4_bt_range_msb");
    }

    #[test]
    fn test_round_trip() {
        let track = sample();
        let mut bytes = Vec::new();
        track.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), BOTTOM_TRACK_LEN);
        assert_eq!(decode(&bytes).unwrap(), track);
    }

    #[test]
    fn test_wire_positions() {
        let mut bytes = Vec::new();
        sample().write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[16..18], &0x1234u16.to_le_bytes());
        assert_eq!(&bytes[24..26], &(-250i16).to_le_bytes());
        assert_eq!(bytes[37], 77);
        assert_eq!(&bytes[70..72], &6500u16.to_le_bytes());
        assert_eq!(bytes[76], 1);
        assert_eq!(bytes[77], 2);
        assert_eq!(bytes[80], 9);
    }

    #[test]
    fn test_range() {
        let track = sample();
        assert_eq!(track.range(1), Some(0x1234 + 2 * 65_536));
        assert_eq!(track.range(3), Some(500));
        assert_eq!(track.range(4), Some(9 * 65_536));
        assert_eq!(track.range(0), None);
    }

    #[test]
    fn test_column_range_with_missing_rows() {
        let mut columns = BottomTrackColumns::default();
        columns.push(&sample());
        columns.push_missing();

        let range = columns.range(1).unwrap();
        assert_eq!(range[0], f64::from(0x1234 + 2 * 65_536));
        assert!(range[1].is_nan());
        assert!(columns.range(5).is_err());
    }
}
