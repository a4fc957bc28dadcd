// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cell-indexed sections: velocity, correlation magnitude, echo intensity
//! and percent good.
//!
//! Each is a two-byte type id followed by one four-beam tuple per depth cell.
//! Tuples are split into four per-beam sequences of `num_cells` values.

use byteorder::{LittleEndian, WriteBytesExt};

use super::SectionSlice;
use crate::core::column::columnar_record;
use crate::pd0::constants::{BEAM_COUNT, BYTE_CELL_LEN, SECTION_ID_LEN, VELOCITY_CELL_LEN};
use crate::pd0::cursor::Pd0Cursor;
use crate::{CodecError, Result};

/// Read `num_cells` beam tuples into one sequence per beam.
fn read_beams<'a, T>(
    cursor: &mut Pd0Cursor<'a>,
    num_cells: usize,
    mut read: impl FnMut(&mut Pd0Cursor<'a>) -> Result<T>,
) -> Result<[Vec<T>; BEAM_COUNT]> {
    let mut beams: [Vec<T>; BEAM_COUNT] = std::array::from_fn(|_| Vec::with_capacity(num_cells));
    for _ in 0..num_cells {
        for beam in beams.iter_mut() {
            beam.push(read(cursor)?);
        }
    }
    Ok(beams)
}

/// Interleave per-beam sequences back into cell tuples.
fn write_beams<T: Copy>(
    field: &'static str,
    beams: [&[T]; BEAM_COUNT],
    buf: &mut Vec<u8>,
    mut write: impl FnMut(&mut Vec<u8>, T) -> std::io::Result<()>,
) -> Result<()> {
    let num_cells = beams[0].len();
    if beams.iter().any(|beam| beam.len() != num_cells) {
        return Err(CodecError::encode(field, "beam sequences differ in length"));
    }
    for cell in 0..num_cells {
        for beam in beams {
            write(buf, beam[cell])?;
        }
    }
    Ok(())
}

columnar_record! {
    /// Water velocity per depth cell, mm/s.
    pub struct Velocity => VelocityColumns {
        velocity_data_id: u16,
        water_velocity_east: Vec<i16>,
        water_velocity_north: Vec<i16>,
        water_velocity_up: Vec<i16>,
        error_velocity: Vec<i16>,
    }
}

impl Velocity {
    /// Decode exactly `num_cells` velocity tuples.
    pub fn decode(slice: &SectionSlice<'_>, num_cells: usize) -> Result<Self> {
        let mut c = slice.cursor(SECTION_ID_LEN + num_cells * VELOCITY_CELL_LEN)?;
        let velocity_data_id = c.read_u16()?;
        let [east, north, up, error] = read_beams(&mut c, num_cells, Pd0Cursor::read_i16)?;
        Ok(Self {
            velocity_data_id,
            water_velocity_east: east,
            water_velocity_north: north,
            water_velocity_up: up,
            error_velocity: error,
        })
    }

    /// Number of depth cells.
    pub fn num_cells(&self) -> usize {
        self.water_velocity_east.len()
    }

    /// Append the wire form to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.write_u16::<LittleEndian>(self.velocity_data_id)?;
        write_beams(
            "water_velocity",
            [
                self.water_velocity_east.as_slice(),
                self.water_velocity_north.as_slice(),
                self.water_velocity_up.as_slice(),
                self.error_velocity.as_slice(),
            ],
            buf,
            |buf, value| buf.write_i16::<LittleEndian>(value),
        )
    }
}

/// Byte-valued four-beam sections share one layout and differ only in names.
macro_rules! byte_cell_section {
    (
        $(#[$meta:meta])*
        $record:ident => $columns:ident {
            $id:ident,
            [$b1:ident, $b2:ident, $b3:ident, $b4:ident]
        }
    ) => {
        columnar_record! {
            $(#[$meta])*
            pub struct $record => $columns {
                $id: u16,
                $b1: Vec<u8>,
                $b2: Vec<u8>,
                $b3: Vec<u8>,
                $b4: Vec<u8>,
            }
        }

        impl $record {
            /// Decode exactly `num_cells` four-byte tuples.
            pub fn decode(slice: &SectionSlice<'_>, num_cells: usize) -> Result<Self> {
                let mut c = slice.cursor(SECTION_ID_LEN + num_cells * BYTE_CELL_LEN)?;
                let $id = c.read_u16()?;
                let [$b1, $b2, $b3, $b4] = read_beams(&mut c, num_cells, Pd0Cursor::read_u8)?;
                Ok(Self { $id, $b1, $b2, $b3, $b4 })
            }

            /// Number of depth cells.
            pub fn num_cells(&self) -> usize {
                self.$b1.len()
            }

            /// Append the wire form to `buf`.
            pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<()> {
                buf.write_u16::<LittleEndian>(self.$id)?;
                write_beams(
                    stringify!($id),
                    [
                        self.$b1.as_slice(),
                        self.$b2.as_slice(),
                        self.$b3.as_slice(),
                        self.$b4.as_slice(),
                    ],
                    buf,
                    |buf, value| buf.write_u8(value),
                )
            }
        }
    };
}

byte_cell_section! {
    /// Correlation magnitude per depth cell.
    CorrelationMagnitude => CorrelationMagnitudeColumns {
        correlation_magnitude_id,
        [
            correlation_magnitude_beam1,
            correlation_magnitude_beam2,
            correlation_magnitude_beam3,
            correlation_magnitude_beam4
        ]
    }
}

byte_cell_section! {
    /// Echo intensity per depth cell.
    EchoIntensity => EchoIntensityColumns {
        echo_intensity_id,
        [echo_intensity_beam1, echo_intensity_beam2, echo_intensity_beam3, echo_intensity_beam4]
    }
}

byte_cell_section! {
    /// Percent good per depth cell.
    PercentGood => PercentGoodColumns {
        percent_good_id,
        [percent_good_3beam, percent_transforms_reject, percent_bad_beams, percent_good_4beam]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SectionKind;

    fn slice(kind: SectionKind, bytes: &[u8]) -> SectionSlice<'_> {
        SectionSlice {
            kind,
            ensemble_offset: 0,
            position: 136,
            bytes,
        }
    }

    #[test]
    fn test_velocity_decodes_every_cell() {
        let mut bytes = 256u16.to_le_bytes().to_vec();
        for cell in 0..3i16 {
            for beam in 0..4i16 {
                bytes.extend_from_slice(&(-(cell * 10 + beam)).to_le_bytes());
            }
        }

        let velocity = Velocity::decode(&slice(SectionKind::Velocity, &bytes), 3).unwrap();
        assert_eq!(velocity.num_cells(), 3);
        assert_eq!(velocity.water_velocity_east, vec![0, -10, -20]);
        assert_eq!(velocity.water_velocity_north, vec![-1, -11, -21]);
        assert_eq!(velocity.error_velocity, vec![-3, -13, -23]);

        let mut out = Vec::new();
        velocity.write_to(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_short_cell_section() {
        let mut bytes = 512u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let section = slice(SectionKind::CorrelationMagnitude, &bytes);
        assert_eq!(
            CorrelationMagnitude::decode(&section, 2).unwrap().correlation_magnitude_beam4,
            vec![4, 8]
        );
        assert!(matches!(
            CorrelationMagnitude::decode(&section, 3).unwrap_err(),
            CodecError::SectionLength {
                section: SectionKind::CorrelationMagnitude,
                needed: 14,
                available: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = 1024u16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[100, 0, 0, 100, 0xEE, 0xEE]);

        let good = PercentGood::decode(&slice(SectionKind::PercentGood, &bytes), 1).unwrap();
        assert_eq!(good.percent_good_3beam, vec![100]);
        assert_eq!(good.percent_good_4beam, vec![100]);
        assert_eq!(good.num_cells(), 1);
    }

    #[test]
    fn test_zero_cells() {
        let bytes = 768u16.to_le_bytes();
        let echo = EchoIntensity::decode(&slice(SectionKind::EchoIntensity, &bytes), 0).unwrap();
        assert_eq!(echo.echo_intensity_id, 768);
        assert!(echo.echo_intensity_beam1.is_empty());
    }

    #[test]
    fn test_write_rejects_ragged_beams() {
        let echo = EchoIntensity {
            echo_intensity_id: 768,
            echo_intensity_beam1: vec![1, 2],
            echo_intensity_beam2: vec![1],
            echo_intensity_beam3: vec![1, 2],
            echo_intensity_beam4: vec![1, 2],
        };
        assert!(matches!(
            echo.write_to(&mut Vec::new()).unwrap_err(),
            CodecError::Encode {
                field: "echo_intensity_id",
                ..
            }
        ));
    }
}
