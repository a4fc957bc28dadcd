// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! PD0 format constants for the glider-mounted ExplorerDVL.
//!
//! All multi-byte PD0 fields are little-endian.

/// Header id and data source id byte; the ensemble marker is two of these.
pub const PD0_MARKER: u8 = 0x7F;

/// Fixed header length: header id, data source id, byte count, spare, type count.
pub const HEADER_LEN: usize = 6;

/// Trailing checksum length.
pub const CHECKSUM_LEN: usize = 2;

/// Allowed data type counts: six always-present sections, plus bottom track.
pub const ALLOWED_DATA_TYPE_COUNTS: [u8; 2] = [6, 7];

/// Section type id length at the start of every section.
pub const SECTION_ID_LEN: usize = 2;

/// Fixed leader record length.
pub const FIXED_LEADER_LEN: usize = 58;

/// Variable leader record length.
pub const VARIABLE_LEADER_LEN: usize = 60;

/// Bottom track record length.
pub const BOTTOM_TRACK_LEN: usize = 81;

/// Number of acoustic beams on the instrument.
pub const BEAM_COUNT: usize = 4;

/// Bytes per depth cell in the velocity section (four i16).
pub const VELOCITY_CELL_LEN: usize = 8;

/// Bytes per depth cell in the byte-valued cell sections (four u8).
pub const BYTE_CELL_LEN: usize = 4;

/// Acoustic frequencies in kHz, indexed by the low three sysconfig bits.
pub const FREQUENCIES_KHZ: [u16; 6] = [75, 150, 300, 600, 1200, 2400];

/// Required fixed leader data flag.
pub const DATA_FLAG: u8 = 0;

/// Required fixed leader signal processing mode.
pub const SIGNAL_PROCESSING_MODE: u8 = 1;

/// Year offset of the two-digit real-time clock year.
pub const CLOCK_YEAR_BASE: i32 = 2000;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
pub const NTP_EPOCH_OFFSET: f64 = 2_208_988_800.0;
