// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Packed status-byte expansion.
//!
//! Each packed byte is described by a table of `(bit, name)` entries. The
//! same table drives decoding ([`unpack`]), encoding ([`pack`]) and
//! human-readable listings ([`set_flags`]).

/// One named bit inside a packed status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitFlag {
    /// Bit position, 0 = least significant
    pub bit: u8,
    /// Output field name
    pub name: &'static str,
}

impl BitFlag {
    /// Create a table entry.
    pub const fn new(bit: u8, name: &'static str) -> Self {
        Self { bit, name }
    }

    #[inline]
    fn mask(&self) -> u8 {
        1 << self.bit
    }
}

/// Expand `byte` into one boolean per table entry, in table order.
pub fn unpack<const N: usize>(byte: u8, table: &[BitFlag; N]) -> [bool; N] {
    std::array::from_fn(|i| byte & table[i].mask() != 0)
}

/// Pack booleans back into a byte using `table`.
///
/// Bits not named by the table are left clear.
pub fn pack(flags: &[bool], table: &[BitFlag]) -> u8 {
    table
        .iter()
        .zip(flags)
        .fold(0u8, |byte, (flag, &set)| if set { byte | flag.mask() } else { byte })
}

/// Names of the flags set in `byte`.
pub fn set_flags(byte: u8, table: &[BitFlag]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|flag| byte & flag.mask() != 0)
        .map(|flag| flag.name)
        .collect()
}

/// Extract the unsigned field `(byte & mask) >> shift`.
#[inline]
pub fn field(byte: u8, mask: u8, shift: u8) -> u8 {
    (byte & mask) >> shift
}
