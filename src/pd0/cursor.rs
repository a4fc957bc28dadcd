// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Little-endian read cursor over one PD0 ensemble.
//!
//! The cursor tracks its position relative to the start of the ensemble so
//! that short-read errors report ensemble-relative byte positions.

use byteorder::{ByteOrder, LittleEndian};

use crate::{CodecError, Result};

/// Bounds-checked little-endian reader.
///
/// # Example
///
/// ```
/// use dvlcodec::pd0::cursor::Pd0Cursor;
///
/// let data = [0x80, 0x00, 0x2A, 0x00];
/// let mut cursor = Pd0Cursor::new(&data);
/// assert_eq!(cursor.read_u16().unwrap(), 128);
/// assert_eq!(cursor.read_u16().unwrap(), 42);
/// assert!(cursor.is_at_end());
/// ```
#[derive(Debug, Clone)]
pub struct Pd0Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Pd0Cursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a cursor positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Get the current position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Get the remaining bytes available to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Check if at end of buffer.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::buffer_too_short(
                len,
                self.remaining(),
                self.offset,
            ));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Skip `len` bytes (spare and reserved fields).
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a u16 value.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.take(2).map(LittleEndian::read_u16)
    }

    /// Read an i16 value.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.take(2).map(LittleEndian::read_i16)
    }

    /// Read a u32 value.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.take(4).map(LittleEndian::read_u32)
    }

    /// Read a u64 value.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.take(8).map(LittleEndian::read_u64)
    }

    /// Read `N` consecutive bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
