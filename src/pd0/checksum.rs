// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Ensemble checksum.
//!
//! The checksum is the byte sum of the ensemble, marker through the last
//! byte before the checksum itself, modulo 65536.

use super::scanner::Frame;
use crate::{CodecError, Result};

/// Sum `bytes` modulo 65536.
pub fn compute(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)))
}

/// Check a candidate frame against its stored checksum.
///
/// Returns the checksum on success so it can be recorded with the ensemble.
pub fn validate(frame: &Frame<'_>) -> Result<u16> {
    let computed = compute(frame.body());
    let stored = frame.stored_checksum();
    if computed != stored {
        return Err(CodecError::ChecksumMismatch {
            offset: frame.offset,
            computed,
            stored,
        });
    }
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_checksum(body: &[u8], checksum: u16) -> Vec<u8> {
        let mut bytes = body.to_vec();
        bytes.extend_from_slice(&checksum.to_le_bytes());
        bytes
    }

    #[test]
    fn test_compute_wraps() {
        assert_eq!(compute(&[]), 0);
        assert_eq!(compute(&[1, 2, 3]), 6);
        assert_eq!(compute(&[0xFF; 258]), (0xFFu32 * 258 % 65536) as u16);
        assert_eq!(compute(&[0xFF; 1000]), (255_000u32 % 65536) as u16);
    }

    #[test]
    fn test_validate() {
        let body = [0x7F, 0x7F, 0x08, 0x00, 0x00, 0x06, 0x10, 0x20];
        let good = frame_with_checksum(&body, compute(&body));
        let frame = Frame {
            offset: 4,
            bytes: &good,
        };
        assert_eq!(validate(&frame).unwrap(), compute(&body));

        // Byte-swapped checksum must be rejected.
        let swapped = frame_with_checksum(&body, compute(&body).swap_bytes());
        let frame = Frame {
            offset: 4,
            bytes: &swapped,
        };
        match validate(&frame) {
            Err(CodecError::ChecksumMismatch {
                offset,
                computed,
                stored,
            }) => {
                assert_eq!(offset, 4);
                assert_eq!(computed, compute(&body));
                assert_eq!(stored, compute(&body).swap_bytes());
            }
            other => panic!("expected checksum mismatch, got {other:?}"),
        }
    }
}
