// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for dvlcodec.
//!
//! Errors fall into the classes a PD0 decode run distinguishes:
//! - Framing (truncated ensemble at the end of the buffer)
//! - Integrity (checksum mismatch)
//! - Structural (header, section id or constant-field violations)
//! - Configuration and I/O (surfaced by the reader and CLI)
//!
//! Every per-ensemble variant carries the absolute byte offset of the
//! ensemble so a warning can be traced back to the offending bytes.

use super::SectionKind;

/// Error class used to decide whether a decode run can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Marker not found or ensemble runs past the end of the buffer
    Framing,
    /// Checksum mismatch
    Integrity,
    /// Header, section or constant-field violation
    Structural,
    /// Invalid decoder configuration
    Config,
    /// Filesystem or serialization failure
    Io,
}

impl ErrorKind {
    /// Short lowercase label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Framing => "framing",
            ErrorKind::Integrity => "integrity",
            ErrorKind::Structural => "structural",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        }
    }
}

/// Errors that can occur while decoding PD0 data.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input buffer contained no bytes at all
    #[error("input buffer is empty")]
    EmptyBuffer,

    /// No ensemble start marker was found anywhere in the buffer
    #[error("no PD0 ensembles found in {buffer_len} bytes")]
    NoEnsembles {
        /// Buffer length in bytes
        buffer_len: usize,
    },

    /// Declared ensemble length runs past the end of the buffer
    #[error(
        "truncated ensemble at offset {offset}: needs {declared} bytes, only {available} available"
    )]
    Truncated {
        /// Offset of the ensemble marker
        offset: usize,
        /// Bytes needed (declared length plus checksum)
        declared: usize,
        /// Bytes remaining in the buffer from the marker
        available: usize,
    },

    /// Computed checksum differs from the stored one
    #[error("checksum mismatch at offset {offset}: computed {computed:#06X}, stored {stored:#06X}")]
    ChecksumMismatch {
        /// Offset of the ensemble marker
        offset: usize,
        /// Checksum computed over the ensemble bytes
        computed: u16,
        /// Checksum stored after the ensemble
        stored: u16,
    },

    /// Header id or data source id is not the PD0 marker byte
    #[error("invalid ensemble header at offset {offset}: expected 0x7F7F, found {found:#06X}")]
    HeaderMismatch {
        /// Offset of the ensemble marker
        offset: usize,
        /// Header id and data source id as read (big-endian pair)
        found: u16,
    },

    /// A section did not start with its expected type id
    #[error(
        "{section} id mismatch in ensemble at offset {offset}: expected {expected}, found {found}"
    )]
    SectionIdMismatch {
        /// Offset of the ensemble marker
        offset: usize,
        /// Section that was being decoded
        section: SectionKind,
        /// Expected type id
        expected: u16,
        /// Type id found on the wire
        found: u16,
    },

    /// The offset table pointed at an unknown section type
    #[error("unknown section type {type_id} at byte {position} of ensemble at offset {offset}")]
    UnknownSection {
        /// Offset of the ensemble marker
        offset: usize,
        /// Position of the section inside the ensemble
        position: usize,
        /// Type id found on the wire
        type_id: u16,
    },

    /// A section appeared more than once in one ensemble
    #[error("duplicate {section} section in ensemble at offset {offset}")]
    DuplicateSection {
        /// Offset of the ensemble marker
        offset: usize,
        /// Repeated section
        section: SectionKind,
    },

    /// A required section was not present
    #[error("ensemble at offset {offset} has no {section} section")]
    MissingSection {
        /// Offset of the ensemble marker
        offset: usize,
        /// Section that was not found
        section: SectionKind,
    },

    /// Fixed leader constant did not match the supported configuration
    #[error("unsupported {field} in ensemble at offset {offset}: expected {expected}, found {found}")]
    ConstantViolation {
        /// Offset of the ensemble marker
        offset: usize,
        /// Field name
        field: &'static str,
        /// Supported value
        expected: u32,
        /// Value found on the wire
        found: u32,
    },

    /// A field holds a value that cannot be interpreted
    #[error("invalid {field} in ensemble at offset {offset}: {reason}")]
    InvalidField {
        /// Offset of the ensemble marker
        offset: usize,
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Section does not fit in the bytes available to it
    #[error(
        "{section} section in ensemble at offset {offset} needs {needed} bytes, only {available} available"
    )]
    SectionLength {
        /// Offset of the ensemble marker
        offset: usize,
        /// Section being decoded
        section: SectionKind,
        /// Bytes required by the section layout
        needed: usize,
        /// Bytes between the section start and the next section
        available: usize,
    },

    /// Buffer too short for requested read
    #[error(
        "buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
    )]
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: usize,
    },

    /// Ensemble could not be encoded
    #[error("cannot encode {field}: {reason}")]
    Encode {
        /// Field that could not be represented on the wire
        field: &'static str,
        /// Why
        reason: String,
    },

    /// Invalid decoder configuration
    #[error("invalid configuration: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CodecError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(offset: usize, field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::InvalidField {
            offset,
            field,
            reason: reason.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::Encode {
            field,
            reason: reason.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: usize) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Error class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::EmptyBuffer | CodecError::NoEnsembles { .. } | CodecError::Truncated { .. } => {
                ErrorKind::Framing
            }
            CodecError::ChecksumMismatch { .. } => ErrorKind::Integrity,
            CodecError::HeaderMismatch { .. }
            | CodecError::SectionIdMismatch { .. }
            | CodecError::UnknownSection { .. }
            | CodecError::DuplicateSection { .. }
            | CodecError::MissingSection { .. }
            | CodecError::ConstantViolation { .. }
            | CodecError::InvalidField { .. }
            | CodecError::SectionLength { .. }
            | CodecError::BufferTooShort { .. }
            | CodecError::Encode { .. } => ErrorKind::Structural,
            CodecError::Config { .. } => ErrorKind::Config,
            CodecError::Io(_) | CodecError::Json(_) => ErrorKind::Io,
        }
    }

    /// Whether decoding can resume at the next ensemble after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Integrity | ErrorKind::Structural)
    }

    /// Byte offset of the offending ensemble, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CodecError::Truncated { offset, .. }
            | CodecError::ChecksumMismatch { offset, .. }
            | CodecError::HeaderMismatch { offset, .. }
            | CodecError::SectionIdMismatch { offset, .. }
            | CodecError::UnknownSection { offset, .. }
            | CodecError::DuplicateSection { offset, .. }
            | CodecError::MissingSection { offset, .. }
            | CodecError::ConstantViolation { offset, .. }
            | CodecError::InvalidField { offset, .. }
            | CodecError::SectionLength { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::EmptyBuffer => vec![],
            CodecError::NoEnsembles { buffer_len } => vec![("buffer_len", buffer_len.to_string())],
            CodecError::Truncated {
                offset,
                declared,
                available,
            } => vec![
                ("offset", offset.to_string()),
                ("declared", declared.to_string()),
                ("available", available.to_string()),
            ],
            CodecError::ChecksumMismatch {
                offset,
                computed,
                stored,
            } => vec![
                ("offset", offset.to_string()),
                ("computed", computed.to_string()),
                ("stored", stored.to_string()),
            ],
            CodecError::HeaderMismatch { offset, found } => vec![
                ("offset", offset.to_string()),
                ("found", format!("{found:#06X}")),
            ],
            CodecError::SectionIdMismatch {
                offset,
                section,
                expected,
                found,
            } => vec![
                ("offset", offset.to_string()),
                ("section", section.to_string()),
                ("expected", expected.to_string()),
                ("found", found.to_string()),
            ],
            CodecError::UnknownSection {
                offset,
                position,
                type_id,
            } => vec![
                ("offset", offset.to_string()),
                ("position", position.to_string()),
                ("type_id", type_id.to_string()),
            ],
            CodecError::DuplicateSection { offset, section }
            | CodecError::MissingSection { offset, section } => vec![
                ("offset", offset.to_string()),
                ("section", section.to_string()),
            ],
            CodecError::ConstantViolation {
                offset,
                field,
                expected,
                found,
            } => vec![
                ("offset", offset.to_string()),
                ("field", field.to_string()),
                ("expected", expected.to_string()),
                ("found", found.to_string()),
            ],
            CodecError::InvalidField {
                offset,
                field,
                reason,
            } => vec![
                ("offset", offset.to_string()),
                ("field", field.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::SectionLength {
                offset,
                section,
                needed,
                available,
            } => vec![
                ("offset", offset.to_string()),
                ("section", section.to_string()),
                ("needed", needed.to_string()),
                ("available", available.to_string()),
            ],
            CodecError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            CodecError::Encode { field, reason } => {
                vec![("field", field.to_string()), ("reason", reason.clone())]
            }
            CodecError::Config { message } => vec![("message", message.clone())],
            CodecError::Io(err) => vec![("message", err.to_string())],
            CodecError::Json(err) => vec![("message", err.to_string())],
        }
    }
}

/// Result type for dvlcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
