// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for gdfcodec.
//!
//! A `GdfError` is fatal: it aborts the whole decode call and no partial
//! output is returned. Recoverable conditions (magic mismatch, unrecognized
//! group kinds) are reported through the warning sink instead and never
//! surface here.

use std::fmt;

/// Errors that can occur while decoding a GDF stream.
///
/// Every variant that corresponds to a malformed stream carries the byte
/// offset at which decoding failed.
#[derive(Debug, Clone)]
pub enum GdfError {
    /// Stream ended inside the fixed file preamble
    TruncatedHeader {
        /// Byte offset where the read started
        offset: u64,
        /// Preamble bytes required
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// A block payload stopped short of its declared element count
    TruncatedPayload {
        /// Name of the block whose payload was cut off
        field: String,
        /// Byte offset of the payload start
        offset: u64,
        /// Payload bytes declared by the block header
        requested: usize,
    },

    /// The stream could not be repositioned for the header probe
    Unseekable {
        /// Underlying seek error
        message: String,
    },

    /// A block declared a payload with a type code of unknown width
    UnsupportedType {
        /// Name of the offending block
        field: String,
        /// Raw type code from the block header
        code: u8,
        /// Byte offset of the block header
        offset: u64,
    },

    /// Decode was cancelled at a block boundary
    Cancelled {
        /// Byte offset at which the cancellation flag was observed
        offset: u64,
    },

    /// Underlying I/O error
    Io {
        /// Error message
        message: String,
    },
}

impl GdfError {
    /// Create a truncated-header error.
    pub fn truncated_header(offset: u64, needed: usize, available: usize) -> Self {
        GdfError::TruncatedHeader {
            offset,
            needed,
            available,
        }
    }

    /// Create a truncated-payload error.
    pub fn truncated_payload(field: impl Into<String>, offset: u64, requested: usize) -> Self {
        GdfError::TruncatedPayload {
            field: field.into(),
            offset,
            requested,
        }
    }

    /// Create an unseekable-stream error.
    pub fn unseekable(message: impl Into<String>) -> Self {
        GdfError::Unseekable {
            message: message.into(),
        }
    }

    /// Create an unsupported-type error.
    pub fn unsupported_type(field: impl Into<String>, code: u8, offset: u64) -> Self {
        GdfError::UnsupportedType {
            field: field.into(),
            code,
            offset,
        }
    }

    /// Create a cancellation error.
    pub fn cancelled(offset: u64) -> Self {
        GdfError::Cancelled { offset }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            GdfError::TruncatedHeader {
                offset,
                needed,
                available,
            } => vec![
                ("offset", offset.to_string()),
                ("needed", needed.to_string()),
                ("available", available.to_string()),
            ],
            GdfError::TruncatedPayload {
                field,
                offset,
                requested,
            } => vec![
                ("field", field.clone()),
                ("offset", offset.to_string()),
                ("requested", requested.to_string()),
            ],
            GdfError::Unseekable { message } => vec![("message", message.clone())],
            GdfError::UnsupportedType {
                field,
                code,
                offset,
            } => vec![
                ("field", field.clone()),
                ("code", format!("{code:#04x}")),
                ("offset", offset.to_string()),
            ],
            GdfError::Cancelled { offset } => vec![("offset", offset.to_string())],
            GdfError::Io { message } => vec![("message", message.clone())],
        }
    }
}

impl fmt::Display for GdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GdfError::TruncatedHeader {
                offset,
                needed,
                available,
            } => write!(
                f,
                "Truncated header: needed {needed} bytes at offset {offset}, but only {available} bytes available"
            ),
            GdfError::TruncatedPayload {
                field,
                offset,
                requested,
            } => write!(
                f,
                "Truncated payload for block '{field}': {requested} bytes declared at offset {offset}"
            ),
            GdfError::Unseekable { message } => {
                write!(f, "Stream not seekable during header probe: {message}")
            }
            GdfError::UnsupportedType {
                field,
                code,
                offset,
            } => write!(
                f,
                "Unsupported type code {code:#04x} for block '{field}' at offset {offset}"
            ),
            GdfError::Cancelled { offset } => {
                write!(f, "Decode cancelled at offset {offset}")
            }
            GdfError::Io { message } => write!(f, "IO error: {message}"),
        }
    }
}

impl std::error::Error for GdfError {}

impl From<std::io::Error> for GdfError {
    fn from(err: std::io::Error) -> Self {
        GdfError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for gdfcodec operations.
pub type Result<T> = std::result::Result<T, GdfError>;
