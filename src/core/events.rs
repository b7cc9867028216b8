// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Warning events emitted during decoding.
//!
//! The decoder reports recoverable conditions (magic mismatch, unrecognized
//! group kinds, dropped fields) through a one-way [`WarningSink`]. Sinks must
//! never call back into the decoder and must not block; the decode loop
//! invokes them synchronously.

use serde::Serialize;
use std::fmt;

/// How serious a decode warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The stream deviates from the format but decoding can continue
    Recoverable,
    /// Noteworthy but expected (e.g. a field dropped by the retention policy)
    Informational,
}

/// A single decode warning.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeWarning {
    /// Severity tag
    pub severity: Severity,
    /// Byte offset in the stream where the condition was observed
    pub offset: u64,
    /// Short human-readable description
    pub message: String,
}

impl DecodeWarning {
    /// Create a recoverable warning.
    pub fn recoverable(offset: u64, message: impl Into<String>) -> Self {
        DecodeWarning {
            severity: Severity::Recoverable,
            offset,
            message: message.into(),
        }
    }

    /// Create an informational warning.
    pub fn informational(offset: u64, message: impl Into<String>) -> Self {
        DecodeWarning {
            severity: Severity::Informational,
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[offset {}] {}", self.offset, self.message)
    }
}

/// One-way sink for decode warnings.
pub trait WarningSink {
    /// Receive one warning. Must not block or re-enter the decoder.
    fn warn(&mut self, warning: DecodeWarning);
}

/// Sink that discards all warnings.
#[derive(Debug, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&mut self, _warning: DecodeWarning) {}
}

/// Sink that forwards warnings to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: DecodeWarning) {
        match warning.severity {
            Severity::Recoverable => {
                tracing::warn!(offset = warning.offset, "{}", warning.message)
            }
            Severity::Informational => {
                tracing::info!(offset = warning.offset, "{}", warning.message)
            }
        }
    }
}

/// Sink that collects warnings for later inspection (used in tests).
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Collected warnings in emission order
    pub warnings: Vec<DecodeWarning>,
}

impl WarningSink for CollectSink {
    fn warn(&mut self, warning: DecodeWarning) {
        self.warnings.push(warning);
    }
}
