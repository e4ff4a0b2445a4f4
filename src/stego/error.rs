// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] names which invariant failed: capacity, framing, or crypto.
//! Decryption failures are deliberately collapsed into a single variant so
//! callers cannot distinguish padding errors from wrong keys.

use core::fmt;

use crate::raster::error::RasterError;

/// Errors produced by the payload framer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Start or end marker absent from the candidate bytes.
    MarkerNotFound,
    /// The payload itself contains the end marker and could not be framed.
    MarkerInPayload,
    /// A chunk record has a bad index header or fails its CRC.
    MalformedChunk,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerNotFound => write!(f, "payload marker not found"),
            Self::MarkerInPayload => write!(f, "payload contains the end marker"),
            Self::MalformedChunk => write!(f, "malformed chunk record"),
        }
    }
}

impl std::error::Error for FramingError {}

/// Errors that can occur during embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The carrier channels are malformed.
    InvalidCarrier(RasterError),
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
    /// Not enough complex blocks for the whole bit stream.
    InsufficientCapacity { required_bits: usize, available_bits: usize },
    /// The end marker was never observed before the carrier was exhausted.
    MarkerNotFound,
    /// Video extraction: chunks before the end marker are missing.
    IncompleteMessage { missing: Vec<usize> },
    /// The key is not 16, 24 or 32 bytes long.
    InvalidKeyLength(usize),
    /// Decryption failed (wrong key or corrupted data).
    DecryptionFailed,
    /// Framing or unframing failed.
    Framing(FramingError),
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCarrier(e) => write!(f, "invalid carrier: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::InsufficientCapacity { required_bits, available_bits } => write!(
                f,
                "insufficient capacity: payload needs {required_bits} bits, carrier holds {available_bits}"
            ),
            Self::MarkerNotFound => write!(f, "end marker not found in carrier"),
            Self::IncompleteMessage { missing } => {
                write!(f, "incomplete message: missing chunk(s) {missing:?}")
            }
            Self::InvalidKeyLength(len) => {
                write!(f, "invalid key length {len} (expected 16, 24 or 32 bytes)")
            }
            Self::DecryptionFailed => write!(f, "decryption failed"),
            Self::Framing(e) => write!(f, "framing error: {e}"),
            Self::Cancelled => write!(f, "operation cancelled by user"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCarrier(e) => Some(e),
            Self::Framing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RasterError> for StegoError {
    fn from(e: RasterError) -> Self {
        Self::InvalidCarrier(e)
    }
}

impl From<FramingError> for StegoError {
    fn from(e: FramingError) -> Self {
        match e {
            FramingError::MarkerNotFound => Self::MarkerNotFound,
            other => Self::Framing(other),
        }
    }
}
