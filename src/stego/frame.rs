// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Payload frame construction and parsing.
//!
//! The frame is the container that wraps the (optionally encrypted) payload
//! before it is turned into a bit stream:
//!
//! ```text
//! [17 bytes] START_MARKER  "~#@BPCS1_START@#~"  (the digit is the format version)
//! [N bytes ] payload
//! [15 bytes] END_MARKER    "~#@BPCS1_END@#~"
//! ```
//!
//! Total frame size = 32 + payload_len bytes. Markers are public constants,
//! not secrets. Extraction stops at the first end-marker occurrence, so a
//! payload containing the end marker is refused at framing time.

use crate::stego::error::FramingError;
use crate::stego::extract::ByteCollector;
use crate::stego::layout::BITS_PER_BLOCK;

/// Frame format version, mirrored in both markers.
pub const FRAME_VERSION: u8 = 1;

/// Literal prefix of every frame.
pub const START_MARKER: &[u8] = b"~#@BPCS1_START@#~";

/// Literal suffix of every frame.
pub const END_MARKER: &[u8] = b"~#@BPCS1_END@#~";

/// Bytes added by [`frame`].
pub const FRAME_OVERHEAD: usize = START_MARKER.len() + END_MARKER.len();

/// Wrap `payload` in start/end markers.
///
/// # Errors
/// [`FramingError::MarkerInPayload`] if the first [`END_MARKER`] after the
/// start marker is not the appended one. This covers a payload containing the
/// marker and a payload whose tail forms one together with the marker's head.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>, FramingError> {
    let mut out = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
    out.extend_from_slice(START_MARKER);
    out.extend_from_slice(payload);
    out.extend_from_slice(END_MARKER);
    if find(&out[START_MARKER.len()..], END_MARKER) != Some(payload.len()) {
        return Err(FramingError::MarkerInPayload);
    }
    Ok(out)
}

/// Strip the markers from a frame.
///
/// `data` must begin with [`START_MARKER`]; the payload ends at the first
/// [`END_MARKER`] after it. Anything after the end marker is ignored.
///
/// # Errors
/// [`FramingError::MarkerNotFound`] if either marker is missing.
pub fn unframe(data: &[u8]) -> Result<&[u8], FramingError> {
    let body = data.strip_prefix(START_MARKER).ok_or(FramingError::MarkerNotFound)?;
    let end = find(body, END_MARKER).ok_or(FramingError::MarkerNotFound)?;
    Ok(&body[..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Incremental unframer fed one extracted byte at a time.
///
/// Fails as soon as the prefix diverges from [`START_MARKER`], and completes
/// as soon as the accumulated bytes end with [`END_MARKER`].
#[derive(Debug, Default)]
pub struct MarkerScanner {
    buf: Vec<u8>,
}

impl MarkerScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accumulated so far.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

impl ByteCollector for MarkerScanner {
    type Output = Vec<u8>;

    fn push(&mut self, byte: u8) -> Result<Option<Vec<u8>>, FramingError> {
        self.buf.push(byte);
        let n = self.buf.len();
        if n <= START_MARKER.len() {
            if byte != START_MARKER[n - 1] {
                return Err(FramingError::MarkerNotFound);
            }
            return Ok(None);
        }
        if n >= FRAME_OVERHEAD && self.buf.ends_with(END_MARKER) {
            let payload = self.buf[START_MARKER.len()..n - END_MARKER.len()].to_vec();
            self.buf.clear();
            return Ok(Some(payload));
        }
        Ok(None)
    }
}

/// A sequence of bits (`0`/`1` bytes) consumed in fixed-size groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<u8>,
}

impl BitStream {
    /// MSB-first bits of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { bits: bytes_to_bits(bytes) }
    }

    /// Wrap raw bits. Values are masked to their low bit.
    pub fn from_bits(mut bits: Vec<u8>) -> Self {
        bits.iter_mut().for_each(|b| *b &= 1);
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Number of per-block groups needed to carry the stream.
    pub fn group_count(&self) -> usize {
        self.bits.len().div_ceil(BITS_PER_BLOCK)
    }

    /// Group `index`, right-padded with zero bits past the end of the stream.
    pub fn group(&self, index: usize) -> [u8; BITS_PER_BLOCK] {
        let mut out = [0u8; BITS_PER_BLOCK];
        let start = index * BITS_PER_BLOCK;
        if start < self.bits.len() {
            let end = (start + BITS_PER_BLOCK).min(self.bits.len());
            out[..end - start].copy_from_slice(&self.bits[start..end]);
        }
        out
    }
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}
