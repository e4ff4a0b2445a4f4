// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Chunk records for multi-carrier-unit transport.
//!
//! A framed payload too large for one video frame is cut into fixed-size
//! chunks. Each chunk travels in its own carrier unit inside a record:
//!
//! ```text
//! [1-10 bytes] chunk index, ASCII decimal, no leading zeros
//! [1 byte    ] delimiter '|'
//! [chunk_len ] chunk bytes (the last chunk is zero-padded)
//! [4 bytes   ] CRC-32 of everything above (big-endian)
//! ```
//!
//! Records may be recovered in any order. [`reassemble`] sorts them by index
//! and succeeds only once the chunk holding the end marker and every chunk
//! before it are present.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::stego::error::{FramingError, StegoError};
use crate::stego::extract::ByteCollector;
use crate::stego::frame::{self, START_MARKER};

/// Separates the decimal index from the chunk bytes.
pub const CHUNK_DELIMITER: u8 = b'|';

/// Longest accepted decimal index.
pub const MAX_INDEX_DIGITS: usize = 10;

/// CRC trailer length.
pub const CHUNK_CRC_LEN: usize = 4;

/// One fragment of a framed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub data: Vec<u8>,
}

/// Cut `framed` into `chunk_len`-byte chunks, zero-padding the last one.
pub fn split_chunks(framed: &[u8], chunk_len: usize) -> Vec<Chunk> {
    debug_assert!(chunk_len > 0);
    framed
        .chunks(chunk_len)
        .enumerate()
        .map(|(index, part)| {
            let mut data = part.to_vec();
            data.resize(chunk_len, 0);
            Chunk { index, data }
        })
        .collect()
}

/// Serialized record length for a chunk at `index`.
pub fn record_len(index: usize, chunk_len: usize) -> usize {
    index.to_string().len() + 1 + chunk_len + CHUNK_CRC_LEN
}

/// Serialize a chunk into its record.
pub fn chunk_record(chunk: &Chunk) -> Vec<u8> {
    let mut out = Vec::with_capacity(record_len(chunk.index, chunk.data.len()));
    out.extend_from_slice(chunk.index.to_string().as_bytes());
    out.push(CHUNK_DELIMITER);
    out.extend_from_slice(&chunk.data);
    let crc = crc32fast::hash(&out);
    out.extend_from_slice(&crc.to_be_bytes());
    out
}

/// Incremental record parser fed one extracted byte at a time.
#[derive(Debug)]
pub struct ChunkScanner {
    chunk_len: usize,
    buf: Vec<u8>,
    /// Parsed index and header length once the delimiter has been seen.
    header: Option<(usize, usize)>,
}

impl ChunkScanner {
    pub fn new(chunk_len: usize) -> Self {
        Self { chunk_len, buf: Vec::new(), header: None }
    }

    fn push_header_byte(&mut self, byte: u8) -> Result<(), FramingError> {
        match byte {
            b'0'..=b'9' => {
                if self.buf.len() >= MAX_INDEX_DIGITS || self.buf.as_slice() == b"0" {
                    return Err(FramingError::MalformedChunk);
                }
                self.buf.push(byte);
                Ok(())
            }
            CHUNK_DELIMITER if !self.buf.is_empty() => {
                let index = std::str::from_utf8(&self.buf)
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or(FramingError::MalformedChunk)?;
                self.buf.push(byte);
                self.header = Some((index, self.buf.len()));
                Ok(())
            }
            _ => Err(FramingError::MalformedChunk),
        }
    }
}

impl ByteCollector for ChunkScanner {
    type Output = Chunk;

    fn push(&mut self, byte: u8) -> Result<Option<Chunk>, FramingError> {
        let Some((index, header_len)) = self.header else {
            self.push_header_byte(byte)?;
            return Ok(None);
        };
        self.buf.push(byte);
        if self.buf.len() < header_len + self.chunk_len + CHUNK_CRC_LEN {
            return Ok(None);
        }
        let (body, crc) = self.buf.split_at(self.buf.len() - CHUNK_CRC_LEN);
        let stored = u32::from_be_bytes([crc[0], crc[1], crc[2], crc[3]]);
        if stored != crc32fast::hash(body) {
            return Err(FramingError::MalformedChunk);
        }
        Ok(Some(Chunk { index, data: body[header_len..].to_vec() }))
    }
}

/// Chunks recovered so far, keyed by index.
///
/// Duplicate indices keep the first record seen.
#[derive(Debug, Clone, Default)]
pub struct ChunkSet {
    by_index: BTreeMap<usize, Vec<u8>>,
}

impl ChunkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk. Returns `false` if its index was already present.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        match self.by_index.entry(chunk.index) {
            Entry::Vacant(slot) => {
                slot.insert(chunk.data);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Unframe the contiguous run of chunks starting at index 0.
    ///
    /// # Errors
    /// - [`StegoError::MarkerNotFound`] if the set is empty or chunk 0 does
    ///   not start a frame.
    /// - [`StegoError::IncompleteMessage`] listing missing indices when the
    ///   end marker is not reachable through consecutive chunks.
    pub fn reassemble(&self) -> Result<Vec<u8>, StegoError> {
        let Some(&last) = self.by_index.keys().next_back() else {
            return Err(StegoError::MarkerNotFound);
        };

        let mut joined = Vec::new();
        let mut next = 0usize;
        while let Some(data) = self.by_index.get(&next) {
            joined.extend_from_slice(data);
            if joined.len() >= START_MARKER.len() && !joined.starts_with(START_MARKER) {
                return Err(StegoError::MarkerNotFound);
            }
            if let Ok(payload) = frame::unframe(&joined) {
                return Ok(payload.to_vec());
            }
            next += 1;
        }

        let mut missing: Vec<usize> = (next..=last).filter(|i| !self.by_index.contains_key(i)).collect();
        if missing.is_empty() {
            missing.push(last + 1);
        }
        Err(StegoError::IncompleteMessage { missing })
    }
}

impl Extend<Chunk> for ChunkSet {
    fn extend<I: IntoIterator<Item = Chunk>>(&mut self, iter: I) {
        for chunk in iter {
            self.insert(chunk);
        }
    }
}

impl FromIterator<Chunk> for ChunkSet {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Order chunks by index and unframe the contiguous run starting at 0.
///
/// See [`ChunkSet::reassemble`].
pub fn reassemble(chunks: impl IntoIterator<Item = Chunk>) -> Result<Vec<u8>, StegoError> {
    chunks.into_iter().collect::<ChunkSet>().reassemble()
}
