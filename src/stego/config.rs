// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Embedding parameters shared by the embedder and the extractor.
//!
//! Both sides must use identical values; nothing here is stored in the
//! carrier.

use std::ops::RangeInclusive;

use crate::raster::bitplane::PLANE_COUNT;
use crate::raster::complexity::DEFAULT_THRESHOLD;
use crate::raster::grid::DEFAULT_BLOCK_SIZE;
use crate::stego::error::StegoError;
use crate::stego::layout::MIN_BLOCK_SIZE;

/// Default bit-planes used for embedding (the four most significant).
pub const DEFAULT_PLANES: RangeInclusive<u8> = 4..=7;

/// Default payload bits carried per video chunk.
pub const DEFAULT_CHUNK_SIZE_BITS: usize = 512;

/// Default frame interval between sampled video units.
pub const DEFAULT_FRAME_STRIDE: usize = 12;

/// Single-carrier embedding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BpcsConfig {
    /// Block edge length in samples.
    pub block_size: usize,
    /// Minimum complexity score for a block to carry data.
    pub complexity_threshold: f64,
    /// Bit-plane indices used, scanned in ascending order.
    pub planes: RangeInclusive<u8>,
}

impl Default for BpcsConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            complexity_threshold: DEFAULT_THRESHOLD,
            planes: DEFAULT_PLANES,
        }
    }
}

impl BpcsConfig {
    /// Same defaults with a different threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { complexity_threshold: threshold, ..Self::default() }
    }

    /// Check every field.
    ///
    /// # Errors
    /// [`StegoError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), StegoError> {
        if self.block_size < MIN_BLOCK_SIZE {
            return Err(StegoError::InvalidConfig("block_size must be at least 4"));
        }
        let t = self.complexity_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(StegoError::InvalidConfig("complexity_threshold must be in (0, 1]"));
        }
        if self.planes.is_empty() {
            return Err(StegoError::InvalidConfig("plane range is empty"));
        }
        if *self.planes.end() as usize >= PLANE_COUNT {
            return Err(StegoError::InvalidConfig("plane index must be below 8"));
        }
        Ok(())
    }
}

/// Multi-carrier-unit (video) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoConfig {
    /// Per-unit embedding parameters.
    pub bpcs: BpcsConfig,
    /// Framed payload bits carried by each chunk. Multiple of 8.
    pub chunk_size_bits: usize,
    /// Chunk `k` goes to unit `k * frame_stride`.
    pub frame_stride: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            bpcs: BpcsConfig::default(),
            chunk_size_bits: DEFAULT_CHUNK_SIZE_BITS,
            frame_stride: DEFAULT_FRAME_STRIDE,
        }
    }
}

impl VideoConfig {
    /// Chunk length in bytes.
    pub fn chunk_len(&self) -> usize {
        self.chunk_size_bits / 8
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        self.bpcs.validate()?;
        if self.chunk_size_bits == 0 || self.chunk_size_bits % 8 != 0 {
            return Err(StegoError::InvalidConfig("chunk_size_bits must be a positive multiple of 8"));
        }
        if self.frame_stride == 0 {
            return Err(StegoError::InvalidConfig("frame_stride must be positive"));
        }
        Ok(())
    }
}
