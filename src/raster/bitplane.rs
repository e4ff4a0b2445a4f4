// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Bit-plane decomposition of 8-bit channels.
//!
//! Plane `i` holds bit `i` of every sample (0 = least significant). The
//! decomposition is exact: [`recompose`] of [`decompose`] returns the input.

use super::error::{RasterError, Result};
use super::grid::{Block, BlockPos};
use super::Channel;

/// Number of bit-planes in an 8-bit channel.
pub const PLANE_COUNT: usize = 8;

/// A 2-D grid of single bits stored as `0`/`1` bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPlane {
    width: usize,
    height: usize,
    bits: Vec<u8>,
}

impl BitPlane {
    /// An all-zero plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, bits: vec![0u8; width * height] }
    }

    /// Wrap a row-major bit buffer. Values are masked to their low bit.
    pub fn from_bits(width: usize, height: usize, mut bits: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or(RasterError::InvalidDimensions)?;
        if bits.len() != expected {
            return Err(RasterError::SampleCountMismatch { expected, actual: bits.len() });
        }
        bits.iter_mut().for_each(|b| *b &= 1);
        Ok(Self { width, height, bits })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.bits[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, bit: u8) {
        self.bits[row * self.width + col] = bit & 1;
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Copy the `size × size` block whose top-left corner is `pos`.
    ///
    /// The block must lie fully inside the plane.
    pub fn block(&self, pos: BlockPos, size: usize) -> Block {
        debug_assert!(pos.row + size <= self.height && pos.col + size <= self.width);
        let mut cells = Vec::with_capacity(size * size);
        for r in 0..size {
            let start = (pos.row + r) * self.width + pos.col;
            cells.extend_from_slice(&self.bits[start..start + size]);
        }
        Block::from_cells_unchecked(size, cells)
    }

    /// Overwrite the block at `pos` with `block`.
    pub fn put_block(&mut self, pos: BlockPos, block: &Block) {
        let size = block.size();
        debug_assert!(pos.row + size <= self.height && pos.col + size <= self.width);
        for (r, row) in block.cells().chunks_exact(size).enumerate() {
            let start = (pos.row + r) * self.width + pos.col;
            self.bits[start..start + size].copy_from_slice(row);
        }
    }
}

/// Split a channel into its 8 bit-planes, least significant first.
pub fn decompose(channel: &Channel) -> [BitPlane; PLANE_COUNT] {
    std::array::from_fn(|i| BitPlane {
        width: channel.width(),
        height: channel.height(),
        bits: channel.samples().iter().map(|&s| (s >> i) & 1).collect(),
    })
}

/// Rebuild a channel from its 8 bit-planes: `sample = Σ plane[i] << i`.
///
/// # Errors
/// [`RasterError::DimensionMismatch`] if the planes differ in size.
pub fn recompose(planes: &[BitPlane; PLANE_COUNT]) -> Result<Channel> {
    let (width, height) = (planes[0].width, planes[0].height);
    if planes.iter().any(|p| p.width != width || p.height != height) {
        return Err(RasterError::DimensionMismatch);
    }
    let mut samples = vec![0u8; width * height];
    for (i, plane) in planes.iter().enumerate() {
        for (s, &bit) in samples.iter_mut().zip(&plane.bits) {
            *s |= (bit & 1) << i;
        }
    }
    Channel::new(width, height, samples)
}
