// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Non-overlapping block tiling of a bit-plane.
//!
//! Tiles are visited row-major: left to right, then top to bottom. Only blocks
//! lying fully inside the plane are produced; a right or bottom margin narrower
//! than the block size is never touched. This order is the canonical
//! embedding order and must not change.

use super::bitplane::BitPlane;
use super::error::{RasterError, Result};

/// Default block edge length.
pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Top-left sample coordinate of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub row: usize,
    pub col: usize,
}

/// A square `size × size` grid of bits, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    size: usize,
    cells: Vec<u8>,
}

impl Block {
    /// An all-zero block.
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![0u8; size * size] }
    }

    /// Wrap `size * size` row-major cells. Values are masked to their low bit.
    pub fn from_cells(size: usize, mut cells: Vec<u8>) -> Result<Self> {
        if cells.len() != size * size {
            return Err(RasterError::BlockShape { size, actual: cells.len() });
        }
        cells.iter_mut().for_each(|c| *c &= 1);
        Ok(Self { size, cells })
    }

    pub(crate) fn from_cells_unchecked(size: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, bit: u8) {
        self.cells[row * self.size + col] = bit & 1;
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }
}

/// Number of full blocks along an axis of length `len`.
pub fn blocks_along(len: usize, block_size: usize) -> usize {
    if block_size == 0 {
        0
    } else {
        len / block_size
    }
}

/// Positions of every full block in a `width × height` plane, in scan order.
pub fn tile_positions(width: usize, height: usize, block_size: usize) -> impl Iterator<Item = BlockPos> {
    let wide = blocks_along(width, block_size);
    let tall = blocks_along(height, block_size);
    (0..tall).flat_map(move |br| {
        (0..wide).map(move |bc| BlockPos { row: br * block_size, col: bc * block_size })
    })
}

/// Iterate `(position, block)` over every full block of `plane`, in scan order.
pub fn tiles(plane: &BitPlane, block_size: usize) -> impl Iterator<Item = (BlockPos, Block)> + '_ {
    tile_positions(plane.width(), plane.height(), block_size)
        .map(move |pos| (pos, plane.block(pos, block_size)))
}
