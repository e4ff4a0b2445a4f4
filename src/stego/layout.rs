// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Bit layout inside one carrying block.
//!
//! ```text
//! cells 0..8 (raster order)  payload bits, MSB of the group first
//! flag cell                  first odd-checkerboard cell at raster index >= 8
//! remaining cells            untouched cover bits
//! ```
//!
//! The flag cell is cleared before the complexity re-check. It sits on an odd
//! checkerboard square, so conjugation turns it into 1; the extractor reads it
//! to decide whether to undo the conjugation.

use crate::raster::complexity::{checkerboard, conjugate_in_place, is_complex};
use crate::raster::grid::Block;

/// Payload bits carried per block.
pub const BITS_PER_BLOCK: usize = 8;

/// Smallest block edge that fits the data cells and the flag cell.
pub const MIN_BLOCK_SIZE: usize = 4;

/// Outcome of writing one group into a complex cover block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockWrite {
    /// Written block stayed complex.
    Plain,
    /// Written block fell below the threshold and was conjugated.
    Conjugated,
    /// Neither form is complex. The block is left non-complex so the
    /// extractor skips it; the group must go to the next block.
    Rejected,
}

/// Raster index of the conjugation flag cell for `size × size` blocks.
pub fn flag_cell(size: usize) -> usize {
    (BITS_PER_BLOCK..size * size)
        .find(|&i| checkerboard(i / size, i % size) == 1)
        .unwrap_or(size * size - 1)
}

/// Write `group` (`BITS_PER_BLOCK` bits) into `block`, conjugating if needed.
pub fn write_group(block: &mut Block, group: &[u8; BITS_PER_BLOCK], threshold: f64) -> BlockWrite {
    let flag = flag_cell(block.size());
    let cells = block.cells_mut();
    cells[..BITS_PER_BLOCK].copy_from_slice(group);
    cells[flag] = 0;

    if is_complex(block, threshold) {
        return BlockWrite::Plain;
    }
    conjugate_in_place(block);
    if is_complex(block, threshold) {
        return BlockWrite::Conjugated;
    }
    conjugate_in_place(block);
    BlockWrite::Rejected
}

/// Read the group carried by a complex block, undoing conjugation if flagged.
pub fn read_group(block: &Block) -> [u8; BITS_PER_BLOCK] {
    let flag = flag_cell(block.size());
    let mut group = [0u8; BITS_PER_BLOCK];
    if block.cells()[flag] == 1 {
        for (i, bit) in group.iter_mut().enumerate() {
            *bit = block.cells()[i] ^ checkerboard(i / block.size(), i % block.size());
        }
    } else {
        group.copy_from_slice(&block.cells()[..BITS_PER_BLOCK]);
    }
    group
}

/// Pack a group MSB-first into one byte.
pub fn group_to_byte(group: &[u8; BITS_PER_BLOCK]) -> u8 {
    group.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1))
}
