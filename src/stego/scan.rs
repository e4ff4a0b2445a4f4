// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Canonical block visiting order.
//!
//! Embedder and extractor share no state besides the carrier, so both must
//! visit blocks in exactly the same sequence. [`ScanOrder`] makes that
//! sequence an explicit value: channels in carrier order, then the configured
//! bit-planes in ascending order, then full blocks row-major.

use std::ops::RangeInclusive;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::raster::bitplane::BitPlane;
use crate::raster::complexity::is_complex;
use crate::raster::grid::{blocks_along, tile_positions, BlockPos};
use crate::raster::Carrier;
use crate::stego::config::BpcsConfig;

/// One position in the scan: which channel, which plane, which block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSlot {
    pub channel: usize,
    pub plane: u8,
    pub pos: BlockPos,
}

/// Deterministic scan over every block slot of a carrier.
#[derive(Debug, Clone)]
pub struct ScanOrder {
    channels: usize,
    width: usize,
    height: usize,
    block_size: usize,
    planes: RangeInclusive<u8>,
}

impl ScanOrder {
    pub fn new(channels: usize, width: usize, height: usize, config: &BpcsConfig) -> Self {
        Self {
            channels,
            width,
            height,
            block_size: config.block_size,
            planes: config.planes.clone(),
        }
    }

    pub fn for_carrier(carrier: &Carrier, config: &BpcsConfig) -> Self {
        Self::new(carrier.channels().len(), carrier.width(), carrier.height(), config)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Plane indices in visiting order.
    pub fn planes(&self) -> RangeInclusive<u8> {
        self.planes.clone()
    }

    /// Block positions within one plane, in visiting order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> {
        tile_positions(self.width, self.height, self.block_size)
    }

    /// Full blocks per plane.
    pub fn blocks_per_plane(&self) -> usize {
        blocks_along(self.width, self.block_size) * blocks_along(self.height, self.block_size)
    }

    /// Total slots across all channels and planes.
    pub fn len(&self) -> usize {
        self.channels * self.planes.clone().count() * self.blocks_per_plane()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every slot in canonical order.
    pub fn slots(&self) -> impl Iterator<Item = BlockSlot> + '_ {
        (0..self.channels).flat_map(move |channel| {
            self.planes().flat_map(move |plane| {
                self.positions().map(move |pos| BlockSlot { channel, plane, pos })
            })
        })
    }
}

/// Complexity test for every block at `positions`, in the same order.
///
/// Tiles never overlap, so scores taken before any write stay valid for the
/// whole plane pass. Runs on the rayon pool with the `parallel` feature.
pub fn complex_mask(plane: &BitPlane, positions: &[BlockPos], block_size: usize, threshold: f64) -> Vec<bool> {
    let test = |pos: &BlockPos| is_complex(&plane.block(*pos, block_size), threshold);

    #[cfg(feature = "parallel")]
    let mask = positions.par_iter().map(test).collect();

    #[cfg(not(feature = "parallel"))]
    let mask = positions.iter().map(test).collect();

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_then_plane_then_block() {
        let cfg = BpcsConfig { planes: 6..=7, ..BpcsConfig::default() };
        let order = ScanOrder::new(2, 16, 8, &cfg);
        let slots: Vec<_> = order.slots().collect();
        assert_eq!(slots.len(), order.len());
        assert_eq!(slots.len(), 2 * 2 * 2);
        let summary: Vec<_> = slots.iter().map(|s| (s.channel, s.plane, s.pos.col)).collect();
        assert_eq!(
            summary,
            vec![(0, 6, 0), (0, 6, 8), (0, 7, 0), (0, 7, 8), (1, 6, 0), (1, 6, 8), (1, 7, 0), (1, 7, 8)]
        );
    }

    #[test]
    fn small_carrier_is_empty() {
        let order = ScanOrder::new(3, 7, 7, &BpcsConfig::default());
        assert!(order.is_empty());
        assert_eq!(order.slots().count(), 0);
    }

    #[test]
    fn default_plane_range() {
        let order = ScanOrder::new(1, 64, 64, &BpcsConfig::default());
        assert_eq!(order.planes().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        assert_eq!(order.len(), 4 * 64);
    }

    #[test]
    fn mask_flags_only_noisy_blocks() {
        let mut plane = BitPlane::new(16, 8);
        for r in 0..8 {
            for c in 8..16 {
                plane.set(r, c, ((r + c) % 2) as u8);
            }
        }
        let order = ScanOrder::new(1, 16, 8, &BpcsConfig::default());
        let positions: Vec<_> = order.positions().collect();
        assert_eq!(complex_mask(&plane, &positions, 8, 0.3), vec![false, true]);
    }
}
