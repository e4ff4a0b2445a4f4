// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Capacity estimation for a single carrier unit.
//!
//! Every complex cover block carries one byte, so the raw capacity is the
//! number of complex blocks in the scan. The estimate accounts for:
//! - Frame overhead (start and end markers)
//! - Cipher overhead (IV, check value, padding) when a key is used
//!
//! With `threshold <= 0.5` a written block is always complex either plainly
//! or conjugated, so the figure is exact. Above 0.5 some blocks may be
//! rejected during embedding and the figure is an upper bound.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::raster::bitplane::decompose;
use crate::raster::Carrier;
use crate::stego::config::BpcsConfig;
use crate::stego::crypto;
use crate::stego::error::StegoError;
use crate::stego::frame::FRAME_OVERHEAD;
use crate::stego::layout::BITS_PER_BLOCK;
use crate::stego::scan::{complex_mask, ScanOrder};

/// Capacity figures for one carrier at one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapacityInfo {
    /// Complex blocks across all channels and configured planes.
    pub complex_blocks: usize,
    /// Raw embeddable bits, framing included.
    pub capacity_bits: usize,
    /// Largest unencrypted payload in bytes.
    pub max_payload: usize,
    /// Largest payload in bytes when encrypting with a [`crypto::CipherKey`].
    pub max_encrypted_payload: usize,
    /// `false` when rejected blocks may lower the real figure.
    pub exact: bool,
}

/// Count complex blocks and derive payload limits.
///
/// # Errors
/// [`StegoError::InvalidConfig`] if `config` fails validation.
pub fn estimate_capacity(carrier: &Carrier, config: &BpcsConfig) -> Result<CapacityInfo, StegoError> {
    config.validate()?;

    let order = ScanOrder::for_carrier(carrier, config);
    let positions: Vec<_> = order.positions().collect();

    let count_channel = |channel: usize| -> usize {
        let planes = decompose(carrier.channel(channel));
        order
            .planes()
            .map(|p| {
                complex_mask(&planes[p as usize], &positions, order.block_size(), config.complexity_threshold)
                    .into_iter()
                    .filter(|&c| c)
                    .count()
            })
            .sum()
    };

    #[cfg(feature = "parallel")]
    let complex_blocks: usize = (0..order.channels()).into_par_iter().map(count_channel).sum();

    #[cfg(not(feature = "parallel"))]
    let complex_blocks: usize = (0..order.channels()).map(count_channel).sum();

    let frame_budget = complex_blocks.saturating_sub(FRAME_OVERHEAD);
    let max_encrypted_payload = if frame_budget >= crypto::ciphertext_len(0) {
        crypto::max_plaintext_len(frame_budget)
    } else {
        0
    };

    Ok(CapacityInfo {
        complex_blocks,
        capacity_bits: complex_blocks * BITS_PER_BLOCK,
        max_payload: frame_budget,
        max_encrypted_payload,
        exact: config.complexity_threshold <= 0.5,
    })
}
