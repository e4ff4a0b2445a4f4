// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! BPCS embedding of a bit stream into one carrier unit.
//!
//! Walks the [`ScanOrder`] and writes one group of
//! [`BITS_PER_BLOCK`] bits into every complex block until the stream is
//! consumed. See [`layout`](crate::stego::layout) for the in-block layout and
//! the conjugation flag.
//!
//! Embedding is atomic: the input carrier is never modified, and if the
//! carrier runs out of complex blocks no output is produced.

use log::debug;

use crate::raster::bitplane::{decompose, recompose};
use crate::raster::Carrier;
use crate::stego::config::BpcsConfig;
use crate::stego::error::StegoError;
use crate::stego::frame::BitStream;
use crate::stego::layout::{write_group, BlockWrite, BITS_PER_BLOCK};
use crate::stego::scan::{complex_mask, ScanOrder};

/// Where the embedder stands in the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedState {
    /// Visiting block `block` (index within the plane) of `plane` in `channel`.
    Scanning { channel: usize, plane: u8, block: usize },
    /// The whole stream was written.
    Done,
    /// Every slot was visited with bits left over.
    Exhausted,
}

/// Counters collected during one embedding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedStats {
    /// Stream bits written (excluding zero padding of the last group).
    pub bits_embedded: usize,
    /// Blocks that received a group.
    pub blocks_used: usize,
    /// Of those, blocks stored conjugated.
    pub blocks_conjugated: usize,
    /// Complex cover blocks that could not hold a group at this threshold.
    pub blocks_rejected: usize,
}

/// Result of a successful embedding.
#[derive(Debug, Clone)]
pub struct EmbedOutput {
    pub carrier: Carrier,
    pub stats: EmbedStats,
}

/// Embed `stream` into a copy of `carrier`.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::InsufficientCapacity`] if the carrier runs out of complex
///   blocks before the stream is consumed. No partial carrier is returned.
pub fn embed_stream(carrier: &Carrier, stream: &BitStream, config: &BpcsConfig) -> Result<EmbedOutput, StegoError> {
    config.validate()?;

    let order = ScanOrder::for_carrier(carrier, config);
    let positions: Vec<_> = order.positions().collect();
    let groups = stream.group_count();

    let mut stats = EmbedStats::default();
    let mut next_group = 0usize;
    let mut state = if groups == 0 {
        EmbedState::Done
    } else {
        EmbedState::Scanning { channel: 0, plane: *order.planes().start(), block: 0 }
    };
    let mut channels = carrier.channels().to_vec();

    for channel in 0..order.channels() {
        if state == EmbedState::Done {
            break;
        }
        let mut planes = decompose(&channels[channel]);

        'planes: for plane in order.planes() {
            let bit_plane = &mut planes[plane as usize];
            let mask = complex_mask(bit_plane, &positions, order.block_size(), config.complexity_threshold);
            let used_before = stats.blocks_used;

            for (block, (&pos, _)) in positions.iter().zip(&mask).enumerate().filter(|(_, (_, c))| **c) {
                state = EmbedState::Scanning { channel, plane, block };

                let mut cells = bit_plane.block(pos, order.block_size());
                let group = stream.group(next_group);
                match write_group(&mut cells, &group, config.complexity_threshold) {
                    BlockWrite::Plain => {}
                    BlockWrite::Conjugated => stats.blocks_conjugated += 1,
                    BlockWrite::Rejected => {
                        bit_plane.put_block(pos, &cells);
                        stats.blocks_rejected += 1;
                        continue;
                    }
                }
                bit_plane.put_block(pos, &cells);
                stats.blocks_used += 1;
                next_group += 1;

                if next_group == groups {
                    state = EmbedState::Done;
                    debug!("channel {channel} plane {plane}: {} blocks, stream done", stats.blocks_used - used_before);
                    break 'planes;
                }
            }
            debug!("channel {channel} plane {plane}: {} blocks", stats.blocks_used - used_before);
        }

        channels[channel] = recompose(&planes)?;
    }

    if state != EmbedState::Done {
        debug!("carrier exhausted after {state:?}");
        state = EmbedState::Exhausted;
    }
    if state == EmbedState::Exhausted {
        return Err(StegoError::InsufficientCapacity {
            required_bits: stream.len(),
            available_bits: stats.blocks_used * BITS_PER_BLOCK,
        });
    }

    stats.bits_embedded = stream.len();
    Ok(EmbedOutput { carrier: carrier.with_channels(channels)?, stats })
}
