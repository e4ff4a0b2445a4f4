// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Chunk-to-unit assignment for video carriers.

use crate::stego::config::VideoConfig;
use crate::stego::error::StegoError;

use super::{ChunkAssignment, ScanBudget};

/// Chunks needed for `framed_len` framed bytes.
pub fn chunk_count(framed_len: usize, config: &VideoConfig) -> usize {
    framed_len.div_ceil(config.chunk_len())
}

/// Assign chunk `k` to unit `k * frame_stride`.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::InsufficientCapacity`] if the last assignment falls past
///   `unit_count`. Checked before any unit is touched.
pub fn plan(framed_len: usize, unit_count: usize, config: &VideoConfig) -> Result<Vec<ChunkAssignment>, StegoError> {
    config.validate()?;
    let chunks = chunk_count(framed_len, config);
    let reachable = unit_count.div_ceil(config.frame_stride);
    if chunks > reachable {
        return Err(StegoError::InsufficientCapacity {
            required_bits: chunks * config.chunk_size_bits,
            available_bits: reachable * config.chunk_size_bits,
        });
    }
    Ok((0..chunks)
        .map(|chunk| ChunkAssignment { chunk, unit: chunk * config.frame_stride })
        .collect())
}

/// Units visited by extraction, in order, within `budget.max_units`.
pub fn sampled_units(unit_count: usize, frame_stride: usize, budget: &ScanBudget) -> impl Iterator<Item = usize> {
    (0..unit_count)
        .step_by(frame_stride.max(1))
        .take(budget.max_units.unwrap_or(usize::MAX))
}
