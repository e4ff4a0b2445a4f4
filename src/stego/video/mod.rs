// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Multi-frame (video) embedding.
//!
//! A framed payload that does not fit one frame is split into chunk records
//! and spread over the frame sequence at a fixed stride:
//!
//! ```text
//! unit:   0    1 .. 11   12   13 .. 23   24  ...
//! chunk:  0    -    -    1    -     -    2   ...
//! ```
//!
//! Every unit is embedded and extracted independently with the single-carrier
//! BPCS engine. Extraction samples units `0, stride, 2*stride, ...` and
//! reassembles whatever records it recovers strictly by chunk index.

pub mod planner;
mod pipeline;

use std::time::Instant;

use crate::raster::Carrier;
use crate::stego::error::StegoError;

pub use pipeline::{embed_video, embed_video_with_progress, extract_video, extract_video_with_progress};
pub use planner::{chunk_count, plan, sampled_units};

/// Where one chunk goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkAssignment {
    pub chunk: usize,
    pub unit: usize,
}

/// A unit whose chunk could not be embedded.
#[derive(Debug)]
pub struct UnitFailure {
    pub unit: usize,
    pub chunk: usize,
    pub error: StegoError,
}

/// Result of [`embed_video`].
///
/// `frames` always has one entry per input unit. Units that carry no chunk or
/// whose embedding failed are passed through unmodified.
#[derive(Debug)]
pub struct VideoEmbedOutcome {
    pub frames: Vec<Carrier>,
    pub placements: Vec<ChunkAssignment>,
    pub failures: Vec<UnitFailure>,
}

impl VideoEmbedOutcome {
    /// `true` when every planned chunk was embedded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Limits on how much of a video extraction may scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanBudget {
    /// Maximum number of sampled units; `None` scans all of them.
    pub max_units: Option<usize>,
    /// Stop scanning new units once this instant has passed.
    pub deadline: Option<Instant>,
}

impl ScanBudget {
    /// No limits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_units(mut self, max_units: usize) -> Self {
        self.max_units = Some(max_units);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
