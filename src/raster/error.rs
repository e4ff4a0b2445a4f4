// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for raster construction and bit-plane handling.

use std::fmt;

use super::ColorMode;

/// Errors raised while building channels, carriers or bit-planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// `width * height` does not fit in `usize`.
    InvalidDimensions,
    /// The sample buffer length does not match `width * height`
    /// (times the channel count for interleaved buffers).
    SampleCountMismatch { expected: usize, actual: usize },
    /// Two grids that must share dimensions do not.
    DimensionMismatch,
    /// The channel count does not match the color mode.
    ChannelCount { mode: ColorMode, actual: usize },
    /// A block cell buffer is not `size * size` long.
    BlockShape { size: usize, actual: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions => write!(f, "raster dimensions overflow"),
            Self::SampleCountMismatch { expected, actual } => {
                write!(f, "expected {expected} samples, got {actual}")
            }
            Self::DimensionMismatch => write!(f, "raster dimensions do not match"),
            Self::ChannelCount { mode, actual } => write!(
                f,
                "{mode:?} carrier needs {} channel(s), got {actual}",
                mode.channel_count()
            ),
            Self::BlockShape { size, actual } => {
                write!(f, "{size}x{size} block needs {} cells, got {actual}", size * size)
            }
        }
    }
}

impl std::error::Error for RasterError {}

pub type Result<T> = std::result::Result<T, RasterError>;
