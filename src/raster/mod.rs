// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Raw raster model: sample channels, bit-planes and block tiling.
//!
//! This layer knows nothing about payloads. It provides:
//! - [`Channel`]: one 8-bit component grid, row-major.
//! - [`Carrier`]: one carrier unit (an image or a video frame) made of
//!   equally sized channels in a fixed order per [`ColorMode`].
//! - [`bitplane`]: lossless decomposition into 8 bit-planes and back.
//! - [`grid`]: full-block tiling of a plane in canonical raster order.
//! - [`complexity`]: block complexity scoring and checkerboard conjugation.
//!
//! File decoding and colorspace conversion happen outside this crate; callers
//! hand over decoded buffers via [`Carrier::from_interleaved`] or per-channel.

pub mod error;
pub mod bitplane;
pub mod grid;
pub mod complexity;

use error::{RasterError, Result};

/// Channel layout of a carrier unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// One luminance channel.
    Grayscale,
    /// Three channels in R, G, B order.
    Rgb,
}

impl ColorMode {
    /// Number of channels a carrier of this mode holds.
    pub fn channel_count(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgb => 3,
        }
    }
}

/// A 2-D grid of 8-bit samples in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl Channel {
    /// Wrap a row-major sample buffer.
    ///
    /// # Errors
    /// [`RasterError::SampleCountMismatch`] if `samples.len() != width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or(RasterError::InvalidDimensions)?;
        if samples.len() != expected {
            return Err(RasterError::SampleCountMismatch { expected, actual: samples.len() });
        }
        Ok(Self { width, height, samples })
    }

    /// A channel with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self { width, height, samples: vec![value; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.samples[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        let idx = self.index(row, col);
        self.samples[idx] = value;
    }

    /// Row-major samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height, "row {row} >= {}", self.height);
        debug_assert!(col < self.width, "col {col} >= {}", self.width);
        row * self.width + col
    }
}

/// One carrier unit: an image or a single video frame.
///
/// All channels share the same dimensions. Channel order is fixed per mode
/// and is part of the embedding contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    mode: ColorMode,
    channels: Vec<Channel>,
}

impl Carrier {
    /// Build a carrier from per-channel grids.
    ///
    /// # Errors
    /// - [`RasterError::ChannelCount`] if the count does not match `mode`.
    /// - [`RasterError::DimensionMismatch`] if channel sizes differ.
    pub fn new(mode: ColorMode, channels: Vec<Channel>) -> Result<Self> {
        if channels.len() != mode.channel_count() {
            return Err(RasterError::ChannelCount { mode, actual: channels.len() });
        }
        let (w, h) = (channels[0].width, channels[0].height);
        if channels.iter().any(|c| c.width != w || c.height != h) {
            return Err(RasterError::DimensionMismatch);
        }
        Ok(Self { mode, channels })
    }

    pub fn grayscale(channel: Channel) -> Self {
        Self { mode: ColorMode::Grayscale, channels: vec![channel] }
    }

    pub fn rgb(r: Channel, g: Channel, b: Channel) -> Result<Self> {
        Self::new(ColorMode::Rgb, vec![r, g, b])
    }

    /// Split an interleaved pixel buffer (`RGBRGB...` or `YYY...`) into channels.
    pub fn from_interleaved(width: usize, height: usize, mode: ColorMode, pixels: &[u8]) -> Result<Self> {
        let n = mode.channel_count();
        let expected = width
            .checked_mul(height)
            .and_then(|p| p.checked_mul(n))
            .ok_or(RasterError::InvalidDimensions)?;
        if pixels.len() != expected {
            return Err(RasterError::SampleCountMismatch { expected, actual: pixels.len() });
        }
        let channels = (0..n)
            .map(|c| Channel {
                width,
                height,
                samples: pixels.iter().skip(c).step_by(n).copied().collect(),
            })
            .collect();
        Ok(Self { mode, channels })
    }

    /// Interleave the channels back into one pixel buffer.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let n = self.channels.len();
        let mut out = vec![0u8; self.width() * self.height() * n];
        for (c, channel) in self.channels.iter().enumerate() {
            for (i, &s) in channel.samples.iter().enumerate() {
                out[i * n + c] = s;
            }
        }
        out
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn width(&self) -> usize {
        self.channels[0].width
    }

    pub fn height(&self) -> usize {
        self.channels[0].height
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> &Channel {
        &self.channels[index]
    }

    /// Same mode, replacement channels of identical dimensions.
    pub(crate) fn with_channels(&self, channels: Vec<Channel>) -> Result<Self> {
        let out = Self::new(self.mode, channels)?;
        if out.width() != self.width() || out.height() != self.height() {
            return Err(RasterError::DimensionMismatch);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_rejects_wrong_sample_count() {
        assert!(Channel::new(4, 4, vec![0; 16]).is_ok());
        assert_eq!(
            Channel::new(4, 4, vec![0; 15]),
            Err(RasterError::SampleCountMismatch { expected: 16, actual: 15 })
        );
    }

    #[test]
    fn channel_get_set() {
        let mut ch = Channel::filled(3, 2, 7);
        assert_eq!(ch.get(1, 2), 7);
        ch.set(1, 2, 200);
        assert_eq!(ch.get(1, 2), 200);
        assert_eq!(ch.samples()[5], 200);
    }

    #[test]
    fn carrier_checks_channel_count_and_size() {
        let a = Channel::filled(4, 4, 0);
        let b = Channel::filled(4, 4, 0);
        assert!(matches!(
            Carrier::new(ColorMode::Rgb, vec![a.clone(), b.clone()]),
            Err(RasterError::ChannelCount { mode: ColorMode::Rgb, actual: 2 })
        ));
        let small = Channel::filled(2, 4, 0);
        assert_eq!(Carrier::rgb(a, b, small), Err(RasterError::DimensionMismatch));
    }

    #[test]
    fn interleaved_roundtrip_rgb() {
        let pixels: Vec<u8> = (0..2 * 3 * 3).map(|i| i as u8).collect();
        let carrier = Carrier::from_interleaved(2, 3, ColorMode::Rgb, &pixels).unwrap();
        assert_eq!(carrier.channel(0).samples(), &[0, 3, 6, 9, 12, 15]);
        assert_eq!(carrier.channel(2).samples(), &[2, 5, 8, 11, 14, 17]);
        assert_eq!(carrier.to_interleaved(), pixels);
    }

    #[test]
    fn interleaved_rejects_short_buffer() {
        let result = Carrier::from_interleaved(2, 2, ColorMode::Rgb, &[0u8; 11]);
        assert!(matches!(result, Err(RasterError::SampleCountMismatch { expected: 12, actual: 11 })));
    }
}
