// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # bpcs-core
//!
//! Pure-Rust Bit-Plane Complexity Segmentation (BPCS) steganography for raw
//! 8-bit pixel buffers. A payload is written only into blocks of the upper
//! bit-planes whose pattern is already noise-like, so the change is not
//! visible. Supports:
//!
//! - **Images**: grayscale or RGB carriers, one frame.
//! - **Video**: a payload split into chunk records spread over many frames.
//!
//! The raster layer (`raster` module) has no dependencies beyond std. The
//! steganography layer (`stego` module) adds optional AES-CBC encryption with a
//! caller-supplied key. Image decoding, video muxing and passphrase handling
//! are left to the caller.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use bpcs_core::{embed, extract, BpcsConfig, Carrier};
//!
//! let cover = Carrier::from_interleaved(width, height, ColorMode::Rgb, &pixels)?;
//! let stego = embed(&cover, b"secret message", None, &BpcsConfig::default())?;
//! let decoded = extract(&stego, None, &BpcsConfig::default())?;
//! assert_eq!(decoded, b"secret message");
//! ```

pub mod raster;
pub mod stego;

pub use raster::error::{RasterError, Result as RasterResult};
pub use raster::bitplane::{decompose, recompose, BitPlane};
pub use raster::complexity::{conjugate, is_complex, score};
pub use raster::grid::{tiles, Block, BlockPos};
pub use raster::{Carrier, Channel, ColorMode};
pub use stego::{capacity, embed, embed_with_stats, extract, CapacityInfo, FramingError, StegoError};
pub use stego::{embed_video, embed_video_with_progress, extract_video, extract_video_with_progress};
pub use stego::{ChunkAssignment, ScanBudget, UnitFailure, VideoEmbedOutcome};
pub use stego::{BpcsConfig, CipherKey, VideoConfig};
pub use stego::crypto::{decrypt, encrypt};
pub use stego::frame::{frame, unframe};
pub use stego::scan::{BlockSlot, ScanOrder};
pub use stego::progress::{self, Progress};
