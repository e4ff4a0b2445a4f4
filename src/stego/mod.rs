// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Steganographic embedding and extraction.
//!
//! Two carrier shapes are supported:
//!
//! - **Single carrier** (`embed` / `extract`): one image. The framed payload
//!   is written into the complex blocks of the configured bit-planes.
//!
//! - **Video** (`embed_video` / `extract_video`): a sequence of frames. The
//!   framed payload is split into CRC-protected chunk records, one per frame at
//!   a fixed stride.
//!
//! Both share the same frame format and the optional AES-CBC cipher layer.

pub mod error;
pub mod config;
pub mod crypto;
pub mod frame;
pub mod chunk;
pub mod layout;
pub mod scan;
pub mod embed;
pub mod extract;
pub mod capacity;
mod pipeline;
pub mod video;
pub mod progress;

pub use error::{FramingError, StegoError};
pub use config::{BpcsConfig, VideoConfig};
pub use crypto::CipherKey;
pub use capacity::CapacityInfo;
pub use pipeline::{capacity, embed, embed_with_stats, extract};
pub use video::{
    embed_video, embed_video_with_progress, extract_video, extract_video_with_progress, ChunkAssignment, ScanBudget,
    UnitFailure, VideoEmbedOutcome,
};
