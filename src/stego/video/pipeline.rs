// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Video embed/extract over a sequence of carrier units.
//!
//! With the `parallel` feature, units are processed on the rayon pool.
//! Cancellation and the scan deadline are checked once per unit; results are
//! always gathered before reassembly, so processing order never matters.

use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::raster::Carrier;
use crate::stego::chunk::{chunk_record, split_chunks, Chunk, ChunkScanner, ChunkSet};
use crate::stego::config::VideoConfig;
use crate::stego::crypto::CipherKey;
use crate::stego::embed::{embed_stream, EmbedOutput};
use crate::stego::error::StegoError;
use crate::stego::extract::extract_with;
use crate::stego::frame::BitStream;
use crate::stego::pipeline::{open, seal};
use crate::stego::progress::Progress;

use super::planner::{plan, sampled_units};
use super::{ChunkAssignment, ScanBudget, UnitFailure, VideoEmbedOutcome};

/// Sampled units processed between reassembly attempts.
const EXTRACT_BATCH_UNITS: usize = 8;

/// Spread `payload` over `frames`.
///
/// See [`embed_video_with_progress`].
pub fn embed_video(
    frames: &[Carrier],
    payload: &[u8],
    key: Option<&CipherKey>,
    config: &VideoConfig,
) -> Result<VideoEmbedOutcome, StegoError> {
    embed_video_with_progress(frames, payload, key, config, &Progress::new())
}

/// Spread `payload` over `frames`, reporting one progress step per assigned unit.
///
/// A unit that lacks capacity for its chunk is recorded in
/// [`VideoEmbedOutcome::failures`] and left unmodified; the other units are
/// still embedded.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::InsufficientCapacity`] if there are too few units for the
///   chunk count at the configured stride.
/// - [`StegoError::Cancelled`] if `progress` is cancelled.
pub fn embed_video_with_progress(
    frames: &[Carrier],
    payload: &[u8],
    key: Option<&CipherKey>,
    config: &VideoConfig,
    progress: &Progress,
) -> Result<VideoEmbedOutcome, StegoError> {
    config.validate()?;
    let framed = seal(payload, key)?;
    let placements = plan(framed.len(), frames.len(), config)?;
    let chunks = split_chunks(&framed, config.chunk_len());
    progress.init(placements.len() as u32);
    progress.check_cancelled()?;

    let embed_unit = |a: &ChunkAssignment| -> Result<(ChunkAssignment, Result<EmbedOutput, StegoError>), StegoError> {
        progress.check_cancelled()?;
        let record = chunk_record(&chunks[a.chunk]);
        let result = embed_stream(&frames[a.unit], &BitStream::from_bytes(&record), &config.bpcs);
        let status = if result.is_ok() { "ok" } else { "failed" };
        debug!("unit {}: chunk {} ({} record bytes) {status}", a.unit, a.chunk, record.len());
        progress.advance();
        Ok((*a, result))
    };

    #[cfg(feature = "parallel")]
    let results: Vec<_> = placements.par_iter().map(embed_unit).collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = placements.iter().map(embed_unit).collect::<Result<_, _>>()?;

    let mut out_frames = frames.to_vec();
    let mut failures = Vec::new();
    for (a, result) in results {
        match result {
            Ok(out) => out_frames[a.unit] = out.carrier,
            Err(error) => {
                warn!("unit {} could not hold chunk {}: {error}", a.unit, a.chunk);
                failures.push(UnitFailure { unit: a.unit, chunk: a.chunk, error });
            }
        }
    }

    progress.finish();
    info!(
        "embedded {} chunks over {} units ({} failed)",
        placements.len() - failures.len(),
        frames.len(),
        failures.len()
    );
    Ok(VideoEmbedOutcome { frames: out_frames, placements, failures })
}

/// Recover a payload spread by [`embed_video`].
///
/// See [`extract_video_with_progress`].
pub fn extract_video(
    frames: &[Carrier],
    key: Option<&CipherKey>,
    config: &VideoConfig,
    budget: &ScanBudget,
) -> Result<Vec<u8>, StegoError> {
    extract_video_with_progress(frames, key, config, budget, &Progress::new())
}

/// Recover a payload spread by [`embed_video`], reporting one progress step
/// per sampled unit.
///
/// Units are scanned in batches; after each batch the recovered chunks are
/// reassembled and scanning stops as soon as the message is complete. Units
/// that yield no valid record are ignored.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::MarkerNotFound`] if no chunk 0 carrying a frame start was found.
/// - [`StegoError::IncompleteMessage`] if chunks before the end marker are missing
///   once all sampled units (or the budget) are exhausted.
/// - [`StegoError::DecryptionFailed`] if a key is given and does not match.
/// - [`StegoError::Cancelled`] if `progress` is cancelled.
pub fn extract_video_with_progress(
    frames: &[Carrier],
    key: Option<&CipherKey>,
    config: &VideoConfig,
    budget: &ScanBudget,
    progress: &Progress,
) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let units: Vec<usize> = sampled_units(frames.len(), config.frame_stride, budget).collect();
    progress.init(units.len() as u32);
    progress.check_cancelled()?;

    let chunk_len = config.chunk_len();
    let scan_unit = |&unit: &usize| -> Result<Option<Chunk>, StegoError> {
        progress.check_cancelled()?;
        if budget.expired() {
            return Ok(None);
        }
        let chunk = extract_with(&frames[unit], &config.bpcs, &mut ChunkScanner::new(chunk_len)).ok();
        match &chunk {
            Some(c) => debug!("unit {unit}: chunk {}", c.index),
            None => debug!("unit {unit}: no record"),
        }
        progress.advance();
        Ok(chunk)
    };

    let mut set = ChunkSet::new();
    let mut result = Err(StegoError::MarkerNotFound);
    for batch in units.chunks(EXTRACT_BATCH_UNITS) {
        #[cfg(feature = "parallel")]
        let found: Vec<Option<Chunk>> = batch.par_iter().map(scan_unit).collect::<Result<_, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let found: Vec<Option<Chunk>> = batch.iter().map(scan_unit).collect::<Result<_, _>>()?;

        set.extend(found.into_iter().flatten());
        result = set.reassemble();
        if result.is_ok() || budget.expired() {
            break;
        }
    }

    progress.finish();
    let content = result?;
    info!("reassembled {} content bytes from {} chunks", content.len(), set.len());
    open(&content, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Channel;
    use crate::stego::config::BpcsConfig;

    fn noise_frames(count: usize, size: usize) -> Vec<Carrier> {
        let mut x = 0x9E37_79B9u32;
        (0..count)
            .map(|_| {
                let samples = (0..size * size)
                    .map(|_| {
                        x ^= x << 13;
                        x ^= x >> 17;
                        x ^= x << 5;
                        (x >> 9) as u8
                    })
                    .collect();
                Carrier::grayscale(Channel::new(size, size, samples).unwrap())
            })
            .collect()
    }

    fn small_chunks() -> VideoConfig {
        VideoConfig { chunk_size_bits: 256, frame_stride: 3, bpcs: BpcsConfig::default() }
    }

    #[test]
    fn roundtrip_over_strided_units() {
        let frames = noise_frames(12, 32);
        let cfg = small_chunks();
        let payload = b"spread across several video frames";
        let outcome = embed_video(&frames, payload, None, &cfg).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.frames.len(), frames.len());
        // 34 + 32 framed bytes in 32-byte chunks.
        assert_eq!(outcome.placements.len(), 3);
        for unit in [1, 2, 4, 5, 7, 8, 9, 10, 11] {
            assert_eq!(outcome.frames[unit], frames[unit], "unit {unit} should be untouched");
        }
        let got = extract_video(&outcome.frames, None, &cfg, &ScanBudget::unbounded()).unwrap();
        assert_eq!(got, payload);
    }

    #[test]
    fn too_few_units_fails_up_front() {
        let frames = noise_frames(4, 32);
        assert!(matches!(
            embed_video(&frames, &[b'a'; 200], None, &small_chunks()),
            Err(StegoError::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn smooth_unit_is_reported_and_skipped() {
        let mut frames = noise_frames(12, 32);
        frames[3] = Carrier::grayscale(Channel::filled(32, 32, 128));
        let outcome = embed_video(&frames, b"spread across several video frames", None, &small_chunks()).unwrap();
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!((outcome.failures[0].unit, outcome.failures[0].chunk), (3, 1));
        assert_eq!(outcome.frames[3], frames[3]);

        match extract_video(&outcome.frames, None, &small_chunks(), &ScanBudget::unbounded()) {
            Err(StegoError::IncompleteMessage { missing }) => assert_eq!(missing, vec![1]),
            other => panic!("expected IncompleteMessage, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_progress_stops_embedding() {
        let frames = noise_frames(12, 32);
        let progress = Progress::new();
        progress.cancel();
        assert!(matches!(
            embed_video_with_progress(&frames, b"x", None, &small_chunks(), &progress),
            Err(StegoError::Cancelled)
        ));
        assert!(matches!(
            extract_video_with_progress(&frames, None, &small_chunks(), &ScanBudget::unbounded(), &progress),
            Err(StegoError::Cancelled)
        ));
    }

    #[test]
    fn progress_reaches_total() {
        let frames = noise_frames(12, 32);
        let progress = Progress::new();
        let outcome = embed_video_with_progress(&frames, b"abc", None, &small_chunks(), &progress).unwrap();
        assert_eq!(progress.get(), (outcome.placements.len() as u32, outcome.placements.len() as u32));
    }
}
