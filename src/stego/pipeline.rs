// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Single-carrier embed/extract pipeline.
//!
//! Embedding:
//! 1. Encrypt the payload when a key is given (AES-CBC, random IV)
//! 2. Wrap it in start/end markers
//! 3. Write the framed bytes into complex blocks, MSB first
//!
//! Extraction walks the same scan, stops at the end marker and decrypts.

use log::info;

use crate::raster::Carrier;
use crate::stego::capacity::{estimate_capacity, CapacityInfo};
use crate::stego::config::BpcsConfig;
use crate::stego::crypto::{self, CipherKey};
use crate::stego::embed::{embed_stream, EmbedOutput};
use crate::stego::error::{FramingError, StegoError};
use crate::stego::extract::extract_with;
use crate::stego::frame::{self, BitStream, MarkerScanner};

/// Fresh IVs tried when a ciphertext happens to collide with the end marker.
const SEAL_ATTEMPTS: usize = 4;

/// Build the framed byte sequence for `payload`: optional encryption, then markers.
///
/// A plaintext payload that would end the frame early is refused. A
/// ciphertext that would do so is re-encrypted under a new IV.
pub(crate) fn seal(payload: &[u8], key: Option<&CipherKey>) -> Result<Vec<u8>, StegoError> {
    let Some(key) = key else {
        return Ok(frame::frame(payload)?);
    };
    let mut last = FramingError::MarkerInPayload;
    for _ in 0..SEAL_ATTEMPTS {
        match frame::frame(&crypto::encrypt(payload, key)) {
            Ok(framed) => return Ok(framed),
            Err(e) => last = e,
        }
    }
    Err(last.into())
}

/// Reverse of [`seal`] applied to unframed content.
pub(crate) fn open(content: &[u8], key: Option<&CipherKey>) -> Result<Vec<u8>, StegoError> {
    match key {
        Some(key) => crypto::decrypt(content, key),
        None => Ok(content.to_vec()),
    }
}

/// Hide `payload` in a copy of `carrier`.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::Framing`] if the (encrypted) payload contains the end marker.
/// - [`StegoError::InsufficientCapacity`] if the carrier is too small or too
///   smooth for the framed payload.
pub fn embed(
    carrier: &Carrier,
    payload: &[u8],
    key: Option<&CipherKey>,
    config: &BpcsConfig,
) -> Result<Carrier, StegoError> {
    embed_with_stats(carrier, payload, key, config).map(|out| out.carrier)
}

/// [`embed`] that also returns the embedding counters.
pub fn embed_with_stats(
    carrier: &Carrier,
    payload: &[u8],
    key: Option<&CipherKey>,
    config: &BpcsConfig,
) -> Result<EmbedOutput, StegoError> {
    config.validate()?;
    let framed = seal(payload, key)?;
    let out = embed_stream(carrier, &BitStream::from_bytes(&framed), config)?;
    info!(
        "embedded {} bits in {} blocks ({} conjugated, {} rejected)",
        out.stats.bits_embedded, out.stats.blocks_used, out.stats.blocks_conjugated, out.stats.blocks_rejected
    );
    Ok(out)
}

/// Recover a payload hidden by [`embed`].
///
/// # Errors
/// - [`StegoError::MarkerNotFound`] if the carrier holds no frame.
/// - [`StegoError::DecryptionFailed`] if a key is given and does not match.
pub fn extract(carrier: &Carrier, key: Option<&CipherKey>, config: &BpcsConfig) -> Result<Vec<u8>, StegoError> {
    let content = extract_with(carrier, config, &mut MarkerScanner::new())?;
    info!("extracted frame with {} content bytes", content.len());
    open(&content, key)
}

/// Capacity of `carrier` under `config`.
///
/// # Errors
/// [`StegoError::InvalidConfig`] if `config` fails validation.
pub fn capacity(carrier: &Carrier, config: &BpcsConfig) -> Result<CapacityInfo, StegoError> {
    estimate_capacity(carrier, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Channel;

    fn noise(size: usize, seed: u32) -> Carrier {
        let mut x = seed | 1;
        let samples = (0..size * size)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                (x >> 3) as u8
            })
            .collect();
        Carrier::grayscale(Channel::new(size, size, samples).unwrap())
    }

    #[test]
    fn plain_roundtrip() {
        let carrier = noise(64, 21);
        let cfg = BpcsConfig::default();
        let stego = embed(&carrier, b"HELLO", None, &cfg).unwrap();
        assert_eq!(extract(&stego, None, &cfg).unwrap(), b"HELLO");
    }

    #[test]
    fn encrypted_roundtrip() {
        let carrier = noise(64, 22);
        let cfg = BpcsConfig::default();
        let key = CipherKey::new(&[3u8; 32]).unwrap();
        let stego = embed(&carrier, b"attack at dawn", Some(&key), &cfg).unwrap();
        assert_eq!(extract(&stego, Some(&key), &cfg).unwrap(), b"attack at dawn");
    }

    #[test]
    fn seal_open_symmetry() {
        let key = CipherKey::new(&[1u8; 16]).unwrap();
        let sealed = seal(b"abc", Some(&key)).unwrap();
        let content = frame::unframe(&sealed).unwrap();
        assert_eq!(open(content, Some(&key)).unwrap(), b"abc");
        assert_eq!(seal(b"abc", None).unwrap(), frame::frame(b"abc").unwrap());
    }

    #[test]
    fn plaintext_ending_in_partial_marker_is_refused() {
        let payload = &frame::END_MARKER[..frame::END_MARKER.len() - 1];
        assert!(matches!(
            seal(payload, None),
            Err(StegoError::Framing(FramingError::MarkerInPayload))
        ));
        // Encrypted, the same bytes no longer look like a marker.
        let key = CipherKey::new(&[5u8; 16]).unwrap();
        let sealed = seal(payload, Some(&key)).unwrap();
        assert_eq!(open(frame::unframe(&sealed).unwrap(), Some(&key)).unwrap(), payload);
    }

    #[test]
    fn stats_match_frame_size() {
        let carrier = noise(64, 23);
        let out = embed_with_stats(&carrier, b"12345", None, &BpcsConfig::default()).unwrap();
        assert_eq!(out.stats.bits_embedded, (5 + frame::FRAME_OVERHEAD) * 8);
        assert_eq!(out.stats.blocks_used, 5 + frame::FRAME_OVERHEAD);
    }
}
