// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Round-trip integration tests for single-carrier embed/extract.

use bpcs_core::{
    capacity, decompose, embed, embed_with_stats, extract, BpcsConfig, Carrier, Channel, CipherKey, ColorMode,
    FramingError, StegoError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn noise_channel(rng: &mut ChaCha20Rng, width: usize, height: usize) -> Channel {
    let samples = (0..width * height).map(|_| rng.gen::<u8>()).collect();
    Channel::new(width, height, samples).unwrap()
}

fn noise_gray(seed: u64, width: usize, height: usize) -> Carrier {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    Carrier::grayscale(noise_channel(&mut rng, width, height))
}

fn noise_rgb(seed: u64, width: usize, height: usize) -> Carrier {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let pixels: Vec<u8> = (0..width * height * 3).map(|_| rng.gen()).collect();
    Carrier::from_interleaved(width, height, ColorMode::Rgb, &pixels).unwrap()
}

#[test]
fn all_zero_carrier_has_no_room() {
    let carrier = Carrier::grayscale(Channel::filled(64, 64, 0));
    match embed(&carrier, b"HELLO", None, &BpcsConfig::default()) {
        Err(StegoError::InsufficientCapacity { required_bits, available_bits }) => {
            assert_eq!(required_bits, (5 + 32) * 8);
            assert_eq!(available_bits, 0);
        }
        other => panic!("expected InsufficientCapacity, got {other:?}"),
    }
}

#[test]
fn noise_carrier_hello_roundtrip() {
    let carrier = noise_gray(1, 64, 64);
    let cfg = BpcsConfig::with_threshold(0.3);
    let stego = embed(&carrier, b"HELLO", None, &cfg).unwrap();
    assert_eq!(stego.width(), 64);
    assert_eq!(stego.height(), 64);
    assert_eq!(extract(&stego, None, &cfg).unwrap(), b"HELLO");
}

#[test]
fn rgb_roundtrip_with_key() {
    let carrier = noise_rgb(2, 96, 64);
    let cfg = BpcsConfig::default();
    let key = CipherKey::new(b"0123456789abcdef0123456789abcdef").unwrap();
    let message = "Meet me at the usual place. Bring the documents.".repeat(4);

    let stego = embed(&carrier, message.as_bytes(), Some(&key), &cfg).unwrap();
    assert_eq!(stego.mode(), ColorMode::Rgb);
    assert_eq!(extract(&stego, Some(&key), &cfg).unwrap(), message.as_bytes());
}

#[test]
fn payload_spills_into_later_channels() {
    let carrier = noise_rgb(3, 32, 32);
    let cfg = BpcsConfig::default();
    // One channel holds 64 bytes at most; force use of the second.
    let payload = vec![0x5Au8; 80];
    let stego = embed(&carrier, &payload, None, &cfg).unwrap();
    assert_ne!(stego.channel(1), carrier.channel(1));
    assert_eq!(extract(&stego, None, &cfg).unwrap(), payload);
}

#[test]
fn roundtrip_with_high_threshold() {
    let carrier = noise_gray(4, 128, 128);
    let cfg = BpcsConfig::with_threshold(0.55);
    let info = capacity(&carrier, &cfg).unwrap();
    assert!(!info.exact);

    let out = embed_with_stats(&carrier, b"above one half", None, &cfg).unwrap();
    assert_eq!(extract(&out.carrier, None, &cfg).unwrap(), b"above one half");
}

#[test]
fn roundtrip_with_small_blocks() {
    let carrier = noise_gray(5, 64, 64);
    let cfg = BpcsConfig { block_size: 4, ..BpcsConfig::default() };
    let stego = embed(&carrier, b"four by four", None, &cfg).unwrap();
    assert_eq!(extract(&stego, None, &cfg).unwrap(), b"four by four");
}

#[test]
fn empty_payload_roundtrip() {
    let carrier = noise_gray(6, 64, 64);
    let stego = embed(&carrier, b"", None, &BpcsConfig::default()).unwrap();
    assert_eq!(extract(&stego, None, &BpcsConfig::default()).unwrap(), b"");
}

#[test]
fn oversized_payload_is_rejected() {
    let carrier = noise_gray(7, 64, 64);
    let cfg = BpcsConfig::default();
    let info = capacity(&carrier, &cfg).unwrap();
    assert!(info.exact);

    let fits = vec![b'x'; info.max_payload];
    let stego = embed(&carrier, &fits, None, &cfg).unwrap();
    assert_eq!(extract(&stego, None, &cfg).unwrap(), fits);

    let too_big = vec![b'x'; info.max_payload + 1];
    match embed(&carrier, &too_big, None, &cfg) {
        Err(StegoError::InsufficientCapacity { required_bits, available_bits }) => {
            assert_eq!(required_bits, (too_big.len() + 32) * 8);
            assert_eq!(available_bits, info.capacity_bits);
        }
        other => panic!("expected InsufficientCapacity, got {other:?}"),
    }
}

#[test]
fn encrypted_capacity_is_tight() {
    let carrier = noise_gray(8, 64, 64);
    let cfg = BpcsConfig::default();
    let key = CipherKey::new(&[9u8; 16]).unwrap();
    let info = capacity(&carrier, &cfg).unwrap();

    let fits = vec![1u8; info.max_encrypted_payload];
    let stego = embed(&carrier, &fits, Some(&key), &cfg).unwrap();
    assert_eq!(extract(&stego, Some(&key), &cfg).unwrap(), fits);
}

#[test]
fn wrong_key_fails() {
    let carrier = noise_gray(9, 64, 64);
    let cfg = BpcsConfig::default();
    let key = CipherKey::new(&[1u8; 24]).unwrap();
    let wrong = CipherKey::new(&[2u8; 24]).unwrap();
    let stego = embed(&carrier, b"classified", Some(&key), &cfg).unwrap();
    assert!(matches!(extract(&stego, Some(&wrong), &cfg), Err(StegoError::DecryptionFailed)));
}

#[test]
fn mismatched_config_finds_nothing() {
    let carrier = noise_gray(10, 64, 64);
    let stego = embed(&carrier, b"HELLO", None, &BpcsConfig::default()).unwrap();
    let other = BpcsConfig { planes: 5..=7, ..BpcsConfig::default() };
    assert!(matches!(extract(&stego, None, &other), Err(StegoError::MarkerNotFound)));
}

#[test]
fn clean_carrier_has_no_message() {
    let carrier = noise_gray(11, 64, 64);
    assert!(matches!(extract(&carrier, None, &BpcsConfig::default()), Err(StegoError::MarkerNotFound)));
}

#[test]
fn unused_planes_and_simple_blocks_are_unchanged() {
    // Left half noise, right half flat: the flat half has no complex blocks.
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let (w, h) = (64, 64);
    let mut samples = vec![0u8; w * h];
    for r in 0..h {
        for c in 0..w / 2 {
            samples[r * w + c] = rng.gen();
        }
        for c in w / 2..w {
            samples[r * w + c] = 0x80;
        }
    }
    let carrier = Carrier::grayscale(Channel::new(w, h, samples).unwrap());
    let stego = embed(&carrier, &[0xC3; 60], None, &BpcsConfig::default()).unwrap();

    let before = decompose(carrier.channel(0));
    let after = decompose(stego.channel(0));
    for p in 0..4 {
        assert_eq!(before[p], after[p], "plane {p} changed");
    }
    for r in 0..h {
        for c in w / 2..w {
            assert_eq!(stego.channel(0).get(r, c), 0x80, "flat pixel ({r}, {c}) changed");
        }
    }
    assert_eq!(extract(&stego, None, &BpcsConfig::default()).unwrap(), vec![0xC3; 60]);
}

#[test]
fn input_carrier_is_not_modified() {
    let carrier = noise_gray(13, 64, 64);
    let snapshot = carrier.clone();
    let _ = embed(&carrier, b"HELLO", None, &BpcsConfig::default()).unwrap();
    let _ = embed(&carrier, &[0u8; 10_000], None, &BpcsConfig::default());
    assert_eq!(carrier, snapshot);
}

#[test]
fn invalid_key_length_is_rejected() {
    assert!(matches!(CipherKey::new(&[0u8; 20]), Err(StegoError::InvalidKeyLength(20))));
}

#[test]
fn payload_completing_end_marker_is_refused() {
    let carrier = noise_gray(31, 64, 64);
    let cfg = BpcsConfig::default();
    for payload in [&b"~#@BPCS1_END@#"[..], &b"tail ~#@BPCS1_END@#"[..]] {
        assert!(matches!(
            embed(&carrier, payload, None, &cfg),
            Err(StegoError::Framing(FramingError::MarkerInPayload))
        ));
    }
    let key = CipherKey::generate(32).unwrap();
    let stego = embed(&carrier, b"~#@BPCS1_END@#", Some(&key), &cfg).unwrap();
    assert_eq!(extract(&stego, Some(&key), &cfg).unwrap(), b"~#@BPCS1_END@#");
}
