// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Symmetric payload encryption.
//!
//! AES in CBC mode with PKCS#7 padding. The key is supplied by the caller
//! (16, 24 or 32 bytes selects AES-128/192/256); turning a passphrase into a
//! key happens outside this crate. Output layout:
//!
//! ```text
//! [16 bytes] IV, fresh from the OS-seeded CSPRNG on every call (not secret)
//! [N bytes ] AES-CBC( plaintext || CRC-32(plaintext) ), PKCS#7 padded
//! ```
//!
//! The CRC-32 check value makes a wrong key fail reliably instead of
//! occasionally producing valid padding. Every failure path returns the same
//! [`StegoError::DecryptionFailed`], so callers cannot tell a padding error
//! from a check-value mismatch.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;
/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// Check value appended to the plaintext before padding.
pub const CHECK_LEN: usize = 4;
/// Accepted key lengths in bytes.
pub const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Largest number of bytes [`encrypt`] adds to a plaintext.
pub const CIPHER_OVERHEAD_MAX: usize = IV_LEN + CHECK_LEN + BLOCK_LEN;

/// A validated AES key. Wiped from memory on drop.
#[derive(Clone)]
pub struct CipherKey(Zeroizing<Vec<u8>>);

impl CipherKey {
    /// # Errors
    /// [`StegoError::InvalidKeyLength`] unless `bytes` is 16, 24 or 32 long.
    pub fn new(bytes: &[u8]) -> Result<Self, StegoError> {
        if !KEY_LENGTHS.contains(&bytes.len()) {
            return Err(StegoError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    /// A random key of `len` bytes from the OS-seeded CSPRNG.
    ///
    /// # Errors
    /// [`StegoError::InvalidKeyLength`] unless `len` is 16, 24 or 32.
    pub fn generate(len: usize) -> Result<Self, StegoError> {
        if !KEY_LENGTHS.contains(&len) {
            return Err(StegoError::InvalidKeyLength(len));
        }
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        rand::thread_rng().fill_bytes(&mut bytes);
        Ok(Self(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CipherKey(AES-{})", self.0.len() * 8)
    }
}

/// Ciphertext length (IV included) produced for `plaintext_len` bytes.
pub fn ciphertext_len(plaintext_len: usize) -> usize {
    IV_LEN + ((plaintext_len + CHECK_LEN) / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Largest plaintext whose ciphertext fits in `budget` bytes.
pub fn max_plaintext_len(budget: usize) -> usize {
    let blocks = budget.saturating_sub(IV_LEN) / BLOCK_LEN;
    (blocks * BLOCK_LEN).saturating_sub(CHECK_LEN + 1)
}

/// Encrypt with a fresh random IV. Returns `iv || ciphertext`.
pub fn encrypt(plaintext: &[u8], key: &CipherKey) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    encrypt_with_iv(plaintext, key, &iv)
}

/// Encrypt with a caller-provided IV. Returns `iv || ciphertext`.
///
/// Reusing an IV under the same key leaks equality of plaintext prefixes;
/// prefer [`encrypt`].
pub fn encrypt_with_iv(plaintext: &[u8], key: &CipherKey, iv: &[u8; IV_LEN]) -> Vec<u8> {
    let mut inner = Zeroizing::new(Vec::with_capacity(plaintext.len() + CHECK_LEN));
    inner.extend_from_slice(plaintext);
    inner.extend_from_slice(&crc32fast::hash(plaintext).to_be_bytes());

    let k = key.as_bytes();
    let ciphertext = match k.len() {
        16 => Aes128CbcEnc::new(k.into(), iv.as_slice().into()).encrypt_padded_vec_mut::<Pkcs7>(&inner),
        24 => Aes192CbcEnc::new(k.into(), iv.as_slice().into()).encrypt_padded_vec_mut::<Pkcs7>(&inner),
        _ => Aes256CbcEnc::new(k.into(), iv.as_slice().into()).encrypt_padded_vec_mut::<Pkcs7>(&inner),
    };

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Decrypt `iv || ciphertext`.
///
/// # Errors
/// [`StegoError::DecryptionFailed`] for any malformed input, bad padding or
/// check-value mismatch.
pub fn decrypt(data: &[u8], key: &CipherKey) -> Result<Vec<u8>, StegoError> {
    if data.len() < IV_LEN + BLOCK_LEN || (data.len() - IV_LEN) % BLOCK_LEN != 0 {
        return Err(StegoError::DecryptionFailed);
    }
    let (iv, ciphertext) = data.split_at(IV_LEN);
    let k = key.as_bytes();
    let inner = match k.len() {
        16 => Aes128CbcDec::new(k.into(), iv.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => Aes192CbcDec::new(k.into(), iv.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        _ => Aes256CbcDec::new(k.into(), iv.into()).decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    }
    .map(Zeroizing::new)
    .map_err(|_| StegoError::DecryptionFailed)?;

    if inner.len() < CHECK_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let (plaintext, check) = inner.split_at(inner.len() - CHECK_LEN);
    if crc32fast::hash(plaintext).to_be_bytes() != check {
        return Err(StegoError::DecryptionFailed);
    }
    Ok(plaintext.to_vec())
}
