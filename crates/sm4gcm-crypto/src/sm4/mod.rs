//! SM4 block cipher implementation.
//!
//! SM4 is a 128-bit block cipher standardized by the Chinese government
//! (GB/T 32907-2016). It uses a 128-bit key and is widely used in Chinese
//! commercial cryptography.
//!
//! Only the forward (encryption) direction is provided: the cipher is used
//! as a keystream generator by GCM and as the block primitive for external
//! chaining modes.

mod tables;

use std::fmt;

use crate::provider::BlockCipher;
use sm4gcm_types::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// SM4 block size in bytes (128 bits).
pub const SM4_BLOCK_SIZE: usize = 16;

/// SM4 key size in bytes (128 bits).
pub const SM4_KEY_SIZE: usize = 16;

const ROUNDS: usize = 32;

pub(crate) const SBOX: [u8; 256] = [
    0xd6, 0x90, 0xe9, 0xfe, 0xcc, 0xe1, 0x3d, 0xb7, 0x16, 0xb6, 0x14, 0xc2, 0x28, 0xfb, 0x2c, 0x05,
    0x2b, 0x67, 0x9a, 0x76, 0x2a, 0xbe, 0x04, 0xc3, 0xaa, 0x44, 0x13, 0x26, 0x49, 0x86, 0x06, 0x99,
    0x9c, 0x42, 0x50, 0xf4, 0x91, 0xef, 0x98, 0x7a, 0x33, 0x54, 0x0b, 0x43, 0xed, 0xcf, 0xac, 0x62,
    0xe4, 0xb3, 0x1c, 0xa9, 0xc9, 0x08, 0xe8, 0x95, 0x80, 0xdf, 0x94, 0xfa, 0x75, 0x8f, 0x3f, 0xa6,
    0x47, 0x07, 0xa7, 0xfc, 0xf3, 0x73, 0x17, 0xba, 0x83, 0x59, 0x3c, 0x19, 0xe6, 0x85, 0x4f, 0xa8,
    0x68, 0x6b, 0x81, 0xb2, 0x71, 0x64, 0xda, 0x8b, 0xf8, 0xeb, 0x0f, 0x4b, 0x70, 0x56, 0x9d, 0x35,
    0x1e, 0x24, 0x0e, 0x5e, 0x63, 0x58, 0xd1, 0xa2, 0x25, 0x22, 0x7c, 0x3b, 0x01, 0x21, 0x78, 0x87,
    0xd4, 0x00, 0x46, 0x57, 0x9f, 0xd3, 0x27, 0x52, 0x4c, 0x36, 0x02, 0xe7, 0xa0, 0xc4, 0xc8, 0x9e,
    0xea, 0xbf, 0x8a, 0xd2, 0x40, 0xc7, 0x38, 0xb5, 0xa3, 0xf7, 0xf2, 0xce, 0xf9, 0x61, 0x15, 0xa1,
    0xe0, 0xae, 0x5d, 0xa4, 0x9b, 0x34, 0x1a, 0x55, 0xad, 0x93, 0x32, 0x30, 0xf5, 0x8c, 0xb1, 0xe3,
    0x1d, 0xf6, 0xe2, 0x2e, 0x82, 0x66, 0xca, 0x60, 0xc0, 0x29, 0x23, 0xab, 0x0d, 0x53, 0x4e, 0x6f,
    0xd5, 0xdb, 0x37, 0x45, 0xde, 0xfd, 0x8e, 0x2f, 0x03, 0xff, 0x6a, 0x72, 0x6d, 0x6c, 0x5b, 0x51,
    0x8d, 0x1b, 0xaf, 0x92, 0xbb, 0xdd, 0xbc, 0x7f, 0x11, 0xd9, 0x5c, 0x41, 0x1f, 0x10, 0x5a, 0xd8,
    0x0a, 0xc1, 0x31, 0x88, 0xa5, 0xcd, 0x7b, 0xbd, 0x2d, 0x74, 0xd0, 0x12, 0xb8, 0xe5, 0xb4, 0xb0,
    0x89, 0x69, 0x97, 0x4a, 0x0c, 0x96, 0x77, 0x7e, 0x65, 0xb9, 0xf1, 0x09, 0xc5, 0x6e, 0xc6, 0x84,
    0x18, 0xf0, 0x7d, 0xec, 0x3a, 0xdc, 0x4d, 0x20, 0x79, 0xee, 0x5f, 0x3e, 0xd7, 0xcb, 0x39, 0x48,
];

/// System parameter FK, mixed into the key words before expansion.
const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

/// Fixed parameter CK, one word per round of the key schedule.
const CK: [u32; ROUNDS] = [
    0x00070e15, 0x1c232a31, 0x383f464d, 0x545b6269, 0x70777e85, 0x8c939aa1, 0xa8afb6bd, 0xc4cbd2d9,
    0xe0e7eef5, 0xfc030a11, 0x181f262d, 0x343b4249, 0x50575e65, 0x6c737a81, 0x888f969d, 0xa4abb2b9,
    0xc0c7ced5, 0xdce3eaf1, 0xf8ff060d, 0x141b2229, 0x30373e45, 0x4c535a61, 0x686f767d, 0x848b9299,
    0xa0a7aeb5, 0xbcc3cad1, 0xd8dfe6ed, 0xf4fb0209, 0x10171e25, 0x2c333a41, 0x484f565d, 0x646b7279,
];

/// Non-linear substitution τ: the S-box applied to each byte of the word.
#[inline]
fn tau(a: u32) -> u32 {
    let b = a.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

/// Linear transform L of the encryption round.
#[inline]
pub(crate) const fn l(b: u32) -> u32 {
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

/// Linear transform L' of the key schedule.
#[inline]
fn l_prime(b: u32) -> u32 {
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}

/// Round transform T = L ∘ τ, computed byte by byte.
#[inline]
fn t_direct(x: u32) -> u32 {
    l(tau(x))
}

/// Selects how the round transform T is evaluated.
///
/// Every variant yields the same ciphertext; they differ only in memory
/// footprint and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundFunction {
    /// S-box substitution followed by the rotation-based linear transform.
    Direct,
    /// Four 256-entry tables, one per byte lane, with L folded in.
    #[default]
    Table,
    /// A single 256-entry table; the other lanes are recovered by rotation.
    CompactTable,
}

impl RoundFunction {
    /// Evaluate T(x) with this implementation.
    #[inline]
    pub fn apply(self, x: u32) -> u32 {
        match self {
            RoundFunction::Direct => t_direct(x),
            RoundFunction::Table => tables::t_table(x),
            RoundFunction::CompactTable => tables::t_compact(x),
        }
    }
}

/// Derive the 32 round keys from a 16-byte key.
fn expand_key(key: &[u8; SM4_KEY_SIZE]) -> [u32; ROUNDS] {
    let mut k = [0u32; 4];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        k[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ FK[i];
    }

    let mut rk = [0u32; ROUNDS];
    for i in 0..ROUNDS {
        let tmp = k[(i + 1) % 4] ^ k[(i + 2) % 4] ^ k[(i + 3) % 4] ^ CK[i];
        rk[i] = k[i % 4] ^ l_prime(tau(tmp));
        // K[i+4] takes the slot of K[i], which is no longer needed.
        k[i % 4] = rk[i];
    }
    k.zeroize();
    rk
}

/// An SM4 key with precomputed round keys.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sm4Key {
    /// Precomputed round keys (32 rounds).
    round_keys: [u32; ROUNDS],
    #[zeroize(skip)]
    round_fn: RoundFunction,
}

impl Sm4Key {
    /// Create a new SM4 key from 16 raw bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        Self::with_round_function(key, RoundFunction::default())
    }

    /// Create a key that evaluates its rounds with `round_fn`.
    pub fn with_round_function(key: &[u8], round_fn: RoundFunction) -> Result<Self, CryptoError> {
        let key: &[u8; SM4_KEY_SIZE] = key.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: SM4_KEY_SIZE,
            got: key.len(),
        })?;
        Ok(Self {
            round_keys: expand_key(key),
            round_fn,
        })
    }

    /// The round function this key was configured with.
    pub fn round_function(&self) -> RoundFunction {
        self.round_fn
    }

    /// Encrypt a single 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let block: &mut [u8; SM4_BLOCK_SIZE] =
            block.try_into().map_err(|_| CryptoError::InvalidArg)?;
        *block = self.encrypt(block);
        Ok(())
    }

    /// Encrypt one block, returning the ciphertext block.
    pub fn encrypt(&self, block: &[u8; SM4_BLOCK_SIZE]) -> [u8; SM4_BLOCK_SIZE] {
        // Dispatch once per block rather than once per round.
        match self.round_fn {
            RoundFunction::Direct => self.crypt_with(block, t_direct),
            RoundFunction::Table => self.crypt_with(block, tables::t_table),
            RoundFunction::CompactTable => self.crypt_with(block, tables::t_compact),
        }
    }

    #[inline(always)]
    fn crypt_with(
        &self,
        block: &[u8; SM4_BLOCK_SIZE],
        t: impl Fn(u32) -> u32,
    ) -> [u8; SM4_BLOCK_SIZE] {
        let mut x = [0u32; 4];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            x[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        for &rk in &self.round_keys {
            let next = x[0] ^ t(x[1] ^ x[2] ^ x[3] ^ rk);
            x = [x[1], x[2], x[3], next];
        }

        // Reverse transform R: output (X35, X34, X33, X32).
        let mut out = [0u8; SM4_BLOCK_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(x.iter().rev()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        x.zeroize();
        out
    }

    #[cfg(test)]
    pub(crate) fn round_keys(&self) -> &[u32; ROUNDS] {
        &self.round_keys
    }
}

impl fmt::Debug for Sm4Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm4Key")
            .field("round_fn", &self.round_fn)
            .finish_non_exhaustive()
    }
}

impl BlockCipher for Sm4Key {
    fn block_size(&self) -> usize {
        SM4_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        SM4_KEY_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        Sm4Key::encrypt_block(self, block)
    }
}
