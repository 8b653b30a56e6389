//! CTR (Counter) mode as used inside GCM.
//!
//! The counter block is `nonce-derived prefix || 32-bit block counter`; only
//! the low 32 bits advance (inc32, wrapping mod 2^32), the upper 96 bits are
//! fixed for the whole message.

use super::ghash::{Ghash, GhashKey, GHASH_BLOCK_SIZE};
use crate::provider::BlockCipher;
use sm4gcm_types::CryptoError;
use zeroize::Zeroize;

/// Counter block size in bytes.
pub const CTR_BLOCK_SIZE: usize = 16;

/// Nonce length that maps directly onto J0 without hashing.
pub const DIRECT_NONCE_SIZE: usize = 12;

/// Increment the last 4 bytes of a 16-byte counter (big-endian INC32).
pub fn inc32(counter: &mut [u8; CTR_BLOCK_SIZE]) {
    let ctr =
        u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]).wrapping_add(1);
    counter[12..16].copy_from_slice(&ctr.to_be_bytes());
}

/// Derive the pre-counter block J0 from a nonce.
///
/// A 12-byte nonce becomes `nonce || 0x00000001`; any other length is
/// hashed: `GHASH(H, nonce || pad || 0^64 || [len(nonce) in bits]_64)`.
pub(crate) fn derive_j0(
    ghash_key: &GhashKey,
    nonce: &[u8],
) -> Result<[u8; CTR_BLOCK_SIZE], CryptoError> {
    if nonce.is_empty() {
        return Err(CryptoError::InvalidNonce);
    }

    if nonce.len() == DIRECT_NONCE_SIZE {
        let mut j0 = [0u8; CTR_BLOCK_SIZE];
        j0[..DIRECT_NONCE_SIZE].copy_from_slice(nonce);
        j0[15] = 1;
        return Ok(j0);
    }

    let mut acc = Ghash::new(ghash_key);
    acc.update_padded(nonce);
    let mut len_block = [0u8; GHASH_BLOCK_SIZE];
    len_block[8..].copy_from_slice(&((nonce.len() as u64) * 8).to_be_bytes());
    acc.update_block(&len_block);
    Ok(acc.finish().to_bytes())
}

/// XOR `data` with the keystream `E(icb), E(inc32(icb)), ...`.
///
/// The final partial block uses only as many keystream bytes as it needs.
/// Encryption and decryption are the same operation.
pub fn ctr32_xor<C: BlockCipher + ?Sized>(
    cipher: &C,
    icb: &[u8; CTR_BLOCK_SIZE],
    data: &mut [u8],
) -> Result<(), CryptoError> {
    let mut counter = *icb;
    let mut keystream = [0u8; CTR_BLOCK_SIZE];
    for chunk in data.chunks_mut(CTR_BLOCK_SIZE) {
        keystream = counter;
        cipher.encrypt_block(&mut keystream)?;
        for (d, &k) in chunk.iter_mut().zip(keystream.iter()) {
            *d ^= k;
        }
        inc32(&mut counter);
    }
    keystream.zeroize();
    counter.zeroize();
    Ok(())
}
