//! GCM (Galois/Counter Mode) authenticated encryption with SM4.
//!
//! Implements GCM as defined in NIST SP 800-38D, instantiated with the SM4
//! block cipher (the SM4-GCM construction of RFC 8998).
//!
//! [`Sm4Gcm`] precomputes the round keys and the hash subkey H once per key
//! and can then seal and open any number of messages. It holds no mutable
//! state, so one context may be shared across threads.

use super::ctr::{ctr32_xor, derive_j0, inc32, CTR_BLOCK_SIZE, DIRECT_NONCE_SIZE};
use super::gf128::Gf128;
use super::ghash::{Ghash, GhashKey};
use crate::provider::Aead;
use crate::sm4::{RoundFunction, Sm4Key, SM4_BLOCK_SIZE, SM4_KEY_SIZE};
use sm4gcm_types::CryptoError;
use subtle::ConstantTimeEq;
use tracing::{debug, instrument};
use zeroize::Zeroize;

pub use super::ghash::GhashBackend;

/// GCM authentication tag size in bytes.
pub const GCM_TAG_SIZE: usize = 16;

/// Recommended GCM nonce size in bytes.
pub const GCM_NONCE_SIZE: usize = DIRECT_NONCE_SIZE;

/// Longest plaintext a single invocation may process: 2^39 - 256 bits.
pub const GCM_MAX_PLAINTEXT_LEN: u64 = (1 << 36) - 32;

/// Runtime configuration of an [`Sm4Gcm`] context.
///
/// The defaults are the table-driven SM4 round and constant-time GHASH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sm4GcmConfig {
    round_function: RoundFunction,
    ghash_backend: GhashBackend,
}

impl Sm4GcmConfig {
    /// Create a builder for SM4-GCM configuration.
    pub fn builder() -> Sm4GcmConfigBuilder {
        Sm4GcmConfigBuilder::default()
    }

    pub fn round_function(&self) -> RoundFunction {
        self.round_function
    }

    pub fn ghash_backend(&self) -> GhashBackend {
        self.ghash_backend
    }
}

/// Builder for `Sm4GcmConfig`.
#[derive(Debug, Default)]
pub struct Sm4GcmConfigBuilder {
    round_function: RoundFunction,
    ghash_backend: GhashBackend,
}

impl Sm4GcmConfigBuilder {
    pub fn round_function(mut self, round_function: RoundFunction) -> Self {
        self.round_function = round_function;
        self
    }

    /// Select the GHASH multiplier. See [`GhashBackend::Table4Bit`] before
    /// choosing anything but the default.
    pub fn ghash_backend(mut self, backend: GhashBackend) -> Self {
        self.ghash_backend = backend;
        self
    }

    pub fn build(self) -> Sm4GcmConfig {
        Sm4GcmConfig {
            round_function: self.round_function,
            ghash_backend: self.ghash_backend,
        }
    }
}

/// SM4-GCM context bound to one key.
#[derive(Clone)]
pub struct Sm4Gcm {
    cipher: Sm4Key,
    ghash_key: GhashKey,
    config: Sm4GcmConfig,
}

impl Sm4Gcm {
    /// Create a context with the default configuration.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        Self::with_config(key, Sm4GcmConfig::default())
    }

    /// Create a context with an explicit configuration.
    #[instrument(level = "debug", skip_all, fields(key_len = key.len(), config = ?config))]
    pub fn with_config(key: &[u8], config: Sm4GcmConfig) -> Result<Self, CryptoError> {
        let cipher = Sm4Key::with_round_function(key, config.round_function)?;

        // H = E_K(0^128)
        let mut h_block = cipher.encrypt(&[0u8; SM4_BLOCK_SIZE]);
        let h = Gf128::from_bytes(&h_block);
        h_block.zeroize();
        let ghash_key = GhashKey::new(h, config.ghash_backend);

        Ok(Self {
            cipher,
            ghash_key,
            config,
        })
    }

    pub fn config(&self) -> &Sm4GcmConfig {
        &self.config
    }

    /// Encrypt `plaintext` and authenticate it together with `aad`.
    ///
    /// Returns the ciphertext (same length as `plaintext`) and the 16-byte tag.
    #[instrument(
        level = "trace",
        skip_all,
        fields(nonce_len = nonce.len(), plaintext_len = plaintext.len(), aad_len = aad.len())
    )]
    pub fn seal(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, [u8; GCM_TAG_SIZE]), CryptoError> {
        let mut output = plaintext.to_vec();
        let tag = self.seal_in_place_detached(nonce, aad, &mut output)?;
        Ok((output, tag))
    }

    /// Verify `tag` over `aad || ciphertext` and, only if it matches,
    /// decrypt.
    ///
    /// Fails with [`CryptoError::AuthenticationFailure`] on mismatch; no
    /// plaintext is produced in that case.
    #[instrument(
        level = "trace",
        skip_all,
        fields(nonce_len = nonce.len(), ciphertext_len = ciphertext.len(), aad_len = aad.len())
    )]
    pub fn open(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        aad: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut output = ciphertext.to_vec();
        self.open_in_place_detached(nonce, aad, &mut output, tag)?;
        Ok(output)
    }

    /// Encrypt `buffer` in place and return the tag.
    ///
    /// On return `buffer` holds exactly `buffer.len()` bytes of ciphertext.
    pub fn seal_in_place_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
    ) -> Result<[u8; GCM_TAG_SIZE], CryptoError> {
        check_text_len(buffer.len())?;
        let mut j0 = derive_j0(&self.ghash_key, nonce)?;

        let mut counter = j0;
        inc32(&mut counter);
        ctr32_xor(&self.cipher, &counter, buffer)?;

        let tag = self.compute_tag(&j0, aad, buffer);
        j0.zeroize();
        Ok(tag)
    }

    /// Verify and decrypt `buffer` in place.
    ///
    /// The tag is checked before any byte of `buffer` is touched: on
    /// failure `buffer` still holds the original ciphertext.
    pub fn open_in_place_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &[u8],
    ) -> Result<(), CryptoError> {
        if tag.len() != GCM_TAG_SIZE {
            return Err(CryptoError::InvalidTagLength);
        }
        check_text_len(buffer.len())?;
        let mut j0 = derive_j0(&self.ghash_key, nonce)?;

        let mut expected = self.compute_tag(&j0, aad, buffer);
        let ok: bool = expected[..].ct_eq(tag).into();
        expected.zeroize();
        if !ok {
            j0.zeroize();
            debug!(
                ciphertext_len = buffer.len(),
                aad_len = aad.len(),
                "sm4-gcm: tag verification failed"
            );
            return Err(CryptoError::AuthenticationFailure);
        }

        let mut counter = j0;
        inc32(&mut counter);
        ctr32_xor(&self.cipher, &counter, buffer)?;
        j0.zeroize();
        Ok(())
    }

    /// `tag = E_K(J0) ^ GHASH(H, A || pad || C || pad || len(A) || len(C))`.
    fn compute_tag(
        &self,
        j0: &[u8; CTR_BLOCK_SIZE],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> [u8; GCM_TAG_SIZE] {
        let mut acc = Ghash::new(&self.ghash_key);
        acc.update_padded(aad);
        acc.update_padded(ciphertext);
        let s = acc.finish_with_lengths(aad.len(), ciphertext.len());

        let mut ek0 = self.cipher.encrypt(j0);
        let mut tag = s.to_bytes();
        for (t, &e) in tag.iter_mut().zip(ek0.iter()) {
            *t ^= e;
        }
        ek0.zeroize();
        tag
    }
}

impl std::fmt::Debug for Sm4Gcm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sm4Gcm")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Aead for Sm4Gcm {
    fn tag_size(&self) -> usize {
        GCM_TAG_SIZE
    }

    fn nonce_size(&self) -> usize {
        GCM_NONCE_SIZE
    }

    fn key_size(&self) -> usize {
        SM4_KEY_SIZE
    }

    fn encrypt(&self, nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (mut ct, tag) = self.seal(nonce, plaintext, aad)?;
        ct.extend_from_slice(&tag);
        Ok(ct)
    }

    fn decrypt(&self, nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < GCM_TAG_SIZE {
            return Err(CryptoError::InvalidArg);
        }
        let ct_len = ciphertext.len() - GCM_TAG_SIZE;
        let (ct_data, received_tag) = ciphertext.split_at(ct_len);
        self.open(nonce, ct_data, aad, received_tag)
    }
}

fn check_text_len(len: usize) -> Result<(), CryptoError> {
    if len as u64 > GCM_MAX_PLAINTEXT_LEN {
        return Err(CryptoError::InputOverflow);
    }
    Ok(())
}

/// Encrypt and authenticate data using SM4-GCM.
/// Returns the ciphertext and the detached 16-byte tag.
pub fn sm4_gcm_seal(
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, [u8; GCM_TAG_SIZE]), CryptoError> {
    Sm4Gcm::new(key)?.seal(nonce, plaintext, aad)
}

/// Verify and decrypt data using SM4-GCM with a detached tag.
/// Returns plaintext on success, or `AuthenticationFailure`.
pub fn sm4_gcm_open(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    Sm4Gcm::new(key)?.open(nonce, ciphertext, aad, tag)
}

/// Encrypt and authenticate data using SM4-GCM.
/// Returns ciphertext || 16-byte tag.
pub fn sm4_gcm_encrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    Sm4Gcm::new(key)?.encrypt(nonce, aad, plaintext)
}

/// Decrypt and verify data using SM4-GCM.
/// `ciphertext` includes the appended 16-byte tag.
/// Returns plaintext on success, or error if authentication fails.
pub fn sm4_gcm_decrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    Sm4Gcm::new(key)?.decrypt(nonce, aad, ciphertext)
}
