#![doc = "SM4 block cipher and SM4-GCM authenticated encryption."]
#![forbid(unsafe_code)]

// Core traits
pub mod provider;

// Symmetric ciphers
#[cfg(feature = "sm4")]
pub mod sm4;

// Modes of operation
#[cfg(feature = "modes")]
pub mod modes;

pub mod cipher {
    //! Unified symmetric cipher interface.
    pub use super::provider::{Aead, BlockCipher};
}

#[cfg(feature = "modes")]
pub use modes::gcm::{
    sm4_gcm_decrypt, sm4_gcm_encrypt, sm4_gcm_open, sm4_gcm_seal, GhashBackend, Sm4Gcm,
    Sm4GcmConfig, Sm4GcmConfigBuilder, GCM_TAG_SIZE,
};
#[cfg(feature = "sm4")]
pub use sm4::{RoundFunction, Sm4Key, SM4_BLOCK_SIZE, SM4_KEY_SIZE};

pub use sm4gcm_types::CryptoError;
