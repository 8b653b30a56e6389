//! Block cipher modes of operation.
//!
//! GCM is layered bottom-up: [`gf128`] field arithmetic, the [`ghash`]
//! accumulator, the [`ctr`] keystream engine, and [`gcm`] which composes
//! them with the SM4 block cipher through the
//! [`BlockCipher`](crate::provider::BlockCipher) trait.

pub mod ctr;
pub mod gcm;
pub mod gf128;
pub mod ghash;
