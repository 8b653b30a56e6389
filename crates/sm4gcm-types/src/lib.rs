#![forbid(unsafe_code)]
#![doc = "Common error types for the SM4-GCM crates."]

pub mod error;

pub use error::*;
