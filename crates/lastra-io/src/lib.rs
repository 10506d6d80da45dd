#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// Decode encoded bytes into RGBA8 buffers.
pub mod decode;

/// Encode RGBA8 buffers for the caller's transport.
pub mod encode;

pub use crate::decode::decode_rgba8;
pub use crate::encode::{encode, OutputEncoding};
pub use crate::error::IoError;
