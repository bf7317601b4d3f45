#[cfg(not(any(feature = "brotli", feature = "zlib", feature = "zstd")))]
compile_error!("at least one codec feature (brotli, zlib, zstd) must be enabled");

#[cfg(feature = "brotli")]
pub mod brotli_codec;
pub mod codec;
pub mod engine;
pub mod error;
pub mod framing;
pub mod hash;
pub mod path;
pub mod pool;
pub mod report;
pub mod scan;
#[cfg(feature = "zlib")]
pub mod zlib_codec;
#[cfg(feature = "zstd")]
pub mod zstd_codec;

pub use error::{ArchiveError, Result};
