//! Zlib codec implementation.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use super::compress_bound;
use crate::{Error, Result};

/// Upper bound on the output buffer reserved up front from a declared size.
const MAX_PREALLOC: usize = 16 << 20;

/// Compresses `data` into a new zlib stream.
///
/// # Errors
///
/// Returns [`Error::Compression`] if the encoder fails.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let output = Vec::with_capacity(compress_bound(data.len()));
    let mut encoder = ZlibEncoder::new(output, Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(format!("deflate failed: {}", e)))?;
    let mut compressed = encoder
        .finish()
        .map_err(|e| Error::Compression(format!("deflate failed: {}", e)))?;
    compressed.shrink_to_fit();
    Ok(compressed)
}

/// Decompresses a zlib stream that must expand to exactly `expected_size` bytes.
///
/// At most `expected_size + 1` bytes are produced, which is enough to detect
/// a payload that is larger than declared without decoding all of it.
///
/// # Errors
///
/// Returns [`Error::Compression`] if the stream is corrupt, or
/// [`Error::SizeMismatch`] if it does not expand to `expected_size` bytes.
pub fn decompress(data: &[u8], expected_size: u64) -> Result<Vec<u8>> {
    let capacity = usize::try_from(expected_size).map_err(|_| {
        Error::ResourceLimitExceeded(format!(
            "entry size {} does not fit in memory on this platform",
            expected_size
        ))
    })?;

    let mut output = Vec::with_capacity(capacity.min(MAX_PREALLOC));
    ZlibDecoder::new(data)
        .take(expected_size.saturating_add(1))
        .read_to_end(&mut output)
        .map_err(|e| Error::Compression(format!("inflate failed: {}", e)))?;

    if output.len() as u64 != expected_size {
        return Err(Error::SizeMismatch {
            expected: expected_size,
            actual: output.len() as u64,
        });
    }
    Ok(output)
}
