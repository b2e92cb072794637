//! Payload compression for CAR records.
//!
//! Every record payload is compressed independently as a zlib stream using
//! the library's default level. Compression and decompression are pure
//! functions over byte slices and share no state across calls, so they are
//! safe to run concurrently on independent buffers.

mod zlib;

pub use zlib::{compress, decompress};

/// Returns an upper bound on the compressed size of `len` input bytes.
///
/// This matches zlib's `compressBound` and is used to size the output
/// buffer before the real compressed length is known.
pub fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}
