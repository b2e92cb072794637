//! CAR archive format constants and low-level encoding utilities.
//!
//! A CAR stream is a fixed 5-byte header followed by zero or more records,
//! written back to back with no padding and no index:
//!
//! ```text
//! Header:   "CAR" "v1"
//! Record:   name_len:u64le  name:[u8; name_len] (XOR 0x58)
//!           uncompressed_size:u64le  compressed_size:u64le
//!           payload:[u8; compressed_size] (zlib)
//! ```

pub mod header;
pub mod reader;
pub mod record;

/// The CAR file signature (magic bytes).
pub const MAGIC: &[u8; 3] = b"CAR";

/// The only format version this implementation reads and writes.
pub const VERSION: &[u8; 2] = b"v1";

/// Size of the header in bytes (magic followed by version).
pub const HEADER_SIZE: usize = MAGIC.len() + VERSION.len();

/// Key byte every name byte is XORed with.
///
/// This only keeps names out of a casual hex dump; it is not encryption.
pub const NAME_KEY: u8 = 0x58;

/// Size of each length/size field in a record.
pub const LENGTH_FIELD_SIZE: u64 = 8;
