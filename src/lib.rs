//! # car-archive
//!
//! A library for reading and writing CAR archives: a single-file container
//! that bundles named byte blobs, compressing each one independently.
//!
//! An archive is a 5-byte header (`CARv1`) followed by records written back
//! to back. Each record stores a lightly obfuscated name, the uncompressed
//! and compressed sizes as 64-bit little-endian integers, and a zlib
//! payload. There is no index: readers find entries by walking the records.
//!
//! Name obfuscation is a fixed-key XOR that keeps names out of a casual hex
//! dump. It is not encryption.
//!
//! ## Quick Start
//!
//! ### Creating an Archive
//!
//! ```rust,no_run
//! use car_archive::{Writer, Result};
//!
//! fn main() -> Result<()> {
//!     let mut writer = Writer::create_path("output.car")?;
//!
//!     // Add data from memory
//!     writer.add_bytes("hello.txt", b"Hello, World!")?;
//!
//!     // Add data from any reader
//!     let file = std::fs::File::open("notes.txt")?;
//!     writer.add_file("notes.txt", file)?;
//!
//!     let result = writer.finish()?;
//!     println!("Wrote {} entries ({:.1}% saved)",
//!         result.entries_written,
//!         result.space_savings() * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use car_archive::{Archive, Result};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! fn main() -> Result<()> {
//!     let mut archive = Archive::open(BufReader::new(File::open("output.car")?))?;
//!
//!     for entry in archive.entries()? {
//!         println!("{}: {} bytes", entry.name, entry.size);
//!     }
//!
//!     let text = archive.get_as_string("hello.txt")?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Duplicate Names
//!
//! Names do not have to be unique. A lookup returns the first record with
//! the requested name, so a later record with the same name is shadowed.
//! Use [`WriteOptions::reject_duplicates`] to refuse duplicates instead.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | Yes | Parallel compression/decompression of batches with Rayon |
//! | `cli` | No | Command-line interface tool |

pub mod codec;
mod error;
pub mod format;
mod handle;
mod limits;
pub mod read;
pub mod write;

pub use error::{Error, Result};
pub use handle::{ArchiveHandle, Mode};
pub use limits::ResourceLimits;
pub use read::{Archive, Entry, EntryIndex, ReadOptions};
pub use write::{DuplicatePolicy, WriteOptions, WriteResult, Writer};
