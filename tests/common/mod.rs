//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use car_archive::{Archive, WriteOptions, WriteResult, Writer};
use std::io::Cursor;

/// Size of the `CARv1` header.
pub const HEADER_LEN: usize = 5;

/// Creates an in-memory archive with optional configuration.
///
/// Returns both the archive bytes and the WriteResult metadata.
pub fn create_archive_with_result(
    options: Option<WriteOptions>,
    entries: &[(&str, &[u8])],
) -> car_archive::Result<(Vec<u8>, WriteResult)> {
    let mut archive_bytes = Vec::new();
    let result = {
        let writer = Writer::create(&mut archive_bytes)?;

        let mut writer = match options {
            Some(opts) => writer.options(opts),
            None => writer,
        };

        for (name, data) in entries {
            writer.add_bytes(name, data)?;
        }

        writer.finish()?
    };
    Ok((archive_bytes, result))
}

/// Creates an in-memory archive with default options.
pub fn create_archive(entries: &[(&str, &[u8])]) -> car_archive::Result<Vec<u8>> {
    create_archive_with_result(None, entries).map(|(bytes, _)| bytes)
}

/// Opens an in-memory archive.
pub fn open(bytes: &[u8]) -> Archive<Cursor<&[u8]>> {
    Archive::open(Cursor::new(bytes)).expect("Failed to open archive")
}

/// Extracts the error from a Result, panicking if it's Ok.
///
/// Useful when the Ok type doesn't implement Debug.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}

/// Builds one record by hand: name, sizes and payload exactly as given.
///
/// The name is obfuscated; nothing else is checked, so callers can
/// describe records that lie about their sizes.
pub fn raw_record(name: &[u8], uncompressed: u64, compressed: u64, payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(&(name.len() as u64).to_le_bytes());
    record.extend(name.iter().map(|b| b ^ 0x58));
    record.extend_from_slice(&uncompressed.to_le_bytes());
    record.extend_from_slice(&compressed.to_le_bytes());
    record.extend_from_slice(payload);
    record
}

/// Verifies that an archive holds exactly `expected_entries`, in order.
pub fn verify_archive_contents(archive_bytes: &[u8], expected_entries: &[(&str, &[u8])]) {
    let mut archive = open(archive_bytes);

    assert_eq!(
        archive.file_count().expect("count failed"),
        expected_entries.len(),
        "Entry count mismatch"
    );

    let all = archive.read_all().expect("Failed to read archive");
    for ((entry, data), (name, expected)) in all.iter().zip(expected_entries) {
        assert_eq!(entry.name, *name);
        assert_eq!(data.as_slice(), *expected, "Content mismatch for '{}'", name);
    }
}
