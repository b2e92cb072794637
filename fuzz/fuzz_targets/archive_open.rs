//! Fuzz target for Archive::open with arbitrary byte input.
//!
//! Exercises header verification and the record walk with malformed or
//! adversarial input, looking for panics, hangs, or unbounded allocations.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use car_archive::{Archive, ReadOptions, ResourceLimits};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let limits = ResourceLimits::new().max_entry_size(1 << 20);
    let options = ReadOptions::new().limits(limits);

    // We don't care about the result - we're looking for panics or hangs
    let Ok(mut archive) = Archive::open_with_options(Cursor::new(data), options) else {
        return;
    };

    if let Ok(entries) = archive.entries() {
        for entry in entries.iter().take(16) {
            let _ = archive.read_entry(entry);
        }
    }
    let _ = archive.get_bytes("a");
});
