//! CAR archive header writing and verification.

use std::io::{self, Read, Write};

use super::{HEADER_SIZE, MAGIC, VERSION};
use crate::{Error, Result};

/// Writes the signature and version bytes.
pub fn write_header<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(MAGIC)?;
    w.write_all(VERSION)?;
    Ok(())
}

/// Reads and validates the header at the current stream position.
///
/// Holds no state, so it can be called before every scan.
///
/// # Errors
///
/// Returns an error if:
/// - The stream is shorter than the header ([`Error::InvalidFormat`])
/// - The signature is not `CAR` ([`Error::InvalidFormat`])
/// - The version is not `v1` ([`Error::UnsupportedVersion`])
pub fn verify_header<R: Read>(r: &mut R) -> Result<()> {
    let mut header = [0u8; HEADER_SIZE];
    r.read_exact(&mut header).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::InvalidFormat("unexpected end of stream while reading header".into())
        } else {
            Error::Io(e)
        }
    })?;

    let (magic, version) = header.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(Error::InvalidFormat(
            "input does not appear to be a CAR archive".into(),
        ));
    }
    if version != VERSION {
        return Err(Error::UnsupportedVersion {
            found: String::from_utf8_lossy(version).into_owned(),
        });
    }
    Ok(())
}
