//! Low-level binary reading and writing utilities for the CAR format.

use std::io::{self, Read, Write};

/// Reads an unsigned 64-bit little-endian integer.
pub fn read_u64_le<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads an unsigned 64-bit little-endian integer, or `None` at end of stream.
///
/// Returns `Ok(None)` only when the stream yields no bytes at all. A stream
/// that ends part-way through the integer fails with
/// [`io::ErrorKind::UnexpectedEof`].
pub fn read_u64_le_or_eof<R: Read>(r: &mut R) -> io::Result<Option<u64>> {
    let mut buf = [0u8; 8];
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    match filled {
        0 => Ok(None),
        8 => Ok(Some(u64::from_le_bytes(buf))),
        n => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("length field truncated after {} of 8 bytes", n),
        )),
    }
}

/// Writes an unsigned 64-bit little-endian integer.
pub fn write_u64_le<W: Write>(w: &mut W, value: u64) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

/// Reads exactly `count` bytes into a new vector.
///
/// The buffer grows with the data actually read, so a corrupt length field
/// cannot force a huge up-front allocation.
pub fn read_bytes<R: Read>(r: &mut R, count: u64) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    r.by_ref().take(count).read_to_end(&mut buf)?;
    if (buf.len() as u64) < count {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, got {}", count, buf.len()),
        ));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_u64_le_roundtrip() {
        let mut buf = Vec::new();
        write_u64_le(&mut buf, 0x0102_0304_0506_0708).unwrap();
        assert_eq!(buf, [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);

        let mut cursor = Cursor::new(&buf);
        assert_eq!(read_u64_le(&mut cursor).unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_read_u64_or_eof_clean_end() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert_eq!(read_u64_le_or_eof(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_read_u64_or_eof_value() {
        let mut cursor = Cursor::new(42u64.to_le_bytes().to_vec());
        assert_eq!(read_u64_le_or_eof(&mut cursor).unwrap(), Some(42));
        assert_eq!(read_u64_le_or_eof(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_read_u64_or_eof_partial() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let err = read_u64_le_or_eof(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_bytes_exact() {
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        assert_eq!(read_bytes(&mut cursor, 4).unwrap(), b"abcd");
        assert_eq!(read_bytes(&mut cursor, 0).unwrap(), b"");
    }

    #[test]
    fn test_read_bytes_short() {
        let mut cursor = Cursor::new(b"ab".to_vec());
        let err = read_bytes(&mut cursor, u64::MAX).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
