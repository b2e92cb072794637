//! Record encoding and decoding.
//!
//! Decoding stops at the record header: the compressed payload is either
//! skipped with a seek or read on request, so passes that only count or
//! search records never decompress anything.

use std::io::{Read, Seek, SeekFrom, Write};

use super::reader::{read_bytes, read_u64_le, read_u64_le_or_eof, write_u64_le};
use super::{LENGTH_FIELD_SIZE, NAME_KEY};
use crate::limits::ResourceLimits;
use crate::{Error, Result, codec};

/// Applies the reversible name obfuscation.
///
/// The transform is its own inverse: applying it twice yields the input.
pub fn obfuscate_name(name: &[u8]) -> Vec<u8> {
    name.iter().map(|b| b ^ NAME_KEY).collect()
}

/// The decoded header of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Plaintext name bytes.
    pub name: Vec<u8>,
    /// Length of the payload after decompression.
    pub uncompressed_size: u64,
    /// Length of the compressed payload in the stream.
    pub compressed_size: u64,
    /// Stream offset of the record's first byte.
    pub offset: u64,
    /// Stream offset of the compressed payload.
    pub payload_offset: u64,
}

impl RecordHeader {
    /// Returns the stream offset just past this record.
    pub fn end_offset(&self) -> u64 {
        self.payload_offset + self.compressed_size
    }
}

/// A decoded record whose payload is still compressed.
#[derive(Debug, Clone)]
pub struct Record {
    /// The record header.
    pub header: RecordHeader,
    /// The compressed payload bytes.
    pub payload: Vec<u8>,
}

impl Record {
    /// Decompresses the payload, checking it against the declared size.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        codec::decompress(&self.payload, self.header.uncompressed_size)
    }
}

/// A record compressed and ready to be written.
///
/// Preparing a record touches no stream, so several can be prepared in
/// parallel and then written in order.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    name: Vec<u8>,
    uncompressed_size: u64,
    compressed: Vec<u8>,
}

impl PreparedRecord {
    /// Compresses `payload` for a record named `name`.
    pub fn new(name: &[u8], payload: &[u8]) -> Result<Self> {
        Ok(Self {
            name: name.to_vec(),
            uncompressed_size: payload.len() as u64,
            compressed: codec::compress(payload)?,
        })
    }

    /// Returns the plaintext name.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Returns the payload size before compression.
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Returns the payload size after compression.
    pub fn compressed_size(&self) -> u64 {
        self.compressed.len() as u64
    }

    /// Returns the number of bytes [`write_to`](Self::write_to) emits.
    pub fn encoded_len(&self) -> u64 {
        3 * LENGTH_FIELD_SIZE + self.name.len() as u64 + self.compressed_size()
    }

    /// Writes the record in wire order.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_u64_le(w, self.name.len() as u64)?;
        w.write_all(&obfuscate_name(&self.name))?;
        write_u64_le(w, self.uncompressed_size)?;
        write_u64_le(w, self.compressed_size())?;
        w.write_all(&self.compressed)?;
        Ok(())
    }
}

/// Compresses and writes one record, returning the number of bytes written.
pub fn encode_record<W: Write>(w: &mut W, name: &[u8], payload: &[u8]) -> Result<u64> {
    let record = PreparedRecord::new(name, payload)?;
    record.write_to(w)?;
    Ok(record.encoded_len())
}

/// Reads the header of the record at the current position.
///
/// `stream_len` is the total stream length, used to reject records whose
/// name or payload would extend past the end.
///
/// # Returns
///
/// `Ok(None)` when the stream ends exactly at a record boundary.
///
/// # Errors
///
/// Returns [`Error::Truncated`] for any partial record and
/// [`Error::ResourceLimitExceeded`] when the name is longer than allowed.
pub fn read_record_header<R: Read + Seek>(
    r: &mut R,
    stream_len: u64,
    limits: &ResourceLimits,
) -> Result<Option<RecordHeader>> {
    let offset = r.stream_position()?;
    let name_len = match read_u64_le_or_eof(r)
        .map_err(|e| Error::from_record_io(e, offset, "name length"))?
    {
        Some(len) => len,
        None => return Ok(None),
    };

    limits.check_name_len(name_len)?;
    let remaining = stream_len.saturating_sub(offset + LENGTH_FIELD_SIZE);
    if name_len > remaining {
        return Err(Error::truncated(
            offset,
            format!(
                "name of {} bytes extends past end of stream ({} bytes left)",
                name_len, remaining
            ),
        ));
    }

    let obfuscated = read_bytes(r, name_len).map_err(|e| Error::from_record_io(e, offset, "name"))?;
    let uncompressed_size =
        read_u64_le(r).map_err(|e| Error::from_record_io(e, offset, "uncompressed size"))?;
    let compressed_size =
        read_u64_le(r).map_err(|e| Error::from_record_io(e, offset, "compressed size"))?;

    let payload_offset = offset + 3 * LENGTH_FIELD_SIZE + name_len;
    let remaining = stream_len.saturating_sub(payload_offset);
    if compressed_size > remaining {
        return Err(Error::truncated(
            offset,
            format!(
                "payload of {} bytes extends past end of stream ({} bytes left)",
                compressed_size, remaining
            ),
        ));
    }

    Ok(Some(RecordHeader {
        name: obfuscate_name(&obfuscated),
        uncompressed_size,
        compressed_size,
        offset,
        payload_offset,
    }))
}

/// Moves the stream past a record's payload without reading it.
pub fn skip_payload<R: Seek>(r: &mut R, header: &RecordHeader) -> Result<()> {
    r.seek(SeekFrom::Start(header.end_offset()))?;
    Ok(())
}

/// Reads a record's compressed payload.
pub fn read_payload<R: Read + Seek>(r: &mut R, header: &RecordHeader) -> Result<Vec<u8>> {
    r.seek(SeekFrom::Start(header.payload_offset))?;
    read_bytes(r, header.compressed_size)
        .map_err(|e| Error::from_record_io(e, header.offset, "payload"))
}

/// Reads the record at the current position, payload included.
///
/// The payload is returned compressed; see [`Record::decompress`].
pub fn decode_record<R: Read + Seek>(
    r: &mut R,
    stream_len: u64,
    limits: &ResourceLimits,
) -> Result<Option<Record>> {
    let Some(header) = read_record_header(r, stream_len, limits)? else {
        return Ok(None);
    };
    let payload = read_payload(r, &header)?;
    Ok(Some(Record { header, payload }))
}
