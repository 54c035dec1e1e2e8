//! SRF file header: magic, subimage count, and the chained string blocks
//! that precede the first pixel section.

use alloc::string::String;

use log::trace;

use super::cursor::Cursor;
use crate::error::{FormatError, SrfError};
use crate::pixel::SRF_MAGIC;

/// Offset of the little-endian subimage count.
const COUNT_OFFSET: usize = 24;

/// Offset of the first length-prefixed header block.
const CHAIN_OFFSET: usize = 32;

/// Bytes skipped after each block's payload, counted from its length field:
/// the 4-byte length itself plus a trailing 4-byte tag (none after the last).
const CHAIN_SKIPS: [usize; 3] = [8, 8, 4];

/// Parsed SRF file header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrfHeader {
    /// Number of pixel sections declared by the file.
    pub subimage_count: u32,
    /// First header block, a short format identifier (`"578"` in known files).
    pub format_id: String,
    /// SRF revision string, e.g. `"1.00"`.
    pub version: String,
    /// Garmin product code, e.g. `"006-D0578-XX"`.
    pub product: String,
    /// Byte offset of the first pixel section record.
    pub first_record: usize,
}

/// Parse the header and walk the block chain to the first record.
pub fn parse_header(data: &[u8]) -> Result<SrfHeader, SrfError> {
    check_magic(data)?;

    let mut cursor = Cursor::at(data, COUNT_OFFSET)?;
    let subimage_count = cursor.get_u32_le()?;

    cursor.set_position(CHAIN_OFFSET)?;
    let mut blocks: [String; 3] = Default::default();
    for (block, skip) in blocks.iter_mut().zip(CHAIN_SKIPS) {
        let start = cursor.position();
        let len = cursor.get_u32_le()? as usize;
        *block = String::from_utf8_lossy(cursor.read_bytes(len)?).into_owned();
        let next = start
            .checked_add(len)
            .and_then(|p| p.checked_add(skip))
            .ok_or(FormatError::Truncated)?;
        cursor.set_position(next)?;
        trace!("srf header block at {start}: {len} bytes, next at {next}");
    }
    let [format_id, version, product] = blocks;

    Ok(SrfHeader {
        subimage_count,
        format_id,
        version,
        product,
        first_record: cursor.position(),
    })
}

/// Byte offset of the first pixel section record.
pub fn locate_first_record(data: &[u8]) -> Result<usize, SrfError> {
    Ok(parse_header(data)?.first_record)
}

fn check_magic(data: &[u8]) -> Result<(), FormatError> {
    match data.get(..SRF_MAGIC.len()) {
        Some(magic) if magic == SRF_MAGIC => Ok(()),
        Some(_) => Err(FormatError::BadMagic),
        None if SRF_MAGIC.starts_with(data) => Err(FormatError::Truncated),
        None => Err(FormatError::BadMagic),
    }
}
