//! Garmin SRF vehicle bitmap parser.
//!
//! An SRF file is a 16-byte magic, a subimage count, three length-prefixed
//! header blocks, then one pixel section per subimage. Sections are decoded
//! independently and stacked by [`crate::compose`].

mod cursor;
mod header;
mod record;

pub use header::{SrfHeader, locate_first_record, parse_header};
pub use record::decode_record;
pub(crate) use record::record_layout;

use alloc::vec::Vec;

use enough::Stop;
use log::{trace, warn};

use crate::compose::compose_with;
use crate::decode::Bitmap;
use crate::error::{FormatError, SrfError};
use crate::limits::Limits;

/// Smallest possible record: header and tag with empty planes.
const MIN_RECORD_LEN: usize = 40;

/// Sum of all bytes mod 256. Files written by the Garmin tools end in a
/// check byte that brings this to zero.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Fail with [`FormatError::ChecksumMismatch`] unless [`checksum`] is zero.
pub fn verify_checksum(data: &[u8]) -> Result<(), FormatError> {
    match checksum(data) {
        0 => Ok(()),
        sum => Err(FormatError::ChecksumMismatch { sum }),
    }
}

/// Decode every declared section into one composite bitmap.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    strict_checksum: bool,
    stop: &dyn Stop,
) -> Result<Bitmap, SrfError> {
    let header = parse_header(data)?;
    if strict_checksum {
        verify_checksum(data)?;
    } else if let Err(e) = verify_checksum(data) {
        warn!("ignoring srf {e}");
    }
    trace!(
        "srf {} rev {} product {}: {} subimages from offset {}",
        header.format_id,
        header.version,
        header.product,
        header.subimage_count,
        header.first_record
    );

    let declared = header.subimage_count as usize;
    let room = data.len().saturating_sub(header.first_record) / MIN_RECORD_LEN;
    let mut records = Vec::new();
    records
        .try_reserve(declared.min(room))
        .map_err(|_| SrfError::OutOfMemory {
            bytes: declared.min(room) * core::mem::size_of::<Bitmap>(),
        })?;

    let mut offset = header.first_record;
    for _ in 0..declared {
        stop.check()?;
        let (subimage, next) = record::decode_record_with(data, offset, limits, stop)?;
        records.push(subimage);
        offset = next;
    }
    if offset < data.len() {
        trace!("srf trailer: {} bytes", data.len() - offset);
    }

    compose_with(&records, limits)
}
