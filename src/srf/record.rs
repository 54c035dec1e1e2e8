//! Pixel section records: a 32-byte header, an alpha plane of one byte per
//! pixel, an 8-byte tag, then an RGB565 colour plane.

use core::ops::Range;

use enough::{Stop, Unstoppable};
use log::trace;

use super::cursor::Cursor;
use crate::decode::{Bitmap, try_alloc_pixels};
use crate::error::{FormatError, SrfError};
use crate::limits::Limits;
use crate::pixel::srf_to_argb;

/// Height and width (u16 LE each) sit 12 bytes into the record.
const DIMENSIONS_OFFSET: usize = 12;

/// Alpha plane start, relative to the record.
const ALPHA_OFFSET: usize = 32;

/// Type tag and length word between the alpha and colour planes.
const COLOR_TAG_LEN: usize = 8;

/// Byte ranges of one record inside the file.
#[derive(Clone, Debug)]
pub(crate) struct RecordLayout {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) alpha: Range<usize>,
    pub(crate) color: Range<usize>,
}

impl RecordLayout {
    /// Offset just past the colour plane: `offset + 40 + 3 * width * height`.
    pub(crate) fn end(&self) -> usize {
        self.color.end
    }
}

/// Read a record's dimensions and check that both planes are present.
pub(crate) fn record_layout(data: &[u8], offset: usize) -> Result<RecordLayout, FormatError> {
    let mut cursor = Cursor::at(data, offset)?;
    cursor.skip(DIMENSIONS_OFFSET)?;
    let height = cursor.get_u16_le()?;
    let width = cursor.get_u16_le()?;

    // u16 * u16 always fits in usize on supported targets
    let count = usize::from(width) * usize::from(height);

    let alpha_start = offset
        .checked_add(ALPHA_OFFSET)
        .ok_or(FormatError::Truncated)?;
    let alpha_end = alpha_start.checked_add(count).ok_or(FormatError::Truncated)?;
    let color_start = alpha_end
        .checked_add(COLOR_TAG_LEN)
        .ok_or(FormatError::Truncated)?;
    let color_end = count
        .checked_mul(2)
        .and_then(|n| color_start.checked_add(n))
        .ok_or(FormatError::Truncated)?;
    if color_end > data.len() {
        return Err(FormatError::Truncated);
    }

    Ok(RecordLayout {
        width: u32::from(width),
        height: u32::from(height),
        alpha: alpha_start..alpha_end,
        color: color_start..color_end,
    })
}

/// Decode the record at `offset`, returning the subimage and the offset of
/// the next record.
pub fn decode_record(data: &[u8], offset: usize) -> Result<(Bitmap, usize), SrfError> {
    decode_record_with(data, offset, None, &Unstoppable)
}

pub(crate) fn decode_record_with(
    data: &[u8],
    offset: usize,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(Bitmap, usize), SrfError> {
    let layout = record_layout(data, offset)?;
    if let Some(limits) = limits {
        limits.check_argb(layout.width, layout.height)?;
    }
    trace!(
        "srf record at {offset}: {}x{}, next at {}",
        layout.width,
        layout.height,
        layout.end()
    );

    let mut pixels = try_alloc_pixels(layout.width, layout.height)?;
    let width = layout.width as usize;
    if width != 0 {
        let alpha = &data[layout.alpha.clone()];
        let color = &data[layout.color.clone()];
        let rows = alpha.chunks_exact(width).zip(color.chunks_exact(width * 2));
        for (row_idx, (alpha_row, color_row)) in rows.enumerate() {
            if row_idx % 16 == 0 {
                stop.check()?;
            }
            pixels.extend(
                alpha_row
                    .iter()
                    .zip(color_row.chunks_exact(2))
                    .map(|(&a, c)| srf_to_argb(a, u16::from_le_bytes([c[0], c[1]]))),
            );
        }
    }

    Ok((
        Bitmap::from_raw(pixels, layout.width, layout.height),
        layout.end(),
    ))
}
