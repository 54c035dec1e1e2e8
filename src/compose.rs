//! Vertical stacking of decoded subimages into one composite bitmap.

use log::debug;

use crate::decode::Bitmap;
use crate::error::SrfError;
use crate::limits::Limits;

/// Stack `records` top to bottom in order, left-justified.
///
/// The composite is as wide as the widest record and as tall as all records
/// together. Columns to the right of a narrower record stay transparent.
pub fn compose(records: &[Bitmap]) -> Result<Bitmap, SrfError> {
    compose_with(records, None)
}

pub(crate) fn compose_with(records: &[Bitmap], limits: Option<&Limits>) -> Result<Bitmap, SrfError> {
    let width = records.iter().map(|r| r.width()).max().unwrap_or(0);
    let height = records
        .iter()
        .try_fold(0u32, |sum, r| sum.checked_add(r.height()))
        .ok_or_else(|| SrfError::LimitExceeded("composite height overflows u32".into()))?;
    if let Some(limits) = limits {
        limits.check_argb(width, height)?;
    }

    let mut composite = Bitmap::zeroed(width, height)?;
    let mut y = 0;
    for record in records {
        composite.blit_left(record, y);
        y += record.height();
    }
    debug!(
        "composed {} subimages into {width}x{height}",
        records.len()
    );
    Ok(composite)
}
