//! Flat PNG sprite atlases.
//!
//! A PNG sheet is already a composite, so it goes straight to geometry
//! inference without the SRF section parser.

use alloc::string::ToString;

use crate::decode::{Bitmap, try_alloc_pixels};
use crate::error::SrfError;
use crate::limits::Limits;
use crate::pixel::rgba_to_argb;

/// Decode a PNG (or other raster `image` can read) into an ARGB32 bitmap.
pub(crate) fn decode(data: &[u8], limits: Option<&Limits>) -> Result<Bitmap, SrfError> {
    let img = image::load_from_memory(data).map_err(|e| SrfError::Raster(e.to_string()))?;
    let (width, height) = (img.width(), img.height());
    if let Some(limits) = limits {
        limits.check_argb(width, height)?;
    }

    let rgba = img.into_rgba8();
    let mut pixels = try_alloc_pixels(width, height)?;
    pixels.extend(rgba.pixels().map(|p| rgba_to_argb(p.0)));
    Ok(Bitmap::from_raw(pixels, width, height))
}
