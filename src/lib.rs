//! # zensrf
//!
//! Garmin SRF vehicle bitmap decoder and sprite slicer.
//!
//! An SRF file holds a vehicle drawn as a strip of 36 rotation frames (the
//! "3D" view, 10° apart) above a strip of 36 tilt frames (the "2D" view).
//! This crate turns SRF bytes, or an equivalent flat PNG atlas, into those
//! two frame sequences as ARGB32 bitmaps.
//!
//! ## Pipeline
//!
//! 1. [`srf::parse_header`] checks the `GARMIN BITMAP 01` magic and walks the
//!    header block chain to the first pixel section.
//! 2. [`srf::decode_record`] expands each section's 7-bit inverted alpha plane
//!    and RGB565 colour plane into ARGB32.
//! 3. [`compose`] stacks the sections into one composite bitmap. PNG input
//!    starts here.
//! 4. [`infer`] derives the frame cell sizes from the composite dimensions.
//! 5. [`slice`] cuts 36 + 36 frames into a [`VehicleSpriteSet`].
//!
//! ## Non-Goals
//!
//! - Animated SRF sheets (detected, rejected with
//!   [`UnsupportedFeature::AnimatedLayout`])
//! - Encoding SRF or PNG
//! - Rendering
//!
//! ## Usage
//!
//! ```no_run
//! use zensrf::{DecodeRequest, FrameTicker, Unstoppable};
//! use std::time::Duration;
//!
//! let data: &[u8] = &[]; // your .srf bytes
//!
//! // Probe without decoding
//! let info = zensrf::SrfInfo::from_bytes(data)?;
//! println!("{} sections, {}x{}", info.sections.len(), info.width(), info.height());
//!
//! let sprites = DecodeRequest::new(data).decode_sprites(Unstoppable)?;
//! let mut ticker = FrameTicker::default();
//! let frame = &sprites.images_3d()[ticker.advance(Duration::from_millis(16))];
//! # let _ = frame;
//! # Ok::<(), zensrf::SrfError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod compose;
mod decode;
mod error;
mod geometry;
mod info;
mod limits;
mod pixel;
mod playback;
mod slice;

pub mod srf;

#[cfg(feature = "png")]
mod png;

// Re-exports
pub use compose::compose;
pub use decode::{Bitmap, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::{FormatError, SrfError, UnsupportedFeature};
pub use geometry::{DEGREES_PER_FRAME, FRAME_COUNT, SpriteGeometry, infer};
pub use info::SrfInfo;
pub use limits::Limits;
pub use pixel::{SourceFormat, argb_to_rgba};
pub use playback::{DEFAULT_FRAME_INTERVAL, FrameTicker};
#[cfg(feature = "std")]
pub use playback::SpriteSlot;
pub use slice::{VehicleSpriteSet, slice};

/// Decode SRF bytes into the stacked composite bitmap.
pub fn decode_srf(data: &[u8], stop: impl Stop) -> Result<Bitmap, SrfError> {
    DecodeRequest::new(data)
        .with_format(SourceFormat::Srf)
        .decode_bitmap(stop)
}

/// Decode a flat PNG sprite atlas into a bitmap.
#[cfg(feature = "png")]
pub fn decode_png(data: &[u8], stop: impl Stop) -> Result<Bitmap, SrfError> {
    DecodeRequest::new(data)
        .with_format(SourceFormat::Png)
        .decode_bitmap(stop)
}

/// Decode SRF or PNG bytes (sniffed by magic) into a vehicle sprite set.
pub fn load_vehicle(data: &[u8], stop: impl Stop) -> Result<VehicleSpriteSet, SrfError> {
    DecodeRequest::new(data).decode_sprites(stop)
}

/// Read a vehicle file. `.srf` files go through the SRF parser, anything
/// else is decoded as a raster image.
#[cfg(feature = "std")]
pub fn load_vehicle_file(
    path: impl AsRef<std::path::Path>,
    stop: impl Stop,
) -> Result<VehicleSpriteSet, SrfError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    log::debug!("loading {} ({} bytes)", path.display(), data.len());
    DecodeRequest::new(&data)
        .with_format(SourceFormat::from_extension(path))
        .decode_sprites(stop)
}
