//! Cutting a composite sheet into the 3D and 2D frame sequences.

use log::debug;

use crate::decode::Bitmap;
use crate::error::{SrfError, UnsupportedFeature};
use crate::geometry::{FRAME_COUNT, SpriteGeometry, infer};

/// The two 36-frame sequences of one vehicle.
///
/// Built once per loaded file and never modified; replace the whole set to
/// show a different vehicle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleSpriteSet {
    images_3d: [Bitmap; FRAME_COUNT],
    images_2d: [Bitmap; FRAME_COUNT],
    geometry: SpriteGeometry,
}

impl VehicleSpriteSet {
    /// Infer the geometry of `bitmap` and slice it.
    pub fn from_bitmap(bitmap: &Bitmap) -> Result<Self, SrfError> {
        let geometry = infer(bitmap.width(), bitmap.height())?;
        slice(bitmap, geometry)
    }

    /// Rotation frames, 0° to 350°, each `size_3d` square.
    pub fn images_3d(&self) -> &[Bitmap; FRAME_COUNT] {
        &self.images_3d
    }

    /// Tilt frames, each `size_2d` square.
    pub fn images_2d(&self) -> &[Bitmap; FRAME_COUNT] {
        &self.images_2d
    }

    pub fn geometry(&self) -> SpriteGeometry {
        self.geometry
    }
}

/// Cut `bitmap` into 36 3D frames along the top band and 36 2D frames along
/// the band below it.
///
/// Every cell is checked before anything is copied: an empty cell or one
/// reaching outside the bitmap fails with
/// [`FormatError::GeometryOverflow`](crate::FormatError::GeometryOverflow).
pub fn slice(bitmap: &Bitmap, geometry: SpriteGeometry) -> Result<VehicleSpriteSet, SrfError> {
    if geometry.animated {
        return Err(UnsupportedFeature::AnimatedLayout {
            size_3d: geometry.size_3d,
            size_2d: geometry.size_2d,
        }
        .into());
    }
    let SpriteGeometry {
        size_3d, size_2d, ..
    } = geometry;
    let band_3d = |i: usize| (i as u64 * u64::from(size_3d), 0u64, size_3d);
    let band_2d = |i: usize| (i as u64 * u64::from(size_2d), u64::from(size_3d), size_2d);

    for i in 0..FRAME_COUNT {
        for (x, y, size) in [band_3d(i), band_2d(i)] {
            bitmap.check_rect(x, y, size, size)?;
        }
    }

    let cut = |(x, y, size): (u64, u64, u32)| bitmap.copy_rect(x, y, size, size);
    let images_3d = core::array::from_fn(|i| cut(band_3d(i)));
    let images_2d = core::array::from_fn(|i| cut(band_2d(i)));
    debug!(
        "sliced {}x{} sheet into {FRAME_COUNT} frames of {size_3d}px and {FRAME_COUNT} of {size_2d}px",
        bitmap.width(),
        bitmap.height()
    );

    Ok(VehicleSpriteSet {
        images_3d,
        images_2d,
        geometry,
    })
}
