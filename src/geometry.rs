//! Sprite cell sizes inferred from composite dimensions alone.
//!
//! A vehicle sheet is one row of 36 square 3D rotation frames (10° apart)
//! above one row of 36 2D tilt frames. Animated sheets carry two rows of
//! each and are detected but not decoded.

use log::debug;

use crate::error::{SrfError, UnsupportedFeature};

/// Frames per sequence: 360° in 10° steps.
pub const FRAME_COUNT: usize = 36;

/// Degrees of rotation between consecutive frames.
pub const DEGREES_PER_FRAME: u32 = 10;

/// Width in pixels of a sheet whose cells are 10px: 36 frames × 10°.
const WIDTH_PER_CELL_STEP: u32 = FRAME_COUNT as u32 * DEGREES_PER_FRAME;

/// Minimum height of the two elevation bands in an animated sheet.
const ANIMATED_ELEVATION_FLOOR: u32 = 120;

/// Cell sizes of a vehicle sheet. Both sizes are multiples of 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteGeometry {
    /// Side of each square 3D rotation frame.
    pub size_3d: u32,
    /// Side of each 2D tilt frame.
    pub size_2d: u32,
    /// The sheet uses the animated (two-band) layout.
    pub animated: bool,
}

impl SpriteGeometry {
    /// Compute the geometry without rejecting animated sheets.
    pub fn measure(width: u32, height: u32) -> Self {
        let size_3d = (width / WIDTH_PER_CELL_STEP) * 10;
        let bands_3d = size_3d.saturating_mul(2);
        let animated = u64::from(height) >= u64::from(bands_3d) + u64::from(ANIMATED_ELEVATION_FLOOR);
        let size_2d = if animated {
            ((height - bands_3d) / 20) * 10
        } else {
            (height.saturating_sub(size_3d) / 10) * 10
        };
        Self {
            size_3d,
            size_2d,
            animated,
        }
    }
}

/// Infer cell sizes for a `width`x`height` sheet.
///
/// Animated sheets fail with [`UnsupportedFeature::AnimatedLayout`]. Zero
/// cell sizes are not rejected here; slicing reports them.
pub fn infer(width: u32, height: u32) -> Result<SpriteGeometry, SrfError> {
    let geometry = SpriteGeometry::measure(width, height);
    debug!("{width}x{height} sheet: {geometry:?}");
    if geometry.animated {
        return Err(UnsupportedFeature::AnimatedLayout {
            size_3d: geometry.size_3d,
            size_2d: geometry.size_2d,
        }
        .into());
    }
    Ok(geometry)
}
