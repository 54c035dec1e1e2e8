use alloc::format;

use crate::error::SrfError;

/// Caps on the ARGB32 buffers a decode may allocate.
///
/// Checked for every SRF section, the stacked composite, and PNG atlases
/// before their pixels are allocated. `None` means unlimited.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for one ARGB32 buffer (4 per pixel).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Fail with `LimitExceeded` if a `width`x`height` ARGB32 buffer breaks a cap.
    pub(crate) fn check_argb(&self, width: u32, height: u32) -> Result<(), SrfError> {
        let pixels = u64::from(width) * u64::from(height);
        let measures = [
            ("width", u64::from(width), self.max_width),
            ("height", u64::from(height), self.max_height),
            ("pixel count", pixels, self.max_pixels),
            ("buffer bytes", pixels.saturating_mul(4), self.max_memory_bytes),
        ];
        for (what, value, max) in measures {
            if let Some(max) = max.filter(|&max| value > max) {
                return Err(SrfError::LimitExceeded(format!(
                    "{what} {value} exceeds limit {max} for {width}x{height} bitmap"
                )));
            }
        }
        Ok(())
    }
}
