use alloc::string::String;
use enough::StopReason;

/// Structural problems in an SRF stream or a sprite layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("missing \"GARMIN BITMAP 01\" magic")]
    BadMagic,

    #[error("unexpected end of input")]
    Truncated,

    #[error(
        "sprite cell {x},{y} {width}x{height} does not fit a {bitmap_width}x{bitmap_height} bitmap"
    )]
    GeometryOverflow {
        x: u64,
        y: u64,
        width: u32,
        height: u32,
        bitmap_width: u32,
        bitmap_height: u32,
    },

    #[error("checksum mismatch: byte sum is {sum:#04x}, expected 0x00")]
    ChecksumMismatch { sum: u8 },
}

/// Layouts that are recognized but deliberately not decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UnsupportedFeature {
    #[error("animated sprite layout (3D cell {size_3d}px, 2D cell {size_2d}px) is not supported")]
    AnimatedLayout { size_3d: u32, size_2d: u32 },
}

/// Errors from SRF/PNG decoding, compositing and slicing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SrfError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedFeature),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("raster decode failed: {0}")]
    Raster(String),

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for SrfError {
    fn from(r: StopReason) -> Self {
        SrfError::Cancelled(r)
    }
}

impl SrfError {
    /// The format error behind this failure, if any.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            SrfError::Format(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this failure is the unsupported animated layout.
    pub fn is_animated_layout(&self) -> bool {
        matches!(
            self,
            SrfError::Unsupported(UnsupportedFeature::AnimatedLayout { .. })
        )
    }
}
