use alloc::vec::Vec;

use enough::Stop;
use log::debug;

use crate::error::{FormatError, SrfError};
use crate::info::SrfInfo;
use crate::limits::Limits;
use crate::pixel::SourceFormat;
use crate::slice::VehicleSpriteSet;

/// An owned ARGB32 pixel buffer, row-major, top-to-bottom, left-to-right.
///
/// Used for decoded subimages, the stacked composite, and every sprite frame.
/// Pixels are `alpha << 24 | red << 16 | green << 8 | blue`.
///
/// Dimensions are read-only so the buffer always holds `width * height`
/// pixels:
///
/// ```compile_fail
/// let mut bmp = zensrf::compose(&[]).unwrap();
/// bmp.width = 100;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// The ARGB32 value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w)
    }

    pub(crate) fn from_raw(pixels: Vec<u32>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Fully transparent bitmap; allocation failure is reported, not aborted.
    pub(crate) fn zeroed(width: u32, height: u32) -> Result<Self, SrfError> {
        let mut pixels = try_alloc_pixels(width, height)?;
        pixels.resize(width as usize * height as usize, 0);
        Ok(Self::from_raw(pixels, width, height))
    }

    /// Copy `src` into this bitmap with its top-left corner at `(0, y)`.
    ///
    /// Caller guarantees `src` fits.
    pub(crate) fn blit_left(&mut self, src: &Bitmap, y: u32) {
        let dst_w = self.width as usize;
        let src_w = src.width as usize;
        if src_w == 0 {
            return;
        }
        for (row, src_row) in src.pixels.chunks_exact(src_w).enumerate() {
            let start = (y as usize + row) * dst_w;
            self.pixels[start..start + src_w].copy_from_slice(src_row);
        }
    }

    /// Fail with `GeometryOverflow` unless the rectangle is non-empty and inside.
    pub(crate) fn check_rect(&self, x: u64, y: u64, width: u32, height: u32) -> Result<(), FormatError> {
        let fits = width != 0
            && height != 0
            && x + u64::from(width) <= u64::from(self.width)
            && y + u64::from(height) <= u64::from(self.height);
        if fits {
            Ok(())
        } else {
            Err(FormatError::GeometryOverflow {
                x,
                y,
                width,
                height,
                bitmap_width: self.width,
                bitmap_height: self.height,
            })
        }
    }

    /// Copy out a rectangle already validated by [`Bitmap::check_rect`].
    pub(crate) fn copy_rect(&self, x: u64, y: u64, width: u32, height: u32) -> Bitmap {
        let (x, y) = (x as usize, y as usize);
        let (w, h) = (width as usize, height as usize);
        let stride = self.width as usize;
        let mut pixels = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * stride + x;
            pixels.extend_from_slice(&self.pixels[start..start + w]);
        }
        Bitmap::from_raw(pixels, width, height)
    }

    /// Copy out the `width`x`height` rectangle at `(x, y)`.
    ///
    /// Returns [`FormatError::GeometryOverflow`] if the rectangle is empty or
    /// leaves the bitmap.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Bitmap, SrfError> {
        let (x, y) = (u64::from(x), u64::from(y));
        self.check_rect(x, y, width, height)?;
        Ok(self.copy_rect(x, y, width, height))
    }

    /// Convert to straight RGBA8 pixels.
    #[cfg(feature = "rgb")]
    pub fn to_rgba8(&self) -> Vec<rgb::RGBA8> {
        self.pixels
            .iter()
            .map(|&p| {
                let [r, g, b, a] = crate::pixel::argb_to_rgba(p);
                rgb::RGBA8::new(r, g, b, a)
            })
            .collect()
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of packed ARGB32 values.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, u32> {
        imgref::ImgRef::new(&self.pixels, self.width as usize, self.height as usize)
    }

    /// Convert to an [`imgref::ImgVec`] of RGBA8 pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(self.to_rgba8(), self.width as usize, self.height as usize)
    }
}

/// Reserve an empty pixel vector with room for `width * height` values.
pub(crate) fn try_alloc_pixels(width: u32, height: u32) -> Result<Vec<u32>, SrfError> {
    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(SrfError::OutOfMemory { bytes: usize::MAX })?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| SrfError::OutOfMemory {
            bytes: count.saturating_mul(4),
        })?;
    Ok(pixels)
}

/// Decode request builder.
///
/// ```no_run
/// use zensrf::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // SRF or PNG bytes
/// let limits = Limits { max_pixels: Some(16_000_000), ..Default::default() };
/// let sprites = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .verify_checksum(true)
///     .decode_sprites(Unstoppable)?;
/// assert_eq!(sprites.images_3d().len(), 36);
/// # Ok::<(), zensrf::SrfError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    format: Option<SourceFormat>,
    verify_checksum: bool,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            format: None,
            verify_checksum: false,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Force the source format instead of sniffing magic bytes.
    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Require the SRF trailer checksum (all bytes summing to zero mod 256).
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// The format this request will decode as. Unrecognized input is
    /// treated as SRF so it fails with `BadMagic`.
    pub fn format(&self) -> SourceFormat {
        self.format
            .or_else(|| SourceFormat::detect(self.data))
            .unwrap_or(SourceFormat::Srf)
    }

    /// Read SRF header and section sizes without decoding pixels.
    ///
    /// PNG atlases carry no section table and fail with [`SrfError::Raster`].
    pub fn probe(&self) -> Result<SrfInfo, SrfError> {
        match self.format() {
            SourceFormat::Srf => SrfInfo::from_bytes(self.data),
            SourceFormat::Png => Err(SrfError::Raster(
                "PNG atlases have no SRF sections to probe".into(),
            )),
        }
    }

    /// Decode to the stacked composite bitmap.
    pub fn decode_bitmap(&self, stop: impl Stop) -> Result<Bitmap, SrfError> {
        self.decode_bitmap_inner(&stop)
    }

    /// Decode and slice into the 3D and 2D sprite sequences.
    pub fn decode_sprites(&self, stop: impl Stop) -> Result<VehicleSpriteSet, SrfError> {
        let bitmap = self.decode_bitmap_inner(&stop)?;
        stop.check()?;
        VehicleSpriteSet::from_bitmap(&bitmap)
    }

    fn decode_bitmap_inner(&self, stop: &dyn Stop) -> Result<Bitmap, SrfError> {
        let bitmap = match self.format() {
            SourceFormat::Srf => {
                crate::srf::decode(self.data, self.limits, self.verify_checksum, stop)?
            }
            SourceFormat::Png => decode_raster(self.data, self.limits, stop)?,
        };
        debug!("composite bitmap {}x{}", bitmap.width, bitmap.height);
        Ok(bitmap)
    }
}

#[cfg(feature = "png")]
fn decode_raster(data: &[u8], limits: Option<&Limits>, stop: &dyn Stop) -> Result<Bitmap, SrfError> {
    stop.check()?;
    crate::png::decode(data, limits)
}

#[cfg(not(feature = "png"))]
fn decode_raster(_data: &[u8], _limits: Option<&Limits>, _stop: &dyn Stop) -> Result<Bitmap, SrfError> {
    Err(SrfError::Raster("PNG support requires the `png` feature".into()))
}
