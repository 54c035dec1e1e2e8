/// SRF file identifier, the first 16 bytes of every file.
pub(crate) const SRF_MAGIC: &[u8; 16] = b"GARMIN BITMAP 01";

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Source container detected from magic bytes or file extension.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Garmin SRF vehicle bitmap.
    Srf,
    /// Flat raster sprite atlas (PNG).
    Png,
}

impl SourceFormat {
    /// Detect the container from its leading bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(SRF_MAGIC) {
            Some(Self::Srf)
        } else if data.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// `.srf` (any case) is SRF; every other path is treated as a raster.
    #[cfg(feature = "std")]
    pub fn from_extension(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("srf") => Self::Srf,
            _ => Self::Png,
        }
    }
}

/// Convert a raw SRF alpha byte (7-bit, inverted) to 8-bit opacity.
#[inline]
pub(crate) fn decode_alpha(raw: u8) -> u32 {
    let a = u32::from(raw) << 1;
    if a >= 254 { 0 } else { 255 - a }
}

/// Expand an RGB565 word into the RGB bytes of an ARGB32 value.
///
/// Each channel is shifted to the top of its byte with zero low bits. The
/// green mask keeps only the upper five of its six bits.
#[inline]
pub(crate) fn decode_color(c: u16) -> u32 {
    let c = u32::from(c);
    let r = (c & 0xF800) << 8;
    let g = (c & 0x07C0) << 5;
    let b = (c & 0x001F) << 3;
    r | g | b
}

/// Pack one SRF pixel (raw alpha byte + RGB565 word) as ARGB32.
#[inline]
pub(crate) fn srf_to_argb(alpha: u8, color: u16) -> u32 {
    (decode_alpha(alpha) << 24) | decode_color(color)
}

/// Pack straight RGBA8 channels as ARGB32.
#[cfg_attr(not(feature = "png"), allow(dead_code))]
#[inline]
pub(crate) fn rgba_to_argb([r, g, b, a]: [u8; 4]) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

/// Split an ARGB32 value into RGBA8 channels.
#[inline]
pub fn argb_to_rgba(argb: u32) -> [u8; 4] {
    let [a, r, g, b] = argb.to_be_bytes();
    [r, g, b, a]
}
