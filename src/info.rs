use alloc::vec::Vec;

use crate::error::SrfError;
use crate::srf::{SrfHeader, parse_header, record_layout};

/// SRF metadata read without decoding any pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrfInfo {
    pub header: SrfHeader,
    /// `(width, height)` of each pixel section, in file order.
    pub sections: Vec<(u32, u32)>,
}

impl SrfInfo {
    /// Probe SRF bytes: header plus every declared section's dimensions.
    ///
    /// Fails like a full decode would if a section is missing or short.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SrfError> {
        let header = parse_header(data)?;
        let mut sections = Vec::new();
        let mut offset = header.first_record;
        for _ in 0..header.subimage_count {
            let layout = record_layout(data, offset)?;
            sections.push((layout.width, layout.height));
            offset = layout.end();
        }
        Ok(Self { header, sections })
    }

    /// Composite width: the widest section.
    pub fn width(&self) -> u32 {
        self.sections.iter().map(|&(w, _)| w).max().unwrap_or(0)
    }

    /// Composite height: all sections stacked.
    pub fn height(&self) -> u64 {
        self.sections.iter().map(|&(_, h)| u64::from(h)).sum()
    }
}
