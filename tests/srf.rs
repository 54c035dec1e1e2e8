//! End-to-end SRF decoding against synthetic files laid out the way the
//! Garmin vehicle tools write them.

use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{Stop, StopReason, Unstoppable};
use zensrf::*;

/// One pixel section: raw alpha bytes and RGB565 words, row-major.
struct Section {
    width: u16,
    height: u16,
    alpha: Vec<u8>,
    color: Vec<u16>,
}

impl Section {
    fn uniform(width: u16, height: u16, alpha: u8, color: u16) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            alpha: vec![alpha; n],
            color: vec![color; n],
        }
    }

    fn with(width: u16, height: u16, f: impl Fn(usize, usize) -> (u8, u16)) -> Self {
        let mut alpha = Vec::new();
        let mut color = Vec::new();
        for y in 0..height as usize {
            for x in 0..width as usize {
                let (a, c) = f(x, y);
                alpha.push(a);
                color.push(c);
            }
        }
        Self {
            width,
            height,
            alpha,
            color,
        }
    }
}

/// Serialized file plus the offset where the last section ends.
struct SrfFile {
    bytes: Vec<u8>,
    sections_end: usize,
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_pstring(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn build_srf(sections: &[Section]) -> SrfFile {
    build_srf_declaring(sections, sections.len() as u32)
}

fn build_srf_declaring(sections: &[Section], count: u32) -> SrfFile {
    let mut out = Vec::new();
    out.extend_from_slice(b"GARMIN BITMAP 01");
    put_u32(&mut out, 4);
    put_u32(&mut out, 4);
    put_u32(&mut out, count);
    put_u32(&mut out, 5);
    put_pstring(&mut out, "578");
    put_u32(&mut out, 6);
    put_pstring(&mut out, "1.00");
    put_u32(&mut out, 7);
    put_pstring(&mut out, "006-D0578-XX");

    for s in sections {
        put_u32(&mut out, 0);
        put_u32(&mut out, 16);
        put_u32(&mut out, 0);
        put_u16(&mut out, s.height);
        put_u16(&mut out, s.width);
        put_u16(&mut out, 2064);
        put_u16(&mut out, s.width * 2);
        put_u32(&mut out, 0);
        put_u32(&mut out, 11);
        put_u32(&mut out, s.alpha.len() as u32);
        out.extend_from_slice(&s.alpha);
        put_u32(&mut out, 1);
        put_u32(&mut out, s.color.len() as u32 * 2);
        for c in &s.color {
            put_u16(&mut out, *c);
        }
    }
    let sections_end = out.len();

    // 0xFF padding to one byte short of a 256 boundary, then the check byte
    let pad = 255 - (out.len() % 256);
    out.extend(std::iter::repeat_n(0xFF, pad));
    let sum = out.iter().fold(0u8, |s, &b| s.wrapping_add(b));
    out.push(sum.wrapping_neg());

    SrfFile {
        bytes: out,
        sections_end,
    }
}

#[test]
fn two_uniform_sections_stack() {
    let file = build_srf(&[
        Section::uniform(10, 10, 0, 0xF800),
        Section::uniform(10, 10, 0, 0x001F),
    ]);
    let bmp = decode_srf(&file.bytes, Unstoppable).unwrap();
    assert_eq!(bmp.width(), 10);
    assert_eq!(bmp.height(), 20);
    assert_eq!(bmp.pixel(0, 0), Some(0xFFF8_0000));
    assert_eq!(bmp.pixel(0, 10), Some(0xFF00_00F8));
    assert!(bmp.pixels()[..100].iter().all(|&p| p == 0xFFF8_0000));
    assert!(bmp.pixels()[100..].iter().all(|&p| p == 0xFF00_00F8));
}

#[test]
fn narrower_sections_are_padded_transparent() {
    let file = build_srf(&[
        Section::uniform(4, 1, 0, 0xFFFF),
        Section::uniform(2, 2, 1, 0x07E0),
        Section::uniform(3, 1, 127, 0x001F),
    ]);
    let bmp = decode_srf(&file.bytes, Unstoppable).unwrap();
    assert_eq!((bmp.width(), bmp.height()), (4, 4));
    #[rustfmt::skip]
    let expected: [u32; 16] = [
        0xFFF8_F8F8, 0xFFF8_F8F8, 0xFFF8_F8F8, 0xFFF8_F8F8,
        0xFD00_F800, 0xFD00_F800, 0,           0,
        0xFD00_F800, 0xFD00_F800, 0,           0,
        0x0000_00F8, 0x0000_00F8, 0x0000_00F8, 0,
    ];
    assert_eq!(bmp.pixels(), &expected[..]);
}

#[test]
fn alpha_boundary_around_127() {
    let file = build_srf(&[Section::with(5, 1, |x, _| {
        ([0u8, 1, 126, 127, 128][x], 0)
    })]);
    let bmp = decode_srf(&file.bytes, Unstoppable).unwrap();
    let alphas: Vec<u32> = bmp.pixels().iter().map(|p| p >> 24).collect();
    assert_eq!(alphas, [255u32, 253, 3, 0, 0]);
}

#[test]
fn declared_count_is_what_gets_decoded() {
    let sections = [
        Section::uniform(3, 2, 0, 1),
        Section::uniform(5, 4, 0, 2),
        Section::uniform(1, 7, 0, 3),
    ];
    let file = build_srf(&sections);
    let info = SrfInfo::from_bytes(&file.bytes).unwrap();
    assert_eq!(info.header.subimage_count, 3);
    assert_eq!(info.sections, [(3, 2), (5, 4), (1, 7)]);
    assert_eq!(info.header.version, "1.00");
    assert_eq!(info.header.product, "006-D0578-XX");

    let bmp = decode_srf(&file.bytes, Unstoppable).unwrap();
    assert_eq!(bmp.width(), info.width());
    assert_eq!(u64::from(bmp.height()), info.height());
    assert_eq!(bmp.height(), 2 + 4 + 7);
}

#[test]
fn declaring_more_sections_than_present_is_truncated() {
    let file = build_srf_declaring(&[Section::uniform(2, 2, 0, 0)], 2);
    let err = decode_srf(&file.bytes, Unstoppable).unwrap_err();
    assert_eq!(err.format_error(), Some(&FormatError::Truncated));
    let err = SrfInfo::from_bytes(&file.bytes).unwrap_err();
    assert_eq!(err.format_error(), Some(&FormatError::Truncated));
}

#[test]
fn every_truncated_copy_fails() {
    let file = build_srf(&[
        Section::uniform(10, 10, 0, 0xF800),
        Section::uniform(10, 10, 0, 0x001F),
    ]);
    for len in 0..file.sections_end {
        let err = decode_srf(&file.bytes[..len], Unstoppable).unwrap_err();
        assert_eq!(
            err.format_error(),
            Some(&FormatError::Truncated),
            "prefix of {len} bytes"
        );
    }
    // trailer is optional
    assert!(decode_srf(&file.bytes[..file.sections_end], Unstoppable).is_ok());
}

#[test]
fn bad_magic() {
    let mut file = build_srf(&[Section::uniform(1, 1, 0, 0)]);
    file.bytes[15] = b'2';
    let err = decode_srf(&file.bytes, Unstoppable).unwrap_err();
    assert_eq!(err.format_error(), Some(&FormatError::BadMagic));
}

#[test]
fn checksum_is_verified_on_request() {
    let file = build_srf(&[Section::uniform(2, 2, 0, 0x1234)]);
    assert_eq!(file.bytes.len() % 256, 0);
    assert_eq!(srf::checksum(&file.bytes), 0);
    DecodeRequest::new(&file.bytes)
        .verify_checksum(true)
        .decode_bitmap(Unstoppable)
        .unwrap();

    let mut corrupt = file.bytes.clone();
    corrupt[file.sections_end - 1] ^= 0x01;
    let err = DecodeRequest::new(&corrupt)
        .verify_checksum(true)
        .decode_bitmap(Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err.format_error(),
        Some(FormatError::ChecksumMismatch { .. })
    ));
    // tolerated unless verification is on
    assert!(decode_srf(&corrupt, Unstoppable).is_ok());
}

#[test]
fn limits_reject_large_sections() {
    let file = build_srf(&[Section::uniform(20, 20, 0, 0)]);
    let limits = Limits {
        max_pixels: Some(399),
        ..Default::default()
    };
    let err = DecodeRequest::new(&file.bytes)
        .with_limits(&limits)
        .decode_bitmap(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, SrfError::LimitExceeded(_)));
}

/// Frame index `i` as RGB565: red holds `i % 32`, blue holds `i / 32`.
fn frame_color(i: usize) -> u16 {
    (((i % 32) as u16) << 11) | (i / 32) as u16
}

fn frame_argb(alpha: u32, i: usize) -> u32 {
    (alpha << 24) | (((i % 32) as u32) << 19) | (((i / 32) as u32) << 3)
}

/// 360 wide gives 10px rotation cells; 10 more rows below give 10px tilt
/// cells. The tilt band is drawn with raw alpha 1.
fn vehicle_file() -> SrfFile {
    build_srf(&[
        Section::with(360, 10, |x, _| (0, frame_color(x / 10))),
        Section::with(360, 10, |x, _| (1, frame_color(x / 10))),
    ])
}

#[test]
fn srf_to_sprite_set() {
    let file = vehicle_file();
    let set = load_vehicle(&file.bytes, Unstoppable).unwrap();
    assert_eq!(
        set.geometry(),
        SpriteGeometry {
            size_3d: 10,
            size_2d: 10,
            animated: false
        }
    );
    for (i, frame) in set.images_3d().iter().enumerate() {
        assert_eq!((frame.width(), frame.height()), (10, 10));
        let expected = frame_argb(0xFF, i);
        assert!(frame.pixels().iter().all(|&p| p == expected), "3D frame {i}");
    }
    for (i, frame) in set.images_2d().iter().enumerate() {
        let expected = frame_argb(0xFD, i);
        assert!(frame.pixels().iter().all(|&p| p == expected), "2D frame {i}");
    }
    assert_ne!(set.images_3d()[0], set.images_3d()[32]);
}

#[test]
fn animated_sheet_is_unsupported() {
    // 360 wide, 140 tall: 10px cells, 140 >= 2 * 10 + 120
    let file = build_srf(&[Section::uniform(360, 140, 0, 0)]);
    let err = load_vehicle(&file.bytes, Unstoppable).unwrap_err();
    assert!(err.is_animated_layout());
}

#[test]
fn undersized_sheet_overflows() {
    let file = build_srf(&[Section::uniform(359, 20, 0, 0)]);
    let err = load_vehicle(&file.bytes, Unstoppable).unwrap_err();
    assert!(matches!(
        err.format_error(),
        Some(FormatError::GeometryOverflow { .. })
    ));
}

#[test]
fn zero_sections_cannot_be_sliced() {
    let file = build_srf(&[]);
    let bmp = decode_srf(&file.bytes, Unstoppable).unwrap();
    assert_eq!((bmp.width(), bmp.height()), (0, 0));
    let err = load_vehicle(&file.bytes, Unstoppable).unwrap_err();
    assert!(matches!(
        err.format_error(),
        Some(FormatError::GeometryOverflow { .. })
    ));
}

#[test]
fn record_walk_matches_public_helpers() {
    let file = vehicle_file();
    let first = srf::locate_first_record(&file.bytes).unwrap();
    assert_eq!(first, 71);
    let (a, next) = srf::decode_record(&file.bytes, first).unwrap();
    assert_eq!(next, first + 40 + 360 * 10 * 3);
    let (b, end) = srf::decode_record(&file.bytes, next).unwrap();
    assert_eq!(end, file.sections_end);
    assert_eq!(compose(&[a, b]).unwrap(), decode_srf(&file.bytes, Unstoppable).unwrap());
}

/// Counts checks and cancels from the `fire_at`-th one on.
struct CancelAfter {
    fire_at: usize,
    checks: AtomicUsize,
}

impl CancelAfter {
    fn new(fire_at: usize) -> Self {
        Self {
            fire_at,
            checks: AtomicUsize::new(0),
        }
    }

    fn checks(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

impl Stop for CancelAfter {
    fn check(&self) -> Result<(), StopReason> {
        let n = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if n >= self.fire_at {
            Err(StopReason::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[test]
fn cancelled_before_decoding() {
    let file = vehicle_file();
    let stop = CancelAfter::new(1);
    let err = decode_srf(&file.bytes, &stop).unwrap_err();
    assert!(matches!(err, SrfError::Cancelled(StopReason::Cancelled)));
    assert_eq!(stop.checks(), 1);

    let err = load_vehicle(&file.bytes, &CancelAfter::new(1)).unwrap_err();
    assert!(matches!(err, SrfError::Cancelled(_)));
    assert!(err.format_error().is_none());
}

#[test]
fn cancelled_between_row_batches() {
    // 20 rows per section: one check per section plus rows 0 and 16
    let file = build_srf(&[
        Section::uniform(4, 20, 0, 0x1234),
        Section::uniform(4, 20, 0, 0x4321),
    ]);
    let stop = CancelAfter::new(usize::MAX);
    decode_srf(&file.bytes, &stop).unwrap();
    assert_eq!(stop.checks(), 6);

    // third check is row 16 of the first section
    let stop = CancelAfter::new(3);
    let err = decode_srf(&file.bytes, &stop).unwrap_err();
    assert!(matches!(err, SrfError::Cancelled(_)));
    assert_eq!(stop.checks(), 3);
}

#[test]
fn cancelled_before_slicing() {
    let file = vehicle_file();
    // 10-row sections: two checks each, then one before slicing
    let counting = CancelAfter::new(usize::MAX);
    load_vehicle(&file.bytes, &counting).unwrap();
    assert_eq!(counting.checks(), 5);

    let err = load_vehicle(&file.bytes, &CancelAfter::new(5)).unwrap_err();
    assert!(matches!(err, SrfError::Cancelled(_)));
    assert!(decode_srf(&file.bytes, &CancelAfter::new(5)).is_ok());
}
