#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn srf(sections: &[(u16, u16)]) -> Vec<u8> {
    let mut out = b"GARMIN BITMAP 01".to_vec();
    for v in [4u32, 4, sections.len() as u32, 5] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for (tag, s) in [(6u32, "578"), (7, "1.00"), (0, "006-D0578-XX")] {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
        if tag != 0 {
            out.extend_from_slice(&tag.to_le_bytes());
        }
    }
    for &(w, h) in sections {
        let n = w as usize * h as usize;
        for v in [0u32, 16, 0] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        for v in [h, w, 2064, w * 2, 0, 0] {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.extend_from_slice(&11u32.to_le_bytes());
        out.extend_from_slice(&(n as u32).to_le_bytes());
        out.extend((0..n).map(|i| (i % 129) as u8));
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(n as u32 * 2).to_le_bytes());
        out.extend((0..n).flat_map(|i| ((i * 0x0841) as u16).to_le_bytes()));
    }
    let pad = 255 - out.len() % 256;
    out.extend(std::iter::repeat_n(0xFF, pad));
    let sum = out.iter().fold(0u8, |s, &b| s.wrapping_add(b));
    out.push(sum.wrapping_neg());
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Smallest sheet that slices: 360x20 as two 10-row sections
    fs::write(format!("{dir}/vehicle_360x20.srf"), srf(&[(360, 10), (360, 10)])).unwrap();

    // Mixed widths and a zero-width section
    fs::write(format!("{dir}/mixed.srf"), srf(&[(3, 2), (0, 4), (5, 1)])).unwrap();

    // Animated layout (rejected after decode)
    fs::write(format!("{dir}/animated.srf"), srf(&[(360, 140)])).unwrap();

    // Truncated/malformed seeds for edge coverage
    let full = srf(&[(4, 4)]);
    fs::write(format!("{dir}/truncated_header.bin"), &full[..40]).unwrap();
    fs::write(format!("{dir}/truncated_planes.bin"), &full[..100]).unwrap();
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"GARMIN BITMAP 01").unwrap();
    fs::write(format!("{dir}/png_sig.bin"), b"\x89PNG\r\n\x1a\n").unwrap();

    println!("Generated seed corpus in {dir}/");
}
