#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Full pipeline with sniffed format: must never panic
    let _ = zensrf::load_vehicle(data, enough::Unstoppable);

    // SRF stages explicitly: must never panic
    let _ = zensrf::SrfInfo::from_bytes(data);
    if let Ok(first) = zensrf::srf::locate_first_record(data) {
        let _ = zensrf::srf::decode_record(data, first);
    }
    if let Ok(bitmap) = zensrf::decode_srf(data, enough::Unstoppable) {
        let geometry = zensrf::SpriteGeometry::measure(bitmap.width(), bitmap.height());
        let _ = zensrf::slice(&bitmap, geometry);
    }
});
