#![no_main]
use libfuzzer_sys::fuzz_target;
use lzb::{decompress, Config};

// Arbitrary bytes must never panic the decoder, no matter which knobs
// are set. Truncation errors are fine; the sink is capped by the fact
// that a block can only ever produce 32895 bytes per length field.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let mut cfg = Config::default();
    cfg.offset_bits(u32::from(data[0]) % 17)
        .zero_offset(data[1] & 1 != 0)
        .exor_offset(data[1] & 2 != 0);
    let mut out = Vec::new();
    let _ = decompress(&cfg, &data[2..], &mut out);
});
