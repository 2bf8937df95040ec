#![no_main]
use libfuzzer_sys::fuzz_target;
use lzb::{compress_to_vec, decompress_to_vec, Config, MAX_INPUT};

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT {
        return;
    }
    let cfg = Config::default();
    let compressed = compress_to_vec(&cfg, data).expect("could not compress input data");
    let decompressed = decompress_to_vec(&cfg, &compressed).expect("could not decompress own output");
    assert_eq!(decompressed, data);
});
