use lzb::{compress_to_vec, decompress, decompress_to_vec, Config, DecodeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn roundtrip(cfg: &Config, data: &[u8]) {
    let compressed = compress_to_vec(cfg, data).unwrap();
    let decompressed = decompress_to_vec(cfg, &compressed).unwrap();
    assert_eq!(
        decompressed, data,
        "roundtrip failed for cfg {:?} on {} input bytes",
        cfg,
        data.len()
    );
}

fn sample_inputs() -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(0x12b_c0dec);
    let mut random = vec![0u8; 2048];
    rng.fill(&mut random[..]);
    let mut mixed = vec![0u8; 2000];
    rng.fill(&mut mixed[..800]);
    rng.fill(&mut mixed[950..]);
    vec![
        Vec::new(),
        b"A".to_vec(),
        b"ABABABAB".to_vec(),
        b"the quick brown fox jumps over the lazy dog. ".repeat(8),
        vec![0xAA; 300],
        (0..600u32).map(|i| (i % 37) as u8).collect(),
        random,
        mixed,
    ]
}

#[test]
fn roundtrip_over_the_config_grid() {
    let inputs = sample_inputs();
    for &bits in &[0, 4, 8, 12, 16] {
        for &zero_offset in &[false, true] {
            for &exor in &[false, true] {
                let mut cfg = Config::default();
                cfg.offset_bits(bits)
                    .zero_offset(zero_offset)
                    .exor_offset(exor);
                for data in &inputs {
                    roundtrip(&cfg, data);
                }
            }
        }
    }
}

#[test]
fn roundtrip_with_address_relative_offsets() {
    let inputs = sample_inputs();
    for &(bits, base) in &[
        (8, 0),
        (8, 0x80),
        (8, 0xFF),
        (16, 0),
        (16, 0x1234),
        (16, 0xFFFF),
    ] {
        let mut cfg = Config::default();
        cfg.offset_bits(bits).relative_base(base);
        for data in &inputs {
            roundtrip(&cfg, data);
        }
    }
}

#[test]
fn roundtrip_with_two_byte_lengths() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut random = vec![0u8; 3000];
    rng.fill(&mut random[..]);

    let mut cfg = Config::default();
    cfg.max_literal_len(300).max_match_len(300);
    roundtrip(&cfg, &vec![0x33; 800]);
    roundtrip(&cfg, &random);
    roundtrip(&cfg, b"ABABABAB");
}

#[test]
fn encoder_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut data = vec![0u8; 2048];
    rng.fill(&mut data[..]);
    let cfg = Config::default();
    assert_eq!(
        compress_to_vec(&cfg, &data).unwrap(),
        compress_to_vec(&cfg, &data).unwrap()
    );
}

#[test]
fn long_literal_runs_split_at_the_wire_limit() {
    // a 16-byte window never matches inside a period-37 sequence, so
    // the whole input is one logical literal run
    let mut cfg = Config::default();
    cfg.offset_bits(4);
    let data: Vec<u8> = (0..600u32).map(|i| (i % 37) as u8).collect();
    let out = compress_to_vec(&cfg, &data).unwrap();

    // 255-byte blocks with zero-length match headers between them,
    // then the closing zero-length match
    assert_eq!(out.len(), 1 + 255 + 2 + 255 + 2 + 90 + 1);
    assert_eq!(out[0], 0xFF);
    assert_eq!(out[256], 0x00);
    assert_eq!(out[257], 0xFF);
    assert_eq!(out[513], 0x00);
    assert_eq!(out[514], 90);
    assert_eq!(out[605], 0x00);
    assert_eq!(decompress_to_vec(&cfg, &out).unwrap(), data);
}

#[test]
fn rle_run_fits_three_bytes() {
    let mut cfg = Config::default();
    cfg.offset_bits(0);
    for k in 2..=256 {
        let data = vec![0x42u8; k];
        let out = compress_to_vec(&cfg, &data).unwrap();
        assert!(out.len() <= 3, "{} bytes of run took {} wire bytes", k, out.len());
        assert_eq!(decompress_to_vec(&cfg, &out).unwrap(), data);
    }
}

#[test]
fn incompressible_input_barely_expands() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut data = vec![0u8; 4096];
    rng.fill(&mut data[..]);
    let out = compress_to_vec(&Config::default(), &data).unwrap();
    // one header plus one boundary marker per full literal block, plus
    // slack for the final partial pair
    let overhead = (data.len() + 254) / 255 * 2 + 2;
    assert!(out.len() <= data.len() + overhead);
}

#[test]
fn zero_offset_streams_are_not_cross_compatible() {
    let mut padded = Config::default();
    padded.offset_bits(4).zero_offset(true);
    let mut plain = padded.clone();
    plain.zero_offset(false);

    // long literal run, so the stream contains padded zero-length
    // matches that the plain decoder will misread
    let data: Vec<u8> = (0..600u32).map(|i| (i % 37) as u8).collect();
    let stream = compress_to_vec(&padded, &data).unwrap();
    assert_eq!(decompress_to_vec(&padded, &stream).unwrap(), data);

    let cross = decompress_to_vec(&plain, &stream);
    assert!(!cross.map(|out| out == data).unwrap_or(false));
}

#[test]
fn every_truncation_errors_or_yields_a_prefix() {
    let inputs: Vec<Vec<u8>> = vec![
        b"ABABABAB".to_vec(),
        vec![0x55; 300],
        (0..200u32).map(|i| (i * 7 % 256) as u8).collect(),
    ];
    let mut cfgs = Vec::new();
    cfgs.push(Config::default());
    let mut cfg = Config::default();
    cfg.zero_offset(true).exor_offset(true);
    cfgs.push(cfg);
    let mut cfg = Config::default();
    cfg.offset_bits(16);
    cfgs.push(cfg);
    let mut cfg = Config::default();
    cfg.offset_bits(0);
    cfgs.push(cfg);

    for cfg in &cfgs {
        for data in &inputs {
            let full = compress_to_vec(cfg, data).unwrap();
            for cut in 0..full.len() {
                let mut out = Vec::new();
                match decompress(cfg, &full[..cut], &mut out) {
                    Ok(n) => assert_eq!(n as usize, out.len()),
                    Err(
                        DecodeError::TruncatedLiteral { .. }
                        | DecodeError::TruncatedLength { .. }
                        | DecodeError::TruncatedOffset { .. },
                    ) => {}
                    Err(other) => panic!("unexpected decode error: {}", other),
                }
                assert!(
                    data.starts_with(&out),
                    "truncating at {} produced bytes that are not a prefix",
                    cut
                );
            }
        }
    }
}
