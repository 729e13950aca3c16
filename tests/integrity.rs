//! Data-integrity regressions: shapes and sizes that broke earlier
//! iterations of the codecs, plus content-class sweeps.

use polypress::transform::bwt::{bwt_decode, bwt_encode, mtf_decode, mtf_encode};
use polypress::{compress, decompress};

const PANGRAM: &[u8] = b"The quick brown fox jumps over the lazy dog. ";

fn periodic(len: usize) -> Vec<u8> {
    (0..len).map(|i| PANGRAM[i % PANGRAM.len()]).collect()
}

fn roundtrip(data: &[u8]) {
    let frame = compress(data);
    let restored = decompress(&frame);
    assert_eq!(restored.len(), data.len(), "length drift at {}", data.len());
    assert_eq!(restored, data, "content drift at {}", data.len());
}

#[test]
fn test_periodic_text_sizes() {
    for size in [100usize, 500, 1000, 5000, 10_000, 50_000] {
        roundtrip(&periodic(size));
    }
}

#[test]
fn test_all_byte_values_preserved() {
    let mut data = Vec::new();
    for _ in 0..11 {
        data.extend(0..=255u8);
    }
    let frame = compress(&data);
    let restored = decompress(&frame);

    let mut found = [false; 256];
    for &b in &restored {
        found[b as usize] = true;
    }
    assert!(found.iter().all(|&f| f), "byte value lost in roundtrip");
    assert_eq!(restored, data);
}

#[test]
fn test_special_byte_runs() {
    // Escape bytes of the various transform framings.
    for b in [0x00u8, 0x01, 0x7F, 0x80, 0xF0, 0xFD, 0xFE, 0xFF] {
        roundtrip(&vec![b; 100]);
    }
}

#[test]
fn test_interior_power_of_two_boundaries() {
    for size in [1023usize, 1024, 1025, 8191, 8192, 8193, 32_767, 32_768, 32_769] {
        roundtrip(&periodic(size));
    }
}

#[test]
fn test_repeated_compression_is_stable() {
    // The codec holds no cross-call state; re-running must be identical.
    let data = periodic(5000);
    let first = compress(&data);
    for _ in 0..10 {
        let frame = compress(&data);
        assert_eq!(frame, first);
        assert_eq!(decompress(&frame), data);
    }
}

#[test]
fn test_bwt_problematic_sizes() {
    // Multiples of the 46-byte pattern period, the sizes around the old
    // inverse-cycle bug, and off-by-ones from the period.
    for size in [45usize, 46, 47, 91, 92, 93, 138, 184, 230, 999, 1000, 1001] {
        let data = periodic(size);
        let (enc, primary) = bwt_encode(&data);
        assert_eq!(bwt_decode(&enc, primary), data, "bwt size {size}");
    }
}

#[test]
fn test_mtf_patterns() {
    let sequential: Vec<u8> = (0..10u8).collect();
    let reverse: Vec<u8> = (0..10u8).rev().collect();
    let cycling: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
    for data in [sequential, reverse, cycling] {
        assert_eq!(mtf_decode(&mtf_encode(&data)), data);
    }
}

#[test]
fn test_content_classes() {
    let size = 20_000usize;

    // LCG noise.
    let mut seed = 42u32;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (seed >> 16) as u8
    };
    let random: Vec<u8> = (0..size).map(|_| next()).collect();

    // Structured binary: 512-byte records with a marker header.
    let structured: Vec<u8> = (0..size)
        .map(|i| if i % 512 < 8 { 0x7F } else { (i * 7 % 256) as u8 })
        .collect();

    // Low entropy: zero padding with sparse payload bytes.
    let low_entropy: Vec<u8> = (0..size)
        .map(|i| if i % 97 == 0 { (i % 256) as u8 } else { 0 })
        .collect();

    for data in [random, structured, low_entropy] {
        roundtrip(&data);
    }
}
