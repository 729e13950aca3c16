//! Transform composition laws: each preprocessor inverts exactly, alone and
//! in the stacked orders the hybrid driver uses.

use polypress::transform::bwt::{bwt_decode, bwt_encode, mtf_decode, mtf_encode};
use polypress::transform::delta::{delta_decode, delta_encode};
use polypress::transform::dict::{dict_decode, dict_encode};
use polypress::transform::lz77::{lz77_decode, lz77_encode};
use polypress::transform::lzma::{lzma_decode, lzma_encode};
use polypress::transform::lzopt::{lzopt_decode, lzopt_encode};
use polypress::transform::lzx::{lzx_decode, lzx_encode};
use polypress::transform::record::{record_deinterleave, record_interleave};
use polypress::transform::rle::{rle_decode, rle_encode};
use polypress::transform::sparse::{sparse_decode, sparse_encode};
use polypress::transform::word::{word_decode, word_encode};

fn corpora() -> Vec<Vec<u8>> {
    let text: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(5000)
        .collect();

    let html: Vec<u8> = b"<div class=\"x\"><span>the content</span></div>\n"
        .iter()
        .copied()
        .cycle()
        .take(3000)
        .collect();

    let mut binary = Vec::new();
    let mut x = 1u64;
    for _ in 0..4000 {
        x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1442695040888963407);
        binary.push((x >> 56) as u8);
    }

    let mut zero_padded = vec![0u8; 1500];
    zero_padded.extend_from_slice(&text[..500]);
    zero_padded.extend(vec![0u8; 1500]);

    let runs: Vec<u8> = [0x00u8, 0x41, 0xFE, 0xFF]
        .iter()
        .flat_map(|&b| std::iter::repeat(b).take(700))
        .collect();

    let all_values: Vec<u8> = (0..=255u8).cycle().take(1024).collect();

    vec![
        Vec::new(),
        b"x".to_vec(),
        text,
        html,
        binary,
        zero_padded,
        runs,
        all_values,
    ]
}

#[test]
fn test_every_transform_inverts() {
    for data in corpora() {
        assert_eq!(rle_decode(&rle_encode(&data)), data);
        assert_eq!(delta_decode(&delta_encode(&data)), data);
        assert_eq!(sparse_decode(&sparse_encode(&data)), data);
        assert_eq!(word_decode(&word_encode(&data)), data);
        assert_eq!(lz77_decode(&lz77_encode(&data)), data);
        assert_eq!(lzopt_decode(&lzopt_encode(&data)), data);
        assert_eq!(lzx_decode(&lzx_encode(&data)), data);
        assert_eq!(lzma_decode(&lzma_encode(&data)), data);
        assert_eq!(dict_decode(&dict_encode(&data)), data);
        assert_eq!(record_deinterleave(&record_interleave(&data, 512)), data);

        let (b, primary) = bwt_encode(&data);
        assert_eq!(bwt_decode(&b, primary), data);
        assert_eq!(mtf_decode(&mtf_encode(&data)), data);
    }
}

#[test]
fn test_stacked_pipelines_invert() {
    for data in corpora() {
        // Delta then RLE (mode 18's preprocessing).
        let stacked = rle_encode(&delta_encode(&data));
        assert_eq!(delta_decode(&rle_decode(&stacked)), data);

        // RLE then LZ77 and the reverse order (modes 23/24).
        let a = lz77_encode(&rle_encode(&data));
        assert_eq!(rle_decode(&lz77_decode(&a)), data);
        let b = rle_encode(&lz77_encode(&data));
        assert_eq!(lz77_decode(&rle_decode(&b)), data);

        // Word then static dict (mode 34).
        let wd = dict_encode(&word_encode(&data));
        assert_eq!(word_decode(&dict_decode(&wd)), data);

        // BWT+MTF over LZ77 output (mode 16).
        let lz = lz77_encode(&data);
        let (bw, primary) = bwt_encode(&lz);
        let mtf = mtf_encode(&bw);
        let back = bwt_decode(&mtf_decode(&mtf), primary);
        assert_eq!(lz77_decode(&back), data);

        // Sparse then word (mode 41).
        let sw = word_encode(&sparse_encode(&data));
        assert_eq!(sparse_decode(&word_decode(&sw)), data);

        // RLE then LZMA (modes 49/50).
        let rl = lzma_encode(&rle_encode(&data));
        assert_eq!(rle_decode(&lzma_decode(&rl)), data);
    }
}

#[test]
fn test_record_interleave_odd_tails() {
    // Lengths straddling record boundaries, including partial tails that
    // shorten more than one interleave row.
    for len in [1usize, 511, 512, 513, 1000, 1025, 4097] {
        let data: Vec<u8> = (0..len).map(|i| (i % 241) as u8).collect();
        assert_eq!(record_deinterleave(&record_interleave(&data, 512)), data);
    }
}

#[test]
fn test_bwt_regression_shapes() {
    let cases: Vec<Vec<u8>> = vec![
        b"banana".to_vec(),
        b"abcabcabcabc".to_vec(),
        vec![b'a'; 100],
        (0..100).map(|i| if i % 2 == 0 { b'b' } else { b'a' }).collect(),
        (0..503).map(|i| b"hello"[i % 5]).collect(),
        (0..1000).map(|i| b"The quick brown fox jumps over the lazy dog. "[i % 46]).collect(),
    ];
    for data in cases {
        let (enc, primary) = bwt_encode(&data);
        assert_eq!(bwt_decode(&enc, primary), data, "len {}", data.len());
    }
}
