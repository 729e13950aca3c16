//! Hybrid driver: try a catalog of pipelines, keep the smallest.
//!
//! Compression runs the input through every applicable combination of
//! preprocessors and entropy coders, keeps only the current best candidate,
//! and frames the winner with a single leading mode byte. Decompression
//! dispatches on that byte and applies the inverse stages in reverse order.
//!
//! Mode catalog (encode direction, leftmost stage applied first):
//!
//! | Mode | Pipeline |
//! |---|---|
//! | 0 | PPM5 |
//! | 1, 2, 4 | LZ77 + PPM3/5/6 |
//! | 3 | PPM6 |
//! | 5, 6, 7 | LZOpt + PPM3/5/6 |
//! | 8, 9, 13 | BWT+MTF + PPM3/5/6 |
//! | 10, 11 | LZX + PPM5/6 |
//! | 12 | CM |
//! | 14, 15 | RLE + PPM5/6 |
//! | 16 | LZ77 + BWT+MTF + PPM5 |
//! | 17, 18 | Delta [+ RLE] + PPM5 |
//! | 19 | reserved (pattern repeat, disabled) |
//! | 20, 21 | Word + PPM5/6 |
//! | 22 | Delta + BWT+MTF + PPM5 |
//! | 23, 24 | RLE/LZ77 in either order + PPM5 |
//! | 25 | RLE + BWT+MTF + PPM5 |
//! | 26, 27 | LZOpt/RLE in either order + PPM5 |
//! | 28, 29 | RecordInterleave(512) [+ RLE] + PPM5 |
//! | 30, 31 | Word + RLE + PPM5/6 |
//! | 32, 33 | Dict + PPM5/6 |
//! | 34 | Word + Dict + PPM6 |
//! | 35..=38 | Word/LZ77 compositions + PPM5/6 |
//! | 39..=41 | Sparse [+ Word] + PPM5/6 |
//! | 42, 43 | LZMA + PPM5/6 |
//! | 44 | LZMA + BWT+MTF + PPM5 |
//! | 45..=50 | LZMA with Word/Dict/RLE + PPM5/6 |
//! | 255 | store raw |
//!
//! BWT-bearing payloads carry the 4-byte big-endian primary index in front
//! of the entropy-coded bytes. Size gates keep the expensive candidates off
//! large inputs; the gates are part of the format's behavior (they decide
//! which mode can win), not just a performance tweak.

use crate::cm;
use crate::ppm;
use crate::transform::bwt;
use crate::transform::delta;
use crate::transform::dict;
use crate::transform::lz77;
use crate::transform::lzma;
use crate::transform::lzopt;
use crate::transform::lzx;
use crate::transform::record;
use crate::transform::rle;
use crate::transform::sparse;
use crate::transform::word;

/// Store-raw mode byte.
const MODE_RAW: u8 = 255;

/// BWT pipelines stay off inputs over 1 MB.
const MAX_BWT_SIZE: usize = 1 << 20;
/// LZX builds a suffix array; gated accordingly.
const MAX_LZX_SIZE: usize = 1 << 18;
/// CM is the slowest candidate by far.
const MAX_CM_SIZE: usize = 512 * 1024;
/// LZOpt pipelines (the DP inside falls back to greedy above 256 KB).
const MAX_LZOPT_SIZE: usize = 512 * 1024;
/// Static-dictionary LZ only pays off for small files.
const MAX_DICT_SIZE: usize = 65_535;

struct Best {
    mode: u8,
    data: Option<Vec<u8>>,
}

impl Best {
    fn new() -> Self {
        Self {
            mode: 0,
            data: None,
        }
    }

    /// Keep `candidate` if it is strictly smaller than the current best.
    fn consider(&mut self, candidate: Vec<u8>, mode: u8) {
        let better = match &self.data {
            None => true,
            Some(best) => candidate.len() < best.len(),
        };
        if better {
            self.mode = mode;
            self.data = Some(candidate);
        }
    }
}

/// 4-byte big-endian primary index, then the PPM-coded MTF bytes.
fn bwt_frame(data: &[u8], order: usize) -> Vec<u8> {
    let (bwt_data, primary) = bwt::bwt_encode(data);
    let mtf_data = bwt::mtf_encode(&bwt_data);
    drop(bwt_data);

    let coded = ppm::compress(&mtf_data, order);
    let mut full = Vec::with_capacity(4 + coded.len());
    full.extend_from_slice(&primary.to_be_bytes());
    full.extend_from_slice(&coded);
    full
}

/// Inverse of [`bwt_frame`] minus the trailing transform stages.
fn bwt_unframe(payload: &[u8], order: usize) -> Vec<u8> {
    if payload.len() < 4 {
        return Vec::new();
    }
    let primary = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let mtf_data = ppm::decompress(&payload[4..], order);
    let bwt_data = bwt::mtf_decode(&mtf_data);
    bwt::bwt_decode(&bwt_data, primary)
}

/// Compress `input`, returning a mode-tagged frame.
///
/// Always succeeds: mode 255 (store raw) bounds the result at
/// `input.len() + 1` bytes.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut best = Best::new();

    best.consider(ppm::compress(input, 5), 0);
    best.consider(ppm::compress(input, 6), 3);

    // LZ77 is cheap; always in the running.
    {
        let lz_data = lz77::lz77_encode(input);
        best.consider(ppm::compress(&lz_data, 3), 1);
        best.consider(ppm::compress(&lz_data, 5), 2);
        best.consider(ppm::compress(&lz_data, 6), 4);
    }

    if input.len() <= MAX_LZOPT_SIZE {
        let lzopt_data = lzopt::lzopt_encode(input);
        best.consider(ppm::compress(&lzopt_data, 3), 5);
        best.consider(ppm::compress(&lzopt_data, 5), 6);
        best.consider(ppm::compress(&lzopt_data, 6), 7);
    }

    if input.len() <= MAX_BWT_SIZE {
        let (bwt_data, primary) = bwt::bwt_encode(input);
        let mtf_data = bwt::mtf_encode(&bwt_data);
        drop(bwt_data);
        for (order, mode) in [(3usize, 8u8), (5, 9), (6, 13)] {
            let coded = ppm::compress(&mtf_data, order);
            let mut full = Vec::with_capacity(4 + coded.len());
            full.extend_from_slice(&primary.to_be_bytes());
            full.extend_from_slice(&coded);
            best.consider(full, mode);
        }
    }

    if input.len() <= MAX_LZX_SIZE {
        let lzx_data = lzx::lzx_encode(input);
        best.consider(ppm::compress(&lzx_data, 5), 10);
        best.consider(ppm::compress(&lzx_data, 6), 11);
    }

    if input.len() <= MAX_CM_SIZE {
        best.consider(cm::cm_encode(input), 12);
    }

    {
        let rle_data = rle::rle_encode(input);
        best.consider(ppm::compress(&rle_data, 5), 14);
        best.consider(ppm::compress(&rle_data, 6), 15);
    }

    if input.len() <= MAX_BWT_SIZE {
        let lz_data = lz77::lz77_encode(input);
        best.consider(bwt_frame(&lz_data, 5), 16);
    }

    {
        let delta_data = delta::delta_encode(input);
        best.consider(ppm::compress(&delta_data, 5), 17);

        let delta_rle = rle::rle_encode(&delta_data);
        best.consider(ppm::compress(&delta_rle, 5), 18);
    }

    // Mode 19 (pattern repeat) stays reserved.

    {
        let word_data = word::word_encode(input);
        if word_data.len() < input.len() {
            best.consider(ppm::compress(&word_data, 5), 20);
            best.consider(ppm::compress(&word_data, 6), 21);

            let word_rle = rle::rle_encode(&word_data);
            best.consider(ppm::compress(&word_rle, 5), 30);
            best.consider(ppm::compress(&word_rle, 6), 31);

            let word_lz = lz77::lz77_encode(&word_data);
            best.consider(ppm::compress(&word_lz, 5), 35);
            best.consider(ppm::compress(&word_lz, 6), 36);
        }
    }

    {
        let lz_data = lz77::lz77_encode(input);
        let lz_word = word::word_encode(&lz_data);
        if lz_word.len() < lz_data.len() {
            best.consider(ppm::compress(&lz_word, 5), 37);
            best.consider(ppm::compress(&lz_word, 6), 38);
        }
    }

    if input.len() <= MAX_BWT_SIZE {
        let delta_data = delta::delta_encode(input);
        best.consider(bwt_frame(&delta_data, 5), 22);
    }

    {
        let rle_data = rle::rle_encode(input);
        let lz_data = lz77::lz77_encode(&rle_data);
        best.consider(ppm::compress(&lz_data, 5), 23);
    }

    {
        let lz_data = lz77::lz77_encode(input);
        let rle_data = rle::rle_encode(&lz_data);
        best.consider(ppm::compress(&rle_data, 5), 24);
    }

    if input.len() <= MAX_BWT_SIZE {
        let rle_data = rle::rle_encode(input);
        best.consider(bwt_frame(&rle_data, 5), 25);
    }

    if input.len() <= MAX_LZOPT_SIZE {
        let lzopt_data = lzopt::lzopt_encode(input);
        let lzopt_rle = rle::rle_encode(&lzopt_data);
        best.consider(ppm::compress(&lzopt_rle, 5), 26);

        let rle_first = rle::rle_encode(input);
        let rle_lzopt = lzopt::lzopt_encode(&rle_first);
        best.consider(ppm::compress(&rle_lzopt, 5), 27);
    }

    if input.len() >= 1024 && input.len() <= 1024 * 1024 {
        let rec = record::record_interleave(input, 512);
        best.consider(ppm::compress(&rec, 5), 28);

        let rec_rle = rle::rle_encode(&rec);
        best.consider(ppm::compress(&rec_rle, 5), 29);
    }

    if input.len() <= MAX_DICT_SIZE {
        let dict_data = dict::dict_encode(input);
        best.consider(ppm::compress(&dict_data, 5), 32);
        best.consider(ppm::compress(&dict_data, 6), 33);

        let word_data = word::word_encode(input);
        if word_data.len() < input.len() {
            let word_dict = dict::dict_encode(&word_data);
            best.consider(ppm::compress(&word_dict, 6), 34);
        }
    }

    {
        let sparse_data = sparse::sparse_encode(input);
        if sparse_data.len() < input.len() {
            best.consider(ppm::compress(&sparse_data, 5), 39);
            best.consider(ppm::compress(&sparse_data, 6), 40);

            let sparse_word = word::word_encode(&sparse_data);
            if sparse_word.len() < sparse_data.len() {
                best.consider(ppm::compress(&sparse_word, 6), 41);
            }
        }
    }

    {
        let lzma_data = lzma::lzma_encode(input);
        best.consider(ppm::compress(&lzma_data, 5), 42);
        best.consider(ppm::compress(&lzma_data, 6), 43);

        if lzma_data.len() <= MAX_BWT_SIZE {
            best.consider(bwt_frame(&lzma_data, 5), 44);
        }
    }

    {
        let word_data = word::word_encode(input);
        if word_data.len() < input.len() {
            let lzma_data = lzma::lzma_encode(&word_data);
            best.consider(ppm::compress(&lzma_data, 5), 45);
            best.consider(ppm::compress(&lzma_data, 6), 46);
        }
    }

    if input.len() <= MAX_DICT_SIZE {
        let dict_data = dict::dict_encode(input);
        let lzma_data = lzma::lzma_encode(&dict_data);
        best.consider(ppm::compress(&lzma_data, 5), 47);
        best.consider(ppm::compress(&lzma_data, 6), 48);
    }

    {
        let rle_data = rle::rle_encode(input);
        if rle_data.len() < input.len() {
            let lzma_data = lzma::lzma_encode(&rle_data);
            best.consider(ppm::compress(&lzma_data, 5), 49);
            best.consider(ppm::compress(&lzma_data, 6), 50);
        }
    }

    let (mode, data) = match best.data {
        Some(data) => (best.mode, data),
        None => (MODE_RAW, Vec::new()),
    };

    // Nothing beat the input itself: store raw.
    if mode == MODE_RAW || data.len() >= input.len() {
        let mut result = Vec::with_capacity(1 + input.len());
        result.push(MODE_RAW);
        result.extend_from_slice(input);
        return result;
    }

    let mut result = Vec::with_capacity(1 + data.len());
    result.push(mode);
    result.extend_from_slice(&data);
    result
}

/// Decompress a mode-tagged frame.
///
/// Total over all inputs: empty input yields empty output, unknown modes
/// fall back to PPM5, malformed payloads truncate.
pub fn decompress(input: &[u8]) -> Vec<u8> {
    let Some((&mode, payload)) = input.split_first() else {
        return Vec::new();
    };

    match mode {
        0 => ppm::decompress(payload, 5),
        1 => lz77::lz77_decode(&ppm::decompress(payload, 3)),
        2 => lz77::lz77_decode(&ppm::decompress(payload, 5)),
        3 => ppm::decompress(payload, 6),
        4 => lz77::lz77_decode(&ppm::decompress(payload, 6)),
        5 => lzopt::lzopt_decode(&ppm::decompress(payload, 3)),
        6 => lzopt::lzopt_decode(&ppm::decompress(payload, 5)),
        7 => lzopt::lzopt_decode(&ppm::decompress(payload, 6)),
        8 => bwt_unframe(payload, 3),
        9 => bwt_unframe(payload, 5),
        10 => lzx::lzx_decode(&ppm::decompress(payload, 5)),
        11 => lzx::lzx_decode(&ppm::decompress(payload, 6)),
        12 => cm::cm_decode(payload),
        13 => bwt_unframe(payload, 6),
        14 => rle::rle_decode(&ppm::decompress(payload, 5)),
        15 => rle::rle_decode(&ppm::decompress(payload, 6)),
        16 => lz77::lz77_decode(&bwt_unframe(payload, 5)),
        17 => delta::delta_decode(&ppm::decompress(payload, 5)),
        18 => delta::delta_decode(&rle::rle_decode(&ppm::decompress(payload, 5))),
        20 => word::word_decode(&ppm::decompress(payload, 5)),
        21 => word::word_decode(&ppm::decompress(payload, 6)),
        22 => delta::delta_decode(&bwt_unframe(payload, 5)),
        23 => rle::rle_decode(&lz77::lz77_decode(&ppm::decompress(payload, 5))),
        24 => lz77::lz77_decode(&rle::rle_decode(&ppm::decompress(payload, 5))),
        25 => rle::rle_decode(&bwt_unframe(payload, 5)),
        26 => lzopt::lzopt_decode(&rle::rle_decode(&ppm::decompress(payload, 5))),
        27 => rle::rle_decode(&lzopt::lzopt_decode(&ppm::decompress(payload, 5))),
        28 => record::record_deinterleave(&ppm::decompress(payload, 5)),
        29 => record::record_deinterleave(&rle::rle_decode(&ppm::decompress(payload, 5))),
        30 => word::word_decode(&rle::rle_decode(&ppm::decompress(payload, 5))),
        31 => word::word_decode(&rle::rle_decode(&ppm::decompress(payload, 6))),
        32 => dict::dict_decode(&ppm::decompress(payload, 5)),
        33 => dict::dict_decode(&ppm::decompress(payload, 6)),
        34 => word::word_decode(&dict::dict_decode(&ppm::decompress(payload, 6))),
        35 => word::word_decode(&lz77::lz77_decode(&ppm::decompress(payload, 5))),
        36 => word::word_decode(&lz77::lz77_decode(&ppm::decompress(payload, 6))),
        37 => lz77::lz77_decode(&word::word_decode(&ppm::decompress(payload, 5))),
        38 => lz77::lz77_decode(&word::word_decode(&ppm::decompress(payload, 6))),
        39 => sparse::sparse_decode(&ppm::decompress(payload, 5)),
        40 => sparse::sparse_decode(&ppm::decompress(payload, 6)),
        41 => sparse::sparse_decode(&word::word_decode(&ppm::decompress(payload, 6))),
        42 => lzma::lzma_decode(&ppm::decompress(payload, 5)),
        43 => lzma::lzma_decode(&ppm::decompress(payload, 6)),
        44 => lzma::lzma_decode(&bwt_unframe(payload, 5)),
        45 => word::word_decode(&lzma::lzma_decode(&ppm::decompress(payload, 5))),
        46 => word::word_decode(&lzma::lzma_decode(&ppm::decompress(payload, 6))),
        47 => dict::dict_decode(&lzma::lzma_decode(&ppm::decompress(payload, 5))),
        48 => dict::dict_decode(&lzma::lzma_decode(&ppm::decompress(payload, 6))),
        49 => rle::rle_decode(&lzma::lzma_decode(&ppm::decompress(payload, 5))),
        50 => rle::rle_decode(&lzma::lzma_decode(&ppm::decompress(payload, 6))),
        MODE_RAW => payload.to_vec(),
        _ => ppm::decompress(payload, 5),
    }
}
