//! Large-window LZ with suffix-array match finding.
//!
//! Window up to 64 MB, four offset classes framed `0xFC` (< 256), `0xFD`
//! (< 65536), `0xFE` (< 2^24), `0xFF` (< 2^32); literals at or above `0xFC`
//! are doubled. Inputs up to 256 KB build a full suffix array and probe the
//! neighbouring ranks in both directions from the current position; larger
//! inputs fall back to hash chains.

use std::collections::HashMap;

use super::suffix::SuffixArray;

const ESC_TINY: u8 = 0xFC;
const ESC_SHORT: u8 = 0xFD;
const ESC_MED: u8 = 0xFE;
const ESC_LONG: u8 = 0xFF;
const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 251 + MIN_MATCH;
const WINDOW_SIZE: usize = 64 << 20;
const SA_LIMIT: usize = 256 * 1024;
const SA_PROBES: i32 = 128;
const CHAIN_LEN: usize = 128;

#[derive(Clone, Copy)]
struct Match {
    len: usize,
    offset: usize,
}

#[inline]
fn match_cost(offset: usize) -> i64 {
    if offset < 256 {
        3
    } else if offset < 65_536 {
        4
    } else if offset < (1 << 24) {
        5
    } else {
        6
    }
}

#[inline]
fn hash4(p: &[u8]) -> u32 {
    ((p[0] as u32) << 24) | ((p[1] as u32) << 16) | ((p[2] as u32) << 8) | p[3] as u32
}

fn match_len(text: &[u8], a: usize, b: usize) -> usize {
    let max = MAX_MATCH.min(text.len() - b);
    let mut len = 0;
    while len < max && text[a + len] == text[b + len] {
        len += 1;
    }
    len
}

/// Probe suffix-array neighbours of `pos`'s rank; earlier text positions at
/// nearby ranks share the longest prefixes with `pos`.
fn find_matches_sa(text: &[u8], pos: usize, sa: &SuffixArray) -> Vec<Match> {
    let mut matches = Vec::new();
    let n = text.len() as i32;
    if pos >= text.len() || sa.sa.is_empty() {
        return matches;
    }

    let rank = sa.inv[pos];
    let try_rank = |idx: i32, matches: &mut Vec<Match>| {
        if idx < 0 || idx >= n {
            return;
        }
        let match_pos = sa.sa[idx as usize] as usize;
        if match_pos >= pos {
            return;
        }
        let dist = pos - match_pos;
        if dist > WINDOW_SIZE {
            return;
        }
        let len = match_len(text, match_pos, pos);
        if len >= MIN_MATCH {
            matches.push(Match { len, offset: dist });
        }
    };

    let range = SA_PROBES.min(n);
    for delta in 1..range {
        try_rank(rank - delta, &mut matches);
        try_rank(rank + delta, &mut matches);
        if matches.len() >= 8 {
            break;
        }
    }

    matches
}

fn find_matches_hash(
    text: &[u8],
    pos: usize,
    table: &HashMap<u32, Vec<usize>>,
) -> Vec<Match> {
    let mut matches = Vec::new();
    if pos + 3 >= text.len() {
        return matches;
    }
    let Some(chain) = table.get(&hash4(&text[pos..])) else {
        return matches;
    };

    for &match_pos in chain.iter().rev().take(CHAIN_LEN) {
        if match_pos >= pos {
            continue;
        }
        let dist = pos - match_pos;
        if dist > WINDOW_SIZE {
            break;
        }
        let len = match_len(text, match_pos, pos);
        if len >= MIN_MATCH {
            matches.push(Match { len, offset: dist });
            if len >= 64 {
                break;
            }
        }
    }

    matches
}

pub fn lzx_encode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }

    let n = input.len();
    let mut out = Vec::with_capacity(n);

    let use_sa = n <= SA_LIMIT;
    let sa = if use_sa {
        Some(SuffixArray::build(input))
    } else {
        None
    };
    let mut table: HashMap<u32, Vec<usize>> = HashMap::new();

    let mut i = 0;
    while i < n {
        let matches = if let Some(sa) = &sa {
            find_matches_sa(input, i, sa)
        } else {
            let m = find_matches_hash(input, i, &table);
            if i + 3 < n {
                let chain = table.entry(hash4(&input[i..])).or_default();
                chain.push(i);
                if chain.len() > 256 {
                    chain.remove(0);
                }
            }
            m
        };

        let mut best_savings = 0i64;
        let mut best = Match { len: 0, offset: 0 };
        for m in &matches {
            let savings = m.len as i64 - match_cost(m.offset);
            if savings > best_savings {
                best_savings = savings;
                best = *m;
            }
        }

        if best_savings > 0 {
            let len_code = (best.len - MIN_MATCH) as u8;
            if best.offset < 256 {
                out.push(ESC_TINY);
                out.push(len_code);
                out.push(best.offset as u8);
            } else if best.offset < 65_536 {
                out.push(ESC_SHORT);
                out.push(len_code);
                out.push((best.offset >> 8) as u8);
                out.push((best.offset & 0xFF) as u8);
            } else if best.offset < (1 << 24) {
                out.push(ESC_MED);
                out.push(len_code);
                out.push((best.offset >> 16) as u8);
                out.push(((best.offset >> 8) & 0xFF) as u8);
                out.push((best.offset & 0xFF) as u8);
            } else {
                out.push(ESC_LONG);
                out.push(len_code);
                out.push((best.offset >> 24) as u8);
                out.push(((best.offset >> 16) & 0xFF) as u8);
                out.push(((best.offset >> 8) & 0xFF) as u8);
                out.push((best.offset & 0xFF) as u8);
            }
            i += best.len;
        } else {
            let b = input[i];
            if b >= ESC_TINY {
                out.push(b);
            }
            out.push(b);
            i += 1;
        }
    }

    out
}

pub fn lzx_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 3);
    let mut i = 0;

    while i < input.len() {
        let tag = input[i];
        let (header_len, offset_bytes) = match tag {
            ESC_TINY => (3, 1),
            ESC_SHORT => (4, 2),
            ESC_MED => (5, 3),
            ESC_LONG => (6, 4),
            _ => {
                out.push(tag);
                i += 1;
                continue;
            }
        };

        if i + 1 >= input.len() {
            break;
        }
        if input[i + 1] == tag {
            out.push(tag);
            i += 2;
            continue;
        }
        if i + header_len - 1 >= input.len() {
            break;
        }

        let len = input[i + 1] as usize + MIN_MATCH;
        let mut offset = 0usize;
        for k in 0..offset_bytes {
            offset = (offset << 8) | input[i + 2 + k] as usize;
        }
        if offset > out.len() || offset == 0 {
            break;
        }
        super::lz77::copy_match(&mut out, offset, len);
        i += header_len;
    }

    out
}
