//! PPM: prediction by partial matching over byte contexts.
//!
//! An order-N coder keeps one [`Model257`] per observed context of every
//! length from N down to 1, plus a single uniform order-0 model. Each byte
//! is tried at the longest context first; a miss emits the escape symbol,
//! adds that context's seen bytes to the exclusion mask, and drops one
//! order. Order 0 can always encode the byte (or the terminating escape).
//!
//! Orders 1 and 2 use dense context tables indexed by the low context bits;
//! orders 3..=6 use sparse maps populated lazily on first update. Order 1
//! keeps the original simplified scheme: raw frequencies, no Witten-Bell
//! smoothing, no exclusion. Orders 2..=6 run the full Witten-Bell +
//! exclusion chain.
//!
//! Encoder and decoder must mutate identical model state in identical
//! order; any divergence is immediate and unrecoverable, which is why both
//! sides share the same context-table type and update path.

use std::collections::HashMap;

use crate::model::{Exclusion, Model257, ESCAPE};
use crate::range_coder::{RangeDecoder, RangeEncoder};

/// Context-model store for one order-N coder.
///
/// Order-2 slots materialize on first update: an untouched escape-only
/// model codes its escape over the interval (0, 1, 1), which narrows
/// nothing and excludes nothing on either side, so leaving the slot empty
/// until then produces the same stream for a fraction of the memory.
struct ContextTable {
    max_order: usize,
    order0: Model257,
    dense1: Vec<Model257>,
    dense2: Vec<Option<Box<Model257>>>,
    /// `sparse[k]` holds the order-(k + 3) contexts.
    sparse: Vec<HashMap<u64, Model257>>,
}

#[inline]
fn context_mask(order: usize) -> u64 {
    (1u64 << (8 * order)) - 1
}

impl ContextTable {
    fn new(max_order: usize) -> Self {
        debug_assert!((2..=6).contains(&max_order));
        let sparse_levels = max_order.saturating_sub(2);
        Self {
            max_order,
            order0: Model257::uniform256(),
            dense1: (0..1usize << 8).map(|_| Model257::escape_only()).collect(),
            dense2: (0..1usize << 16).map(|_| None).collect(),
            sparse: (0..sparse_levels).map(|_| HashMap::new()).collect(),
        }
    }

    /// Model for `order` under history `h`, if it exists yet.
    fn model_mut(&mut self, order: usize, h: u64) -> Option<&mut Model257> {
        let key = h & context_mask(order);
        match order {
            1 => Some(&mut self.dense1[key as usize]),
            2 => self.dense2[key as usize].as_deref_mut(),
            _ => self.sparse[order - 3].get_mut(&key),
        }
    }

    /// Bump `b` in every context model (creating missing sparse entries)
    /// and in order 0.
    fn bump_all(&mut self, h: u64, b: u8) {
        let sym = b as usize;
        for order in 3..=self.max_order {
            let key = h & context_mask(order);
            self.sparse[order - 3]
                .entry(key)
                .or_insert_with(Model257::escape_only)
                .bump(sym);
        }
        self.dense2[(h & context_mask(2)) as usize]
            .get_or_insert_with(|| Box::new(Model257::escape_only()))
            .bump(sym);
        self.dense1[(h & context_mask(1)) as usize].bump(sym);
        self.order0.bump(sym);
    }
}

/// Compress `input` with a PPM coder of the given order (1..=6).
pub fn compress(input: &[u8], max_order: usize) -> Vec<u8> {
    debug_assert!((1..=6).contains(&max_order));
    if max_order == 1 {
        return compress_order1(input);
    }

    let mut ctx = ContextTable::new(max_order);
    let mut enc = RangeEncoder::new();
    let mut h: u64 = 0;

    for &b in input {
        let sym = b as usize;
        let mut excl = Exclusion::new();
        let mut hit = false;

        for order in (1..=max_order).rev() {
            if let Some(m) = ctx.model_mut(order, h) {
                if m.count(sym) > 0 && !excl.contains(sym) {
                    let (lo, hi, tot) = m.wb_cum_ex(sym, &excl);
                    enc.encode(lo, hi, tot);
                    hit = true;
                    break;
                }
                let (lo, hi, tot) = m.wb_cum_ex(ESCAPE, &excl);
                enc.encode(lo, hi, tot);
                m.fill_exclusion(&mut excl);
            }
        }

        if !hit {
            let (lo, hi) = ctx.order0.cum(sym);
            enc.encode(lo, hi, ctx.order0.total());
        }

        ctx.bump_all(h, b);
        h = (h << 8) | b as u64;
    }

    // EOF: an escape cascades through every existing order, terminated by
    // the order-0 escape.
    let mut excl = Exclusion::new();
    for order in (1..=max_order).rev() {
        if let Some(m) = ctx.model_mut(order, h) {
            let (lo, hi, tot) = m.wb_cum_ex(ESCAPE, &excl);
            enc.encode(lo, hi, tot);
            m.fill_exclusion(&mut excl);
        }
    }
    let (lo, hi) = ctx.order0.cum(ESCAPE);
    enc.encode(lo, hi, ctx.order0.total());

    enc.finish()
}

/// Decompress a stream produced by [`compress`] with the same order.
pub fn decompress(input: &[u8], max_order: usize) -> Vec<u8> {
    debug_assert!((1..=6).contains(&max_order));
    if max_order == 1 {
        return decompress_order1(input);
    }

    let mut ctx = ContextTable::new(max_order);
    let mut dec = RangeDecoder::new(input);
    let mut out = Vec::with_capacity(input.len() * 3);
    let mut h: u64 = 0;

    loop {
        // Truncated payloads zero-fill forever without ever reaching the
        // terminating escape; stop once the stream is clearly drained.
        if dec.exhausted() {
            break;
        }

        let mut excl = Exclusion::new();
        let mut sym = None;

        for order in (1..=max_order).rev() {
            let decoded = match ctx.model_mut(order, h) {
                Some(m) => {
                    let tot = m.wb_total_ex(&excl);
                    let f = dec.get_freq(tot);
                    let s = m.wb_find_ex(f, &excl);
                    let (lo, hi, _) = m.wb_cum_ex(s, &excl);
                    dec.decode(lo, hi, tot);
                    if s != ESCAPE {
                        Some(s)
                    } else {
                        m.fill_exclusion(&mut excl);
                        None
                    }
                }
                None => None,
            };
            if decoded.is_some() {
                sym = decoded;
                break;
            }
        }

        let s = match sym {
            Some(s) => s,
            None => {
                let tot = ctx.order0.total();
                let f = dec.get_freq(tot);
                let s = ctx.order0.find_by_freq(f);
                let (lo, hi) = ctx.order0.cum(s);
                dec.decode(lo, hi, tot);
                if s == ESCAPE {
                    break;
                }
                s
            }
        };

        let b = s as u8;
        out.push(b);
        ctx.bump_all(h, b);
        h = (h << 8) | b as u64;
    }

    out
}

// --- Order 1: the early simplified scheme -------------------------------
//
// Raw frequencies and a single dense context byte. A miss escapes straight
// to order 0 with no exclusion bookkeeping.

fn compress_order1(input: &[u8]) -> Vec<u8> {
    let mut ctx: Vec<Model257> = (0..256).map(|_| Model257::escape_only()).collect();
    let mut order0 = Model257::uniform256();
    let mut enc = RangeEncoder::new();
    let mut prev = 0u8;

    for &b in input {
        let sym = b as usize;
        let m = &mut ctx[prev as usize];

        if m.count(sym) > 0 {
            let (lo, hi) = m.cum(sym);
            enc.encode(lo, hi, m.total());
        } else {
            let (lo, hi) = m.cum(ESCAPE);
            enc.encode(lo, hi, m.total());
            let (lo0, hi0) = order0.cum(sym);
            enc.encode(lo0, hi0, order0.total());
        }

        m.bump(sym);
        order0.bump(sym);
        prev = b;
    }

    let m = &mut ctx[prev as usize];
    let (lo, hi) = m.cum(ESCAPE);
    enc.encode(lo, hi, m.total());
    let (lo0, hi0) = order0.cum(ESCAPE);
    enc.encode(lo0, hi0, order0.total());

    enc.finish()
}

fn decompress_order1(input: &[u8]) -> Vec<u8> {
    let mut ctx: Vec<Model257> = (0..256).map(|_| Model257::escape_only()).collect();
    let mut order0 = Model257::uniform256();
    let mut dec = RangeDecoder::new(input);
    let mut out = Vec::with_capacity(input.len() * 3);
    let mut prev = 0u8;

    loop {
        if dec.exhausted() {
            break;
        }

        let m = &mut ctx[prev as usize];
        let f = dec.get_freq(m.total());
        let sym = m.find_by_freq(f);
        let (lo, hi) = m.cum(sym);
        dec.decode(lo, hi, m.total());

        let sym = if sym == ESCAPE {
            let f0 = dec.get_freq(order0.total());
            let s0 = order0.find_by_freq(f0);
            let (lo0, hi0) = order0.cum(s0);
            dec.decode(lo0, hi0, order0.total());
            if s0 == ESCAPE {
                break;
            }
            s0
        } else {
            sym
        };

        let b = sym as u8;
        out.push(b);
        ctx[prev as usize].bump(sym);
        order0.bump(sym);
        prev = b;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8], order: usize) {
        let packed = compress(data, order);
        assert_eq!(
            decompress(&packed, order),
            data,
            "order-{} roundtrip failed for {} bytes",
            order,
            data.len()
        );
    }

    #[test]
    fn test_roundtrip_all_orders() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for order in 1..=6 {
            roundtrip(data, order);
        }
    }

    #[test]
    fn test_empty_input() {
        for order in 1..=6 {
            roundtrip(b"", order);
        }
    }

    #[test]
    fn test_single_bytes() {
        for b in [0u8, 1, 127, 128, 255] {
            roundtrip(&[b], 5);
            roundtrip(&[b], 2);
        }
    }

    #[test]
    fn test_repeated_text_compresses() {
        let data: Vec<u8> = b"abracadabra ".iter().copied().cycle().take(4096).collect();
        let packed = compress(&data, 5);
        assert!(packed.len() < data.len() / 4);
        assert_eq!(decompress(&packed, 5), data);
    }

    #[test]
    fn test_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).collect();
        for order in [1, 2, 3, 5, 6] {
            roundtrip(&data, order);
        }
    }

    #[test]
    fn test_truncated_stream_terminates() {
        let data: Vec<u8> = b"terminate ".iter().copied().cycle().take(500).collect();
        let packed = compress(&data, 5);
        let _ = decompress(&packed[..packed.len() / 2], 5);
        let _ = decompress(&[], 5);
        let _ = decompress(&[], 1);
    }

    #[test]
    fn test_binary_with_runs() {
        let mut data = vec![0u8; 500];
        data.extend((0..500).map(|i| (i * 37 % 256) as u8));
        data.extend(vec![0xFF; 300]);
        for order in [2, 5, 6] {
            roundtrip(&data, order);
        }
    }
}
