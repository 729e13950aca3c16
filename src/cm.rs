//! Context-mixing codec (PAQ-style).
//!
//! Bit-wise arithmetic coder driven by a logistic mixer. Five context
//! models of increasing order map context hashes to 8-bit counter states
//! (two 4-bit counts packed per state); a match model predicts the next bit
//! from the last time the trailing 8 bytes recurred; the mixer combines the
//! stretched predictions with adaptive weights and squashes the result back
//! to a 12-bit probability.
//!
//! Self-contained by design: shares nothing with the range coder or
//! Model257 so the two entropy paths cannot couple. The payload carries a
//! 4-byte big-endian original-length prefix; declared lengths over 100 MB
//! are rejected as corrupt.

use std::sync::OnceLock;

/// Stretch/squash lookups plus the packed counter-state machine.
struct Tables {
    /// 12-bit probability -> 13-bit log-odds.
    stretch: [i32; 4096],
    /// Shifted log-odds -> 12-bit probability, clamped to [1, 4095].
    squash: [i32; 8192],
    /// (state, bit) -> next state; (n0, n1) nibbles with opponent decay.
    next_state: [u8; 512],
    /// state -> scaled zero/one ratio.
    state_map: [u8; 256],
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut stretch = [0i32; 4096];
        for (i, s) in stretch.iter_mut().enumerate() {
            let p = (i as f64 + 0.5) / 4096.0;
            *s = (512.0 * (p / (1.0 - p)).ln()) as i32;
        }

        let mut squash = [0i32; 8192];
        for (i, s) in squash.iter_mut().enumerate() {
            let x = (i as f64 - 4096.0) / 512.0;
            *s = ((4096.0 / (1.0 + (-x).exp())) as i32).clamp(1, 4095);
        }

        let mut next_state = [0u8; 512];
        let mut state_map = [0u8; 256];
        for i in 0..256 {
            let n0 = (i >> 4) & 15;
            let n1 = i & 15;

            state_map[i] = ((n1 * 255) / (n0 + n1).max(1)) as u8;

            let mut inc0 = (n0 + 1).min(15);
            let mut dec1 = n1;
            if inc0 + n1 > 15 {
                dec1 = n1 * 14 / 15;
            }
            next_state[i * 2] = ((inc0 << 4) | dec1) as u8;

            let inc1 = (n1 + 1).min(15);
            inc0 = n0;
            if n0 + inc1 > 15 {
                inc0 = n0 * 14 / 15;
            }
            next_state[i * 2 + 1] = ((inc0 << 4) | inc1) as u8;
        }

        Tables {
            stretch,
            squash,
            next_state,
            state_map,
        }
    })
}

#[inline]
fn stretch(p: i32) -> i32 {
    tables().stretch[p.clamp(0, 4095) as usize]
}

#[inline]
fn squash(x: i32) -> i32 {
    tables().squash[(x + 4096).clamp(0, 8191) as usize]
}

/// One order's state table: context hash -> packed counter state.
struct ContextModel {
    states: Vec<u8>,
    mask: usize,
}

impl ContextModel {
    fn new(bits: u32) -> Self {
        Self {
            states: vec![0; 1 << bits],
            mask: (1 << bits) - 1,
        }
    }

    #[inline]
    fn predict(&self, ctx: u32) -> i32 {
        tables().state_map[self.states[ctx as usize & self.mask] as usize] as i32 * 16
    }

    #[inline]
    fn update(&mut self, ctx: u32, bit: i32) {
        let s = &mut self.states[ctx as usize & self.mask];
        *s = tables().next_state[*s as usize * 2 + bit as usize];
    }
}

/// Predicts the next bit from the byte that followed the last occurrence of
/// the trailing 8-byte context; confidence grows with consecutive hits.
struct MatchModel {
    hash_table: Vec<u32>,
    history: Vec<u8>,
    hist_pos: usize,
    match_len: usize,
    match_pos: usize,
    predicted_bit: i32,
    confidence: i32,
}

impl MatchModel {
    fn new() -> Self {
        Self {
            hash_table: vec![0; 1 << 18],
            history: vec![0; 1 << 20],
            hist_pos: 0,
            match_len: 0,
            match_pos: 0,
            predicted_bit: 0,
            confidence: 0,
        }
    }

    fn update(&mut self, bit_ctx: u32, bit: i32, byte_ctx: u8) {
        let hist_len = self.history.len();

        if bit_ctx & 0xFF == 1 {
            self.history[self.hist_pos % hist_len] = byte_ctx;
            self.hist_pos += 1;
        }

        if self.match_len > 0 {
            if bit == self.predicted_bit {
                self.confidence = (self.confidence + 1).min(7);
            } else {
                self.match_len = 0;
                self.confidence = 0;
            }
        }

        if bit_ctx & 0xFF == 1 && self.hist_pos > 8 {
            let mut h = 0u32;
            for i in 0..8 {
                let b = self.history[(self.hist_pos - 8 + i) % hist_len];
                h = h.wrapping_mul(257).wrapping_add(b as u32);
            }
            let h = h as usize & (self.hash_table.len() - 1);

            if self.match_len == 0 {
                let prev = self.hash_table[h] as usize;
                if prev > 0 && prev < self.hist_pos - 8 {
                    let valid = (0..8).all(|i| {
                        self.history[(prev + i) % hist_len]
                            == self.history[(self.hist_pos - 8 + i) % hist_len]
                    });
                    if valid {
                        self.match_pos = prev + 8;
                        self.match_len = 1;
                        self.confidence = 1;
                    }
                }
            }

            self.hash_table[h] = (self.hist_pos - 8) as u32;
        }
    }

    fn predict(&mut self, bit_ctx: u32) -> i32 {
        if self.match_len == 0 {
            return 2048;
        }

        let pred_byte = self.history[self.match_pos % self.history.len()];
        let bit_pos = 7 - ((bit_ctx & 0xFF) as i32 - 1);
        if !(0..=7).contains(&bit_pos) {
            return 2048;
        }

        self.predicted_bit = ((pred_byte >> bit_pos) & 1) as i32;
        if self.predicted_bit != 0 {
            4095 - (512 >> self.confidence)
        } else {
            512 >> self.confidence
        }
    }

    fn byte_done(&mut self) {
        if self.match_len > 0 {
            self.match_pos += 1;
            self.match_len += 1;
        }
    }
}

/// Logistic mixer over up to 8 stretched predictions.
struct Mixer {
    inputs: [i32; 8],
    weights: [i32; 8],
    n_inputs: usize,
    pr: i32,
}

impl Mixer {
    fn new() -> Self {
        Self {
            inputs: [0; 8],
            weights: [256; 8],
            n_inputs: 0,
            pr: 2048,
        }
    }

    #[inline]
    fn add(&mut self, p: i32) {
        if self.n_inputs < 8 {
            self.inputs[self.n_inputs] = stretch(p.clamp(1, 4095));
            self.n_inputs += 1;
        }
    }

    fn mix(&mut self) -> i32 {
        if self.n_inputs == 0 {
            return 2048;
        }

        let mut sum = 0i64;
        let mut w_sum = 0i64;
        for i in 0..self.n_inputs {
            sum += self.inputs[i] as i64 * self.weights[i] as i64;
            w_sum += self.weights[i] as i64;
        }

        self.pr = squash(if w_sum > 0 { (sum / w_sum) as i32 } else { 0 });
        self.n_inputs = 0;
        self.pr
    }

    fn update(&mut self, bit: i32) {
        let err = ((bit << 12) - self.pr) * 7;
        for i in 0..8 {
            let delta = ((self.inputs[i] as i64 * err as i64) >> 16) as i32;
            self.weights[i] = (self.weights[i] + delta).clamp(1, 65_535);
        }
    }
}

/// Binary arithmetic encoder over 12-bit probabilities.
struct BitEncoder<'a> {
    low: u32,
    high: u32,
    out: &'a mut Vec<u8>,
}

impl<'a> BitEncoder<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            low: 0,
            high: 0xFFFF_FFFF,
            out,
        }
    }

    #[inline]
    fn encode(&mut self, bit: i32, p: i32) {
        let mid = self.low + (((self.high - self.low) as u64 * p as u64) >> 12) as u32;
        if bit != 0 {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        while (self.low ^ self.high) < (1 << 24) {
            self.out.push((self.low >> 24) as u8);
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
        }
    }

    fn flush(self) {
        self.out.extend_from_slice(&self.low.to_be_bytes());
    }
}

/// Binary arithmetic decoder mirroring [`BitEncoder`].
struct BitDecoder<'a> {
    low: u32,
    high: u32,
    code: u32,
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitDecoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        let mut dec = Self {
            low: 0,
            high: 0xFFFF_FFFF,
            code: 0,
            data,
            pos: 0,
        };
        for _ in 0..4 {
            dec.code = (dec.code << 8) | dec.next_byte() as u32;
        }
        dec
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                b
            }
            None => 0,
        }
    }

    #[inline]
    fn decode(&mut self, p: i32) -> i32 {
        let mid = self.low + (((self.high - self.low) as u64 * p as u64) >> 12) as u32;
        let bit = (self.code > mid) as i32;

        if bit != 0 {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        while (self.low ^ self.high) < (1 << 24) {
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
            self.code = (self.code << 8) | self.next_byte() as u32;
        }

        bit
    }
}

/// The shared model bank; encode and decode must drive it identically.
struct Models {
    cm0: ContextModel,
    cm1: ContextModel,
    cm2: ContextModel,
    cm3: ContextModel,
    cm4: ContextModel,
    mm: MatchModel,
    mixer: Mixer,
    ctx1: u32,
    ctx2: u32,
    ctx3: u32,
    ctx4: u32,
}

impl Models {
    fn new() -> Self {
        Self {
            cm0: ContextModel::new(8),
            cm1: ContextModel::new(16),
            cm2: ContextModel::new(20),
            cm3: ContextModel::new(22),
            cm4: ContextModel::new(24),
            mm: MatchModel::new(),
            mixer: Mixer::new(),
            ctx1: 0,
            ctx2: 0,
            ctx3: 0,
            ctx4: 0,
        }
    }

    /// Mixed 12-bit probability for the next bit under `bit_ctx`.
    fn predict(&mut self, bit_ctx: u32) -> i32 {
        let p0 = self.cm0.predict(bit_ctx);
        let p1 = self.cm1.predict((self.ctx1 << 8) | bit_ctx);
        let p2 = self.cm2.predict(((self.ctx2 & 0xFFF) << 8) | bit_ctx);
        let p3 = self.cm3.predict(((self.ctx3 & 0x3FFF) << 8) | bit_ctx);
        let p4 = self.cm4.predict(((self.ctx4 & 0xFFFF) << 8) | bit_ctx);
        let pm = self.mm.predict(bit_ctx);

        self.mixer.add(p0);
        self.mixer.add(p1);
        self.mixer.add(p2);
        self.mixer.add(p3);
        self.mixer.add(p4);
        self.mixer.add(pm);
        self.mixer.add(2048);
        self.mixer.add(2048);
        self.mixer.mix()
    }

    fn update(&mut self, bit_ctx: u32, bit: i32) {
        self.cm0.update(bit_ctx, bit);
        self.cm1.update((self.ctx1 << 8) | bit_ctx, bit);
        self.cm2.update(((self.ctx2 & 0xFFF) << 8) | bit_ctx, bit);
        self.cm3.update(((self.ctx3 & 0x3FFF) << 8) | bit_ctx, bit);
        self.cm4.update(((self.ctx4 & 0xFFFF) << 8) | bit_ctx, bit);
        self.mm.update(bit_ctx, bit, (self.ctx1 & 0xFF) as u8);
        self.mixer.update(bit);
    }

    fn byte_done(&mut self, byte: u8) {
        self.mm.byte_done();
        self.ctx4 = (self.ctx4 << 8) | (self.ctx3 >> 24);
        self.ctx3 = (self.ctx3 << 8) | (self.ctx2 >> 16);
        self.ctx2 = (self.ctx2 << 8) | (self.ctx1 >> 8);
        self.ctx1 = (self.ctx1 << 8) | byte as u32;
    }
}

/// Maximum original length the decoder will accept.
const MAX_DECODED_LEN: u32 = 100 * 1024 * 1024;

pub fn cm_encode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(input.len());
    out.extend_from_slice(&(input.len() as u32).to_be_bytes());

    let mut models = Models::new();
    let mut enc = BitEncoder::new(&mut out);

    for &byte in input {
        let mut bit_ctx = 1u32;
        for i in (0..8).rev() {
            let bit = ((byte >> i) & 1) as i32;
            let p = models.predict(bit_ctx);
            enc.encode(bit, p);
            models.update(bit_ctx, bit);
            bit_ctx = (bit_ctx << 1) | bit as u32;
        }
        models.byte_done(byte);
    }

    enc.flush();
    out
}

pub fn cm_decode(input: &[u8]) -> Vec<u8> {
    if input.len() < 4 {
        return Vec::new();
    }

    let size = u32::from_be_bytes([input[0], input[1], input[2], input[3]]);
    if size > MAX_DECODED_LEN {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(size as usize);
    let mut models = Models::new();
    let mut dec = BitDecoder::new(&input[4..]);

    for _ in 0..size {
        let mut bit_ctx = 1u32;
        let mut byte = 0u8;
        for _ in 0..8 {
            let p = models.predict(bit_ctx);
            let bit = dec.decode(p);
            models.update(bit_ctx, bit);
            byte = (byte << 1) | bit as u8;
            bit_ctx = (bit_ctx << 1) | bit as u32;
        }
        models.byte_done(byte);
        out.push(byte);
    }

    out
}
