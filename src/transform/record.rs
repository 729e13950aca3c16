//! Record interleave for fixed-size record streams (TAR's 512-byte blocks).
//!
//! Emits a 16-bit record size, then all bytes at record position 0, all at
//! position 1, and so on. Same-position bytes across records tend to agree,
//! which lines them up for the context models downstream.

/// Interleave `input` as records of `record_size` bytes.
pub fn record_interleave(input: &[u8], record_size: u16) -> Vec<u8> {
    if input.is_empty() || record_size == 0 {
        return input.to_vec();
    }

    let rs = record_size as usize;
    let num_records = input.len().div_ceil(rs);
    let mut out = Vec::with_capacity(2 + input.len());
    out.push((record_size >> 8) as u8);
    out.push((record_size & 0xFF) as u8);

    for pos in 0..rs {
        for rec in 0..num_records {
            if let Some(&b) = input.get(rec * rs + pos) {
                out.push(b);
            }
        }
    }

    out
}

/// Inverse of [`record_interleave`], using the stored record size.
///
/// Walks the same (position, record) order as the forward pass; a partial
/// last record shortens the tail rows, so the inverse cannot assume a fixed
/// row stride.
pub fn record_deinterleave(input: &[u8]) -> Vec<u8> {
    if input.len() < 2 {
        return input.to_vec();
    }

    let rs = ((input[0] as usize) << 8) | input[1] as usize;
    if rs == 0 {
        return Vec::new();
    }

    let data_size = input.len() - 2;
    let num_records = data_size.div_ceil(rs);
    let mut out = vec![0u8; data_size];
    let mut src = 2;

    for pos in 0..rs {
        for rec in 0..num_records {
            let idx = rec * rs + pos;
            if idx < data_size {
                out[idx] = input[src];
                src += 1;
            }
        }
    }

    out
}
