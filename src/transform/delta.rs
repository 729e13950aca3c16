//! Byte delta coding.
//!
//! Replaces each byte with its difference (mod 256) from the previous one;
//! gradual value ramps become long runs of small values.

pub fn delta_encode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(input.len());
    out.push(input[0]);
    for i in 1..input.len() {
        out.push(input[i].wrapping_sub(input[i - 1]));
    }
    out
}

pub fn delta_decode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(input.len());
    out.push(input[0]);
    for i in 1..input.len() {
        let prev = out[i - 1];
        out.push(prev.wrapping_add(input[i]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_becomes_constant() {
        let data: Vec<u8> = (0..200u8).collect();
        let enc = delta_encode(&data);
        assert!(enc[1..].iter().all(|&d| d == 1));
        assert_eq!(delta_decode(&enc), data);
    }

    #[test]
    fn test_wrapping_roundtrip() {
        let data = [250u8, 3, 250, 3, 0, 255, 0];
        assert_eq!(delta_decode(&delta_encode(&data)), data);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(delta_encode(&[]).is_empty());
        assert_eq!(delta_decode(&delta_encode(&[42])), [42]);
    }
}
