//! Suffix array construction by prefix doubling.
//!
//! O(n log^2 n); ranks compare with -1 past the end of the text, so the
//! virtual end-of-input sentinel orders before every byte (a suffix that is
//! a proper prefix of another sorts first). Shared by the BWT encoder and
//! the LZX match finder, which both depend on exactly this ordering.

pub struct SuffixArray {
    /// Suffix start positions in sorted order.
    pub sa: Vec<i32>,
    /// Inverse permutation: `inv[pos]` is the rank of the suffix at `pos`.
    pub inv: Vec<i32>,
}

impl SuffixArray {
    pub fn build(text: &[u8]) -> Self {
        let n = text.len();
        if n == 0 {
            return Self {
                sa: Vec::new(),
                inv: Vec::new(),
            };
        }

        let mut sa: Vec<i32> = (0..n as i32).collect();
        let mut rank: Vec<i32> = text.iter().map(|&b| b as i32).collect();
        let mut pairs: Vec<(i32, i32, i32)> = Vec::with_capacity(n);

        let mut k = 1usize;
        while k < n {
            pairs.clear();
            for i in 0..n {
                let r1 = rank[i];
                let r2 = if i + k < n { rank[i + k] } else { -1 };
                pairs.push((r1, r2, i as i32));
            }
            pairs.sort_unstable();

            for (i, p) in pairs.iter().enumerate() {
                sa[i] = p.2;
            }

            rank[sa[0] as usize] = 0;
            for i in 1..n {
                let prev = &pairs[i - 1];
                let cur = &pairs[i];
                rank[sa[i] as usize] = if (cur.0, cur.1) == (prev.0, prev.1) {
                    rank[sa[i - 1] as usize]
                } else {
                    rank[sa[i - 1] as usize] + 1
                };
            }

            if rank[sa[n - 1] as usize] == n as i32 - 1 {
                break;
            }
            k *= 2;
        }

        let mut inv = vec![0i32; n];
        for (i, &p) in sa.iter().enumerate() {
            inv[p as usize] = i as i32;
        }

        Self { sa, inv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_suffix_sort(text: &[u8]) -> Vec<i32> {
        let mut sa: Vec<i32> = (0..text.len() as i32).collect();
        sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        sa
    }

    #[test]
    fn test_matches_naive_sort() {
        for text in [
            b"banana".to_vec(),
            b"abcabcabcabc".to_vec(),
            b"aaaaaaa".to_vec(),
            b"mississippi".to_vec(),
            (0..200u8).map(|i| i % 7).collect::<Vec<u8>>(),
        ] {
            let sa = SuffixArray::build(&text);
            assert_eq!(sa.sa, naive_suffix_sort(&text), "text: {:?}", text);
        }
    }

    #[test]
    fn test_inverse_permutation() {
        let text = b"the quick brown fox";
        let sa = SuffixArray::build(text);
        for (i, &p) in sa.sa.iter().enumerate() {
            assert_eq!(sa.inv[p as usize], i as i32);
        }
    }

    #[test]
    fn test_empty() {
        let sa = SuffixArray::build(b"");
        assert!(sa.sa.is_empty());
    }
}
