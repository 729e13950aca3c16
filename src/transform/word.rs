//! Word tokenizer: common text/markup/code fragments become single bytes.
//!
//! Each position is matched against a fixed token table (first match wins,
//! so table order is part of the format); hits emit `0x80 | index`. Plain
//! bytes below 0x80 pass through, everything else is escaped with `0x7F`.
//! Both directions share [`TOKENS`], so the table is the format.

const ESC: u8 = 0x7F;

/// Token table. Order matters: encoding takes the first match.
const TOKENS: &[&[u8]] = &[
    b"the ", b"The ", b" the ", b" and ", b" of ", b" to ", b" in ", b" is ",
    b" a ", b"this ", b"for ", b"with ", b" or ", b" be ", b" as ", b" on ",
    b" at ", b" by ", b" an ", b"that ", b" it ", b" are ", b" was ", b" not ",
    b"  ", b"   ", b"    ", b"\n  ", b"\n    ", b"\r\n", b"\n",
    b"</", b"/>", b"=\"", b"\">", b"'>", b"\":", b"\": ", b"\",", b"\"}", b"\"]",
    b"return ", b"void ", b"int ", b"if (", b"else ", b"for (", b"while (",
    b"function", b"class ", b"const ", b"static ", b"public ", b"private ",
    b"true", b"false", b"null", b"new ", b"var ", b"let ",
    b"http://", b"https://", b".com", b".org",
    b"ing ", b"tion", b"ment", b"ness",
];

fn match_token(data: &[u8]) -> Option<usize> {
    TOKENS.iter().position(|t| data.starts_with(t))
}

pub fn word_encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if let Some(idx) = match_token(&input[i..]) {
            out.push(0x80 | idx as u8);
            i += TOKENS[idx].len();
        } else if input[i] >= 0x80 || input[i] == ESC {
            out.push(ESC);
            out.push(input[i]);
            i += 1;
        } else {
            out.push(input[i]);
            i += 1;
        }
    }

    out
}

pub fn word_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 2);
    let mut i = 0;

    while i < input.len() {
        if input[i] == ESC && i + 1 < input.len() {
            out.push(input[i + 1]);
            i += 2;
        } else if input[i] >= 0x80 {
            let idx = (input[i] & 0x7F) as usize;
            if let Some(token) = TOKENS.get(idx) {
                out.extend_from_slice(token);
            }
            i += 1;
        } else {
            out.push(input[i]);
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_fits_tag_space() {
        assert!(TOKENS.len() <= 127);
    }

    #[test]
    fn test_common_text_shrinks() {
        let data = b"the quick fox and the lazy dog and the end";
        let enc = word_encode(data);
        assert!(enc.len() < data.len());
        assert_eq!(word_decode(&enc), data);
    }

    #[test]
    fn test_html_fragments() {
        let data = b"<a href=\"https://example.com\">link</a>\r\n";
        assert_eq!(word_decode(&word_encode(data)), data);
    }

    #[test]
    fn test_high_bytes_escaped() {
        let data: Vec<u8> = (0x7Eu8..=0x85).chain([ESC, 0xFF]).collect();
        let enc = word_encode(&data);
        assert_eq!(word_decode(&enc), data);
    }

    #[test]
    fn test_binary_roundtrip() {
        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(word_decode(&word_encode(&data)), data);
    }

    #[test]
    fn test_trailing_escape_byte() {
        // A lone 0x7F at the end decodes as itself.
        assert_eq!(word_decode(&[ESC]), [ESC]);
    }
}
