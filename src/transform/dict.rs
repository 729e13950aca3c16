//! Static-dictionary LZ for small files.
//!
//! Matches can reference either a fixed dictionary of common tokens
//! (brotli's idea: bootstrap small inputs with patterns they never had a
//! chance to repeat yet) or the input's own sliding window.
//!
//! Framing:
//!
//! | Form | Bytes |
//! |---|---|
//! | literal < 0xF0 | `b` |
//! | literal >= 0xF0 | `0xF0, b` |
//! | dictionary match | `0xF1, len - 3, off_hi, off_lo` (absolute dict offset) |
//! | window match | `0xF2, len - 3, off_hi, off_lo` (backward distance) |
//!
//! The dictionary blob is deterministic: both sides assemble it from
//! [`DICT_TOKENS`] in table order, so the table is part of the format.

use std::collections::HashMap;
use std::sync::OnceLock;

const ESC_LIT: u8 = 0xF0;
const ESC_DICT: u8 = 0xF1;
const ESC_WIN: u8 = 0xF2;
const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 255 + MIN_MATCH;
const WINDOW: usize = 32_768;

/// Token catalog the static dictionary is assembled from: frequent English
/// words, word endings, HTML/XML tags and attributes, CSS, JavaScript and
/// JSON fragments, punctuation, digit strings, source-language keywords,
/// file extensions, URL prefixes, abbreviations, PDF markers.
const DICT_TOKENS: &[&str] = &[
    // Most common English words (sorted by frequency)
    "the ", "The ", " the ", " and ", "and ", " of ", " to ", " in ", " is ",
    "that ", " that", " for ", "was ", " was", " on ", " with ", "his ", "they ",
    "are ", " are", " be ", " at ", " one ", "have ", " have", "this ", " this",
    "from ", " from", " or ", " had ", "had ", " by ", " not ", "but ", " but",
    "what ", " what", "all ", " all", "were ", " were", "when ", " when",
    "your ", " your", "can ", " can", "said ", " said", "there ", " there",
    "use ", " use", "each ", " each", "which ", " which", "she ", " she",
    "how ", " how", "their ", " their", "will ", " will", "other ", " other",
    "about ", " about", "out ", " out", "many ", " many", "then ", " then",
    "them ", " them", "these ", " these", "some ", " some", "her ", " her",
    "would ", " would", "make ", " make", "like ", " like", "into ", " into",
    "has ", " has", "two ", " two", "more ", " more", "write ", " write",
    "see ", " see", "number ", " number", "way ", " way", "could ", " could",
    "people ", " people", "than ", " than", "first ", " first", "been ", " been",
    "call ", " call", "who ", " who", "its ", " its", "now ", " now",
    "find ", " find", "long ", " long", "down ", " down", "day ", " day",
    "did ", " did", "get ", " get", "come ", " come", "made ", " made",
    "may ", " may", "part ", " part",
    // Common word endings
    "tion ", "tion.", "tion,", "tions ", "ing ", "ing.", "ing,", "ings ",
    "ment ", "ment.", "ment,", "ments ", "able ", "ible ", "ness ", "less ",
    "ful ", "ous ", "ive ", "ed ", "ed.", "ed,", "ly ", "ly.", "ly,",
    "er ", "er.", "er,", "ers ", "est ", "al ", "al.", "al,",
    // HTML/XML common patterns
    "<!DOCTYPE html>", "<!DOCTYPE ", "<html>", "</html>", "<head>", "</head>",
    "<body>", "</body>", "<div>", "</div>", "<span>", "</span>",
    "<p>", "</p>", "<a ", "</a>", "<img ", "<br>", "<br/>", "<hr>",
    "<ul>", "</ul>", "<ol>", "</ol>", "<li>", "</li>",
    "<table>", "</table>", "<tr>", "</tr>", "<td>", "</td>", "<th>", "</th>",
    "<form>", "</form>", "<input ", "<button>", "</button>",
    "<script>", "</script>", "<style>", "</style>", "<link ", "<meta ",
    "<title>", "</title>", "<header>", "</header>", "<footer>", "</footer>",
    "<nav>", "</nav>", "<section>", "</section>", "<article>", "</article>",
    "<h1>", "</h1>", "<h2>", "</h2>", "<h3>", "</h3>",
    // HTML attributes
    " class=\"", " id=\"", " href=\"", " src=\"", " style=\"", " type=\"",
    " name=\"", " value=\"", " alt=\"", " title=\"", " width=\"", " height=\"",
    " rel=\"", " target=\"", " data-", " aria-", " onclick=\"", " onload=\"",
    // CSS properties
    "font-family:", "font-size:", "font-weight:", "color:", "background:",
    "background-color:", "margin:", "margin-top:", "margin-bottom:",
    "margin-left:", "margin-right:", "padding:", "padding-top:",
    "padding-bottom:", "padding-left:", "padding-right:", "border:",
    "border-radius:", "display:", "position:", "width:", "height:",
    "max-width:", "min-width:", "text-align:", "line-height:", "float:",
    "clear:", "overflow:", "z-index:", "opacity:", "transform:",
    // Common CSS values
    ": 0;", ": 0px;", ": auto;", ": none;", ": block;", ": inline;",
    ": inline-block;", ": flex;", ": relative;", ": absolute;", ": fixed;",
    "px;", "em;", "rem;", "%;", "vh;", "vw;",
    // JavaScript patterns
    "function ", "function(", "return ", "return;", "var ", "let ", "const ",
    "if (", "if(", "else {", "else{", "else if", "for (", "for(",
    "while (", "while(", "switch (", "switch(", "case ", "break;",
    "continue;", "null", "undefined", "true", "false", "this.",
    "document.", "window.", "console.log", ".length", ".push(",
    ".forEach(", ".map(", ".filter(", ".reduce(", "=>", "===", "!==",
    // JSON patterns
    "\":", "\": ", "\",", "\": \"", "\"}", "\": {", "\": [", "],",
    "null,", "true,", "false,", "null}", "true}", "false}",
    // XML/namespace patterns
    "<?xml ", "version=\"", "encoding=\"", "xmlns:", "xmlns=\"",
    "<![CDATA[", "]]>", "<!--", "-->",
    // Common punctuation sequences
    ". ", ", ", "; ", ": ", "? ", "! ", "...", " - ", " \u{2013} ", " \u{2014} ",
    "(", ")", "[", "]", "{", "}", "\"", "'", "`",
    "\r\n", "\n\n", "  ", "    ", "\t",
    // Numbers
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
    "10", "20", "100", "1000", "2000", "2024", "2025", "2026",
    // Programming common
    "#include ", "#define ", "#ifdef ", "#ifndef ", "#endif", "#pragma ",
    "public ", "private ", "protected ", "static ", "virtual ", "override ",
    "class ", "struct ", "enum ", "typedef ", "template ", "typename ",
    "namespace ", "using ", "new ", "delete ", "void ", "int ", "char ",
    "bool ", "float ", "double ", "string ", "vector", "map", "set",
    "std::", "nullptr", "sizeof(", "static_cast<", "dynamic_cast<",
    // File extensions in paths
    ".html", ".htm", ".css", ".js", ".json", ".xml", ".txt", ".md",
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".pdf", ".zip",
    ".cpp", ".hpp", ".c", ".h", ".py", ".java", ".go", ".rs",
    // URL patterns
    "http://", "https://", "www.", ".com", ".org", ".net", ".io",
    "/index", "/api/", "/v1/", "/v2/",
    // Common abbreviations
    "e.g.", "i.e.", "etc.", "vs.", "Dr.", "Mr.", "Mrs.", "Ms.",
    // PDF patterns
    "%PDF-", "endobj", "endstream", "stream", " obj\n<<", ">> \n",
    " /Type /", " /Pages ", " /Kids [", " /Count ", " /Parent ",
    " /MediaBox [", " /Contents ", " /Length ", " 0 R", " 0 R >>",
    " 0 R]\n", "trailer", "startxref", "%%EOF", "xref\n",
    "0000000", " 65535 f", " 00000 n", "/Catalog", "/Page",
];

/// The assembled dictionary blob. Built once per process, immutable after.
pub fn static_dict() -> &'static [u8] {
    static DICT: OnceLock<Vec<u8>> = OnceLock::new();
    DICT.get_or_init(|| {
        let mut dict = Vec::with_capacity(8192);
        for token in DICT_TOKENS {
            dict.extend_from_slice(token.as_bytes());
        }
        dict
    })
}

/// 3-byte-key index into the dictionary blob.
fn dict_index() -> &'static HashMap<u32, Vec<usize>> {
    static INDEX: OnceLock<HashMap<u32, Vec<usize>>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let dict = static_dict();
        let mut index: HashMap<u32, Vec<usize>> = HashMap::new();
        for i in 0..dict.len().saturating_sub(3) {
            index.entry(hash3(&dict[i..])).or_default().push(i);
        }
        index
    })
}

#[inline]
fn hash3(p: &[u8]) -> u32 {
    ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32
}

pub fn dict_encode(input: &[u8]) -> Vec<u8> {
    if input.is_empty() {
        return Vec::new();
    }

    let dict = static_dict();
    let index = dict_index();

    let mut out = Vec::with_capacity(input.len());
    let mut win: HashMap<u32, Vec<usize>> = HashMap::new();
    let mut i = 0;

    while i < input.len() {
        let mut best_len = 0usize;
        let mut best_off = 0usize;
        let mut from_dict = false;

        if i + 2 < input.len() {
            let h = hash3(&input[i..]);

            if let Some(positions) = index.get(&h) {
                for &pos in positions {
                    let mut len = 0;
                    while i + len < input.len()
                        && pos + len < dict.len()
                        && len < MAX_MATCH
                        && dict[pos + len] == input[i + len]
                    {
                        len += 1;
                    }
                    if len >= MIN_MATCH && len > best_len {
                        best_len = len;
                        best_off = pos;
                        from_dict = true;
                    }
                }
            }

            if let Some(positions) = win.get(&h) {
                for &pos in positions.iter().rev() {
                    if i - pos > WINDOW {
                        break;
                    }
                    let mut len = 0;
                    while i + len < input.len()
                        && len < MAX_MATCH
                        && input[pos + len] == input[i + len]
                    {
                        len += 1;
                    }
                    if len >= MIN_MATCH && len > best_len {
                        best_len = len;
                        best_off = i - pos;
                        from_dict = false;
                    }
                }
            }
        }

        if best_len >= MIN_MATCH {
            out.push(if from_dict { ESC_DICT } else { ESC_WIN });
            out.push((best_len - MIN_MATCH) as u8);
            out.push((best_off >> 8) as u8);
            out.push((best_off & 0xFF) as u8);

            for j in 0..best_len {
                if i + j + 2 < input.len() {
                    let chain = win.entry(hash3(&input[i + j..])).or_default();
                    chain.push(i + j);
                    if chain.len() > 64 {
                        chain.remove(0);
                    }
                }
            }
            i += best_len;
        } else {
            if input[i] >= ESC_LIT {
                out.push(ESC_LIT);
            }
            out.push(input[i]);

            if i + 2 < input.len() {
                let chain = win.entry(hash3(&input[i..])).or_default();
                chain.push(i);
                if chain.len() > 64 {
                    chain.remove(0);
                }
            }
            i += 1;
        }
    }

    out
}

pub fn dict_decode(input: &[u8]) -> Vec<u8> {
    let dict = static_dict();
    let mut out = Vec::with_capacity(input.len() * 2);
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            ESC_LIT => {
                if i + 1 >= input.len() {
                    break;
                }
                out.push(input[i + 1]);
                i += 2;
            }
            ESC_DICT => {
                if i + 3 >= input.len() {
                    break;
                }
                let len = input[i + 1] as usize + MIN_MATCH;
                let off = ((input[i + 2] as usize) << 8) | input[i + 3] as usize;
                for j in 0..len {
                    if off + j >= dict.len() {
                        break;
                    }
                    out.push(dict[off + j]);
                }
                i += 4;
            }
            ESC_WIN => {
                if i + 3 >= input.len() {
                    break;
                }
                let len = input[i + 1] as usize + MIN_MATCH;
                let off = ((input[i + 2] as usize) << 8) | input[i + 3] as usize;
                if off > out.len() || off == 0 {
                    break;
                }
                super::lz77::copy_match(&mut out, off, len);
                i += 4;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    out
}
