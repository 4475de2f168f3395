//! Tokenize + normalize text into a set of n-gram shingles.

use regex::Regex;
use std::collections::HashSet;

/// An ordered tuple of `k` tokens. Two shingles are equal iff their token
/// sequences are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shingle(pub Vec<String>);

impl Shingle {
    /// Bytes fed to [`crate::hash_kit::HashKit`] — tokens joined by a
    /// control character that cannot appear in a regex-tokenized word, so
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.0.join("\u{1}").into_bytes()
    }
}

const TOKEN_PATTERN: &str = r"(?ix)
    https?://[a-zA-Z0-9$\-_.+!*'(),%]+
    |
    [\#@\$\x{A3}\x{20AC}\x{A5}\x{20A9}\x{0E3F}]?\w+[%+]?
";

/// Owned, per-instance tokenizer + HTML-entity decoder.
pub struct Shingler {
    span: usize,
    token_re: Regex,
}

impl Shingler {
    /// `span` is the shingle size `k` (>= 1).
    #[must_use]
    pub fn new(span: usize) -> Self {
        Self {
            span: span.max(1),
            token_re: Regex::new(TOKEN_PATTERN).expect("static token pattern always compiles"),
        }
    }

    /// Decode HTML entities and lowercase.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        decode_html_entities(text).to_lowercase()
    }

    /// Tokenize already-normalized text with the Unicode-aware token regex.
    fn tokenize(&self, normalized: &str) -> Vec<String> {
        self.token_re.find_iter(normalized).map(|m| m.as_str().to_string()).collect()
    }

    /// Full pipeline: normalize, tokenize, assemble n-grams.
    #[must_use]
    pub fn shingles(&self, text: &str) -> HashSet<Shingle> {
        let normalized = self.normalize(text);
        let tokens = self.tokenize(&normalized);
        let mut out = HashSet::new();
        if tokens.len() >= self.span {
            for window in tokens.windows(self.span) {
                out.insert(Shingle(window.to_vec()));
            }
        } else {
            // Fewer tokens than the span: emit one tuple of all available
            // tokens, possibly empty.
            out.insert(Shingle(tokens.clone()));
        }
        out
    }
}

/// Decode a small set of named HTML entities plus numeric (`&#NNN;`,
/// `&#xHHHH;`) entities. No pack example pulls in a dedicated HTML-entity
/// crate for this narrow a need, so this is a small hand-rolled table
/// rather than an ecosystem dependency (documented in DESIGN.md).
fn decode_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &text[i..];
        if let Some(end) = rest.find(';').filter(|&end| end <= 64) {
            let entity = &rest[1..end];
            if let Some(decoded) = decode_entity(entity) {
                out.push(decoded);
                for _ in 0..entity.chars().count() + 1 {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" => return Some('\''),
        "nbsp" => return Some('\u{A0}'),
        "copy" => return Some('\u{A9}'),
        "reg" => return Some('\u{AE}'),
        "mdash" => return Some('\u{2014}'),
        "ndash" => return Some('\u{2013}'),
        "hellip" => return Some('\u{2026}'),
        _ => {}
    }
    if let Some(hex) = entity.strip_prefix('#').and_then(|s| s.strip_prefix(['x', 'X'])) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    None
}
