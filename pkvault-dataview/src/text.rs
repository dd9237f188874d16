pub mod gen12;
pub mod gen3;
pub mod gen4;
pub mod utf16;

/// A fixed-width glyph table: every code is `width` bytes, strings end at `terminator`.
pub struct Charset {
    width: usize,
    terminator: Vec<u8>,
    unknown: Option<Vec<u8>>,
    decode: patricia_tree::PatriciaMap<String>,
    encode: patricia_tree::PatriciaMap<Vec<u8>>,
}

pub struct CharsetBuilder {
    charset: Charset,
}

impl CharsetBuilder {
    /// Adds a glyph used in both directions.
    pub fn add_rule(mut self, code: &[u8], s: &str) -> Self {
        self.charset.decode.insert(Box::from(code), s.to_string());
        self.charset.encode.insert(Box::from(s.as_bytes()), code.to_vec());
        self
    }

    /// Adds a glyph that only decodes, for codes that duplicate another code's text.
    pub fn add_decode_rule(mut self, code: &[u8], s: &str) -> Self {
        self.charset.decode.insert(Box::from(code), s.to_string());
        self
    }

    pub fn add_range_rules(self, first: u16, chars: &str) -> Self {
        let width = self.charset.width;
        let mut this = self;
        for (i, c) in chars.chars().enumerate() {
            let code = first + i as u16;
            let bytes = code.to_le_bytes();
            this = this.add_rule(&bytes[..width], c.encode_utf8(&mut [0u8; 4]));
        }
        this
    }

    /// Code written for characters that have no glyph, instead of dropping them.
    pub fn with_unknown(mut self, code: &[u8]) -> Self {
        self.charset.unknown = Some(code.to_vec());
        self
    }

    pub fn build(self) -> Charset {
        self.charset
    }
}

impl Charset {
    pub fn builder(width: usize, terminator: &[u8]) -> CharsetBuilder {
        CharsetBuilder {
            charset: Charset {
                width,
                terminator: terminator.to_vec(),
                unknown: None,
                decode: patricia_tree::PatriciaMap::new(),
                encode: patricia_tree::PatriciaMap::new(),
            },
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn terminator(&self) -> &[u8] {
        &self.terminator
    }

    /// Decodes up to the first terminator. Codes with no glyph are skipped.
    pub fn decode(&self, mut buf: &[u8]) -> String {
        let mut out = String::new();
        while buf.len() >= self.width {
            if buf[..self.width] == self.terminator[..] {
                break;
            }
            match self.decode.get_longest_common_prefix(buf) {
                Some((code, s)) => {
                    out.push_str(s);
                    buf = &buf[code.len()..];
                }
                None => {
                    buf = &buf[self.width..];
                }
            }
        }
        out
    }

    pub fn can_encode(&self, s: &str) -> bool {
        let mut rest = s;
        while !rest.is_empty() {
            match self.encode.get_longest_common_prefix(rest.as_bytes()) {
                Some((text, _)) => rest = &rest[text.len()..],
                None => return false,
            }
        }
        true
    }

    /// Encodes at most `max_chars` glyphs. Characters without a glyph fall back to their uppercase form, then to
    /// the unknown code if one is configured, and are otherwise dropped.
    pub fn encode(&self, s: &str, max_chars: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(max_chars * self.width);
        let mut rest = s;
        while !rest.is_empty() && out.len() < max_chars * self.width {
            if let Some((text, code)) = self.encode.get_longest_common_prefix(rest.as_bytes()) {
                out.extend_from_slice(code);
                rest = &rest[text.len()..];
                continue;
            }

            let Some(c) = rest.chars().next() else {
                break;
            };
            rest = &rest[c.len_utf8()..];

            let upper = c.to_uppercase().collect::<String>();
            if let Some(code) = self.encode.get(upper.as_bytes()) {
                out.extend_from_slice(code);
            } else if let Some(code) = self.unknown.as_ref() {
                out.extend_from_slice(code);
            }
        }
        out
    }

    /// Encodes into a fixed-size field: glyphs, then the terminator, padded with the terminator.
    pub fn write_field(&self, field: &mut [u8], s: &str) {
        let max_chars = field.len() / self.width;
        self.pad_field(field, s, max_chars.saturating_sub(1));
    }

    /// Like `write_field`, for fields whose glyphs may run to the very end with no terminator.
    pub fn fill_field(&self, field: &mut [u8], s: &str) {
        self.pad_field(field, s, field.len() / self.width);
    }

    fn pad_field(&self, field: &mut [u8], s: &str, max_chars: usize) {
        let encoded = self.encode(s, max_chars);
        field[..encoded.len()].copy_from_slice(&encoded);
        for chunk in field[encoded.len()..].chunks_mut(self.width) {
            let n = chunk.len();
            chunk.copy_from_slice(&self.terminator[..n]);
        }
    }
}
