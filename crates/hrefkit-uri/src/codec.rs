//! Percent-encoding per URL component
//!
//! Every [`Uri`](crate::Uri) carries a [`Codec`]: the encoder and decoder it
//! applies when components are written or read. The default is UTF-8
//! percent-encoding over the RFC 3986 unreserved set. The legacy Latin-1
//! charset emits `%XX` for code units below 256 and `%uXXXX` above.

use serde::{Deserialize, Serialize};

/// Characters the strict encoder leaves alone besides ASCII alphanumerics
const UNRESERVED: &[u8] = b"-_.~";

/// Characters the Latin-1 escaper leaves alone besides ASCII alphanumerics
const ESCAPE_SAFE: &[u8] = b"@*_+-./";

/// Sub-delimiters and separators that are legal inside a path segment
const PATH_SEGMENT_KEEP: &[u8] = b"$&+,;=:@";

/// RFC 3986 gen-delims and sub-delims
const RESERVED_KEEP: &[u8] = b":/?#[]@!$&'()*+,;=";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// UTF-8 percent-encoding
    #[default]
    Unicode,
    /// Latin-1 `%XX` / `%uXXXX` escaping
    Iso8859,
}

impl Charset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Charset::Unicode => "unicode",
            Charset::Iso8859 => "iso8859",
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unicode" | "utf8" | "utf-8" => Ok(Charset::Unicode),
            "iso8859" | "iso-8859-1" | "latin1" => Ok(Charset::Iso8859),
            _ => Err(format!("Unknown charset: {}", s)),
        }
    }
}

/// Encoder/decoder pair used for every component of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Codec {
    pub encoder: Charset,
    pub decoder: Charset,
}

impl Codec {
    pub const UNICODE: Codec = Codec {
        encoder: Charset::Unicode,
        decoder: Charset::Unicode,
    };

    pub const ISO8859: Codec = Codec {
        encoder: Charset::Iso8859,
        decoder: Charset::Iso8859,
    };

    pub fn new(charset: Charset) -> Self {
        Self {
            encoder: charset,
            decoder: charset,
        }
    }

    pub fn encode(&self, input: &str) -> String {
        match self.encoder {
            Charset::Unicode => urlencoding::encode(input).into_owned(),
            Charset::Iso8859 => escape(input),
        }
    }

    /// Decode, returning `None` when the input does not decode to valid text
    pub fn try_decode(&self, input: &str) -> Option<String> {
        match self.decoder {
            Charset::Unicode => urlencoding::decode(input).ok().map(|s| s.into_owned()),
            Charset::Iso8859 => Some(unescape(input)),
        }
    }

    /// Decode leniently: undecodable input is returned unchanged
    pub fn decode(&self, input: &str) -> String {
        self.try_decode(input).unwrap_or_else(|| {
            tracing::warn!(input, "Keeping undecodable percent-encoding verbatim");
            input.to_string()
        })
    }

    /// `application/x-www-form-urlencoded` flavour: spaces become `+`
    pub fn encode_query(&self, input: &str) -> String {
        self.encode(input).replace("%20", "+")
    }

    pub fn decode_query(&self, input: &str) -> String {
        self.decode(&input.replace('+', "%20"))
    }

    /// Decode and re-encode one query name or value; undecodable input is kept
    pub fn recode_query(&self, input: &str) -> String {
        match self.try_decode(&input.replace('+', "%20")) {
            Some(decoded) => self.encode_query(&decoded),
            None => input.to_string(),
        }
    }

    pub fn encode_path_segment(&self, input: &str) -> String {
        unescape_allowed(&self.encode(input), PATH_SEGMENT_KEEP)
    }

    /// Decode a segment but keep the characters that would split it escaped
    pub fn decode_path_segment(&self, input: &str) -> String {
        let decoded = self.decode(input);
        let mut out = String::with_capacity(decoded.len());
        for c in decoded.chars() {
            match c {
                '/' => out.push_str("%2F"),
                '?' => out.push_str("%3F"),
                '#' => out.push_str("%23"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Decode and re-encode every segment of a path
    pub fn recode_path(&self, path: &str) -> String {
        path.split('/')
            .map(|segment| match self.try_decode(segment) {
                Some(decoded) => self.encode_path_segment(&decoded),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn decode_path(&self, path: &str) -> String {
        path.split('/')
            .map(|segment| self.decode_path_segment(segment))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Encode everything except the RFC 3986 reserved characters
    pub fn encode_reserved(&self, input: &str) -> String {
        unescape_allowed(&self.encode(input), RESERVED_KEEP)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec::UNICODE
    }
}

impl From<Charset> for Codec {
    fn from(charset: Charset) -> Self {
        Codec::new(charset)
    }
}

/// Latin-1 escaping: `%XX` below 256, `%uXXXX` for other UTF-16 code units
fn escape(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for unit in input.encode_utf16() {
        if (unit < 0x80 && (unit as u8).is_ascii_alphanumeric()) || is_escape_safe(unit) {
            result.push(unit as u8 as char);
        } else if unit < 0x100 {
            result.push_str(&format!("%{:02X}", unit));
        } else {
            result.push_str(&format!("%u{:04X}", unit));
        }
    }
    result
}

fn is_escape_safe(unit: u16) -> bool {
    unit < 0x80 && ESCAPE_SAFE.contains(&(unit as u8))
}

/// Inverse of [`escape`]; malformed sequences are kept as literal text
fn unescape(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '%' {
            if chars.get(i + 1) == Some(&'u') {
                if let Some(unit) = chars.get(i + 2..i + 6).and_then(hex_value) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            } else if let Some(unit) = chars.get(i + 1..i + 3).and_then(hex_value) {
                units.push(unit);
                i += 3;
                continue;
            }
        }

        let mut buf = [0u16; 2];
        units.extend_from_slice(chars[i].encode_utf16(&mut buf));
        i += 1;
    }

    String::from_utf16_lossy(&units)
}

fn hex_value(digits: &[char]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, c| {
        c.to_digit(16).map(|d| (acc << 4) | d as u16)
    })
}

/// Turn `%XX` back into its character when the byte is in `allowed`
fn unescape_allowed(encoded: &str, allowed: &[u8]) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let byte = tail
            .get(1..3)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|h| u8::from_str_radix(h, 16).ok());

        match byte {
            Some(b) if allowed.contains(&b) => {
                out.push(b as char);
                rest = &tail[3..];
            }
            _ => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_encode() {
        let codec = Codec::UNICODE;
        assert_eq!(codec.encode("a b"), "a%20b");
        assert_eq!(codec.encode("!'()*"), "%21%27%28%29%2A");
        assert_eq!(codec.encode("ä"), "%C3%A4");
        assert_eq!(codec.encode("-_.~"), "-_.~");
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = Codec::UNICODE;
        for input in ["hello world", "ä/ö?ü#", "a+b=c&d", "日本語"] {
            assert_eq!(codec.decode(&codec.encode(input)), input);
        }

        let legacy = Codec::ISO8859;
        for input in ["hello world", "äöü", "€uro", "@*_+-./"] {
            assert_eq!(legacy.decode(&legacy.encode(input)), input);
        }
    }

    #[test]
    fn test_invalid_utf8_is_kept() {
        let codec = Codec::UNICODE;
        assert_eq!(codec.try_decode("%E4"), None);
        assert_eq!(codec.decode("%E4.html"), "%E4.html");
    }

    #[test]
    fn test_latin1_escape() {
        let codec = Codec::ISO8859;
        assert_eq!(codec.encode("ä"), "%E4");
        assert_eq!(codec.encode("€"), "%u20AC");
        assert_eq!(codec.encode("a b"), "a%20b");
        assert_eq!(codec.decode("%E4%u20AC%zz"), "ä€%zz");
    }

    #[test]
    fn test_query_codec() {
        let codec = Codec::UNICODE;
        assert_eq!(codec.encode_query("a b&c"), "a+b%26c");
        assert_eq!(codec.decode_query("a+b%26c"), "a b&c");
        assert_eq!(codec.recode_query("a%20b%7E"), "a+b~");
        assert_eq!(codec.recode_query("x+%E4"), "x+%E4");
    }

    #[test]
    fn test_path_segment() {
        let codec = Codec::UNICODE;
        assert_eq!(codec.encode_path_segment("a:b@c$d"), "a:b@c$d");
        assert_eq!(codec.encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(codec.decode_path_segment("a%2Fb%20c"), "a%2Fb c");
        assert_eq!(codec.recode_path("/foo bar/%7Ebaz"), "/foo%20bar/~baz");
        assert_eq!(codec.decode_path("/foo%20bar/x%2Fy"), "/foo bar/x%2Fy");
    }

    #[test]
    fn test_encode_reserved() {
        let codec = Codec::UNICODE;
        assert_eq!(codec.encode_reserved("/a b?c=d#e"), "/a%20b?c=d#e");
    }

    #[test]
    fn test_charset_from_str() {
        assert_eq!("UTF-8".parse::<Charset>().unwrap(), Charset::Unicode);
        assert_eq!("latin1".parse::<Charset>().unwrap(), Charset::Iso8859);
        assert!("ebcdic".parse::<Charset>().is_err());
    }
}
