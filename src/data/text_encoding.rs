use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings understood by the delimited-text reader and writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    /// Decode raw bytes; `None` when the bytes are not valid in this encoding
    pub fn decode(&self, bytes: Vec<u8>) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).ok()
                } else {
                    String::from_utf8(bytes).ok()
                }
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode text; returns the first character that cannot be represented
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
                .collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("unsupported text encoding '{}'", other)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("UTF-8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("latin1".parse::<TextEncoding>(), Ok(TextEncoding::Latin1));
        assert_eq!(
            "ISO-8859-1".parse::<TextEncoding>(),
            Ok(TextEncoding::Latin1)
        );
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert_eq!(TextEncoding::Utf8.decode(vec![0x61, 0xff]), None);
        assert_eq!(
            TextEncoding::Utf8.decode(b"\xEF\xBB\xBFa,b".to_vec()),
            Some("a,b".to_string())
        );
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = vec![0x63, 0x61, 0x66, 0xe9];
        let text = TextEncoding::Latin1.decode(bytes.clone()).unwrap();
        assert_eq!(text, "café");
        assert_eq!(TextEncoding::Latin1.encode(&text), Ok(bytes));
        assert_eq!(TextEncoding::Latin1.encode("€"), Err('€'));
    }
}
