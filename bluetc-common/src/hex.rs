//! Hex dumps of wire buffers, used to move attribute blobs through the command line.

use crate::parse::ParseNumError;

/// Renders `bytes` as a contiguous lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Parses a hex string into bytes.
///
/// An optional `0x` prefix and any ASCII whitespace between digits are ignored, so dumps
/// split across lines can be pasted as-is.
pub fn decode(s: &str) -> Result<Vec<u8>, ParseNumError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();

    if digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(ParseNumError::Invalid(s.to_owned()));
    }

    Ok(digits.chunks_exact(2).map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1])).collect())
}

const fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_string_success() {
        assert_eq!(encode(&[0x0c, 0x00, 0x02, 0x80]), "0c000280");
        assert_eq!(decode("0c000280").unwrap(), vec![0x0c, 0x00, 0x02, 0x80]);
        assert_eq!(decode("0x0C00 0280\n").unwrap(), vec![0x0c, 0x00, 0x02, 0x80]);
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn hex_string_fail() {
        assert!(decode("0c0").is_err());
        assert!(decode("zz").is_err());
        assert!(decode("+1").is_err());
    }
}
