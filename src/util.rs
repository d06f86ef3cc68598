//! Helper module for picking numbers out of byte strings.

/// Parse the leading run of ASCII digits as a decimal number.
///
/// An empty run parses as zero, and bytes after the run are ignored, which
/// mirrors `atoi`. The result saturates, so overlong runs still compare
/// correctly against small bounds.
pub(crate) fn leading_decimal(bytes: &[u8]) -> u32 {
    let mut value: u32 = 0;
    for byte in bytes {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(byte - b'0'));
    }
    value
}

/// Get the length of the leading run of ASCII hexadecimal digits.
pub(crate) fn hex_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_hexdigit()).count()
}

/// Parse up to four ASCII hexadecimal digits.
pub(crate) fn parse_hex(bytes: &[u8]) -> Option<u16> {
    if bytes.is_empty() || 4 < bytes.len() {
        return None;
    }

    let mut value: u16 = 0;
    for byte in bytes {
        let digit = (*byte as char).to_digit(16)?;
        value = 16 * value + digit as u16;
    }
    Some(value)
}

#[cfg(test)]
mod test {
    use super::{hex_run, leading_decimal, parse_hex};

    #[test]
    fn test_leading_decimal() {
        assert_eq!(leading_decimal(b"123;45"), 123);
        assert_eq!(leading_decimal(b";45"), 0);
        assert_eq!(leading_decimal(b""), 0);
        assert_eq!(leading_decimal(b"255"), 255);
        assert!(leading_decimal(b"99999999999999999999") > 255);
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex_run(b"1e1e/2020"), 4);
        assert_eq!(hex_run(b"zz"), 0);
        assert_eq!(parse_hex(b"ffff"), Some(0xffff));
        assert_eq!(parse_hex(b"A"), Some(10));
        assert_eq!(parse_hex(b""), None);
        assert_eq!(parse_hex(b"fffff"), None);
        assert_eq!(parse_hex(b"12g4"), None);
    }
}
