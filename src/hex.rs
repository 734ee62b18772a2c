use std::fmt;

/// Lowercase hex dump of raw wire bytes, for log output.
pub(crate) struct Hex<'a>(pub &'a [u8]);

impl<'a> fmt::Display for Hex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Decodes a hex fixture, ignoring spaces so that labels can be visually separated.
#[cfg(test)]
pub(crate) fn parse(s: &str) -> Vec<u8> {
    let s = s.replace(' ', "");
    assert!(s.is_ascii());
    assert_eq!(s.len() % 2, 0, "odd number of hex digits in {s:?}");

    let mut buf = Vec::new();
    for i in (0..s.len()).step_by(2) {
        let chs = &s[i..i + 2];
        assert!(!chs.contains('+'));

        buf.push(u8::from_str_radix(chs, 16).unwrap());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse("00abff"), &[0x00, 0xab, 0xff]);
        assert_eq!(parse("03 777777 00"), &[3, b'w', b'w', b'w', 0]);
    }

    #[test]
    fn display() {
        assert_eq!(Hex(&[0x03, 0x63, 0x6e, 0x00]).to_string(), "03636e00");
        assert_eq!(Hex(&[]).to_string(), "");
    }
}
