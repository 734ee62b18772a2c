//! Presentation format: the dot-separated, escape-encoded text form of a name.
//!
//! Escapes follow RFC 1035 section 5.1: `\X` stands for the byte `X` itself (used for `\.` and
//! `\\`), and `\DDD` for the byte with decimal value `DDD`.

use std::fmt::{self, Write};

use super::Name;
use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LabelStart,
    InLabel,
    EscapeStart,
    EscapeDigit1,
    EscapeDigit2,
}

/// Parses presentation text into wire bytes, including the terminating root label.
///
/// A trailing `.` is allowed but not required. The empty string and `.` both denote the root.
pub(crate) fn parse(text: &[u8]) -> Result<Vec<u8>, ParseError> {
    if text.is_empty() || text == b"." {
        return Ok(vec![0]);
    }

    let mut wire = Vec::with_capacity(Name::MAX_LEN.min(text.len() + 2));
    // Position of the length byte of the label currently being filled.
    let mut start = 0;
    let mut value: u16 = 0;
    let mut state = State::LabelStart;
    for &ch in text {
        if state == State::LabelStart {
            if ch == b'.' {
                return Err(ParseError::LeadingDot);
            }
            start = wire.len();
            wire.push(0);
            state = State::InLabel;
        }

        state = match state {
            State::LabelStart | State::InLabel => match ch {
                b'\\' => State::EscapeStart,
                b'.' => {
                    close_label(&mut wire, start)?;
                    State::LabelStart
                }
                _ => {
                    push(&mut wire, start, ch)?;
                    State::InLabel
                }
            },
            State::EscapeStart => match ch {
                b'0'..=b'9' => {
                    value = u16::from(ch - b'0');
                    State::EscapeDigit1
                }
                _ => {
                    push(&mut wire, start, ch)?;
                    State::InLabel
                }
            },
            State::EscapeDigit1 => match ch {
                b'0'..=b'9' => {
                    value = value * 10 + u16::from(ch - b'0');
                    State::EscapeDigit2
                }
                _ => return Err(ParseError::IncompleteEscape),
            },
            State::EscapeDigit2 => match ch {
                b'0'..=b'9' => {
                    value = value * 10 + u16::from(ch - b'0');
                    let byte = u8::try_from(value).map_err(|_| ParseError::EscapeOutOfRange)?;
                    push(&mut wire, start, byte)?;
                    State::InLabel
                }
                _ => return Err(ParseError::IncompleteEscape),
            },
        };
    }

    match state {
        // Input ended with a `.`; the last label is already closed.
        State::LabelStart => {}
        State::InLabel => close_label(&mut wire, start)?,
        State::EscapeStart | State::EscapeDigit1 | State::EscapeDigit2 => {
            return Err(ParseError::IncompleteEscape)
        }
    }

    wire.push(0);
    if wire.len() > Name::MAX_LEN {
        return Err(ParseError::NameTooLong);
    }
    Ok(wire)
}

fn push(wire: &mut Vec<u8>, start: usize, byte: u8) -> Result<(), ParseError> {
    if wire.len() - start > crate::Label::MAX_LEN {
        return Err(ParseError::LabelTooLong);
    }
    wire.push(byte);
    Ok(())
}

fn close_label(wire: &mut [u8], start: usize) -> Result<(), ParseError> {
    let len = wire.len() - start - 1;
    if len > crate::Label::MAX_LEN {
        return Err(ParseError::LabelTooLong);
    }
    // Leave room for the root label.
    if wire.len() + 1 > Name::MAX_LEN {
        return Err(ParseError::NameTooLong);
    }
    wire[start] = len as u8;
    Ok(())
}

/// Writes the escaped presentation form of a single label's content.
pub(crate) fn write_escaped<W: Write + ?Sized>(w: &mut W, label: &[u8]) -> fmt::Result {
    for &b in label {
        match b {
            b'.' => w.write_str("\\.")?,
            b'\\' => w.write_str("\\\\")?,
            0x21..=0x7e => w.write_char(char::from(b))?,
            _ => write!(w, "\\{:03}", b)?,
        }
    }
    Ok(())
}

/// Displays a [`Name`] in presentation format.
///
/// Returned by [`Name::presentation`]. By default, labels are separated by `.` and the output ends
/// with a trailing `.`; both can be changed with [`Presentation::separator`] and
/// [`Presentation::trailing`].
#[derive(Clone, Copy)]
pub struct Presentation<'a> {
    name: &'a Name,
    separator: &'a str,
    trailing: bool,
}

impl<'a> Presentation<'a> {
    pub(crate) fn new(name: &'a Name) -> Self {
        Self {
            name,
            separator: ".",
            trailing: true,
        }
    }

    /// Sets the string written between labels.
    pub fn separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    /// Sets whether the output ends with a separator.
    ///
    /// When disabled, the root name is displayed as an empty string.
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }
}

impl fmt::Display for Presentation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.name.label_count();
        for (i, label) in self.name.labels().enumerate() {
            write_escaped(f, label)?;
            if self.trailing || i + 1 < count {
                f.write_str(self.separator)?;
            }
        }
        if count == 0 && self.trailing {
            f.write_str(self.separator)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Presentation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        write!(QuoteEscaper(&mut *f), "{}", self)?;
        f.write_char('"')
    }
}

/// Escapes `"` as `\"` so that quoted `Debug` output stays unambiguous.
///
/// `\"` is itself valid presentation format for a literal `"`.
pub(crate) struct QuoteEscaper<'a, W: Write + ?Sized>(pub &'a mut W);

impl<W: Write + ?Sized> Write for QuoteEscaper<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for (i, part) in s.split('"').enumerate() {
            if i > 0 {
                self.0.write_str("\\\"")?;
            }
            self.0.write_str(part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::hex;

    fn escaped(label: &[u8]) -> String {
        let mut s = String::new();
        write_escaped(&mut s, label).unwrap();
        s
    }

    #[test]
    fn root() {
        assert_eq!(parse(b"").unwrap(), [0]);
        assert_eq!(parse(b".").unwrap(), [0]);
    }

    #[test]
    fn trailing_dot_is_optional() {
        let expected = hex::parse("03 777777 04 62757074 03 656475 02 636e 00");
        assert_eq!(parse(b"www.bupt.edu.cn").unwrap(), expected);
        assert_eq!(parse(b"www.bupt.edu.cn.").unwrap(), expected);
    }

    #[test]
    fn escapes() {
        assert_eq!(parse(br"E\..").unwrap(), [2, b'E', b'.', 0]);
        assert_eq!(parse(br"a\\b").unwrap(), [3, b'a', b'\\', b'b', 0]);
        assert_eq!(parse(br"\005").unwrap(), [1, 5, 0]);
        assert_eq!(parse(br"\255x").unwrap(), [2, 255, b'x', 0]);
        assert_eq!(parse(br"a\002bb.").unwrap(), [4, b'a', 2, b'b', b'b', 0]);
        // Any non-digit is taken literally.
        assert_eq!(parse(br"\q").unwrap(), [1, b'q', 0]);
        // Escapes may start a label.
        assert_eq!(parse(br"\.").unwrap(), [1, b'.', 0]);
    }

    #[test]
    fn bad_escapes() {
        assert_eq!(parse(br"a\"), Err(ParseError::IncompleteEscape));
        assert_eq!(parse(br"a\1"), Err(ParseError::IncompleteEscape));
        assert_eq!(parse(br"a\12"), Err(ParseError::IncompleteEscape));
        assert_eq!(parse(br"a\12.b"), Err(ParseError::IncompleteEscape));
        assert_eq!(parse(br"a\1x3"), Err(ParseError::IncompleteEscape));
        assert_eq!(parse(br"\256"), Err(ParseError::EscapeOutOfRange));
        assert_eq!(parse(br"\999"), Err(ParseError::EscapeOutOfRange));
    }

    #[test]
    fn empty_labels() {
        assert_eq!(parse(b".com"), Err(ParseError::LeadingDot));
        assert_eq!(parse(b"a..b"), Err(ParseError::LeadingDot));
        assert_eq!(parse(b".."), Err(ParseError::LeadingDot));
        assert_eq!(parse(b"com.."), Err(ParseError::LeadingDot));
    }

    #[test]
    fn label_length() {
        let ok = "x".repeat(63);
        assert_eq!(parse(ok.as_bytes()).unwrap().len(), 65);

        let long = "x".repeat(64);
        assert_eq!(parse(long.as_bytes()), Err(ParseError::LabelTooLong));

        let long = format!("1{}.com.", "2".repeat(69));
        assert_eq!(parse(long.as_bytes()), Err(ParseError::LabelTooLong));

        // Escapes count as a single byte.
        let escaped = r"\046".repeat(63);
        assert_eq!(parse(escaped.as_bytes()).unwrap().len(), 65);
    }

    #[test]
    fn name_length() {
        // 4 labels of 63 bytes: 4 * 64 + 1 = 257 bytes.
        let label = "x".repeat(63);
        let long = [&*label, &*label, &*label, &*label].join(".");
        assert_eq!(parse(long.as_bytes()), Err(ParseError::NameTooLong));

        // 3 * 64 + 62 + 1 = 255 bytes is the maximum.
        let max = [&*label, &*label, &*label, &"x".repeat(61)].join(".");
        assert_eq!(parse(max.as_bytes()).unwrap().len(), 255);

        let over = [&*label, &*label, &*label, &"x".repeat(62)].join(".");
        assert_eq!(parse(over.as_bytes()), Err(ParseError::NameTooLong));
    }

    #[test]
    fn opaque_octets() {
        assert_eq!(parse("ä".as_bytes()).unwrap(), [2, 0xc3, 0xa4, 0]);
        assert_eq!(escaped("ä".as_bytes()), r"\195\164");
    }

    #[test]
    fn escaping() {
        assert_eq!(escaped(b"E."), r"E\.");
        assert_eq!(escaped(&[5]), r"\005");
        assert_eq!(escaped(b" "), r"\032");
        assert_eq!(escaped(&[0x7f]), r"\127");
        expect![[r#"a\\b~!"#]].assert_eq(&escaped(b"a\\b~!"));
    }
}
