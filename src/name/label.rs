//! Owned domain name labels.

use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
    mem,
    str::FromStr,
};

use super::presentation;
use crate::Error;

// 1 discr. byte + 2 usizes for the `Outline` variant (padded to 3 * usize)
// That means the inline variant can use `3 * usize - 1 byte` of total memory. One of those is used
// for the length.
const LABEL_MAX_INLINE_LEN: usize = mem::size_of::<usize>() * 3 - 1 - 1;

#[derive(Clone)]
enum LabelRepr {
    Inline {
        buf: [u8; LABEL_MAX_INLINE_LEN],
        len: u8,
    },
    Outline {
        data: Box<[u8]>,
    },
}

/// A `.`-separated component of a [`Name`].
///
/// Labels consist of arbitrary bytes and have a maximum length of 63 bytes. This type can only
/// represent non-empty labels, so the minimum length is 1 byte.
///
/// Comparison and hashing ignore ASCII case, like they do for whole [`Name`]s.
///
/// [`Name`]: crate::Name
#[derive(Clone)]
pub struct Label {
    repr: LabelRepr,
}

impl Label {
    /// The maximum length of a domain label.
    pub const MAX_LEN: usize = 0b0011_1111;

    /// Creates a [`Label`] from raw bytes or a string slice, panicking if the bytes are an invalid
    /// label.
    ///
    /// The bytes are taken verbatim; no escape sequences are interpreted. Use the [`FromStr`]
    /// implementation to parse an escaped label.
    ///
    /// # Panics
    ///
    /// This function will panic if `bytes` is empty or contains more than [`Self::MAX_LEN`] bytes.
    pub fn new(label: impl AsRef<[u8]>) -> Self {
        Self::new_impl(label.as_ref())
    }

    fn new_impl(label: &[u8]) -> Self {
        Self::try_new(label)
            .unwrap_or_else(|_| panic!("`Label::new` called with invalid data: {:?}", label))
    }

    /// Creates a [`Label`] from raw bytes or a string slice, returning an error if the bytes are
    /// an invalid label.
    pub fn try_new(label: impl AsRef<[u8]>) -> Result<Self, Error> {
        Self::try_new_impl(label.as_ref())
    }

    fn try_new_impl(label: &[u8]) -> Result<Self, Error> {
        check(label)?;

        Ok(Self {
            repr: if label.len() <= LABEL_MAX_INLINE_LEN {
                let mut buf = [0; LABEL_MAX_INLINE_LEN];
                buf[..label.len()].copy_from_slice(label);
                LabelRepr::Inline {
                    buf,
                    len: label.len() as u8,
                }
            } else {
                LabelRepr::Outline { data: label.into() }
            },
        })
    }

    /// Returns the raw bytes of this label.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.repr {
            LabelRepr::Inline { buf, len } => &buf[..usize::from(*len)],
            LabelRepr::Outline { data } => data,
        }
    }

    /// Returns whether this is the wildcard label `*`.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.as_bytes() == b"*"
    }
}

/// Checks that `label` can be stored as a single label record.
pub(crate) fn check(label: &[u8]) -> Result<(), Error> {
    if label.is_empty() {
        return Err(Error::InvalidEmptyLabel);
    }

    if label.len() > Label::MAX_LEN {
        return Err(Error::LabelTooLong);
    }

    Ok(())
}

impl AsRef<[u8]> for Label {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Label {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.as_bytes().len());
        for b in self.as_bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        presentation::write_escaped(&mut presentation::QuoteEscaper(&mut *f), self.as_bytes())?;
        f.write_char('"')
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        presentation::write_escaped(f, self.as_bytes())
    }
}

impl FromStr for Label {
    type Err = Error;

    /// Parses a single label in escaped presentation form, such as `www` or `a\.b`.
    ///
    /// An unescaped `.` anywhere in the input, including at the end, is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if ends_with_separator(s.as_bytes()) {
            return Err(Error::InvalidValue);
        }
        let wire = presentation::parse(s.as_bytes())?;
        match wire.as_slice() {
            [0] => Err(Error::InvalidEmptyLabel),
            [len, rest @ ..] if usize::from(*len) + 1 == rest.len() => {
                Self::try_new(&rest[..usize::from(*len)])
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

/// Returns whether `text` ends with a `.` that is not escaped by a preceding `\`.
fn ends_with_separator(text: &[u8]) -> bool {
    match text.split_last() {
        Some((b'.', rest)) => rest.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::hash_map::DefaultHasher, mem};

    use expect_test::expect;

    use super::*;

    fn hash_of(label: &Label) -> u64 {
        let mut h = DefaultHasher::new();
        label.hash(&mut h);
        h.finish()
    }

    #[test]
    fn label_size() {
        assert_eq!(mem::size_of::<Label>(), mem::size_of::<Vec<u8>>());
    }

    #[test]
    fn limits() {
        assert_eq!(Label::try_new("").unwrap_err(), Error::InvalidEmptyLabel);
        assert_eq!(Label::try_new([b'x'; 64]).unwrap_err(), Error::LabelTooLong);
        assert_eq!(Label::new([b'x'; 63]).as_bytes().len(), 63);
        assert_eq!(Label::new([b'y'; 30]).as_bytes(), &[b'y'; 30][..]);
    }

    #[test]
    fn display_label() {
        assert_eq!(format!(" {} ", Label::new("\0")), r#" \000 "#);
        assert_eq!(format!(" {} ", Label::new("\n")), r#" \010 "#);
        assert_eq!(format!(" {} ", Label::new("a.b")), r#" a\.b "#);
        assert_eq!(format!(" {} ", Label::new("a")), r#" a "#);
    }

    #[test]
    fn debug_label() {
        expect![[r#""\000""#]].assert_eq(&format!("{:?}", Label::new("\0")));
        expect![[r#""back\\slash""#]].assert_eq(&format!("{:?}", Label::new("back\\slash")));
        expect![[r#""a""#]].assert_eq(&format!("{:?}", Label::new("a")));
        expect![[r#""say\"hi\"""#]].assert_eq(&format!("{:?}", Label::new("say\"hi\"")));
        // Display leaves quotes alone.
        assert_eq!(Label::new("a\"b").to_string(), "a\"b");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(Label::new("WwW"), Label::new("www"));
        assert_ne!(Label::new("www"), Label::new("ww"));
        assert_eq!(hash_of(&Label::new("EXAMPLE")), hash_of(&Label::new("example")));
        // Only ASCII letters fold.
        assert_ne!(Label::new([0xc4]), Label::new([0xe4]));
    }

    #[test]
    fn wildcard() {
        assert!(Label::new("*").is_wildcard());
        assert!(!Label::new("**").is_wildcard());
        assert!(!Label::new("a").is_wildcard());
    }

    #[test]
    fn parse_label() {
        assert_eq!("www".parse::<Label>().unwrap().as_bytes(), b"www");
        assert_eq!(r"a\.b".parse::<Label>().unwrap().as_bytes(), b"a.b");
        assert_eq!(r"\005".parse::<Label>().unwrap().as_bytes(), &[5]);
        assert_eq!("".parse::<Label>(), Err(Error::InvalidEmptyLabel));
        assert_eq!("a.b".parse::<Label>(), Err(Error::InvalidValue));
        assert_eq!("a.".parse::<Label>(), Err(Error::InvalidValue));
        assert_eq!(".".parse::<Label>(), Err(Error::InvalidValue));
        assert_eq!(r"a\\.".parse::<Label>(), Err(Error::InvalidValue));
        assert_eq!(r"a\.".parse::<Label>().unwrap().as_bytes(), b"a.");
        assert_eq!(r"a\\\.".parse::<Label>().unwrap().as_bytes(), b"a\\.");
        assert_eq!(r"\046".parse::<Label>().unwrap().as_bytes(), b".");
    }
}
