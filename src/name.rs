//! Domain names.
//!
//! A [`Name`] stores its labels in DNS wire format: a sequence of length-prefixed label records,
//! terminated by the empty root label. All structural operations work on that encoding directly.

pub mod label;
pub mod presentation;
mod wire;

use std::{
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    slice,
    str::FromStr,
};

use crate::{hex::Hex, Error};
use label::Label;
use presentation::Presentation;
use wire::Reader;

/// A domain name in wire format.
///
/// A `Name` is either *unset* (the state created by [`Name::new`] and [`Default`]), the root name
/// `.`, or a sequence of up to 127 [`Label`]s whose encoding fits in [`Name::MAX_LEN`] bytes.
/// Unset names cannot be formatted, and are distinct from the root name.
///
/// Equality and hashing ignore ASCII case (RFC 4343), so `WWW.Example.COM.` and
/// `www.example.com.` are the same name. Other bytes are compared verbatim; no IDNA processing is
/// performed.
///
/// Operations that can fail leave the name unchanged when they do.
#[derive(Clone, Default)]
pub struct Name {
    // Label records followed by the root label. Empty when unset.
    wire: Vec<u8>,
    // Start of every non-root label record in `wire`, left to right. Only ever written by
    // `from_wire_unchecked` and `replace_wire`, which derive it from `wire`.
    offsets: Vec<u8>,
}

impl Name {
    /// The maximum length of an encoded name, including the root label.
    pub const MAX_LEN: usize = 255;

    /// Creates an unset name.
    #[inline]
    pub const fn new() -> Self {
        Self {
            wire: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Creates the root name `.`.
    pub fn root() -> Self {
        Self::from_wire_unchecked(vec![0])
    }

    /// Parses a name from its presentation format.
    ///
    /// Labels are separated by `.`, a trailing `.` is allowed but not required, and `\.`, `\\` and
    /// `\DDD` escapes may be used to include arbitrary bytes. The empty string and `.` both denote
    /// the root name.
    ///
    /// The [`FromStr`] implementation performs the same operation on string slices.
    pub fn parse(text: impl AsRef<[u8]>) -> Result<Self, Error> {
        let text = text.as_ref();
        match presentation::parse(text) {
            Ok(wire) => Ok(Self::from_wire_unchecked(wire)),
            Err(e) => {
                log::debug!("rejected name '{}': {}", text.escape_ascii(), e);
                Err(e.into())
            }
        }
    }

    /// Creates a name from its uncompressed wire format.
    ///
    /// `bytes` must contain exactly one name, ending with the root label.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = Reader::new(bytes);
        let wire = r.read_uncompressed_name()?;
        if !r.buf().is_empty() {
            return Err(Error::TrailingData);
        }
        Ok(Self::from_wire_unchecked(wire.to_vec()))
    }

    /// Reads a name starting at `offset` in a DNS message, following compression pointers.
    ///
    /// Returns the name and the position of the first byte after it. Compression pointers must
    /// point strictly backwards, otherwise [`Error::PointerLoop`] is returned.
    pub fn from_packet(packet: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        let mut r = Reader::at(packet, offset);
        let wire = r.read_name()?;
        Ok((Self::from_wire_unchecked(wire), r.pos()))
    }

    /// Builds a name from a sequence of labels, failing if it would be too long.
    pub fn try_from_labels<I>(labels: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut wire = Vec::new();
        for label in labels {
            let label = label.as_ref();
            label::check(label)?;
            // Leave room for the root label.
            if wire.len() + 1 + label.len() + 1 > Self::MAX_LEN {
                return Err(Error::NameTooLong);
            }
            wire.push(label.len() as u8);
            wire.extend_from_slice(label);
        }
        wire.push(0);
        Ok(Self::from_wire_unchecked(wire))
    }

    fn from_wire_unchecked(wire: Vec<u8>) -> Self {
        let offsets = index(&wire);
        Self { wire, offsets }
    }

    fn replace_wire(&mut self, wire: Vec<u8>) {
        debug_assert!(wire.len() <= Self::MAX_LEN);
        self.offsets = index(&wire);
        self.wire = wire;
    }

    /// Returns `true` if this name is unset.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.wire.is_empty()
    }

    /// Returns `true` if this is the root name `.`.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.first() == Some(&0)
    }

    /// Returns the number of labels, not counting the root label.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.offsets.len()
    }

    /// Returns the length of the wire encoding, including the root label.
    ///
    /// Unset names have a length of 0.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    /// Returns the wire encoding of this name, including the root label.
    ///
    /// Unset names return an empty slice.
    #[inline]
    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }

    /// Returns the wire encoding with all ASCII letters in lowercase.
    pub fn to_wire_lowercase(&self) -> Vec<u8> {
        self.wire.to_ascii_lowercase()
    }

    /// Returns an iterator over the raw contents of each label, left to right.
    ///
    /// The root label is not included. Unlike the other label accessors this does not fail on an
    /// unset name; the iterator is simply empty, as it is for the root name.
    pub fn labels(&self) -> Labels<'_> {
        Labels {
            wire: &self.wire,
            offsets: self.offsets.iter(),
        }
    }

    /// Returns the labels of this name as owned [`Label`]s.
    ///
    /// Returns [`Error::Unset`] if this name is unset.
    pub fn raw_labels(&self) -> Result<Vec<Label>, Error> {
        if self.is_empty() {
            return Err(Error::Unset);
        }
        Ok(self.labels().map(Label::new).collect())
    }

    /// Returns the contents of the label at `index`, counted from the left.
    pub fn label(&self, index: usize) -> Option<&[u8]> {
        let offset = *self.offsets.get(index)?;
        Some(label_at(&self.wire, offset))
    }

    /// Returns the leftmost (most specific) label.
    ///
    /// Returns `Ok(None)` for the root name and [`Error::Unset`] if this name is unset.
    pub fn first_label(&self) -> Result<Option<&[u8]>, Error> {
        if self.is_empty() {
            return Err(Error::Unset);
        }
        Ok(self.labels().next())
    }

    /// Returns the rightmost label, closest to the root.
    ///
    /// Returns `Ok(None)` for the root name and [`Error::Unset`] if this name is unset.
    pub fn last_label(&self) -> Result<Option<&[u8]>, Error> {
        if self.is_empty() {
            return Err(Error::Unset);
        }
        Ok(self.labels().next_back())
    }

    /// Returns `true` if the first label is the wildcard label `*`.
    pub fn is_wildcard(&self) -> bool {
        self.labels().next() == Some(&b"*"[..])
    }

    /// Returns `true` if this name is a valid host name.
    ///
    /// Every label must consist of ASCII letters, digits and `-`, except that the first label may
    /// be a wildcard. The root name is a valid host name.
    pub fn is_hostname(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.labels().enumerate().all(|(i, label)| {
            (i == 0 && label == b"*")
                || label
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        })
    }

    /// Returns `true` if `self` is equal to `parent` or a subdomain of it.
    ///
    /// Every name that is not unset includes the root name and the unset name. An unset name does
    /// not include anything, not even itself. Labels are compared without regard to ASCII case.
    pub fn includes(&self, parent: &Name) -> bool {
        if self.is_empty() {
            return false;
        }
        if parent.label_count() > self.label_count() || parent.wire_len() > self.wire_len() {
            return false;
        }
        self.labels()
            .rev()
            .zip(parent.labels().rev())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns this name with the labels of `zone` removed from its end.
    ///
    /// A name relative to itself is the root name. Returns [`Error::Unset`] if `self` is unset and
    /// [`Error::NotIncluded`] if `self` is not part of `zone`.
    pub fn make_relative(&self, zone: &Name) -> Result<Name, Error> {
        if self.is_empty() {
            return Err(Error::Unset);
        }
        if !self.includes(zone) {
            return Err(Error::NotIncluded);
        }

        let keep = self.label_count() - zone.label_count();
        let end = match self.offsets.get(keep) {
            Some(&offset) => usize::from(offset),
            None => self.wire.len() - 1,
        };
        let mut wire = Vec::with_capacity(end + 1);
        wire.extend_from_slice(&self.wire[..end]);
        wire.push(0);
        Ok(Self::from_wire_unchecked(wire))
    }

    /// Returns a copy of this name with its labels in reverse order.
    ///
    /// The root name and the unset name map to themselves.
    pub fn reversed(&self) -> Name {
        if self.is_empty() {
            return Name::new();
        }
        let mut wire = Vec::with_capacity(self.wire.len());
        for label in self.labels().rev() {
            wire.push(label.len() as u8);
            wire.extend_from_slice(label);
        }
        wire.push(0);
        Self::from_wire_unchecked(wire)
    }

    /// Reverses the order of the labels in place.
    pub fn reverse_labels(&mut self) {
        *self = self.reversed();
    }

    /// Adds `label` to the start of this name, making it the leftmost label.
    ///
    /// An unset name becomes a single-label name.
    pub fn prepend_label(&mut self, label: impl AsRef<[u8]>) -> Result<(), Error> {
        let label = label.as_ref();
        self.check_grow(label)?;

        let rest: &[u8] = if self.is_empty() { &[0] } else { &self.wire };
        let mut wire = Vec::with_capacity(1 + label.len() + rest.len());
        wire.push(label.len() as u8);
        wire.extend_from_slice(label);
        wire.extend_from_slice(rest);
        self.replace_wire(wire);
        Ok(())
    }

    /// Adds `label` to the end of this name, just before the root label.
    ///
    /// An unset name becomes a single-label name.
    pub fn append_label(&mut self, label: impl AsRef<[u8]>) -> Result<(), Error> {
        let label = label.as_ref();
        self.check_grow(label)?;

        let head = self.wire.len().saturating_sub(1);
        let mut wire = Vec::with_capacity(head + 1 + label.len() + 1);
        wire.extend_from_slice(&self.wire[..head]);
        wire.push(label.len() as u8);
        wire.extend_from_slice(label);
        wire.push(0);
        self.replace_wire(wire);
        Ok(())
    }

    /// Appends `label` to this name and returns it, for building names by chaining.
    pub fn with_label(mut self, label: impl AsRef<[u8]>) -> Result<Self, Error> {
        self.append_label(label)?;
        Ok(self)
    }

    fn check_grow(&self, label: &[u8]) -> Result<(), Error> {
        let res = label::check(label).and_then(|_| {
            // An unset name gains a root label too.
            let base = self.wire.len().max(1);
            if base + 1 + label.len() > Self::MAX_LEN {
                Err(Error::NameTooLong)
            } else {
                Ok(())
            }
        });
        if let Err(e) = res {
            log::debug!(
                "cannot add label '{}' to {}: {}",
                label.escape_ascii(),
                self.to_log_string(),
                e
            );
        }
        res
    }

    /// Appends the labels of `other` to this name.
    ///
    /// An unset `other` leaves the name unchanged; an unset `self` becomes a copy of `other`.
    pub fn append_name(&mut self, other: &Name) -> Result<(), Error> {
        *self = Name::concat(self, other)?;
        Ok(())
    }

    /// Returns a name consisting of the labels of `a` followed by the labels of `b`.
    ///
    /// Unset operands contribute no labels. Returns [`Error::NameTooLong`] if the result would not
    /// fit in [`Name::MAX_LEN`] bytes.
    pub fn concat(a: &Name, b: &Name) -> Result<Name, Error> {
        if b.is_empty() {
            return Ok(a.clone());
        }
        if a.is_empty() {
            return Ok(b.clone());
        }

        let head = &a.wire[..a.wire.len() - 1];
        if head.len() + b.wire.len() > Self::MAX_LEN {
            return Err(Error::NameTooLong);
        }
        let mut wire = Vec::with_capacity(head.len() + b.wire.len());
        wire.extend_from_slice(head);
        wire.extend_from_slice(&b.wire);
        Ok(Self::from_wire_unchecked(wire))
    }

    /// Removes the leftmost label.
    ///
    /// Returns `false` and does nothing if the name is root or unset.
    pub fn chop_off(&mut self) -> bool {
        match self.labels().next() {
            Some(label) => {
                let wire = self.wire[1 + label.len()..].to_vec();
                self.replace_wire(wire);
                true
            }
            None => false,
        }
    }

    /// Removes labels from the left until at most `count` labels remain.
    pub fn trim_to_label_count(&mut self, count: usize) {
        while self.label_count() > count && self.chop_off() {}
    }

    /// Converts all ASCII letters in this name to lowercase, in place.
    pub fn make_ascii_lowercase(&mut self) {
        // Length bytes are at most 63 and never fall into the `A`-`Z` range.
        self.wire.make_ascii_lowercase();
    }

    /// Returns a copy of this name with all ASCII letters in lowercase.
    pub fn to_ascii_lowercase(&self) -> Name {
        let mut name = self.clone();
        name.make_ascii_lowercase();
        name
    }

    /// Returns a [`Display`][fmt::Display]able presentation-format view of this name.
    ///
    /// Returns [`Error::Unset`] if this name is unset.
    pub fn presentation(&self) -> Result<Presentation<'_>, Error> {
        if self.is_empty() {
            return Err(Error::Unset);
        }
        Ok(Presentation::new(self))
    }

    /// Formats this name with a custom label separator, optionally ending with that separator.
    ///
    /// Returns [`Error::Unset`] if this name is unset.
    pub fn to_string_with(&self, separator: &str, trailing: bool) -> Result<String, Error> {
        Ok(self
            .presentation()?
            .separator(separator)
            .trailing(trailing)
            .to_string())
    }

    /// Formats this name for log output.
    ///
    /// This never fails: unset names are shown as `(empty)`.
    pub fn to_log_string(&self) -> String {
        match self.presentation() {
            Ok(p) => p.to_string(),
            Err(_) => String::from("(empty)"),
        }
    }
}

/// Computes the label offsets of a valid wire encoding.
fn index(wire: &[u8]) -> Vec<u8> {
    let mut offsets = Vec::new();
    let mut pos = 0;
    while let Some(&len) = wire.get(pos) {
        if len == 0 {
            break;
        }
        offsets.push(pos as u8);
        pos += 1 + usize::from(len);
    }
    offsets
}

fn label_at(wire: &[u8], offset: u8) -> &[u8] {
    let offset = usize::from(offset);
    let len = usize::from(wire[offset]);
    &wire[offset + 1..offset + 1 + len]
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.wire.len() == other.wire.len() && self.wire.eq_ignore_ascii_case(&other.wire)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.wire.len());
        for b in &self.wire {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.presentation() {
            Ok(p) => write!(f, "Name({:?})", p),
            Err(_) => f.write_str("Name(<unset>)"),
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&[u8]> for Name {
    type Error = Error;

    /// Equivalent to [`Name::from_wire`].
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_wire(bytes)
    }
}

impl Extend<Label> for Name {
    /// Appends each label in turn.
    ///
    /// # Panics
    ///
    /// Panics if the name would exceed [`Name::MAX_LEN`] bytes. Use [`Name::append_label`] to
    /// handle that case.
    fn extend<T: IntoIterator<Item = Label>>(&mut self, iter: T) {
        for label in iter {
            if let Err(e) = self.append_label(&label) {
                panic!(
                    "cannot extend {} with {}: {} (wire: {})",
                    self.to_log_string(),
                    label,
                    e,
                    Hex(&self.wire)
                );
            }
        }
    }
}

impl<'a> Extend<&'a Label> for Name {
    fn extend<T: IntoIterator<Item = &'a Label>>(&mut self, iter: T) {
        self.extend(iter.into_iter().cloned())
    }
}

impl FromIterator<Label> for Name {
    /// Builds a name from labels.
    ///
    /// An empty iterator produces the root name.
    ///
    /// # Panics
    ///
    /// Panics if the name would exceed [`Name::MAX_LEN`] bytes. Use [`Name::try_from_labels`] to
    /// handle that case.
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        let mut name = Name::root();
        name.extend(iter);
        name
    }
}

impl<'a> FromIterator<&'a Label> for Name {
    fn from_iter<T: IntoIterator<Item = &'a Label>>(iter: T) -> Self {
        iter.into_iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Name {
    type Item = &'a [u8];
    type IntoIter = Labels<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.labels()
    }
}

/// Iterator over the raw label contents of a [`Name`], returned by [`Name::labels`].
#[derive(Clone)]
pub struct Labels<'a> {
    wire: &'a [u8],
    offsets: slice::Iter<'a, u8>,
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let offset = *self.offsets.next()?;
        Some(label_at(self.wire, offset))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Labels<'a> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let offset = *self.offsets.next_back()?;
        Some(label_at(self.wire, offset))
    }
}

impl ExactSizeIterator for Labels<'_> {}

impl FusedIterator for Labels<'_> {}
