use std::{fmt, io};

/// Errors raised while parsing the presentation (text) form of a name.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum ParseError {
    /// A `.` appeared where a label was expected to start (`.com`, `a..b`).
    LeadingDot,
    /// A label exceeded [`Label::MAX_LEN`] bytes.
    ///
    /// [`Label::MAX_LEN`]: crate::Label::MAX_LEN
    LabelTooLong,
    /// The encoded name exceeded [`Name::MAX_LEN`] bytes.
    ///
    /// [`Name::MAX_LEN`]: crate::Name::MAX_LEN
    NameTooLong,
    /// A `\` escape was cut short or contained a non-digit where a digit was expected.
    IncompleteEscape,
    /// A `\DDD` escape denoted a value above 255.
    EscapeOutOfRange,
}

impl ParseError {
    fn description(&self) -> &str {
        match self {
            ParseError::LeadingDot => "found `.` at the start of a label",
            ParseError::LabelTooLong => "label too long",
            ParseError::NameTooLong => "name too long",
            ParseError::IncompleteEscape => "incomplete escape sequence",
            ParseError::EscapeOutOfRange => "escape sequence value out of range",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for ParseError {}

/// Broad category of an [`Error`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Malformed input, in presentation or wire format.
    Format,
    /// A mutation would produce an invalid label or an over-long name.
    Bounds,
    /// The operation is not valid for the name's current state.
    State,
}

/// Errors returned by [`Name`] and [`Label`] operations.
///
/// Every operation that returns this error leaves its receiver unchanged.
///
/// [`Name`]: crate::Name
/// [`Label`]: crate::Label
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum Error {
    /// The presentation form could not be parsed.
    Parse(ParseError),
    /// An empty label was encountered where it is not allowed.
    InvalidEmptyLabel,
    /// A label exceeded the maximum allowable length of a label.
    LabelTooLong,
    /// The name would exceed the maximum allowable length of an encoded name.
    NameTooLong,
    /// The operation needs a name, but the name is unset.
    Unset,
    /// [`Name::make_relative`] was called with a zone that does not contain the name.
    ///
    /// [`Name::make_relative`]: crate::Name::make_relative
    NotIncluded,
    /// The end of the data was reached while more was expected.
    Eof,
    /// A compression pointer pointed into itself or further into the message.
    PointerLoop,
    /// A length byte used a reserved label type, or a pointer appeared where none is allowed.
    InvalidValue,
    /// Bytes followed the terminating root label.
    TrailingData,
}

impl Error {
    fn description(&self) -> &str {
        match self {
            Error::Parse(e) => e.description(),
            Error::InvalidEmptyLabel => "invalid empty label",
            Error::LabelTooLong => "label too long",
            Error::NameTooLong => "name too long",
            Error::Unset => "name is unset",
            Error::NotIncluded => "name is not part of the zone",
            Error::Eof => "unexpected end of data",
            Error::PointerLoop => "encountered domain name pointer loop",
            Error::InvalidValue => "invalid value",
            Error::TrailingData => "trailing data after root label",
        }
    }

    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_)
            | Error::Eof
            | Error::PointerLoop
            | Error::InvalidValue
            | Error::TrailingData => ErrorKind::Format,
            Error::InvalidEmptyLabel | Error::LabelTooLong | Error::NameTooLong => {
                ErrorKind::Bounds
            }
            Error::Unset | Error::NotIncluded => ErrorKind::State,
        }
    }
}

impl From<ParseError> for Error {
    #[inline]
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Parse(e) => io::Error::new(io::ErrorKind::InvalidInput, e),
            Error::Eof => io::ErrorKind::UnexpectedEof.into(),
            Error::PointerLoop => io::Error::new(
                io::ErrorKind::InvalidData,
                "a domain name pointer loop was encountered; this may indicate a malicious message",
            ),
            Error::InvalidValue | Error::TrailingData => {
                io::Error::new(io::ErrorKind::InvalidData, e.description().to_owned())
            }
            Error::InvalidEmptyLabel => io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid empty label in domain name",
            ),
            Error::LabelTooLong => io::Error::new(
                io::ErrorKind::InvalidInput,
                "domain name label exceeds maximum label length",
            ),
            Error::NameTooLong => io::Error::new(
                io::ErrorKind::InvalidInput,
                "domain name exceeds maximum encoded length",
            ),
            Error::Unset | Error::NotIncluded => {
                io::Error::new(io::ErrorKind::Other, e.description().to_owned())
            }
        }
    }
}
