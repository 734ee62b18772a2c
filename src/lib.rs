//! DNS domain names in wire and presentation format.
//!
//! [`Name`] holds a domain name in the length-prefixed wire encoding used by the DNS protocol and
//! converts to and from the escaped, dot-separated presentation format of RFC 1035. Containment,
//! relative naming and label manipulation all operate on the wire encoding, and comparisons ignore
//! ASCII case as required by RFC 4343.
//!
//! ```
//! use dnsname::Name;
//!
//! let name: Name = "www.example.com".parse()?;
//! assert_eq!(name.label_count(), 3);
//! assert!(name.includes(&"EXAMPLE.com.".parse()?));
//! assert_eq!(name.presentation()?.to_string(), "www.example.com.");
//! # Ok::<_, dnsname::Error>(())
//! ```
//!
//! Label bytes are opaque octets: no IDNA processing is performed.

pub mod error;
mod hex;
pub mod name;
mod num;

pub use error::{Error, ErrorKind, ParseError};
pub use name::{label::Label, presentation::Presentation, Labels, Name};
