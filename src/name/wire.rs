//! Reading names in wire format, standalone or embedded in a DNS message.

use std::{cmp, mem::size_of};

use bytemuck::AnyBitPattern;

use super::Name;
use crate::{hex::Hex, num::U16, Error};

const LABEL_TYPE_MASK: u8 = 0b1100_0000;
const LABEL_TYPE_NORMAL: u8 = 0b0000_0000;
const LABEL_TYPE_POINTER: u8 = 0b1100_0000;
const POINTER_MASK: u16 = 0b0011_1111_1111_1111;

#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    /// The buffer containing the whole DNS message.
    full_buf: &'a [u8],
    /// The current reader position in the buffer.
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    pub(crate) fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { full_buf: buf, pos }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn buf(&self) -> &'a [u8] {
        self.full_buf.get(self.pos..).unwrap_or(&[])
    }

    pub(crate) fn read_obj<T: AnyBitPattern>(&mut self) -> Result<T, Error> {
        let bytes = self.buf().get(..size_of::<T>()).ok_or(Error::Eof)?;
        self.pos += size_of::<T>();
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    fn peek_u8(&self) -> Result<u8, Error> {
        self.full_buf.get(self.pos).copied().ok_or(Error::Eof)
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8], Error> {
        match self.full_buf.get(self.pos..self.pos + len) {
            Some(slice) => {
                self.pos += len;
                Ok(slice)
            }
            None => Err(Error::Eof),
        }
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, Error> {
        self.read_obj::<u8>()
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(self.read_obj::<U16>()?.get())
    }

    /// Reads an uncompressed `<domain-name>`, returning its wire bytes.
    pub(crate) fn read_uncompressed_name(&mut self) -> Result<&'a [u8], Error> {
        let start = self.pos;
        loop {
            let length = self.read_u8()?;
            match length & LABEL_TYPE_MASK {
                LABEL_TYPE_NORMAL => {
                    self.read_slice(usize::from(length))?;
                    if self.pos - start > Name::MAX_LEN {
                        return Err(Error::NameTooLong);
                    }
                    if length == 0 {
                        break;
                    }
                }
                // Pointers are only meaningful inside a message.
                _ => return Err(Error::InvalidValue),
            }
        }
        Ok(&self.full_buf[start..self.pos])
    }

    /// Reads a possibly compressed `<domain-name>`, returning its decompressed wire bytes.
    pub(crate) fn read_name(&mut self) -> Result<Vec<u8>, Error> {
        let mut wire = Vec::new();
        let mut min_pos = self.pos;
        let mut copy = self.clone();
        loop {
            let length = copy.peek_u8()?;
            match length & LABEL_TYPE_MASK {
                LABEL_TYPE_POINTER => {
                    // 16-bit pointer to somewhere else in the message.
                    let ptr = usize::from(copy.read_u16()? & POINTER_MASK);
                    if ptr >= min_pos {
                        // Pointers must point to an earlier part of the message, to prevent
                        // loops.
                        return Err(Error::PointerLoop);
                    }
                    log::trace!("name pointer at {} -> {}", copy.pos - 2, ptr);
                    self.pos = cmp::max(self.pos, copy.pos);
                    min_pos = ptr;
                    copy.pos = ptr;
                }
                LABEL_TYPE_NORMAL => {
                    copy.pos += 1;

                    // Length byte followed by a label of that many bytes.
                    let label = copy.read_slice(usize::from(length))?;
                    if wire.len() + 1 + label.len() > Name::MAX_LEN {
                        return Err(Error::NameTooLong);
                    }
                    wire.push(length);
                    wire.extend_from_slice(label);
                    if length == 0 {
                        break;
                    }
                }
                _ => return Err(Error::InvalidValue), // anything but 00 and 11 in MSb is reserved
            }
        }

        self.pos = cmp::max(self.pos, copy.pos);
        log::trace!("read name {}", Hex(&wire));
        Ok(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    #[test]
    fn uncompressed() {
        let buf = hex::parse("07 6578616d706c65 03 636f6d 00 ffff");
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_uncompressed_name().unwrap(), &buf[..13]);
        assert_eq!(r.pos(), 13);
        assert_eq!(r.buf(), &[0xff, 0xff]);

        let mut r = Reader::new(&[0]);
        assert_eq!(r.read_uncompressed_name().unwrap(), &[0]);
    }

    #[test]
    fn uncompressed_errors() {
        assert_eq!(
            Reader::new(&[3, b'c', b'o']).read_uncompressed_name(),
            Err(Error::Eof)
        );
        assert_eq!(
            Reader::new(&[3, b'c', b'o', b'm']).read_uncompressed_name(),
            Err(Error::Eof)
        );
        assert_eq!(
            Reader::new(&hex::parse("c000")).read_uncompressed_name(),
            Err(Error::InvalidValue)
        );
        assert_eq!(
            Reader::new(&hex::parse("4100")).read_uncompressed_name(),
            Err(Error::InvalidValue)
        );
    }

    #[test]
    fn compressed() {
        // "example.com." at 0, "www" + pointer to 0 at 13.
        let buf = hex::parse("07 6578616d706c65 03 636f6d 00 03 777777 c000 2a");
        let mut r = Reader::at(&buf, 13);
        let wire = r.read_name().unwrap();
        assert_eq!(wire, hex::parse("03 777777 07 6578616d706c65 03 636f6d 00"));
        assert_eq!(r.pos(), 19);
        assert_eq!(r.read_u8().unwrap(), 0x2a);
    }

    #[test]
    fn pointer_loop() {
        // Points to itself.
        assert_eq!(Reader::new(&hex::parse("c000")).read_name(), Err(Error::PointerLoop));
        // Points forward.
        assert_eq!(
            Reader::new(&hex::parse("c002 00")).read_name(),
            Err(Error::PointerLoop)
        );
        // 0 -> 4 -> 0.
        let buf = hex::parse("01 61 c004 c000");
        assert_eq!(Reader::at(&buf, 4).read_name(), Err(Error::PointerLoop));
    }

    #[test]
    fn decompressed_length_limit() {
        // A chain of pointers, each adding a 63-byte label, eventually exceeds 255 bytes.
        let mut buf = vec![0];
        let mut prev = 0u16;
        for _ in 0..5 {
            let here = buf.len() as u16;
            buf.push(63);
            buf.extend_from_slice(&[b'x'; 63]);
            buf.extend_from_slice(&(0xc000 | prev).to_be_bytes());
            prev = here;
        }
        let mut r = Reader::at(&buf, usize::from(prev));
        assert_eq!(r.read_name(), Err(Error::NameTooLong));
    }
}
