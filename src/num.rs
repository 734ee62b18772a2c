/// A big-endian `u16` as it appears on the wire.
#[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub(crate) struct U16(u16);

impl U16 {
    pub(crate) fn get(self) -> u16 {
        u16::from_be(self.0)
    }
}

impl From<u16> for U16 {
    fn from(value: u16) -> Self {
        Self(value.to_be())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order() {
        let v = U16::from(0xc00c);
        assert_eq!(bytemuck::bytes_of(&v), &[0xc0, 0x0c]);
        assert_eq!(bytemuck::pod_read_unaligned::<U16>(&[0x12, 0x34]).get(), 0x1234);
    }
}
