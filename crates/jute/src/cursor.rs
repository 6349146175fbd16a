//! Endian-adapting cursor over raw input bytes.

use std::marker::PhantomData;

use crate::encoding::{ByteSwap, CodeUnit, SourceEncoding};

/// A cursor over `&[u8]` that yields host-endian code units of the source
/// encoding.
///
/// Reads swap bytes iff the source's resolved endianness differs from the
/// host's; for UTF-8 and host-endian sources the read compiles to a plain
/// unaligned load. The index counts bytes so error positions are uniform
/// across encodings.
#[derive(Debug)]
pub(crate) struct Cursor<'j, E: SourceEncoding> {
    data: &'j [u8],
    pub index: usize,
    _encoding: PhantomData<E>,
}

impl<'j, E: SourceEncoding> Cursor<'j, E> {
    pub fn new(data: &'j [u8]) -> Self {
        Self {
            data,
            index: 0,
            _encoding: PhantomData,
        }
    }

    /// The code unit at the current position, widened to `u32`, or `None`
    /// at (or within one truncated unit of) the end of input.
    #[inline]
    pub fn get(&self) -> Option<u32> {
        if self.index + E::Unit::WIDTH > self.data.len() {
            return None;
        }
        let unit = E::Unit::from_bytes(self.data, self.index);
        let unit = if E::SWAP { unit.byte_swap() } else { unit };
        Some(unit.into())
    }

    /// Advance past one code unit.
    #[inline]
    pub fn bump(&mut self) {
        self.index += E::Unit::WIDTH;
    }

    /// `get` + `bump` in one step.
    #[allow(dead_code)] // the parser peeks then bumps; kept for direct iteration
    #[inline]
    pub fn next(&mut self) -> Option<u32> {
        let unit = self.get()?;
        self.index += E::Unit::WIDTH;
        Some(unit)
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.index + E::Unit::WIDTH > self.data.len()
    }

    pub fn data(&self) -> &'j [u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Utf16BeSource, Utf16LeSource, Utf32BeSource, Utf8Source};

    #[test]
    fn utf8_reads_bytes() {
        let mut c = Cursor::<Utf8Source>::new(b"ab");
        assert_eq!(c.next(), Some(b'a' as u32));
        assert_eq!(c.next(), Some(b'b' as u32));
        assert_eq!(c.next(), None);
    }

    #[test]
    fn utf16_swaps_iff_foreign_order() {
        let be = [0x00, 0x22, 0xD8, 0x34];
        let mut c = Cursor::<Utf16BeSource>::new(&be);
        assert_eq!(c.next(), Some(0x22));
        assert_eq!(c.next(), Some(0xD834));

        let le = [0x22, 0x00, 0x34, 0xD8];
        let mut c = Cursor::<Utf16LeSource>::new(&le);
        assert_eq!(c.next(), Some(0x22));
        assert_eq!(c.next(), Some(0xD834));
    }

    #[test]
    fn utf32_be() {
        let be = [0x00, 0x01, 0xF6, 0x00];
        let mut c = Cursor::<Utf32BeSource>::new(&be);
        assert_eq!(c.next(), Some(0x1F600));
        assert!(c.at_end());
    }

    #[test]
    fn truncated_unit_is_end() {
        let c = Cursor::<Utf16LeSource>::new(&[0x22]);
        assert_eq!(c.get(), None);
        assert!(c.at_end());
    }
}
