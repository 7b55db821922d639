use crate::{NbtError, TagId};
use byteorder::{ByteOrder, WriteBytesExt};
use std::{
    io::{Result, Write},
    marker::PhantomData,
    slice,
};

/// A bounds-checked cursor over a byte slice which reads multi-byte values in the byte order `B`.
pub struct Reader<'a, B> {
    data: &'a [u8],
    position: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> Reader<'a, B> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader {
            data,
            position: 0,
            _order: PhantomData,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn take(&mut self, len: usize) -> std::result::Result<&'a [u8], NbtError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(NbtError::UnexpectedEndOfData {
                needed: len,
                remaining,
            });
        }

        let bytes = &self.data[self.position .. self.position + len];
        self.position += len;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&mut self) -> std::result::Result<u8, NbtError> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_i8(&mut self) -> std::result::Result<i8, NbtError> {
        Ok(self.read_u8()? as i8)
    }

    #[inline]
    pub fn read_u16(&mut self) -> std::result::Result<u16, NbtError> {
        Ok(B::read_u16(self.take(2)?))
    }

    #[inline]
    pub fn read_i16(&mut self) -> std::result::Result<i16, NbtError> {
        Ok(B::read_i16(self.take(2)?))
    }

    #[inline]
    pub fn read_i32(&mut self) -> std::result::Result<i32, NbtError> {
        Ok(B::read_i32(self.take(4)?))
    }

    #[inline]
    pub fn read_i64(&mut self) -> std::result::Result<i64, NbtError> {
        Ok(B::read_i64(self.take(8)?))
    }

    #[inline]
    pub fn read_f32(&mut self) -> std::result::Result<f32, NbtError> {
        Ok(B::read_f32(self.take(4)?))
    }

    #[inline]
    pub fn read_f64(&mut self) -> std::result::Result<f64, NbtError> {
        Ok(B::read_f64(self.take(8)?))
    }

    pub fn read_string(&mut self) -> std::result::Result<String, NbtError> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;

        match std::str::from_utf8(bytes) {
            Ok(string) => Ok(string.to_owned()),
            Err(_) => Err(NbtError::InvalidString),
        }
    }

    /// Reads a four-byte element count and makes sure the rest of the input could hold that
    /// many elements of at least `element_len` bytes each, so that corrupt lengths never turn
    /// into huge allocations.
    pub fn read_len(
        &mut self,
        kind: TagId,
        element_len: usize,
    ) -> std::result::Result<usize, NbtError>
    {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(NbtError::ContainerTooLong {
                kind,
                len: len as i64,
            });
        }

        let len = len as usize;
        let needed = len.saturating_mul(element_len);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(NbtError::UnexpectedEndOfData { needed, remaining });
        }

        Ok(len)
    }
}

#[inline]
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> Result<()> {
    writer.write_u8(value)
}

#[inline]
pub fn write_i8<W: Write>(writer: &mut W, value: i8) -> Result<()> {
    writer.write_i8(value)
}

#[inline]
pub fn write_i16<B: ByteOrder, W: Write>(writer: &mut W, value: i16) -> Result<()> {
    writer.write_i16::<B>(value)
}

#[inline]
pub fn write_u16<B: ByteOrder, W: Write>(writer: &mut W, value: u16) -> Result<()> {
    writer.write_u16::<B>(value)
}

#[inline]
pub fn write_i32<B: ByteOrder, W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_i32::<B>(value)
}

#[inline]
pub fn write_i64<B: ByteOrder, W: Write>(writer: &mut W, value: i64) -> Result<()> {
    writer.write_i64::<B>(value)
}

#[inline]
pub fn write_f32<B: ByteOrder, W: Write>(writer: &mut W, value: f32) -> Result<()> {
    writer.write_f32::<B>(value)
}

#[inline]
pub fn write_f64<B: ByteOrder, W: Write>(writer: &mut W, value: f64) -> Result<()> {
    writer.write_f64::<B>(value)
}

/// Writes a length-prefixed string. The caller is responsible for checking that the string
/// fits in a `u16` length.
pub fn write_string<B: ByteOrder, W: Write>(writer: &mut W, string: &str) -> Result<()> {
    write_u16::<B, _>(writer, string.len() as u16)?;
    writer.write_all(string.as_bytes())
}

#[inline]
pub fn cast_bytes_to_unsigned(bytes: &[i8]) -> &[u8] {
    let data = bytes.as_ptr() as *const u8;
    let len = bytes.len();

    // Safety
    // * `data` is valid for len * 1 bytes
    //     * The entire memory range of `data` is contained in a single
    //       allocated object since it came from a valid slice
    //     * `data` is non-null and aligned correctly for i8 (and thus u8)
    // * `data` points to exactly `len` consecutive bytes
    // * The constructed reference adopts the lifetime of the provided reference
    // * `len` <= isize::MAX because `len` came from a valid slice
    unsafe { slice::from_raw_parts(data, len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn byte_order_is_respected() {
        let data = [0x00, 0x01, 0x01, 0x00];
        let mut big = Reader::<BigEndian>::new(&data);
        let mut little = Reader::<LittleEndian>::new(&data);

        assert_eq!(big.read_i16().unwrap(), 1);
        assert_eq!(little.read_i16().unwrap(), 256);
        assert_eq!(big.position(), 2);
        assert_eq!(little.remaining(), 2);
    }

    #[test]
    fn short_reads_fail_without_advancing() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::<BigEndian>::new(&data);

        assert!(matches!(
            reader.read_i32(),
            Err(NbtError::UnexpectedEndOfData {
                needed: 4,
                remaining: 3
            })
        ));
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8().unwrap(), 1);
    }

    #[test]
    fn lengths_are_checked_against_remaining_input() {
        let mut data = Vec::new();
        write_i32::<BigEndian, _>(&mut data, 1000).unwrap();
        data.extend_from_slice(&[0; 8]);
        let mut reader = Reader::<BigEndian>::new(&data);
        assert!(matches!(
            reader.read_len(TagId::LongArray, 8),
            Err(NbtError::UnexpectedEndOfData { needed: 8000, .. })
        ));

        let mut data = Vec::new();
        write_i32::<LittleEndian, _>(&mut data, -1).unwrap();
        let mut reader = Reader::<LittleEndian>::new(&data);
        assert!(matches!(
            reader.read_len(TagId::ByteArray, 1),
            Err(NbtError::ContainerTooLong { len: -1, .. })
        ));
    }

    #[test]
    fn strings_must_be_utf8() {
        let data = [0x00, 0x02, 0xC3, 0x28];
        let mut reader = Reader::<BigEndian>::new(&data);
        assert!(matches!(reader.read_string(), Err(NbtError::InvalidString)));

        let mut data = Vec::new();
        write_string::<LittleEndian, _>(&mut data, "héllo").unwrap();
        assert_eq!(&data[.. 2], &[6, 0]);
        let mut reader = Reader::<LittleEndian>::new(&data);
        assert_eq!(reader.read_string().unwrap(), "héllo");
    }
}
