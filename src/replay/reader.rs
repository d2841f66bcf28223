use byteorder::{ByteOrder, LittleEndian};

use super::ReplayError;

type Result<T> = core::result::Result<T, ReplayError>;

/// A little-endian reader over the replay byte buffer.
pub(crate) struct ByteReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub(crate) fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(ReplayError::UnexpectedEof)?;
        let taken = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(taken)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    fn read_uleb128(&mut self) -> Result<u64> {
        let mut value = 0_u64;
        let mut shift = 0_u32;
        loop {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift >= u64::BITS {
                return Err(ReplayError::UnexpectedEof);
            }
        }
    }

    /// Reads the .NET-style string: a `0x00` prefix for the empty string, or `0x0b` followed by
    /// a ULEB128 byte length and UTF-8 data.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        match self.read_u8()? {
            0x00 => Ok(String::new()),
            0x0b => {
                let length = self.read_uleb128()? as usize;
                let bytes = self.take(length)?;
                String::from_utf8(bytes.to_vec()).map_err(|_| ReplayError::StringEncoding)
            }
            prefix => Err(ReplayError::InvalidStringPrefix(prefix)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;
    use crate::replay::ReplayError;

    #[test]
    fn reads_little_endian_integers() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(reader.read_u16().expect("must read"), 0x0201);
        assert_eq!(reader.read_u16().expect("must read"), 0x0403);
        assert_eq!(reader.read_u8().expect_err("exhausted"), ReplayError::UnexpectedEof);
    }

    #[test]
    fn reads_prefixed_strings() {
        let mut reader = ByteReader::new(&[0x00, 0x0b, 0x03, b'o', b's', b'u', 0x07]);
        assert_eq!(reader.read_string().expect("empty marker"), "");
        assert_eq!(reader.read_string().expect("short string"), "osu");
        assert_eq!(
            reader.read_string().expect_err("bad prefix"),
            ReplayError::InvalidStringPrefix(0x07)
        );
    }
}
