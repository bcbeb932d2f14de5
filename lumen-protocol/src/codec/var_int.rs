use std::io::{Read, Write};

use crate::codec::errors::{ReadingError, WritingError};
use crate::serial::{ReadFrom, WriteTo};

/// A protocol VarInt: 7 bits per byte, continuation in the high bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Maximum number of bytes a VarInt occupies.
    pub const MAX_SIZE: usize = 5;

    /// Returns the exact number of bytes `val` encodes to.
    #[must_use]
    pub fn written_size(val: i32) -> usize {
        match val {
            0 => 1,
            n => (31 - (n as u32).leading_zeros() as usize) / 7 + 1,
        }
    }
}

impl ReadFrom for VarInt {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = u8::read(data)?;
            val |= (i32::from(byte) & 0x7F) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(Self(val));
            }
        }
        Err(ReadingError::TooLarge("VarInt".to_string()))
    }
}

impl WriteTo for VarInt {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        let mut val = self.0 as u32;
        loop {
            let b = (val & 0x7F) as u8;
            val >>= 7;
            if val == 0 {
                b.write(writer)?;
                return Ok(());
            }
            (b | 0x80).write(writer)?;
        }
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl TryFrom<usize> for VarInt {
    type Error = WritingError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .map(Self)
            .map_err(|_| WritingError::TooLarge(format!("length {value}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_known_encodings() {
        let cases: [(i32, &[u8]); 5] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (2048, &[0x80, 0x10]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];
        for (value, bytes) in cases {
            let mut out = Vec::new();
            VarInt(value).write(&mut out).unwrap();
            assert_eq!(out, bytes, "encoding {value}");
            assert_eq!(VarInt::written_size(value), bytes.len());
            assert_eq!(VarInt::read(&mut Cursor::new(bytes)).unwrap().0, value);
        }
    }

    #[test]
    fn test_unterminated_is_rejected() {
        let bytes = [0xFF; 6];
        let err = VarInt::read(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(matches!(err, ReadingError::TooLarge(_)));
    }
}
