//! Read and write traits for wire values.

use std::io::{Read, Write};

use crate::codec::errors::{ReadingError, WritingError};

/// A value that can be decoded from the wire.
pub trait ReadFrom: Sized {
    /// Reads one value.
    fn read(data: &mut impl Read) -> Result<Self, ReadingError>;
}

/// A value that can be encoded to the wire.
pub trait WriteTo {
    /// Writes this value.
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError>;
}

impl ReadFrom for u8 {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        let mut buf = [0; 1];
        data.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

impl WriteTo for u8 {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        writer.write_all(&[*self])?;
        Ok(())
    }
}

impl ReadFrom for i64 {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        let mut buf = [0; 8];
        data.read_exact(&mut buf)?;
        Ok(Self::from_be_bytes(buf))
    }
}

impl WriteTo for i64 {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        writer.write_all(&self.to_be_bytes())?;
        Ok(())
    }
}
