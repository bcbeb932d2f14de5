use std::io::{Read, Write};

use crate::codec::VarInt;
use crate::codec::errors::{ReadingError, WritingError};
use crate::serial::{ReadFrom, WriteTo};

/// A simple bit set implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSet(pub Box<[u64]>);

impl BitSet {
    /// Creates a cleared bit set able to hold `bits` bits.
    #[must_use]
    pub fn with_bits(bits: usize) -> Self {
        Self(vec![0; bits.div_ceil(64)].into_boxed_slice())
    }

    /// Sets the bit at the given index. Indices past the end are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        let u64_index = index / 64;
        let bit_index = index % 64;

        if u64_index >= self.0.len() {
            return;
        }

        if value {
            self.0[u64_index] |= 1 << bit_index;
        } else {
            self.0[u64_index] &= !(1 << bit_index);
        }
    }

    /// Returns the bit at the given index, `false` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.0
            .get(index / 64)
            .is_some_and(|word| word & (1 << (index % 64)) != 0)
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }
}

impl ReadFrom for BitSet {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        let len = VarInt::read(data)?.0;
        let len = usize::try_from(len)
            .map_err(|_| ReadingError::Invalid(format!("negative BitSet length {len}")))?;
        let mut words = Vec::with_capacity(len.min(64));
        for _ in 0..len {
            words.push(i64::read(data)? as u64);
        }
        Ok(Self(words.into_boxed_slice()))
    }
}

impl WriteTo for BitSet {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        // Trailing zero words are not sent, matching java.util.BitSet#toLongArray
        let mut trimmed_len = self.0.len();
        while trimmed_len > 0 && self.0[trimmed_len - 1] == 0 {
            trimmed_len -= 1;
        }

        VarInt::try_from(trimmed_len)?.write(writer)?;
        for word in &self.0[..trimmed_len] {
            (*word as i64).write(writer)?;
        }
        Ok(())
    }
}
