use std::io::{Read, Write};

use lumen_utils::ChunkPos;

use crate::codec::errors::{ReadingError, WritingError};
use crate::codec::{BitSet, VarInt};
use crate::serial::{ReadFrom, WriteTo};

/// Size of one nibble-packed 16x16x16 light array.
pub const LIGHT_SECTION_BYTES: usize = 2048;

/// Light arrays of one chunk column, keyed by sub-chunk band through the masks.
///
/// A band set in `sky_y_mask` has its array in `sky_updates`, in ascending band
/// order. A band set in `empty_sky_y_mask` is uniformly dark and carries no data.
/// The block light fields work the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightUpdatePacketData {
    /// Bands with sky light data attached.
    pub sky_y_mask: BitSet,
    /// Bands with block light data attached.
    pub block_y_mask: BitSet,
    /// Bands whose sky light is all zero.
    pub empty_sky_y_mask: BitSet,
    /// Bands whose block light is all zero.
    pub empty_block_y_mask: BitSet,
    /// Sky light arrays, 2048 bytes each.
    pub sky_updates: Vec<Vec<u8>>,
    /// Block light arrays, 2048 bytes each.
    pub block_updates: Vec<Vec<u8>>,
}

/// Clientbound light update for a single chunk column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CLightUpdate {
    /// The chunk column the data belongs to.
    pub pos: ChunkPos,
    /// The light arrays.
    pub light_data: LightUpdatePacketData,
}

fn write_arrays(arrays: &[Vec<u8>], writer: &mut impl Write) -> Result<(), WritingError> {
    VarInt::try_from(arrays.len())?.write(writer)?;
    for array in arrays {
        VarInt::try_from(array.len())?.write(writer)?;
        writer.write_all(array)?;
    }
    Ok(())
}

fn read_arrays(data: &mut impl Read) -> Result<Vec<Vec<u8>>, ReadingError> {
    let count = VarInt::read(data)?.0;
    let count = usize::try_from(count)
        .map_err(|_| ReadingError::Invalid(format!("negative light array count {count}")))?;

    let mut arrays = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let len = VarInt::read(data)?.0;
        if usize::try_from(len).ok() != Some(LIGHT_SECTION_BYTES) {
            return Err(ReadingError::Invalid(format!(
                "light array of {len} bytes, expected {LIGHT_SECTION_BYTES}"
            )));
        }
        let mut array = vec![0; LIGHT_SECTION_BYTES];
        data.read_exact(&mut array)?;
        arrays.push(array);
    }
    Ok(arrays)
}

impl WriteTo for LightUpdatePacketData {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        self.sky_y_mask.write(writer)?;
        self.block_y_mask.write(writer)?;
        self.empty_sky_y_mask.write(writer)?;
        self.empty_block_y_mask.write(writer)?;
        write_arrays(&self.sky_updates, writer)?;
        write_arrays(&self.block_updates, writer)
    }
}

impl ReadFrom for LightUpdatePacketData {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        Ok(Self {
            sky_y_mask: BitSet::read(data)?,
            block_y_mask: BitSet::read(data)?,
            empty_sky_y_mask: BitSet::read(data)?,
            empty_block_y_mask: BitSet::read(data)?,
            sky_updates: read_arrays(data)?,
            block_updates: read_arrays(data)?,
        })
    }
}

// The chunk position goes out as two VarInts, not two i32s.
impl WriteTo for CLightUpdate {
    fn write(&self, writer: &mut impl Write) -> Result<(), WritingError> {
        VarInt(self.pos.x()).write(writer)?;
        VarInt(self.pos.z()).write(writer)?;
        self.light_data.write(writer)
    }
}

impl ReadFrom for CLightUpdate {
    fn read(data: &mut impl Read) -> Result<Self, ReadingError> {
        let x = VarInt::read(data)?.0;
        let z = VarInt::read(data)?.0;
        Ok(Self {
            pos: ChunkPos::new(x, z),
            light_data: LightUpdatePacketData::read(data)?,
        })
    }
}
