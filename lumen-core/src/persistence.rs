//! Saving and restoring chunk light as NBT.
//!
//! Layout of the compound:
//!
//! | key                     | tag                      |
//! |-------------------------|--------------------------|
//! | `lumen_version`         | String                   |
//! | `lighting_initialized`  | Byte                     |
//! | `sky_light_height_map`  | IntArray (256)           |
//! | `neighbor_light_checks` | List of Short (32)       |
//! | `sub_chunks`            | List of Compound         |
//!
//! Every sub-chunk compound carries `y` (Byte), `block_light` (ByteArray) and,
//! in worlds with a sky, `sky_light` (ByteArray). Fields that cannot be used
//! are logged and skipped; the rest of the chunk is still restored.

use lumen_utils::ChunkPos;
use simdnbt::owned::{NbtCompound, NbtList, NbtTag};

use crate::chunk::boundary_flags::{FLAG_COUNT, NeighborLightChecks};
use crate::chunk::height_map::{COLUMN_COUNT, SkyLightHeightMap};
use crate::chunk::light_chunk::{LightChunk, SUB_CHUNK_COUNT};
use crate::chunk::light_storage::{LIGHT_ARRAY_SIZE, LightStorage};
use crate::chunk::sub_chunk::SubChunkLight;
use crate::error::LightDataError;
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

/// Format marker written into every chunk. Data with any other marker is discarded.
pub const LIGHT_DATA_VERSION: &str = "lumen-1";

const VERSION_KEY: &str = "lumen_version";
const INITIALIZED_KEY: &str = "lighting_initialized";
const HEIGHT_MAP_KEY: &str = "sky_light_height_map";
const LIGHT_CHECKS_KEY: &str = "neighbor_light_checks";
const SUB_CHUNKS_KEY: &str = "sub_chunks";
const SECTION_Y_KEY: &str = "y";
const BLOCK_LIGHT_KEY: &str = "block_light";
const SKY_LIGHT_KEY: &str = "sky_light";

/// A chunk rebuilt from NBT.
#[derive(Debug)]
pub struct RestoredChunk {
    /// The restored overlay.
    pub chunk: LightChunk,
    /// False when the stored heights were missing or unusable and have to be regenerated.
    pub height_map_restored: bool,
}

/// Serialises the light of a chunk.
///
/// Sub-chunks without blocks whose light is entirely default are left out.
#[must_use]
pub fn write_chunk<G: VoxelGrid + ?Sized>(chunk: &LightChunk, grid: &G, has_sky: bool) -> NbtCompound {
    let mut nbt = NbtCompound::new();
    nbt.insert(VERSION_KEY, NbtTag::String(LIGHT_DATA_VERSION.into()));
    nbt.insert(INITIALIZED_KEY, i8::from(chunk.lighting_initialized));
    nbt.insert(HEIGHT_MAP_KEY, NbtTag::IntArray(chunk.height_map.heights().to_vec()));

    if !chunk.light_checks.is_empty() {
        let flags = chunk.light_checks.as_slice().iter().map(|mask| *mask as i16).collect();
        nbt.insert(LIGHT_CHECKS_KEY, NbtList::Short(flags));
    }

    let mut sub_chunks = Vec::new();
    for (band, section) in chunk.sections() {
        if section.is_trivial(grid.sub_chunk_has_blocks(chunk.pos, band as i32)) {
            continue;
        }
        let mut entry = NbtCompound::new();
        entry.insert(SECTION_Y_KEY, band as i8);
        if let Some(block_light) = section.storage(LightType::Block) {
            entry.insert(BLOCK_LIGHT_KEY, NbtTag::ByteArray(block_light.to_packet_data()));
        }
        if has_sky && let Some(sky_light) = section.storage(LightType::Sky) {
            entry.insert(SKY_LIGHT_KEY, NbtTag::ByteArray(sky_light.to_packet_data()));
        }
        sub_chunks.push(entry);
    }
    nbt.insert(SUB_CHUNKS_KEY, NbtList::Compound(sub_chunks));
    nbt
}

/// Rebuilds the overlay of the chunk at `pos` from `nbt`.
///
/// A missing or different `lumen_version` yields a fresh, uninitialised chunk
/// so its lighting is computed again from scratch.
#[must_use]
pub fn read_chunk(pos: ChunkPos, nbt: &NbtCompound, has_sky: bool) -> RestoredChunk {
    let mut chunk = LightChunk::new(pos);

    let version_matches = matches!(
        nbt.get(VERSION_KEY),
        Some(NbtTag::String(version)) if version.to_str() == LIGHT_DATA_VERSION
    );
    if !version_matches {
        log::debug!("Discarding light data of chunk {pos} written by another format version");
        return RestoredChunk {
            chunk,
            height_map_restored: false,
        };
    }

    match nbt.get(INITIALIZED_KEY) {
        Some(NbtTag::Byte(initialized)) => chunk.lighting_initialized = *initialized != 0,
        Some(_) => warn_ignored(pos, &LightDataError::WrongType { field: INITIALIZED_KEY }),
        None => {}
    }

    let height_map = match read_height_map(nbt) {
        Ok(height_map) => Some(height_map),
        Err(err) => {
            warn_ignored(pos, &err);
            None
        }
    };
    let height_map_restored = height_map.is_some();
    if let Some(height_map) = height_map {
        chunk.height_map = height_map;
    }

    match read_light_checks(nbt) {
        Ok(Some(light_checks)) => chunk.light_checks = light_checks,
        Ok(None) => {}
        Err(err) => warn_ignored(pos, &err),
    }

    match nbt.get(SUB_CHUNKS_KEY) {
        Some(NbtTag::List(NbtList::Compound(entries))) => {
            for entry in entries {
                match read_sub_chunk(entry, has_sky) {
                    Ok((band, section)) => chunk.put_section(band, section),
                    Err(err) => warn_ignored(pos, &err),
                }
            }
        }
        Some(NbtTag::List(NbtList::Empty)) | None => {}
        Some(_) => warn_ignored(pos, &LightDataError::WrongType { field: SUB_CHUNKS_KEY }),
    }

    RestoredChunk {
        chunk,
        height_map_restored,
    }
}

fn warn_ignored(pos: ChunkPos, err: &LightDataError) {
    log::warn!("Chunk {pos}: {err}");
}

fn read_height_map(nbt: &NbtCompound) -> Result<SkyLightHeightMap, LightDataError> {
    let Some(tag) = nbt.get(HEIGHT_MAP_KEY) else {
        return Err(LightDataError::InvalidLength {
            field: HEIGHT_MAP_KEY,
            expected: COLUMN_COUNT,
            found: 0,
        });
    };
    let NbtTag::IntArray(values) = tag else {
        return Err(LightDataError::WrongType { field: HEIGHT_MAP_KEY });
    };
    let mut heights: [i32; COLUMN_COUNT] =
        values.as_slice().try_into().map_err(|_| LightDataError::InvalidLength {
            field: HEIGHT_MAP_KEY,
            expected: COLUMN_COUNT,
            found: values.len(),
        })?;
    for height in &mut heights {
        *height = (*height).clamp(0, 256);
    }
    Ok(SkyLightHeightMap::from_heights(heights))
}

fn read_light_checks(nbt: &NbtCompound) -> Result<Option<NeighborLightChecks>, LightDataError> {
    let values = match nbt.get(LIGHT_CHECKS_KEY) {
        None | Some(NbtTag::List(NbtList::Empty)) => return Ok(None),
        Some(NbtTag::List(NbtList::Short(values))) => values,
        Some(_) => return Err(LightDataError::WrongType { field: LIGHT_CHECKS_KEY }),
    };
    if values.len() != FLAG_COUNT {
        return Err(LightDataError::InvalidLength {
            field: LIGHT_CHECKS_KEY,
            expected: FLAG_COUNT,
            found: values.len(),
        });
    }
    let mut flags = [0u16; FLAG_COUNT];
    for (flag, value) in flags.iter_mut().zip(values) {
        *flag = *value as u16;
    }
    Ok(Some(NeighborLightChecks::from_array(flags)))
}

fn read_light_array(entry: &NbtCompound, field: &'static str) -> Result<Option<LightStorage>, LightDataError> {
    match entry.get(field) {
        None => Ok(None),
        Some(NbtTag::ByteArray(bytes)) => LightStorage::from_bytes(bytes)
            .map(Some)
            .ok_or(LightDataError::InvalidLength {
                field,
                expected: LIGHT_ARRAY_SIZE,
                found: bytes.len(),
            }),
        Some(_) => Err(LightDataError::WrongType { field }),
    }
}

fn read_sub_chunk(entry: &NbtCompound, has_sky: bool) -> Result<(usize, SubChunkLight), LightDataError> {
    let band = match entry.get(SECTION_Y_KEY) {
        Some(NbtTag::Byte(y)) => i32::from(*y),
        _ => return Err(LightDataError::WrongType { field: SECTION_Y_KEY }),
    };
    if !(0..SUB_CHUNK_COUNT as i32).contains(&band) {
        return Err(LightDataError::BandOutOfRange(band));
    }

    let block_light = read_light_array(entry, BLOCK_LIGHT_KEY)?.unwrap_or_default();
    let sky_light = if has_sky {
        // a missing sky array means the band was saved dark
        Some(read_light_array(entry, SKY_LIGHT_KEY)?.unwrap_or_default())
    } else {
        None
    };
    Ok((band as usize, SubChunkLight::from_storage(block_light, sky_light)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumen_utils::BlockPos;

    use super::*;
    use crate::chunk::boundary_flags::{AxisHalf, BoundaryFacing, flag_index};
    use crate::grid::MemoryGrid;
    use crate::light_engine::Direction;

    fn grid_with_blocks(pos: ChunkPos) -> MemoryGrid {
        let mut grid = MemoryGrid::new();
        grid.insert_chunk(pos);
        grid.set_block(BlockPos::new(pos.min_block_x(), 70, pos.min_block_z()), 15, 0);
        grid
    }

    #[test]
    fn test_write_then_read_keeps_light_and_flags() {
        let pos = ChunkPos::new(2, -3);
        let grid = grid_with_blocks(pos);
        let mut chunk = LightChunk::new(pos);
        chunk.lighting_initialized = true;
        chunk.height_map.set(0, 0, 71);
        chunk.set_light(LightType::Block, 4, 70, 4, 13, true);
        let index = flag_index(LightType::Sky, Direction::West, AxisHalf::Positive, BoundaryFacing::Out);
        chunk.light_checks.set_bits(index, 0b1001);

        let nbt = write_chunk(&chunk, &grid, true);
        let restored = read_chunk(pos, &nbt, true);

        assert!(restored.height_map_restored);
        assert!(restored.chunk.lighting_initialized);
        assert_eq!(restored.chunk.height_map.get(0, 0), 71);
        assert_eq!(restored.chunk.height_map.min_height(), 0);
        assert_eq!(restored.chunk.light(LightType::Block, 4, 70, 4, true), 13);
        assert_eq!(restored.chunk.light_checks.get(index), 0b1001);
    }

    #[test]
    fn test_trivial_sub_chunks_are_omitted() {
        let pos = ChunkPos::new(0, 0);
        let mut grid = MemoryGrid::new();
        grid.insert_chunk(pos);
        let mut chunk = LightChunk::new(pos);
        chunk.ensure_section(3, true);

        let nbt = write_chunk(&chunk, &grid, true);
        match nbt.get(SUB_CHUNKS_KEY) {
            Some(NbtTag::List(NbtList::Compound(entries))) => assert!(entries.is_empty()),
            Some(NbtTag::List(NbtList::Empty)) => {}
            other => panic!("unexpected sub_chunks tag {other:?}"),
        }
        assert!(nbt.get(LIGHT_CHECKS_KEY).is_none());
    }

    fn lit_entry(band: i8) -> NbtCompound {
        let mut block_light = LightStorage::new_empty();
        block_light.set(1, 1, 1, 9);
        let mut entry = NbtCompound::new();
        entry.insert(SECTION_Y_KEY, band);
        entry.insert(BLOCK_LIGHT_KEY, NbtTag::ByteArray(block_light.to_packet_data()));
        entry
    }

    #[test]
    fn test_version_mismatch_discards_everything() {
        let mut nbt = NbtCompound::new();
        nbt.insert(VERSION_KEY, NbtTag::String("lumen-0".into()));
        nbt.insert(INITIALIZED_KEY, 1i8);
        nbt.insert(SUB_CHUNKS_KEY, NbtList::Compound(vec![lit_entry(0)]));
        let restored = read_chunk(ChunkPos::new(0, 0), &nbt, true);

        assert!(!restored.height_map_restored);
        assert!(!restored.chunk.lighting_initialized);
        assert!(restored.chunk.section(0).is_none());
    }

    #[test]
    fn test_bad_fields_are_skipped() {
        let mut nbt = NbtCompound::new();
        nbt.insert(VERSION_KEY, NbtTag::String(LIGHT_DATA_VERSION.into()));
        nbt.insert(HEIGHT_MAP_KEY, NbtTag::IntArray(vec![1, 2, 3]));
        nbt.insert(LIGHT_CHECKS_KEY, NbtTag::Int(4));
        nbt.insert(SUB_CHUNKS_KEY, NbtList::Compound(vec![lit_entry(20), lit_entry(2)]));
        let restored = read_chunk(ChunkPos::new(0, 0), &nbt, true);

        assert!(!restored.height_map_restored);
        assert!(restored.chunk.light_checks.is_empty());
        assert!(!restored.chunk.lighting_initialized);
        assert_eq!(restored.chunk.light(LightType::Block, 1, 33, 1, true), 9);
        // the sky array was not stored, so the band reads dark
        assert_eq!(restored.chunk.light(LightType::Sky, 1, 33, 1, true), 0);
    }

    #[test]
    fn test_sub_chunk_errors() {
        let mut entry = NbtCompound::new();
        entry.insert(SECTION_Y_KEY, 16i8);
        assert_eq!(
            read_sub_chunk(&entry, true).unwrap_err(),
            LightDataError::BandOutOfRange(16)
        );

        let mut entry = NbtCompound::new();
        entry.insert(SECTION_Y_KEY, 2i8);
        entry.insert(BLOCK_LIGHT_KEY, NbtTag::ByteArray(vec![0; 10]));
        assert_eq!(
            read_sub_chunk(&entry, true).unwrap_err(),
            LightDataError::InvalidLength {
                field: BLOCK_LIGHT_KEY,
                expected: LIGHT_ARRAY_SIZE,
                found: 10,
            }
        );
    }
}
