//! A [`VoxelGrid`] kept entirely in memory.

use lumen_utils::{BlockPos, ChunkPos};
use rustc_hash::FxHashMap;

use super::VoxelGrid;
use crate::chunk::light_chunk::SUB_CHUNK_COUNT;

const SECTION_VOLUME: usize = 16 * 16 * 16;

/// One band of blocks. Each byte packs opacity in the high nibble and emission in the low one.
type Section = Box<[u8; SECTION_VOLUME]>;

#[derive(Debug, Default)]
struct Column {
    sections: [Option<Section>; SUB_CHUNK_COUNT],
}

#[inline]
const fn voxel_index(pos: BlockPos) -> usize {
    pos.local_y() << 8 | pos.local_z() << 4 | pos.local_x()
}

/// Chunk columns with lazily allocated sections of opacity and emission values.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    columns: FxHashMap<ChunkPos, Column>,
}

impl MemoryGrid {
    /// Creates a grid without any chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty chunk column. Existing columns are kept.
    pub fn insert_chunk(&mut self, pos: ChunkPos) {
        self.columns.entry(pos).or_default();
    }

    /// Removes a chunk column and its blocks.
    pub fn remove_chunk(&mut self, pos: ChunkPos) {
        self.columns.remove(&pos);
    }

    /// Creates an all-air band in an existing chunk.
    pub fn create_sub_chunk(&mut self, pos: ChunkPos, band: i32) {
        let Some(column) = self.columns.get_mut(&pos) else {
            log::warn!("Tried to create sub-chunk {band} in missing chunk {pos}");
            return;
        };
        if let Some(slot) = usize::try_from(band).ok().and_then(|band| column.sections.get_mut(band)) {
            slot.get_or_insert_with(|| Box::new([0; SECTION_VOLUME]));
        }
    }

    /// Places a block with the given light properties, creating its band if needed.
    ///
    /// Writes into missing chunks or outside Y 0..=255 are ignored.
    pub fn set_block(&mut self, pos: BlockPos, opacity: u8, emission: u8) {
        debug_assert!(opacity <= 15 && emission <= 15, "Light properties must be 0-15");
        let Some(column) = self.columns.get_mut(&pos.chunk_pos()) else {
            log::warn!("Tried to set block {pos} in missing chunk");
            return;
        };
        let Some(slot) = usize::try_from(pos.section_y())
            .ok()
            .and_then(|band| column.sections.get_mut(band))
        else {
            return;
        };
        let section = slot.get_or_insert_with(|| Box::new([0; SECTION_VOLUME]));
        section[voxel_index(pos)] = (opacity.min(15) << 4) | emission.min(15);
    }

    /// Places the same block in every position of the box `min..=max`.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, opacity: u8, emission: u8) {
        for y in min.y()..=max.y() {
            for z in min.z()..=max.z() {
                for x in min.x()..=max.x() {
                    self.set_block(BlockPos::new(x, y, z), opacity, emission);
                }
            }
        }
    }

    fn packed(&self, pos: BlockPos) -> u8 {
        let Ok(band) = usize::try_from(pos.section_y()) else {
            return 0;
        };
        self.columns
            .get(&pos.chunk_pos())
            .and_then(|column| column.sections.get(band)?.as_ref())
            .map_or(0, |section| section[voxel_index(pos)])
    }

    fn section(&self, pos: ChunkPos, band: i32) -> Option<&Section> {
        let band = usize::try_from(band).ok()?;
        self.columns.get(&pos)?.sections.get(band)?.as_ref()
    }
}

impl VoxelGrid for MemoryGrid {
    #[inline]
    fn block_opacity(&self, pos: BlockPos) -> u8 {
        self.packed(pos) >> 4
    }

    #[inline]
    fn block_emission(&self, pos: BlockPos) -> u8 {
        self.packed(pos) & 0xF
    }

    fn chunk_exists(&self, pos: ChunkPos) -> bool {
        self.columns.contains_key(&pos)
    }

    fn sub_chunk_exists(&self, pos: ChunkPos, band: i32) -> bool {
        self.section(pos, band).is_some()
    }

    fn sub_chunk_has_blocks(&self, pos: ChunkPos, band: i32) -> bool {
        self.section(pos, band)
            .is_some_and(|section| section.iter().any(|block| *block != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_block_packs_properties() {
        let mut grid = MemoryGrid::new();
        grid.insert_chunk(ChunkPos::new(-1, 2));
        let pos = BlockPos::new(-3, 70, 40);
        grid.set_block(pos, 15, 7);

        assert_eq!(grid.block_opacity(pos), 15);
        assert_eq!(grid.block_emission(pos), 7);
        assert_eq!(grid.block_opacity(pos.offset(0, 1, 0)), 0);
        assert!(grid.sub_chunk_exists(ChunkPos::new(-1, 2), 4));
        assert!(!grid.sub_chunk_exists(ChunkPos::new(-1, 2), 5));
    }

    #[test]
    fn test_missing_chunk_reads_as_air() {
        let mut grid = MemoryGrid::new();
        let pos = BlockPos::new(100, 10, 100);
        grid.set_block(pos, 15, 15);
        assert!(!grid.chunk_exists(pos.chunk_pos()));
        assert_eq!(grid.block_opacity(pos), 0);
        assert_eq!(grid.block_opacity(BlockPos::new(0, -1, 0)), 0);
    }

    #[test]
    fn test_sub_chunk_has_blocks() {
        let mut grid = MemoryGrid::new();
        let chunk = ChunkPos::new(0, 0);
        grid.insert_chunk(chunk);
        grid.create_sub_chunk(chunk, 3);
        assert!(grid.sub_chunk_exists(chunk, 3));
        assert!(!grid.sub_chunk_has_blocks(chunk, 3));

        grid.set_block(BlockPos::new(1, 50, 1), 2, 0);
        assert!(grid.sub_chunk_has_blocks(chunk, 3));
    }

    #[test]
    fn test_chunks_exist_in_range() {
        let mut grid = MemoryGrid::new();
        for x in -1..=1 {
            grid.insert_chunk(ChunkPos::new(x, 0));
        }
        assert!(grid.do_chunks_exist_in_range(BlockPos::new(-16, 0, 0), BlockPos::new(31, 255, 15)));
        assert!(!grid.do_chunks_exist_in_range(BlockPos::new(-17, 0, 0), BlockPos::new(0, 255, 0)));
        assert!(!grid.do_chunks_exist_in_range(BlockPos::new(0, 0, 0), BlockPos::new(0, 255, 16)));
        assert!(!grid.do_chunks_exist_in_range(BlockPos::new(0, -20, 0), BlockPos::new(0, -1, 0)));
    }
}
