//! Read access to the voxel world the light is computed for.

pub mod memory;

use lumen_utils::{BlockPos, ChunkPos};

pub use memory::MemoryGrid;

/// Block data the lighting engine reads from the host world.
///
/// All lookups are by world coordinates. Positions in chunks that do not exist
/// must report opacity and emission 0.
pub trait VoxelGrid {
    /// Light opacity of the block at `pos`, 0-15.
    fn block_opacity(&self, pos: BlockPos) -> u8;

    /// Light the block at `pos` emits, 0-15.
    fn block_emission(&self, pos: BlockPos) -> u8;

    /// Whether the chunk column at `pos` exists.
    fn chunk_exists(&self, pos: ChunkPos) -> bool;

    /// Whether the 16 block tall band `band` of a chunk has been created.
    fn sub_chunk_exists(&self, pos: ChunkPos, band: i32) -> bool;

    /// Whether the band holds any non-air block.
    fn sub_chunk_has_blocks(&self, pos: ChunkPos, band: i32) -> bool {
        self.sub_chunk_exists(pos, band)
    }

    /// Whether every chunk overlapping the box `min..=max` exists.
    ///
    /// Boxes reaching outside Y 0..=255 never count as present.
    fn do_chunks_exist_in_range(&self, min: BlockPos, max: BlockPos) -> bool {
        if max.y() < 0 || min.y() > 255 {
            return false;
        }
        let (min_cx, min_cz) = (min.x() >> 4, min.z() >> 4);
        let (max_cx, max_cz) = (max.x() >> 4, max.z() >> 4);
        (min_cx..=max_cx).all(|cx| (min_cz..=max_cz).all(|cz| self.chunk_exists(ChunkPos::new(cx, cz))))
    }
}
