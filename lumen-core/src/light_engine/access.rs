//! Borrowed view of the voxel grid and light overlay used during propagation.

use lumen_utils::{BlockPos, ChunkPos};

use crate::chunk::boundary_flags::{AxisHalf, BoundaryFacing, flag_index};
use crate::chunk::light_chunk::{LightChunk, LightChunks, MAX_Y};
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

use super::Direction;

/// Everything the engine reads and writes while lighting one world.
///
/// A chunk counts as loaded when the grid reports it and the overlay holds its
/// light data.
pub struct LightChunkAccess<'a, G: VoxelGrid + ?Sized> {
    /// Block data of the world.
    pub grid: &'a G,
    /// Light overlay of every known chunk.
    pub chunks: &'a mut LightChunks,
    /// Whether the world has a sky light field.
    pub has_sky: bool,
}

impl<'a, G: VoxelGrid + ?Sized> LightChunkAccess<'a, G> {
    /// Bundles the borrowed world state.
    pub fn new(grid: &'a G, chunks: &'a mut LightChunks, has_sky: bool) -> Self {
        Self {
            grid,
            chunks,
            has_sky,
        }
    }

    /// Whether the chunk at `pos` can be read and written.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos) && self.grid.chunk_exists(pos)
    }

    /// The overlay of a loaded chunk.
    #[inline]
    #[must_use]
    pub fn chunk(&self, pos: ChunkPos) -> Option<&LightChunk> {
        if !self.grid.chunk_exists(pos) {
            return None;
        }
        self.chunks.get(&pos)
    }

    /// Mutable overlay of a loaded chunk.
    #[inline]
    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut LightChunk> {
        if !self.grid.chunk_exists(pos) {
            return None;
        }
        self.chunks.get_mut(&pos)
    }

    /// Stored light at `pos`. Unloaded chunks and positions outside the world read the default.
    #[inline]
    #[must_use]
    pub fn light(&self, light_type: LightType, pos: BlockPos) -> u8 {
        let default = if light_type == LightType::Sky && self.has_sky { 15 } else { 0 };
        if !(0..=MAX_Y).contains(&pos.y()) {
            return default;
        }
        self.chunk(pos.chunk_pos()).map_or(default, |chunk| {
            chunk.light(light_type, pos.local_x(), pos.y(), pos.local_z(), self.has_sky)
        })
    }

    /// Writes light at `pos`. Unloaded chunks and positions outside the world are ignored.
    #[inline]
    pub fn set_light(&mut self, light_type: LightType, pos: BlockPos, value: u8) {
        if !(0..=MAX_Y).contains(&pos.y()) {
            return;
        }
        let has_sky = self.has_sky;
        if let Some(chunk) = self.chunk_mut(pos.chunk_pos()) {
            chunk.set_light(light_type, pos.local_x(), pos.y(), pos.local_z(), value, has_sky);
        }
    }

    /// Whether `pos` sees the open sky according to its chunk's height-map.
    #[inline]
    #[must_use]
    pub fn can_see_sky(&self, pos: BlockPos) -> bool {
        self.chunk(pos.chunk_pos()).is_none_or(|chunk| {
            chunk
                .height_map
                .can_see_sky(pos.local_x(), pos.y(), pos.local_z())
        })
    }

    /// Whether band `band` of a chunk has been created by the host.
    #[inline]
    #[must_use]
    pub fn sub_chunk_exists(&self, chunk_pos: ChunkPos, band: i32) -> bool {
        (0..16).contains(&band) && self.grid.sub_chunk_exists(chunk_pos, band)
    }

    /// Opacity of the block at `pos` as the grid reports it.
    #[inline]
    #[must_use]
    pub fn opacity(&self, pos: BlockPos) -> u8 {
        self.grid.block_opacity(pos).min(15)
    }

    /// Light lost when entering `pos`: the opacity with a floor of one.
    #[inline]
    #[must_use]
    pub fn attenuation(&self, pos: BlockPos) -> u8 {
        self.opacity(pos).clamp(1, 15)
    }

    /// Light the block at `pos` produces on its own for `light_type`.
    #[inline]
    #[must_use]
    pub fn luminosity(&self, light_type: LightType, pos: BlockPos) -> u8 {
        match light_type {
            LightType::Block => self.grid.block_emission(pos).min(15),
            LightType::Sky if self.can_see_sky(pos) => 15,
            LightType::Sky => 0,
        }
    }

    /// Whether every chunk within `range` blocks of the column `x`, `z` exists.
    #[must_use]
    pub fn chunks_exist_around(&self, x: i32, z: i32, range: i32) -> bool {
        self.grid.do_chunks_exist_in_range(
            BlockPos::new(x - range, 0, z - range),
            BlockPos::new(x + range, MAX_Y, z + range),
        )
    }

    /// Records that bands in `mask` along one edge of a chunk still wait for its neighbour.
    pub fn flag_chunk_boundary_for_update(
        &mut self,
        chunk_pos: ChunkPos,
        mask: u16,
        light_type: LightType,
        direction: Direction,
        half: AxisHalf,
    ) {
        if let Some(chunk) = self.chunks.get_mut(&chunk_pos) {
            let index = flag_index(light_type, direction, half, BoundaryFacing::Out);
            if chunk.light_checks.get(index) & mask != mask {
                chunk.light_checks.set_bits(index, mask);
                chunk.dirty = true;
            }
        }
    }
}
