//! Replaying relight checks that were deferred at chunk edges.
//!
//! A chunk records an `Out` mask when light wanted to cross into a neighbour
//! that was not loaded. Once both sides are present the masks are handed over
//! as `In` masks of the neighbour, and the affected half edges are scheduled.

use lumen_utils::{BlockPos, ChunkPos};

use crate::chunk::boundary_flags::{AxisHalf, BoundaryFacing, flag_index};
use crate::chunk::light_chunk::LightChunks;
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

use super::{Direction, LightChunkAccess, LightEngine};

/// Adds the `Out` mask of `source` facing `destination` to the `In` mask of `destination`.
///
/// `direction` points from `destination` to `source`. The source mask is left
/// untouched; it is only cleared once the check actually ran.
pub fn merge_flags(
    chunks: &mut LightChunks,
    destination: ChunkPos,
    source: ChunkPos,
    light_type: LightType,
    direction: Direction,
    half: AxisHalf,
) {
    let Some(out_mask) = chunks.get(&source).map(|chunk| {
        chunk
            .light_checks
            .get(flag_index(light_type, direction.opposite(), half, BoundaryFacing::Out))
    }) else {
        return;
    };
    if out_mask == 0 {
        return;
    }
    if let Some(chunk) = chunks.get_mut(&destination) {
        chunk
            .light_checks
            .set_bits(flag_index(light_type, direction, half, BoundaryFacing::In), out_mask);
    }
}

/// Schedules the half edge of `chunk_pos` facing `(x_offset, z_offset)` for every band flagged `In`.
///
/// The neighbour across the edge and the side chunk next to that half must
/// both be loaded. Only then are the `In` mask and the neighbour's matching
/// `Out` mask cleared. Known chunks can be passed to skip their lookup.
#[allow(clippy::too_many_arguments)]
pub fn schedule_relight_checks_for_boundary<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    neighbor: Option<ChunkPos>,
    side: Option<ChunkPos>,
    light_type: LightType,
    x_offset: i32,
    z_offset: i32,
    half: AxisHalf,
) {
    let Some(direction) = Direction::from_horizontal_offset(x_offset, z_offset) else {
        return;
    };
    let in_index = flag_index(light_type, direction, half, BoundaryFacing::In);
    let Some(mask) = access.chunk(chunk_pos).map(|chunk| chunk.light_checks.get(in_index)) else {
        return;
    };
    if mask == 0 {
        return;
    }

    let neighbor = neighbor.unwrap_or_else(|| chunk_pos.offset(x_offset, z_offset));
    if !access.is_loaded(neighbor) {
        return;
    }
    let side = side.unwrap_or_else(|| {
        chunk_pos.offset(
            if z_offset != 0 { half.sign() } else { 0 },
            if x_offset != 0 { half.sign() } else { 0 },
        )
    });
    if !access.is_loaded(side) {
        return;
    }

    if let Some(chunk) = access.chunk_mut(chunk_pos) {
        chunk.light_checks.clear(in_index);
        chunk.dirty = true;
    }
    let out_index = flag_index(light_type, direction.opposite(), half, BoundaryFacing::Out);
    if let Some(chunk) = access.chunk_mut(neighbor) {
        chunk.light_checks.clear(out_index);
        chunk.dirty = true;
    }

    let mut min_x = chunk_pos.min_block_x();
    let mut min_z = chunk_pos.min_block_z();
    // the positive edges lie on the far side of the chunk
    if (x_offset | z_offset) > 0 {
        min_x += x_offset * 15;
        min_z += z_offset * 15;
    }
    // the positive half starts halfway along the edge
    if half == AxisHalf::Positive {
        min_x += (z_offset & 1) * 8;
        min_z += (x_offset & 1) * 8;
    }
    let max_x = min_x + 7 * (z_offset & 1);
    let max_z = min_z + 7 * (x_offset & 1);

    for band in (0..16).filter(|band| mask & (1 << band) != 0) {
        engine.schedule_update_for_range(
            light_type,
            BlockPos::new(min_x, band * 16, min_z),
            BlockPos::new(max_x, band * 16 + 15, max_z),
        );
    }
}

/// Hands over and replays every deferred check between a freshly loaded chunk and its neighbours.
///
/// For every loaded horizontal neighbour, light type and half edge the masks
/// are merged both ways, both sides of the shared edge are checked and then
/// the neighbour's edge towards the diagonal chunk, whose check may have been
/// waiting for this chunk as its side chunk.
pub fn schedule_relight_checks_for_chunk_boundaries<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
) {
    for direction in Direction::HORIZONTAL {
        let (dx, dz) = (direction.x_offset(), direction.z_offset());
        let neighbor = chunk_pos.offset(dx, dz);
        if !access.is_loaded(neighbor) {
            continue;
        }

        for light_type in LightType::ALL {
            for half in AxisHalf::ALL {
                merge_flags(access.chunks, chunk_pos, neighbor, light_type, direction, half);
                merge_flags(access.chunks, neighbor, chunk_pos, light_type, direction.opposite(), half);

                schedule_relight_checks_for_boundary(
                    engine,
                    access,
                    chunk_pos,
                    Some(neighbor),
                    None,
                    light_type,
                    dx,
                    dz,
                    half,
                );
                schedule_relight_checks_for_boundary(
                    engine,
                    access,
                    neighbor,
                    Some(chunk_pos),
                    None,
                    light_type,
                    -dx,
                    -dz,
                    half,
                );
                schedule_relight_checks_for_boundary(
                    engine,
                    access,
                    neighbor,
                    None,
                    Some(chunk_pos),
                    light_type,
                    if dz != 0 { half.sign() } else { 0 },
                    if dx != 0 { half.sign() } else { 0 },
                    AxisHalf::of_direction(direction.opposite()),
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chunk::light_chunk::LightChunk;
    use crate::grid::MemoryGrid;

    fn strip(xs: std::ops::RangeInclusive<i32>, zs: std::ops::RangeInclusive<i32>) -> (MemoryGrid, LightChunks) {
        let mut grid = MemoryGrid::new();
        let mut chunks = LightChunks::default();
        for x in xs {
            for z in zs.clone() {
                let pos = ChunkPos::new(x, z);
                grid.insert_chunk(pos);
                chunks.insert(pos, LightChunk::new(pos));
            }
        }
        (grid, chunks)
    }

    fn out_index(direction: Direction, half: AxisHalf) -> usize {
        flag_index(LightType::Block, direction, half, BoundaryFacing::Out)
    }

    #[test]
    fn test_merge_moves_out_to_in() {
        let (_, mut chunks) = strip(0..=1, 0..=0);
        let west = ChunkPos::new(0, 0);
        let east = ChunkPos::new(1, 0);
        chunks.get_mut(&west).unwrap().light_checks.set_bits(out_index(Direction::East, AxisHalf::Positive), 0b100);

        merge_flags(&mut chunks, east, west, LightType::Block, Direction::West, AxisHalf::Positive);

        let in_index = flag_index(LightType::Block, Direction::West, AxisHalf::Positive, BoundaryFacing::In);
        assert_eq!(chunks[&east].light_checks.get(in_index), 0b100);
        // the source keeps its mask until the check runs
        assert_eq!(chunks[&west].light_checks.get(out_index(Direction::East, AxisHalf::Positive)), 0b100);
    }

    #[test]
    fn test_boundary_check_schedules_half_edge() {
        let (grid, mut chunks) = strip(-1..=1, -1..=1);
        let center = ChunkPos::new(0, 0);
        let in_index = flag_index(LightType::Block, Direction::East, AxisHalf::Positive, BoundaryFacing::In);
        chunks.get_mut(&center).unwrap().light_checks.set_bits(in_index, 0b10);

        let mut engine = LightEngine::new();
        let mut access = LightChunkAccess::new(&grid, &mut chunks, true);
        schedule_relight_checks_for_boundary(
            &mut engine,
            &mut access,
            center,
            None,
            None,
            LightType::Block,
            1,
            0,
            AxisHalf::Positive,
        );

        // x = 15, z = 8..=15, y = 16..=31
        assert_eq!(engine.pending_count(LightType::Block), 8 * 16);
        assert_eq!(chunks[&center].light_checks.get(in_index), 0);
    }

    #[test]
    fn test_boundary_check_waits_for_side_chunk() {
        let (grid, mut chunks) = strip(0..=1, 0..=0);
        let center = ChunkPos::new(0, 0);
        let in_index = flag_index(LightType::Sky, Direction::East, AxisHalf::Negative, BoundaryFacing::In);
        chunks.get_mut(&center).unwrap().light_checks.set_bits(in_index, 1);

        let mut engine = LightEngine::new();
        let mut access = LightChunkAccess::new(&grid, &mut chunks, true);
        schedule_relight_checks_for_boundary(
            &mut engine,
            &mut access,
            center,
            None,
            None,
            LightType::Sky,
            1,
            0,
            AxisHalf::Negative,
        );

        assert!(!engine.has_work());
        assert_eq!(chunks[&center].light_checks.get(in_index), 1);
    }

    #[test]
    fn test_chunk_load_replays_neighbor_out_flags() {
        let (grid, mut chunks) = strip(-1..=1, -1..=1);
        let center = ChunkPos::new(0, 0);
        let north = ChunkPos::new(0, -1);
        // the northern chunk wanted to light south into the center before it loaded
        chunks.get_mut(&north).unwrap().light_checks.set_bits(out_index(Direction::South, AxisHalf::Negative), 1);

        let mut engine = LightEngine::new();
        let mut access = LightChunkAccess::new(&grid, &mut chunks, false);
        schedule_relight_checks_for_chunk_boundaries(&mut engine, &mut access, center);

        assert_eq!(engine.pending_count(LightType::Block), 8 * 16);
        assert!(chunks[&north].light_checks.is_empty());
        assert!(chunks[&center].light_checks.is_empty());
    }
}
