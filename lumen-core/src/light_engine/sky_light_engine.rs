//! Height-map maintenance and the sky light work it triggers.
//!
//! The height of a column is the lowest Y from which the open sky is visible.
//! Whenever a height moves, the sky light of the columns between the old and
//! the new height is scheduled, and columns next to bands without blocks are
//! scheduled too since light can enter them sideways.

use lumen_utils::{BlockPos, ChunkPos};

use crate::chunk::boundary_flags::AxisHalf;
use crate::chunk::height_map::COLUMN_COUNT;
use crate::chunk::light_chunk::SUB_CHUNK_COUNT;
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

use super::{Direction, LightChunkAccess, LightEngine};

/// How far around a column neighbouring chunks must exist before gaps are reconciled.
const GAP_CHECK_RANGE: i32 = 16;

/// Y just above the highest band the grid has created, or 0 without any band.
fn top_of_sub_chunks<G: VoxelGrid + ?Sized>(access: &LightChunkAccess<'_, G>, chunk_pos: ChunkPos) -> i32 {
    (0..SUB_CHUNK_COUNT as i32)
        .rev()
        .find(|band| access.sub_chunk_exists(chunk_pos, *band))
        .map_or(0, |band| (band + 1) * 16)
}

/// Scans every column downward from `top_y`, returning the heights and their minimum.
fn scan_heights<G: VoxelGrid + ?Sized>(
    access: &LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    top_y: i32,
) -> ([i32; COLUMN_COUNT], i32) {
    let mut heights = [0; COLUMN_COUNT];
    let mut min_height = i32::MAX;
    for z in 0..16 {
        for x in 0..16 {
            let world_x = chunk_pos.min_block_x() + x;
            let world_z = chunk_pos.min_block_z() + z;
            let mut y = top_y;
            while y > 0 && access.opacity(BlockPos::new(world_x, y - 1, world_z)) == 0 {
                y -= 1;
            }
            heights[(x + z * 16) as usize] = y;
            min_height = min_height.min(y);
        }
    }
    (heights, min_height)
}

fn store_heights<G: VoxelGrid + ?Sized>(
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    heights: &[i32; COLUMN_COUNT],
    min_height: i32,
) {
    let Some(chunk) = access.chunks.get_mut(&chunk_pos) else {
        return;
    };
    for (index, height) in heights.iter().enumerate() {
        chunk.height_map.set(index % 16, index / 16, *height);
    }
    chunk.height_map.set_min_height(min_height);
    chunk.dirty = true;
}

/// Recomputes the height-map of a chunk from its blocks. No light is touched.
pub fn generate_height_map<G: VoxelGrid + ?Sized>(access: &mut LightChunkAccess<'_, G>, chunk_pos: ChunkPos) {
    let top_y = top_of_sub_chunks(access, chunk_pos);
    let (heights, min_height) = scan_heights(access, chunk_pos, top_y);
    store_heights(access, chunk_pos, &heights, min_height);
}

/// Recomputes the height-map and fills the initial sky light straight down every column.
///
/// Light arrays are created for every band the grid reports. The fill starts
/// at 15 on top of the highest band, counts transparent blocks as opacity 1
/// once the light has been dimmed and stops when it runs out.
pub fn generate_skylight_map<G: VoxelGrid + ?Sized>(access: &mut LightChunkAccess<'_, G>, chunk_pos: ChunkPos) {
    let top_y = top_of_sub_chunks(access, chunk_pos);
    let (heights, min_height) = scan_heights(access, chunk_pos, top_y);
    store_heights(access, chunk_pos, &heights, min_height);

    let has_sky = access.has_sky;
    let existing: Vec<usize> = (0..SUB_CHUNK_COUNT)
        .filter(|band| access.sub_chunk_exists(chunk_pos, *band as i32))
        .collect();
    let Some(chunk) = access.chunks.get_mut(&chunk_pos) else {
        return;
    };
    for band in &existing {
        chunk.ensure_section(*band, has_sky);
    }
    if !has_sky || top_y == 0 {
        return;
    }

    for z in 0..16 {
        for x in 0..16 {
            let world_x = chunk_pos.min_block_x() + x as i32;
            let world_z = chunk_pos.min_block_z() + z as i32;
            let mut light: u8 = 15;
            let mut y = top_y - 1;
            loop {
                let mut opacity = access.grid.block_opacity(BlockPos::new(world_x, y, world_z)).min(15);
                if opacity == 0 && light != 15 {
                    opacity = 1;
                }
                light = light.saturating_sub(opacity);
                if light > 0 && chunk.section((y >> 4) as usize).is_some() {
                    chunk.set_light(LightType::Sky, x, y, z, light, has_sky);
                }
                y -= 1;
                if y <= 0 || light == 0 {
                    break;
                }
            }
        }
    }
}

/// Re-evaluates the height of local column `x`, `z` after the block at `y - 1` changed.
///
/// The new height starts at `max(y, height)` and walks down through
/// transparent blocks. Nothing happens when it ends where it started.
pub fn relight_block<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    x: usize,
    y: i32,
    z: usize,
) {
    let Some(chunk) = access.chunk(chunk_pos) else {
        return;
    };
    let old_height = chunk.height_map.get(x, z);
    let world_x = chunk_pos.min_block_x() + x as i32;
    let world_z = chunk_pos.min_block_z() + z as i32;

    let mut new_height = y.max(old_height).min(256);
    while new_height > 0 && access.opacity(BlockPos::new(world_x, new_height - 1, world_z)) == 0 {
        new_height -= 1;
    }
    if new_height == old_height {
        return;
    }

    if let Some(chunk) = access.chunk_mut(chunk_pos) {
        chunk.height_map.set(x, z, new_height);
        chunk.dirty = true;
    }
    if access.has_sky {
        relight_skylight_column(engine, access, chunk_pos, x, z, old_height, new_height);
    }
    if let Some(chunk) = access.chunk_mut(chunk_pos) {
        chunk.height_map.lower_min_height(new_height);
    }
}

/// Schedules sky light between two heights of a column and the affected neighbour columns.
///
/// Covers `[min(a, b), max(a, b) - 1]`. Neighbour columns are scheduled for
/// every band in that range that has no blocks; across an unloaded chunk edge
/// the band is flagged on the boundary instead.
pub fn relight_skylight_column<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    x: usize,
    z: usize,
    a: i32,
    b: i32,
) {
    let start_y = a.min(b);
    let end_y = a.max(b) - 1;
    if end_y < start_y {
        return;
    }
    let world_x = chunk_pos.min_block_x() + x as i32;
    let world_z = chunk_pos.min_block_z() + z as i32;

    engine.schedule_update_for_column(LightType::Sky, world_x, world_z, start_y, end_y);

    let min_band = (start_y >> 4).clamp(0, 15);
    let max_band = (end_y >> 4).clamp(0, 15);
    if !access.sub_chunk_exists(chunk_pos, min_band) && start_y > 0 {
        engine.schedule_update(LightType::Sky, BlockPos::new(world_x, start_y - 1, world_z));
    }

    let empty_bands = (min_band..=max_band)
        .filter(|band| !access.sub_chunk_exists(chunk_pos, *band))
        .fold(0u16, |mask, band| mask | 1 << band);
    if empty_bands == 0 {
        return;
    }

    for direction in Direction::HORIZONTAL {
        let (dx, dz) = (direction.x_offset(), direction.z_offset());
        let at_border = ((x as i32 + dx) | (z as i32 + dz)) & 16 != 0;
        if at_border && !access.is_loaded(chunk_pos.offset(dx, dz)) {
            access.flag_chunk_boundary_for_update(
                chunk_pos,
                empty_bands,
                LightType::Sky,
                direction,
                AxisHalf::of_column(direction, x, z),
            );
            continue;
        }

        for band in (0..16).filter(|band| empty_bands & (1 << band) != 0) {
            engine.schedule_update_for_column(
                LightType::Sky,
                world_x + dx,
                world_z + dz,
                band * 16,
                band * 16 + 15,
            );
        }
    }
}

/// Reconciles every outdated column of a chunk with its neighbours.
///
/// Does nothing until all chunks within 16 blocks of the chunk centre exist;
/// the outdated flags are kept for the next attempt.
pub fn recheck_gaps<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
) {
    let _span = tracing::debug_span!("recheck_gaps", %chunk_pos).entered();

    let center_x = chunk_pos.min_block_x() + 8;
    let center_z = chunk_pos.min_block_z() + 8;
    if !access.chunks_exist_around(center_x, center_z, GAP_CHECK_RANGE) {
        return;
    }

    for z in 0..16 {
        for x in 0..16 {
            recheck_gaps_for_column(engine, access, chunk_pos, x, z);
        }
    }
}

fn recheck_gaps_for_column<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    x: usize,
    z: usize,
) {
    let Some(chunk) = access.chunk(chunk_pos) else {
        return;
    };
    if !chunk.height_map.is_outdated(x, z) {
        return;
    }
    let height = chunk.height_map.get(x, z);
    let world_x = chunk_pos.min_block_x() + x as i32;
    let world_z = chunk_pos.min_block_z() + z as i32;

    let lowest_neighbor_chunk = Direction::HORIZONTAL
        .iter()
        .filter_map(|direction| {
            let neighbor = ChunkPos::from_block(world_x + direction.x_offset(), world_z + direction.z_offset());
            access.chunk(neighbor).map(|chunk| chunk.height_map.min_height())
        })
        .min()
        .unwrap_or(height);

    let mut resolved = check_neighbor_height(engine, access, world_x, world_z, lowest_neighbor_chunk);
    for direction in Direction::HORIZONTAL {
        resolved &= check_neighbor_height(
            engine,
            access,
            world_x + direction.x_offset(),
            world_z + direction.z_offset(),
            height,
        );
    }

    // a neighbour without light data is compared again on the next recheck
    if !resolved {
        return;
    }
    if let Some(chunk) = access.chunk_mut(chunk_pos) {
        chunk.height_map.set_outdated(x, z, false);
    }
}

/// Schedules the sky light of world column `x`, `z` between its height and `max_value`.
///
/// Taller columns get `max_value..=height`, shorter ones `height..=max_value`.
/// Skipped unless every chunk within 16 blocks exists. Returns `false` when the
/// column's chunk has no light data yet.
pub fn check_neighbor_height<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    x: i32,
    z: i32,
    max_value: i32,
) -> bool {
    let Some(chunk) = access.chunk(ChunkPos::from_block(x, z)) else {
        return false;
    };
    let height = chunk.height_map.get((x & 15) as usize, (z & 15) as usize);
    let (min_y, end_y) = match height.cmp(&max_value) {
        std::cmp::Ordering::Greater => (max_value, height + 1),
        std::cmp::Ordering::Less => (height, max_value + 1),
        std::cmp::Ordering::Equal => return true,
    };
    if access.chunks_exist_around(x, z, GAP_CHECK_RANGE) {
        engine.schedule_update_for_column(LightType::Sky, x, z, min_y, end_y - 1);
    }
    true
}

/// Marks the columns of `chunk_pos` along its edge facing `direction` outdated.
pub fn mark_edge_outdated<G: VoxelGrid + ?Sized>(
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    direction: Direction,
) {
    let Some(chunk) = access.chunk_mut(chunk_pos) else {
        return;
    };
    for i in 0..16 {
        let (x, z) = match direction {
            Direction::North => (i, 0),
            Direction::South => (i, 15),
            Direction::West => (0, i),
            Direction::East => (15, i),
            Direction::Down | Direction::Up => return,
        };
        chunk.height_map.set_outdated(x, z, true);
    }
}
