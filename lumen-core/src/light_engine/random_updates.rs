//! Slow background re-checks of chunk light, a few columns per tick.

use lumen_utils::{BlockPos, ChunkPos};

use crate::chunk::light_chunk::MAX_QUEUED_RANDOM_UPDATES;
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

use super::{LightChunkAccess, LightEngine};

/// Who ticks a chunk, which decides how many columns it may re-check per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickContext {
    /// The authoritative server world.
    Server,
    /// An observer's chunk close to the viewer.
    ClientActive,
    /// Any other observed chunk.
    ClientInactive,
}

/// Advances the chunk's random re-check cursor by up to `budget` columns.
///
/// The cursor walks all 4096 sixteen voxel columns of the chunk, band first.
/// Columns in bands the host has not created are skipped. Within a column,
/// corner voxels of the band are always re-checked, an opaque voxel that does
/// not emit is cleared of stale block light, and the first other voxel is
/// re-checked before moving on. Returns the number of columns visited.
pub fn enqueue_random_relight_checks<G: VoxelGrid + ?Sized>(
    engine: &mut LightEngine,
    access: &mut LightChunkAccess<'_, G>,
    chunk_pos: ChunkPos,
    budget: u32,
) -> u32 {
    let _span = tracing::debug_span!("random_light_updates", %chunk_pos, budget).entered();

    let mut visited = 0;
    while visited < budget {
        let Some(chunk) = access.chunk_mut(chunk_pos) else {
            break;
        };
        let cursor = chunk.queued_random_updates;
        if cursor >= MAX_QUEUED_RANDOM_UPDATES {
            break;
        }
        chunk.queued_random_updates += 1;
        visited += 1;

        let band = (cursor % 16) as i32;
        let x = ((cursor / 16) % 16) as usize;
        let z = (cursor / 256) as usize;
        if !access.sub_chunk_exists(chunk_pos, band) {
            continue;
        }
        let world_x = chunk_pos.min_block_x() + x as i32;
        let world_z = chunk_pos.min_block_z() + z as i32;

        for local_y in 0..16 {
            let pos = BlockPos::new(world_x, band * 16 + local_y, world_z);
            let is_corner = (x == 0 || x == 15) && (local_y == 0 || local_y == 15) && (z == 0 || z == 15);
            if is_corner {
                schedule_both(engine, pos);
                continue;
            }

            if access.opacity(pos) >= 15 && access.grid.block_emission(pos) == 0 {
                if access.light(LightType::Block, pos) == 0 {
                    continue;
                }
                access.set_light(LightType::Block, pos, 0);
                break;
            }

            schedule_both(engine, pos);
            break;
        }
    }
    visited
}

fn schedule_both(engine: &mut LightEngine, pos: BlockPos) {
    for light_type in LightType::ALL {
        engine.schedule_update(light_type, pos);
    }
}

/// Restarts the random re-check cursor of a chunk.
pub fn reset_queued_random_updates<G: VoxelGrid + ?Sized>(access: &mut LightChunkAccess<'_, G>, chunk_pos: ChunkPos) {
    if let Some(chunk) = access.chunk_mut(chunk_pos) {
        chunk.queued_random_updates = 0;
    }
}
