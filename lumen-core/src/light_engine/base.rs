//! Base light engine for flood-fill light propagation.
//!
//! Pending positions are first checked against the value their neighbours
//! imply. Positions that turn out too bright or too dark seed per-level
//! buckets that are then processed from level 15 down to 0, darkenings before
//! brightenings on every level. Processing both in level order means a voxel is
//! only re-lit by neighbours that can no longer be darkened.

use lumen_utils::{BlockPos, ChunkPos};
use smallvec::SmallVec;

use crate::chunk::boundary_flags::AxisHalf;
use crate::chunk::light_chunk::MAX_Y;
use crate::grid::VoxelGrid;
use crate::light_type::LightType;

use super::{Direction, LightChunkAccess, LightQueue, UpdateQueue};

const MAX_LIGHT: u8 = 15;
const LEVEL_COUNT: usize = MAX_LIGHT as usize + 1;

/// A face neighbour read during propagation.
#[derive(Debug, Clone, Copy)]
struct Neighbor {
    pos: BlockPos,
    light: u8,
}

/// Light engine that handles light propagation using a flood-fill algorithm.
///
/// The engine owns only transient work. Light values live in the
/// [`LightChunkAccess`] passed to every call, so one engine can serve any
/// number of worlds as long as each drains its own work.
#[derive(Debug)]
pub struct LightEngine {
    pending: [UpdateQueue; 2],
    checking: Vec<BlockPos>,
    initial_brightenings: Vec<(BlockPos, u8)>,
    initial_darkenings: Vec<BlockPos>,
    darkening_queues: [LightQueue; LEVEL_COUNT],
    brightening_queues: [LightQueue; LEVEL_COUNT],
}

impl LightEngine {
    /// Creates a new light engine with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: [UpdateQueue::new(), UpdateQueue::new()],
            checking: Vec::new(),
            initial_brightenings: Vec::new(),
            initial_darkenings: Vec::new(),
            darkening_queues: std::array::from_fn(|_| LightQueue::new()),
            brightening_queues: std::array::from_fn(|_| LightQueue::new()),
        }
    }

    /// Schedules a re-check of one position. Never processes anything right away.
    #[inline]
    pub fn schedule_update(&mut self, light_type: LightType, pos: BlockPos) {
        self.pending[light_type.index()].push(pos);
    }

    /// Schedules the column `x`, `z` from `min_y` to `max_y`, both inclusive.
    pub fn schedule_update_for_column(
        &mut self,
        light_type: LightType,
        x: i32,
        z: i32,
        min_y: i32,
        max_y: i32,
    ) {
        for y in min_y.max(0)..=max_y.min(MAX_Y) {
            self.schedule_update(light_type, BlockPos::new(x, y, z));
        }
    }

    /// Schedules every position of the box `min..=max`.
    pub fn schedule_update_for_range(&mut self, light_type: LightType, min: BlockPos, max: BlockPos) {
        for y in min.y().max(0)..=max.y().min(MAX_Y) {
            for z in min.z()..=max.z() {
                for x in min.x()..=max.x() {
                    self.schedule_update(light_type, BlockPos::new(x, y, z));
                }
            }
        }
    }

    /// Whether positions of `light_type` are waiting.
    #[must_use]
    #[inline]
    pub fn has_pending(&self, light_type: LightType) -> bool {
        !self.pending[light_type.index()].is_empty()
    }

    /// Checks if there are any pending light updates.
    #[must_use]
    pub fn has_work(&self) -> bool {
        LightType::ALL.iter().any(|light_type| self.has_pending(*light_type))
    }

    /// Number of pending positions of `light_type`.
    #[must_use]
    pub fn pending_count(&self, light_type: LightType) -> usize {
        self.pending[light_type.index()].len()
    }

    /// Drops every pending position.
    pub fn clear(&mut self) {
        for queue in &mut self.pending {
            queue.clear();
        }
    }

    /// Drains every pending position of both light types.
    pub fn process_updates_for_all_types<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
    ) {
        for light_type in LightType::ALL {
            self.process_updates(access, light_type);
        }
    }

    /// Drains pending positions of `light_type` until every affected voxel is at its fixed point.
    ///
    /// Sky updates in a world without sky are dropped. Positions in chunks
    /// that are not loaded are dropped.
    pub fn process_updates<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
    ) {
        let queue = &mut self.pending[light_type.index()];
        if queue.is_empty() {
            return;
        }
        queue.drain_into(&mut self.checking);
        if light_type == LightType::Sky && !access.has_sky {
            self.checking.clear();
            return;
        }

        let _span = tracing::debug_span!("lighting", ?light_type, count = self.checking.len()).entered();

        let mut checking = std::mem::take(&mut self.checking);
        for pos in checking.drain(..) {
            if !(0..=MAX_Y).contains(&pos.y()) || !access.is_loaded(pos.chunk_pos()) {
                continue;
            }
            let old_light = access.light(light_type, pos);
            let new_light = Self::calculate_new_light(access, light_type, pos);
            if new_light > old_light {
                self.initial_brightenings.push((pos, new_light));
            } else if new_light < old_light {
                self.initial_darkenings.push(pos);
            }
        }
        self.checking = checking;

        let mut brightenings = std::mem::take(&mut self.initial_brightenings);
        for (pos, new_light) in brightenings.drain(..) {
            if new_light > access.light(light_type, pos) {
                self.enqueue_brightening(access, light_type, pos, new_light);
            }
        }
        self.initial_brightenings = brightenings;

        let mut darkenings = std::mem::take(&mut self.initial_darkenings);
        for pos in darkenings.drain(..) {
            let old_light = access.light(light_type, pos);
            if old_light != 0 {
                self.enqueue_darkening(access, light_type, pos, old_light);
            }
        }
        self.initial_darkenings = darkenings;

        for level in (0..=MAX_LIGHT).rev() {
            while let Some(pos) = self.darkening_queues[level as usize].dequeue() {
                self.process_darkening(access, light_type, pos, level);
            }
            while let Some(pos) = self.brightening_queues[level as usize].dequeue() {
                self.process_brightening(access, light_type, pos, level);
            }
        }
    }

    fn process_darkening<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        level: u8,
    ) {
        // brightened again by another change since it was queued
        if access.light(light_type, pos) >= level {
            return;
        }

        let luminosity = access.luminosity(light_type, pos);
        let opacity = Self::effective_opacity(access, pos, luminosity);

        if Self::calculate_new_light_with(access, light_type, pos, luminosity, opacity) >= level {
            self.enqueue_brightening(access, light_type, pos, level);
            return;
        }

        let mut new_light = luminosity;
        for neighbor in Self::neighbors(access, light_type, pos) {
            if neighbor.light == 0 {
                continue;
            }
            if level.saturating_sub(access.attenuation(neighbor.pos)) >= neighbor.light {
                // this voxel may be what lit the neighbour
                self.enqueue_darkening(access, light_type, neighbor.pos, neighbor.light);
            } else {
                new_light = new_light.max(neighbor.light.saturating_sub(opacity));
            }
        }
        self.enqueue_brightening(access, light_type, pos, new_light);
    }

    fn process_brightening<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        level: u8,
    ) {
        // changed again since it was queued
        if access.light(light_type, pos) != level || level <= 1 {
            return;
        }
        for neighbor in Self::neighbors(access, light_type, pos) {
            let spread = level.saturating_sub(access.attenuation(neighbor.pos));
            if spread > neighbor.light {
                self.enqueue_brightening(access, light_type, neighbor.pos, spread);
            }
        }
    }

    /// Sets the light to `value` and queues the position on that level.
    #[inline]
    fn enqueue_brightening<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        value: u8,
    ) {
        access.set_light(light_type, pos, value);
        self.brightening_queues[value as usize].enqueue(pos);
    }

    /// Sets the light to 0 and queues the position on its old level.
    #[inline]
    fn enqueue_darkening<G: VoxelGrid + ?Sized>(
        &mut self,
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        old_light: u8,
    ) {
        access.set_light(light_type, pos, 0);
        self.darkening_queues[old_light as usize].enqueue(pos);
    }

    /// The value `pos` should hold given its own luminosity and its neighbours.
    fn calculate_new_light<G: VoxelGrid + ?Sized>(
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
    ) -> u8 {
        let luminosity = access.luminosity(light_type, pos);
        let opacity = Self::effective_opacity(access, pos, luminosity);
        Self::calculate_new_light_with(access, light_type, pos, luminosity, opacity)
    }

    fn calculate_new_light_with<G: VoxelGrid + ?Sized>(
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        luminosity: u8,
        opacity: u8,
    ) -> u8 {
        if luminosity >= MAX_LIGHT - opacity {
            return luminosity;
        }
        Self::neighbors(access, light_type, pos)
            .iter()
            .fold(luminosity, |new_light, neighbor| {
                new_light.max(neighbor.light.saturating_sub(opacity))
            })
    }

    /// Attenuation of `pos` itself; bright sources are treated as nearly transparent.
    #[inline]
    fn effective_opacity<G: VoxelGrid + ?Sized>(
        access: &LightChunkAccess<'_, G>,
        pos: BlockPos,
        luminosity: u8,
    ) -> u8 {
        if luminosity >= MAX_LIGHT - 1 {
            1
        } else {
            access.attenuation(pos)
        }
    }

    /// Reads the loaded face neighbours of `pos`.
    ///
    /// A horizontal neighbour in a chunk that is not loaded is skipped and
    /// flags the chunk edge of `pos` so the check is replayed once it loads.
    fn neighbors<G: VoxelGrid + ?Sized>(
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
    ) -> SmallVec<[Neighbor; 6]> {
        let mut neighbors = SmallVec::new();
        let chunk_pos = pos.chunk_pos();
        for direction in Direction::ALL {
            let neighbor_pos = direction.relative(pos);
            if !(0..=MAX_Y).contains(&neighbor_pos.y()) {
                continue;
            }
            let neighbor_chunk = neighbor_pos.chunk_pos();
            if neighbor_chunk != chunk_pos && !access.is_loaded(neighbor_chunk) {
                Self::flag_unloaded_neighbor(access, light_type, pos, chunk_pos, direction);
                continue;
            }
            neighbors.push(Neighbor {
                pos: neighbor_pos,
                light: access.light(light_type, neighbor_pos),
            });
        }
        neighbors
    }

    fn flag_unloaded_neighbor<G: VoxelGrid + ?Sized>(
        access: &mut LightChunkAccess<'_, G>,
        light_type: LightType,
        pos: BlockPos,
        chunk_pos: ChunkPos,
        direction: Direction,
    ) {
        let half = AxisHalf::of_column(direction, pos.local_x(), pos.local_z());
        access.flag_chunk_boundary_for_update(
            chunk_pos,
            1 << pos.section_y(),
            light_type,
            direction,
            half,
        );
    }
}

impl Default for LightEngine {
    fn default() -> Self {
        Self::new()
    }
}
