//! This module contains the `LightWorld` struct, the lighting state of one world.
//!
//! The host calls the `on_*` hooks at the matching points of its chunk
//! lifecycle and passes its voxel grid to every call. Light reads and the
//! packet helpers live here too.

use lumen_protocol::packets::CLightUpdate;
use lumen_utils::{BlockPos, ChunkPos};
use simdnbt::owned::NbtCompound;

use crate::chunk::light_chunk::{ChunkTask, LightChunk, LightChunks, MAX_Y, SUB_CHUNK_COUNT};
use crate::config::LightingConfig;
use crate::error::LightDataError;
use crate::grid::VoxelGrid;
use crate::light_engine::boundary::schedule_relight_checks_for_chunk_boundaries;
use crate::light_engine::random_updates::{enqueue_random_relight_checks, reset_queued_random_updates};
use crate::light_engine::sky_light_engine::{
    generate_height_map, generate_skylight_map, mark_edge_outdated, recheck_gaps, relight_block,
};
use crate::light_engine::{Direction, LightChunkAccess, LightEngine, TickContext};
use crate::light_type::LightType;
use crate::persistence;

/// Lighting state of one world: the light overlay of every known chunk and the engine updating it.
pub struct LightWorld {
    id: String,
    has_sky: bool,
    config: LightingConfig,
    chunks: LightChunks,
    engine: LightEngine,
}

impl LightWorld {
    /// Creates an empty lighting world.
    #[must_use]
    pub fn new(id: impl Into<String>, has_sky: bool, config: LightingConfig) -> Self {
        Self {
            id: id.into(),
            has_sky,
            config,
            chunks: LightChunks::default(),
            engine: LightEngine::new(),
        }
    }

    /// Name the host gave this world.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the world has a sky light field.
    #[must_use]
    pub fn has_sky(&self) -> bool {
        self.has_sky
    }

    /// The tunables the world was created with.
    #[must_use]
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// The light overlay of a chunk, loaded or not.
    #[must_use]
    pub fn chunk(&self, pos: ChunkPos) -> Option<&LightChunk> {
        self.chunks.get(&pos)
    }

    /// Number of chunks with a light overlay.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the engine has queued work of any light type.
    #[must_use]
    pub fn has_pending_updates(&self) -> bool {
        self.engine.has_work()
    }

    fn split<'a, G: VoxelGrid + ?Sized>(&'a mut self, grid: &'a G) -> (&'a mut LightEngine, LightChunkAccess<'a, G>) {
        (
            &mut self.engine,
            LightChunkAccess::new(grid, &mut self.chunks, self.has_sky),
        )
    }

    // ---------------------------------------------------------------------
    // Lifecycle hooks
    // ---------------------------------------------------------------------

    /// Creates the light overlay of a freshly generated chunk.
    ///
    /// Computes its height-map and, in worlds with a sky, the straight down sky fill.
    pub fn on_chunk_init<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) {
        if self.chunks.insert(pos, LightChunk::new(pos)).is_some() {
            log::warn!("Chunk {pos} of light world {} was initialised twice", self.id);
        }
        let (_, mut access) = self.split(grid);
        if access.has_sky {
            generate_skylight_map(&mut access, pos);
        } else {
            generate_height_map(&mut access, pos);
        }
    }

    /// Restores the overlay of a chunk read from disk instead of generating it.
    ///
    /// A height-map that could not be restored is regenerated from the blocks.
    pub fn on_chunk_read<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos, nbt: &NbtCompound) {
        let restored = persistence::read_chunk(pos, nbt, self.has_sky);
        self.chunks.insert(pos, restored.chunk);
        if !restored.height_map_restored {
            let (_, mut access) = self.split(grid);
            generate_height_map(&mut access, pos);
        }
    }

    /// Marks a chunk loaded, runs the work queued for it and replays the checks deferred at its edges.
    ///
    /// With a sky, the columns on both sides of every edge shared with a loaded
    /// neighbour are reconciled too.
    pub fn on_chunk_load<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) {
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            log::warn!("Tried to load chunk {pos} without light data");
            return;
        };
        chunk.loaded = true;
        let tasks = chunk.take_init_tasks();
        log::debug!("Loading chunk {pos} with {} queued light tasks", tasks.len());

        for task in tasks {
            self.run_task(grid, pos, task);
        }
        let (engine, mut access) = self.split(grid);
        schedule_relight_checks_for_chunk_boundaries(engine, &mut access, pos);
        if !access.has_sky {
            return;
        }

        let mut rechecked = vec![pos];
        for direction in Direction::HORIZONTAL {
            let neighbor = pos.offset(direction.x_offset(), direction.z_offset());
            if !access.is_loaded(neighbor) {
                continue;
            }
            mark_edge_outdated(&mut access, pos, direction);
            mark_edge_outdated(&mut access, neighbor, direction.opposite());
            rechecked.push(neighbor);
        }
        for chunk_pos in rechecked {
            recheck_gaps(engine, &mut access, chunk_pos);
        }
    }

    /// Settles pending light, then removes the chunk and returns its serialised light.
    pub fn on_chunk_unload<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) -> Option<NbtCompound> {
        if !self.chunks.contains_key(&pos) {
            return None;
        }
        self.process_light_updates(grid);
        let chunk = self.chunks.remove(&pos)?;
        Some(persistence::write_chunk(&chunk, grid, self.has_sky))
    }

    /// Creates the light arrays of a band the host just created.
    ///
    /// Sky light starts at 15 above the column heights. Existing arrays are kept.
    pub fn on_sub_chunk_init(&mut self, pos: ChunkPos, band: i32) {
        let Ok(band) = usize::try_from(band) else {
            return;
        };
        if band >= SUB_CHUNK_COUNT {
            return;
        }
        if let Some(chunk) = self.chunks.get_mut(&pos) {
            chunk.ensure_section(band, self.has_sky);
        }
    }

    /// Reacts to the block at `pos` changing its opacity or emission.
    ///
    /// Keeps the column height up to date and schedules both light types at
    /// `pos`. For a chunk still loading the work is queued instead.
    pub fn on_block_change<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: BlockPos) {
        if !(0..=MAX_Y).contains(&pos.y()) {
            return;
        }
        let chunk_pos = pos.chunk_pos();
        let (x, z) = (pos.local_x(), pos.local_z());
        let Some(chunk) = self.chunks.get(&chunk_pos) else {
            return;
        };
        let height = chunk.height_map.get(x, z);
        let relight = if grid.block_opacity(pos) > 0 {
            (pos.y() >= height - 1).then_some(pos.y() + 1)
        } else {
            (pos.y() == height - 1).then_some(pos.y())
        };

        if let Some(y) = relight {
            self.add_init_task(grid, chunk_pos, ChunkTask::RelightBlock { x, y, z });
        }
        for light_type in LightType::ALL {
            self.add_init_task(grid, chunk_pos, ChunkTask::ScheduleUpdate { light_type, pos });
        }
    }

    /// Runs a slice of the chunk's background relight checks.
    ///
    /// Returns the number of columns visited.
    pub fn on_random_tick<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos, context: TickContext) -> u32 {
        if !self.config.random_light_updates {
            return 0;
        }
        let budget = self.config.random_update_budget(context);
        let (engine, mut access) = self.split(grid);
        enqueue_random_relight_checks(engine, &mut access, pos, budget)
    }

    /// Starts the chunk's background relight checks over.
    pub fn reset_random_updates<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) {
        let (_, mut access) = self.split(grid);
        reset_queued_random_updates(&mut access, pos);
    }

    // ---------------------------------------------------------------------
    // Lighting state
    // ---------------------------------------------------------------------

    /// Schedules a light update at `pos`.
    pub fn schedule_update(&mut self, light_type: LightType, pos: BlockPos) {
        self.engine.schedule_update(light_type, pos);
    }

    /// Drains all pending light work.
    pub fn process_light_updates<G: VoxelGrid + ?Sized>(&mut self, grid: &G) {
        let (engine, mut access) = self.split(grid);
        engine.process_updates_for_all_types(&mut access);
    }

    /// Runs `task` now if the chunk is loaded, or queues it for the chunk's load otherwise.
    pub fn add_init_task<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos, task: ChunkTask) {
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            log::warn!("Dropping light task {task:?} for unknown chunk {pos}");
            return;
        };
        if chunk.loaded {
            self.run_task(grid, pos, task);
        } else {
            chunk.push_init_task(task);
        }
    }

    fn run_task<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos, task: ChunkTask) {
        match task {
            ChunkTask::ScheduleUpdate { light_type, pos } => self.engine.schedule_update(light_type, pos),
            ChunkTask::RelightBlock { x, y, z } => {
                let (engine, mut access) = self.split(grid);
                relight_block(engine, &mut access, pos, x, y, z);
            }
            ChunkTask::InitLighting => {
                self.init_chunk_lighting(grid, pos);
            }
        }
    }

    /// Computes the initial light of a chunk once its surroundings exist.
    ///
    /// Every chunk within 16 blocks of the chunk has to exist. Every emitting
    /// voxel is scheduled for block light and, with a sky, every column is
    /// reconciled with its neighbours. Returns whether the pass ran.
    pub fn init_chunk_lighting<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) -> bool {
        let _span = tracing::debug_span!("init_chunk_lighting", %pos).entered();

        let base_x = pos.min_block_x();
        let base_z = pos.min_block_z();
        if !self.chunks.contains_key(&pos)
            || !grid.do_chunks_exist_in_range(
                BlockPos::new(base_x - 16, 0, base_z - 16),
                BlockPos::new(base_x + 31, MAX_Y, base_z + 31),
            )
        {
            return false;
        }

        let (engine, mut access) = self.split(grid);
        for band in (0..SUB_CHUNK_COUNT as i32).filter(|band| access.sub_chunk_exists(pos, *band)) {
            for y in band * 16..band * 16 + 16 {
                for z in base_z..base_z + 16 {
                    for x in base_x..base_x + 16 {
                        let voxel = BlockPos::new(x, y, z);
                        if grid.block_emission(voxel) > 0 {
                            engine.schedule_update(LightType::Block, voxel);
                        }
                    }
                }
            }
        }

        if access.has_sky {
            if let Some(chunk) = access.chunks.get_mut(&pos) {
                chunk.height_map.mark_all_outdated();
            }
            recheck_gaps(engine, &mut access, pos);
        }

        if let Some(chunk) = access.chunks.get_mut(&pos) {
            chunk.lighting_initialized = true;
            chunk.dirty = true;
        }
        log::debug!("Initialised lighting of chunk {pos}");
        true
    }

    /// Reconciles the outdated columns of a chunk with their neighbours.
    ///
    /// Columns stay outdated until every chunk within 16 blocks exists.
    pub fn recheck_gaps<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) {
        if !self.has_sky {
            return;
        }
        let (engine, mut access) = self.split(grid);
        recheck_gaps(engine, &mut access, pos);
    }

    /// Whether the chunk and its eight neighbours all have their initial light.
    ///
    /// Runs the initial pass of the chunk itself first if it has not run yet.
    pub fn is_chunk_fully_lit<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) -> bool {
        let Some(chunk) = self.chunks.get(&pos) else {
            return false;
        };
        if !chunk.lighting_initialized {
            self.init_chunk_lighting(grid, pos);
        }

        (-1..=1)
            .flat_map(|dz| (-1..=1).map(move |dx| (dx, dz)))
            .filter(|offset| *offset != (0, 0))
            .all(|(dx, dz)| {
                let neighbor = pos.offset(dx, dz);
                grid.chunk_exists(neighbor)
                    && self
                        .chunks
                        .get(&neighbor)
                        .is_some_and(|chunk| chunk.lighting_initialized)
            })
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Light at `pos`, after settling the pending work of that type when the config asks for it.
    pub fn light<G: VoxelGrid + ?Sized>(&mut self, grid: &G, light_type: LightType, pos: BlockPos) -> u8 {
        if self.config.drain_before_read {
            let (engine, mut access) = self.split(grid);
            engine.process_updates(&mut access, light_type);
        }
        self.light_uncached(grid, light_type, pos)
    }

    /// Light stored at `pos` right now, pending work ignored.
    ///
    /// Unloaded chunks and positions outside the world read the default.
    #[must_use]
    pub fn light_uncached<G: VoxelGrid + ?Sized>(&self, grid: &G, light_type: LightType, pos: BlockPos) -> u8 {
        let default = if light_type == LightType::Sky && self.has_sky { 15 } else { 0 };
        if !(0..=MAX_Y).contains(&pos.y()) || !grid.chunk_exists(pos.chunk_pos()) {
            return default;
        }
        self.chunks.get(&pos.chunk_pos()).map_or(default, |chunk| {
            chunk.light(light_type, pos.local_x(), pos.y(), pos.local_z(), self.has_sky)
        })
    }

    /// The brighter of the block and sky light at `pos`.
    pub fn light_value_max<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: BlockPos) -> u8 {
        let block = self.light(grid, LightType::Block, pos);
        let sky = self.light(grid, LightType::Sky, pos);
        block.max(sky)
    }

    /// The brighter of the block's own emission and the block light at `pos`.
    pub fn brightness_and_block_light_max<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: BlockPos) -> u8 {
        let emission = grid.block_emission(pos).min(15);
        emission.max(self.light(grid, LightType::Block, pos))
    }

    /// [`Self::brightness_and_block_light_max`] for block light, the plain sky light otherwise.
    pub fn brightness_and_light_value_max<G: VoxelGrid + ?Sized>(
        &mut self,
        grid: &G,
        light_type: LightType,
        pos: BlockPos,
    ) -> u8 {
        match light_type {
            LightType::Block => self.brightness_and_block_light_max(grid, pos),
            LightType::Sky => self.light(grid, LightType::Sky, pos),
        }
    }

    /// Whether `pos` sees the open sky. Chunks without light data see it everywhere.
    #[must_use]
    pub fn can_see_sky(&self, pos: BlockPos) -> bool {
        self.chunks.get(&pos.chunk_pos()).is_none_or(|chunk| {
            chunk
                .height_map
                .can_see_sky(pos.local_x(), pos.y(), pos.local_z())
        })
    }

    /// Lowest Y of world column `x`, `z` that sees the sky, if its chunk is known.
    #[must_use]
    pub fn sky_light_height(&self, x: i32, z: i32) -> Option<i32> {
        self.chunks
            .get(&ChunkPos::from_block(x, z))
            .map(|chunk| chunk.height_map.get((x & 15) as usize, (z & 15) as usize))
    }

    // ---------------------------------------------------------------------
    // Replication
    // ---------------------------------------------------------------------

    /// Settles pending light and packs the bands of a chunk that changed since the last packet.
    ///
    /// Returns `None` for unknown chunks and when nothing changed.
    pub fn light_update_packet<G: VoxelGrid + ?Sized>(&mut self, grid: &G, pos: ChunkPos) -> Option<CLightUpdate> {
        self.process_light_updates(grid);
        let has_sky = self.has_sky;
        let chunk = self.chunks.get_mut(&pos)?;
        let light_data = chunk.extract_changed_light_data(has_sky);
        let unchanged = light_data.sky_y_mask.count_ones() == 0
            && light_data.block_y_mask.count_ones() == 0
            && light_data.empty_sky_y_mask.count_ones() == 0
            && light_data.empty_block_y_mask.count_ones() == 0;
        if unchanged {
            return None;
        }
        Some(CLightUpdate { pos, light_data })
    }

    /// Packs every band of a chunk with light arrays, for observers that see it for the first time.
    #[must_use]
    pub fn full_light_update_packet(&self, pos: ChunkPos) -> Option<CLightUpdate> {
        self.chunks.get(&pos).map(|chunk| CLightUpdate {
            pos,
            light_data: chunk.extract_full_light_data(self.has_sky),
        })
    }

    /// Writes received light arrays into the overlay of an observed chunk.
    pub fn apply_light_update(&mut self, packet: &CLightUpdate) -> Result<(), LightDataError> {
        let chunk = self
            .chunks
            .get_mut(&packet.pos)
            .ok_or(LightDataError::UnknownChunk(packet.pos))?;
        chunk.apply_light_data(&packet.light_data, self.has_sky)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumen_protocol::packets::LightUpdatePacketData;

    use super::*;
    use crate::grid::MemoryGrid;

    /// A flat world: one stone layer at y 0 in every chunk of the square.
    fn flat_world(radius: i32) -> MemoryGrid {
        let mut grid = MemoryGrid::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                let pos = ChunkPos::new(x, z);
                grid.insert_chunk(pos);
                grid.fill(
                    BlockPos::new(pos.min_block_x(), 0, pos.min_block_z()),
                    BlockPos::new(pos.min_block_x() + 15, 0, pos.min_block_z() + 15),
                    15,
                    0,
                );
            }
        }
        grid
    }

    fn load_all(world: &mut LightWorld, grid: &MemoryGrid, radius: i32) {
        for x in -radius..=radius {
            for z in -radius..=radius {
                world.on_chunk_init(grid, ChunkPos::new(x, z));
            }
        }
        for x in -radius..=radius {
            for z in -radius..=radius {
                world.on_chunk_load(grid, ChunkPos::new(x, z));
            }
        }
    }

    #[test]
    fn test_torch_lights_its_surroundings() {
        let mut grid = flat_world(1);
        let mut world = LightWorld::new("overworld", true, LightingConfig::default());
        load_all(&mut world, &grid, 1);

        let torch = BlockPos::new(8, 1, 8);
        grid.set_block(torch, 0, 14);
        world.on_block_change(&grid, torch);

        assert_eq!(world.light(&grid, LightType::Block, torch), 14);
        assert_eq!(world.light(&grid, LightType::Block, BlockPos::new(11, 1, 8)), 11);
        // the falloff crosses into the neighbouring chunk
        assert_eq!(world.light(&grid, LightType::Block, BlockPos::new(-2, 1, 8)), 4);
        assert_eq!(world.brightness_and_block_light_max(&grid, torch), 14);
        assert_eq!(world.light_value_max(&grid, torch), 15);
        assert_eq!(
            world.brightness_and_light_value_max(&grid, LightType::Block, BlockPos::new(11, 1, 8)),
            11
        );
        assert_eq!(world.brightness_and_light_value_max(&grid, LightType::Sky, torch), 15);
    }

    #[test]
    fn test_opaque_block_raises_column_height() {
        let mut grid = flat_world(1);
        let mut world = LightWorld::new("overworld", true, LightingConfig::default());
        load_all(&mut world, &grid, 1);
        assert_eq!(world.sky_light_height(4, 4), Some(1));

        let roof = BlockPos::new(4, 40, 4);
        grid.set_block(roof, 15, 0);
        world.on_block_change(&grid, roof);
        assert_eq!(world.sky_light_height(4, 4), Some(41));
        assert!(!world.can_see_sky(BlockPos::new(4, 39, 4)));

        grid.set_block(roof, 0, 0);
        world.on_block_change(&grid, roof);
        assert_eq!(world.sky_light_height(4, 4), Some(1));
    }

    #[test]
    fn test_tasks_wait_for_load() {
        let grid = flat_world(0);
        let pos = ChunkPos::new(0, 0);
        let mut world = LightWorld::new("overworld", false, LightingConfig::default());
        world.on_chunk_init(&grid, pos);

        world.add_init_task(&grid, pos, ChunkTask::InitLighting);
        assert_eq!(world.chunk(pos).unwrap().init_task_count(), 1);

        world.on_chunk_load(&grid, pos);
        assert_eq!(world.chunk(pos).unwrap().init_task_count(), 0);
        // the chunk's surroundings do not exist, so the pass could not run yet
        assert!(!world.chunk(pos).unwrap().lighting_initialized);
    }

    #[test]
    fn test_fully_lit_needs_every_neighbor() {
        let grid = flat_world(2);
        let mut world = LightWorld::new("overworld", true, LightingConfig::default());
        load_all(&mut world, &grid, 2);

        assert!(!world.is_chunk_fully_lit(&grid, ChunkPos::new(0, 0)));
        for x in -1..=1 {
            for z in -1..=1 {
                assert!(world.init_chunk_lighting(&grid, ChunkPos::new(x, z)));
            }
        }
        assert!(world.is_chunk_fully_lit(&grid, ChunkPos::new(0, 0)));
        // the outer ring lacks the chunks two away from it
        assert!(!world.init_chunk_lighting(&grid, ChunkPos::new(2, 2)));
    }

    #[test]
    fn test_unload_round_trips_through_nbt() {
        let mut grid = flat_world(1);
        let mut world = LightWorld::new("overworld", true, LightingConfig::default());
        load_all(&mut world, &grid, 1);
        let torch = BlockPos::new(3, 5, 3);
        grid.set_block(torch, 0, 10);
        world.on_block_change(&grid, torch);

        let pos = ChunkPos::new(0, 0);
        let nbt = world.on_chunk_unload(&grid, pos).unwrap();
        assert!(world.chunk(pos).is_none());
        assert!(world.on_chunk_unload(&grid, pos).is_none());

        world.on_chunk_read(&grid, pos, &nbt);
        world.on_chunk_load(&grid, pos);
        assert_eq!(world.light_uncached(&grid, LightType::Block, torch), 10);
        assert_eq!(world.sky_light_height(3, 3), Some(1));
    }

    #[test]
    fn test_changed_light_packet_applies_on_observer() {
        let mut grid = flat_world(1);
        let mut server = LightWorld::new("overworld", true, LightingConfig::default());
        let mut observer = LightWorld::new("overworld", true, LightingConfig::default());
        load_all(&mut server, &grid, 1);
        load_all(&mut observer, &grid, 1);
        let pos = ChunkPos::new(0, 0);
        // the initial fill is replicated in full
        let full = server.full_light_update_packet(pos).unwrap();
        observer.apply_light_update(&full).unwrap();
        server.light_update_packet(&grid, pos);

        let lamp = BlockPos::new(7, 20, 7);
        grid.set_block(lamp, 0, 15);
        server.on_block_change(&grid, lamp);
        let packet = server.light_update_packet(&grid, pos).unwrap();
        assert!(packet.light_data.block_y_mask.get(1));
        assert!(server.light_update_packet(&grid, pos).is_none());

        observer.apply_light_update(&packet).unwrap();
        assert_eq!(observer.light_uncached(&grid, LightType::Block, lamp), 15);
        assert_eq!(observer.light_uncached(&grid, LightType::Block, BlockPos::new(7, 22, 7)), 13);
    }

    #[test]
    fn test_light_update_for_unknown_chunk_is_rejected() {
        let mut world = LightWorld::new("nether", false, LightingConfig::default());
        let packet = CLightUpdate {
            pos: ChunkPos::new(5, 5),
            light_data: LightUpdatePacketData::default(),
        };
        assert_eq!(
            world.apply_light_update(&packet).unwrap_err(),
            LightDataError::UnknownChunk(ChunkPos::new(5, 5))
        );
    }

    #[test]
    fn test_random_ticks_respect_config() {
        let grid = flat_world(0);
        let pos = ChunkPos::new(0, 0);
        let config = LightingConfig {
            random_light_updates: false,
            ..LightingConfig::default()
        };
        let mut world = LightWorld::new("overworld", true, config);
        world.on_chunk_init(&grid, pos);
        world.on_chunk_load(&grid, pos);
        assert_eq!(world.on_random_tick(&grid, pos, TickContext::Server), 0);

        let mut world = LightWorld::new("overworld", true, LightingConfig::default());
        world.on_chunk_init(&grid, pos);
        world.on_chunk_load(&grid, pos);
        assert_eq!(world.on_random_tick(&grid, pos, TickContext::ClientActive), 256);
        world.reset_random_updates(&grid, pos);
        assert_eq!(world.chunk(pos).unwrap().queued_random_updates, 0);
    }
}
