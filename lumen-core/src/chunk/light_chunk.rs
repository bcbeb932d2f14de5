//! Light overlay of one chunk column.

use lumen_utils::{BlockPos, ChunkPos};
use rustc_hash::FxHashMap;

use crate::chunk::boundary_flags::NeighborLightChecks;
use crate::chunk::height_map::SkyLightHeightMap;
use crate::chunk::sub_chunk::SubChunkLight;
use crate::light_type::LightType;

/// Number of 16 block tall bands in a chunk.
pub const SUB_CHUNK_COUNT: usize = 16;

/// Highest valid Y coordinate.
pub const MAX_Y: i32 = (SUB_CHUNK_COUNT as i32) * 16 - 1;

/// Columns a chunk walks through with random relight checks.
pub const MAX_QUEUED_RANDOM_UPDATES: u32 = 16 * 16 * 16;

/// The light overlay of every chunk a lighting world knows about.
pub type LightChunks = FxHashMap<ChunkPos, LightChunk>;

/// Work requested for a chunk before it finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkTask {
    /// Schedule a light update at a world position.
    ScheduleUpdate {
        /// Field to update.
        light_type: LightType,
        /// World position.
        pos: BlockPos,
    },
    /// Re-evaluate the height of a column from a local position.
    RelightBlock {
        /// Local X (0-15).
        x: usize,
        /// World Y.
        y: i32,
        /// Local Z (0-15).
        z: usize,
    },
    /// Run the initial lighting pass of the chunk.
    InitLighting,
}

/// Light data and lighting bookkeeping of one chunk column.
#[derive(Debug, Clone)]
pub struct LightChunk {
    /// Position of the column.
    pub pos: ChunkPos,
    sections: [Option<Box<SubChunkLight>>; SUB_CHUNK_COUNT],
    /// Sky light heights, outdated columns and the chunk minimum.
    pub height_map: SkyLightHeightMap,
    /// Deferred checks along the chunk edges.
    pub light_checks: NeighborLightChecks,
    /// Whether the initial lighting pass has run.
    pub lighting_initialized: bool,
    /// Progress of random relight checks, `0..=MAX_QUEUED_RANDOM_UPDATES`.
    pub queued_random_updates: u32,
    /// Whether the chunk has finished loading.
    pub loaded: bool,
    /// Whether something worth saving changed.
    pub dirty: bool,
    changed_sections: [u16; 2],
    init_tasks: Vec<ChunkTask>,
}

impl LightChunk {
    /// Creates an empty overlay: no sub-chunks, every column sees the sky.
    #[must_use]
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            sections: Default::default(),
            height_map: SkyLightHeightMap::new(),
            light_checks: NeighborLightChecks::new(),
            lighting_initialized: false,
            queued_random_updates: 0,
            loaded: false,
            dirty: false,
            changed_sections: [0; 2],
            init_tasks: Vec::new(),
        }
    }

    /// The sub-chunk for `band`, if it has light arrays.
    #[must_use]
    #[inline]
    pub fn section(&self, band: usize) -> Option<&SubChunkLight> {
        self.sections.get(band)?.as_deref()
    }

    /// Mutable access to an existing sub-chunk.
    #[must_use]
    pub fn section_mut(&mut self, band: usize) -> Option<&mut SubChunkLight> {
        self.sections.get_mut(band)?.as_deref_mut()
    }

    /// Returns the sub-chunk for `band`, creating it with height-map seeded sky light.
    pub fn ensure_section(&mut self, band: usize, has_sky: bool) -> &mut SubChunkLight {
        let heights = &self.height_map;
        self.sections[band]
            .get_or_insert_with(|| Box::new(SubChunkLight::new(band as i32 * 16, has_sky, heights)))
    }

    /// Replaces the sub-chunk of `band`.
    pub fn put_section(&mut self, band: usize, section: SubChunkLight) {
        self.sections[band] = Some(Box::new(section));
    }

    /// Bands that currently have light arrays.
    pub fn sections(&self) -> impl Iterator<Item = (usize, &SubChunkLight)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(band, section)| section.as_deref().map(|section| (band, section)))
    }

    /// Light at local `x`, `z` and world `y`.
    ///
    /// A band without arrays reads as 15 sky light where the column sees the
    /// sky and 0 otherwise; block light reads 0.
    #[must_use]
    #[inline]
    pub fn light(&self, light_type: LightType, x: usize, y: i32, z: usize, has_sky: bool) -> u8 {
        debug_assert!((0..=MAX_Y).contains(&y), "Y {y} outside the chunk");
        if light_type == LightType::Sky && !has_sky {
            return 0;
        }
        match self.section((y >> 4) as usize) {
            Some(section) => section.get(light_type, x, (y & 15) as usize, z),
            None if light_type == LightType::Sky && self.height_map.can_see_sky(x, y, z) => 15,
            None => 0,
        }
    }

    /// Writes light at local `x`, `z` and world `y`, creating the band's arrays if needed.
    pub fn set_light(
        &mut self,
        light_type: LightType,
        x: usize,
        y: i32,
        z: usize,
        value: u8,
        has_sky: bool,
    ) {
        debug_assert!((0..=MAX_Y).contains(&y), "Y {y} outside the chunk");
        debug_assert!(value <= 15, "Light level must be 0-15");
        if light_type == LightType::Sky && !has_sky {
            return;
        }
        let band = (y >> 4) as usize;
        if self
            .ensure_section(band, has_sky)
            .set(light_type, x, (y & 15) as usize, z, value.min(15))
        {
            self.changed_sections[light_type.index()] |= 1 << band;
            self.dirty = true;
        }
    }

    /// Bands of `light_type` written since the last [`Self::take_changed_sections`].
    #[must_use]
    pub fn changed_sections(&self, light_type: LightType) -> u16 {
        self.changed_sections[light_type.index()]
    }

    /// Returns and clears the changed band masks, block light first.
    pub fn take_changed_sections(&mut self) -> [u16; 2] {
        std::mem::take(&mut self.changed_sections)
    }

    /// Queues a task for the next load.
    pub fn push_init_task(&mut self, task: ChunkTask) {
        self.init_tasks.push(task);
    }

    /// Removes the queued tasks, oldest first.
    pub fn take_init_tasks(&mut self) -> Vec<ChunkTask> {
        std::mem::take(&mut self.init_tasks)
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn init_task_count(&self) -> usize {
        self.init_tasks.len()
    }
}
