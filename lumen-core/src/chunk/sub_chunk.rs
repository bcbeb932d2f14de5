//! Light arrays of one 16x16x16 band of a chunk.

use std::cell::Cell;

use crate::chunk::height_map::SkyLightHeightMap;
use crate::chunk::light_storage::LightStorage;
use crate::light_type::LightType;

/// Block and sky light of a sub-chunk.
///
/// The sky array only exists in worlds with a sky. Whether every value equals
/// its default is cached and recomputed after the next write.
#[derive(Debug, Clone)]
pub struct SubChunkLight {
    block_light: LightStorage,
    sky_light: Option<LightStorage>,
    default_light: Cell<Option<bool>>,
}

impl SubChunkLight {
    /// Creates dark block light and, in has-sky worlds, sky light seeded from `heights`.
    ///
    /// Every voxel at or above its column height starts at 15.
    #[must_use]
    pub fn new(base_y: i32, has_sky: bool, heights: &SkyLightHeightMap) -> Self {
        let mut section = Self {
            block_light: LightStorage::new_empty(),
            sky_light: has_sky.then(LightStorage::new_empty),
            default_light: Cell::new(None),
        };
        if has_sky {
            section.init_sky_light(base_y, heights);
        }
        section
    }

    /// Creates a sub-chunk from already decoded arrays.
    #[must_use]
    pub fn from_storage(block_light: LightStorage, sky_light: Option<LightStorage>) -> Self {
        Self {
            block_light,
            sky_light,
            default_light: Cell::new(None),
        }
    }

    /// Refills sky light from the height-map: 15 at or above the column height, 0 below.
    pub fn init_sky_light(&mut self, base_y: i32, heights: &SkyLightHeightMap) {
        let Some(sky_light) = self.sky_light.as_mut() else {
            return;
        };

        if (0..16).all(|x| (0..16).all(|z| heights.get(x, z) <= base_y)) {
            sky_light.fill(15);
        } else {
            sky_light.fill(0);
            for z in 0..16 {
                for x in 0..16 {
                    let first_lit = (heights.get(x, z) - base_y).clamp(0, 16) as usize;
                    for y in first_lit..16 {
                        sky_light.set(x, y, z, 15);
                    }
                }
            }
        }
        self.default_light.set(None);
    }

    /// Light at local coordinates. Sky light reads 0 when the world has no sky.
    #[must_use]
    #[inline]
    pub fn get(&self, light_type: LightType, x: usize, y: usize, z: usize) -> u8 {
        match light_type {
            LightType::Block => self.block_light.get(x, y, z),
            LightType::Sky => self.sky_light.as_ref().map_or(0, |sky| sky.get(x, y, z)),
        }
    }

    /// Writes light at local coordinates. Sky writes are dropped when the world has no sky.
    ///
    /// Returns whether the stored value changed.
    #[inline]
    pub fn set(&mut self, light_type: LightType, x: usize, y: usize, z: usize, value: u8) -> bool {
        let storage = match light_type {
            LightType::Block => &mut self.block_light,
            LightType::Sky => match self.sky_light.as_mut() {
                Some(sky) => sky,
                None => return false,
            },
        };
        let changed = storage.set(x, y, z, value);
        if changed {
            self.default_light.set(None);
        }
        changed
    }

    /// The array backing `light_type`, if the world has one.
    #[must_use]
    pub fn storage(&self, light_type: LightType) -> Option<&LightStorage> {
        match light_type {
            LightType::Block => Some(&self.block_light),
            LightType::Sky => self.sky_light.as_ref(),
        }
    }

    /// Replaces a whole array. Sky arrays are dropped when the world has no sky.
    pub fn replace_storage(&mut self, light_type: LightType, storage: LightStorage) {
        match light_type {
            LightType::Block => self.block_light = storage,
            LightType::Sky => {
                if let Some(sky) = self.sky_light.as_mut() {
                    *sky = storage;
                }
            }
        }
        self.default_light.set(None);
    }

    /// Whether every voxel of both arrays holds its default value.
    #[must_use]
    pub fn has_default_light(&self) -> bool {
        if let Some(cached) = self.default_light.get() {
            return cached;
        }
        let is_default = self.block_light.is_uniform(LightType::Block.default_value())
            && self
                .sky_light
                .as_ref()
                .is_none_or(|sky| sky.is_uniform(LightType::Sky.default_value()));
        self.default_light.set(Some(is_default));
        is_default
    }

    /// Whether this sub-chunk can be left out of persisted and sent data.
    #[must_use]
    pub fn is_trivial(&self, has_blocks: bool) -> bool {
        !has_blocks && self.has_default_light()
    }
}
