//! Per-column sky light heights of a chunk.

/// Number of columns in a chunk.
pub const COLUMN_COUNT: usize = 16 * 16;

/// Tracks, per column, the lowest Y that still sees the open sky.
///
/// A voxel at `y` sees the sky when `y >= height(x, z)`. Columns are indexed
/// `x + z * 16`. Next to the heights the map keeps one "outdated" bit per
/// column, set when the column has to be reconciled with its neighbours, and
/// the chunk wide minimum height used to prune that reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyLightHeightMap {
    heights: Box<[i32; COLUMN_COUNT]>,
    outdated: [u64; COLUMN_COUNT / 64],
    min_height: i32,
}

#[inline]
const fn column_index(x: usize, z: usize) -> usize {
    x + z * 16
}

impl SkyLightHeightMap {
    /// Creates a map where every column sees the sky from `y = 0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heights: Box::new([0; COLUMN_COUNT]),
            outdated: [0; COLUMN_COUNT / 64],
            min_height: 0,
        }
    }

    /// Rebuilds a map from persisted heights. The minimum is derived from them.
    #[must_use]
    pub fn from_heights(heights: [i32; COLUMN_COUNT]) -> Self {
        let min_height = heights.iter().copied().min().unwrap_or(0);
        Self {
            heights: Box::new(heights),
            outdated: [0; COLUMN_COUNT / 64],
            min_height,
        }
    }

    /// Height of the column at local `x`, `z`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, z: usize) -> i32 {
        debug_assert!(x < 16 && z < 16, "Column coordinates must be 0-15");
        self.heights[column_index(x, z)]
    }

    /// Stores the height of a column. Does not touch the minimum.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, height: i32) {
        debug_assert!(x < 16 && z < 16, "Column coordinates must be 0-15");
        debug_assert!((0..=256).contains(&height), "Height {height} outside 0..=256");
        self.heights[column_index(x, z)] = height.clamp(0, 256);
    }

    /// Whether `y` in column `x`, `z` sees the open sky.
    #[inline]
    #[must_use]
    pub fn can_see_sky(&self, x: usize, y: i32, z: usize) -> bool {
        y >= self.get(x, z)
    }

    /// All heights in column index order.
    #[must_use]
    pub fn heights(&self) -> &[i32; COLUMN_COUNT] {
        &self.heights
    }

    /// Whether the column still has to be reconciled with its neighbours.
    #[inline]
    #[must_use]
    pub fn is_outdated(&self, x: usize, z: usize) -> bool {
        let index = column_index(x, z);
        self.outdated[index / 64] & (1 << (index % 64)) != 0
    }

    /// Sets or clears the outdated bit of a column.
    pub fn set_outdated(&mut self, x: usize, z: usize, outdated: bool) {
        let index = column_index(x, z);
        if outdated {
            self.outdated[index / 64] |= 1 << (index % 64);
        } else {
            self.outdated[index / 64] &= !(1 << (index % 64));
        }
    }

    /// Marks every column outdated.
    pub fn mark_all_outdated(&mut self) {
        self.outdated = [u64::MAX; COLUMN_COUNT / 64];
    }

    /// Whether any column is outdated.
    #[must_use]
    pub fn has_outdated(&self) -> bool {
        self.outdated.iter().any(|word| *word != 0)
    }

    /// Lowest height recorded for the chunk.
    #[inline]
    #[must_use]
    pub fn min_height(&self) -> i32 {
        self.min_height
    }

    /// Replaces the chunk minimum.
    pub fn set_min_height(&mut self, min_height: i32) {
        self.min_height = min_height;
    }

    /// Lowers the chunk minimum to `height` if it is below the current one.
    pub fn lower_min_height(&mut self, height: i32) {
        self.min_height = self.min_height.min(height);
    }

    /// Clears heights, outdated bits and the minimum.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SkyLightHeightMap {
    fn default() -> Self {
        Self::new()
    }
}
