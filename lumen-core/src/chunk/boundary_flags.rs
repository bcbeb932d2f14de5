//! Deferred relight checks along the four chunk edges.
//!
//! A chunk keeps 32 masks. Each mask has one bit per sub-chunk band and stands
//! for one combination of light type, horizontal direction, half of the edge
//! and whether the check was requested by this chunk (`Out`) or handed over by
//! the neighbour (`In`). The index of a combination is
//!
//! ```text
//! light_type * 16 + direction * 4 + half * 2 + facing
//! ```
//!
//! with `Block = 0, Sky = 1`, `North = 0, South = 1, West = 2, East = 3`,
//! `Negative = 0, Positive = 1` and `In = 0, Out = 1`. Every combination maps
//! to a distinct index in `0..32`.

use crate::light_engine::Direction;
use crate::light_type::LightType;

/// Number of masks per chunk.
pub const FLAG_COUNT: usize = 32;

/// Which side of the boundary requested the check.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryFacing {
    /// Handed over by the neighbour, to be run in this chunk.
    In = 0,
    /// Requested by this chunk, waiting for the neighbour to load.
    Out = 1,
}

/// Half of a chunk edge, split at local coordinate 8.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisHalf {
    /// Coordinates 0-7 along the edge.
    Negative = 0,
    /// Coordinates 8-15 along the edge.
    Positive = 1,
}

impl AxisHalf {
    /// Both halves, negative first.
    pub const ALL: [AxisHalf; 2] = [AxisHalf::Negative, AxisHalf::Positive];

    /// The half of the edge facing `direction` that contains the local column `x`, `z`.
    #[must_use]
    pub fn of_column(direction: Direction, x: usize, z: usize) -> Self {
        let along = match direction {
            Direction::East | Direction::West => z,
            _ => x,
        };
        if along < 8 {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// The half matching the sign of a horizontal direction (south and east are positive).
    #[must_use]
    pub fn of_direction(direction: Direction) -> Self {
        match direction {
            Direction::South | Direction::East => Self::Positive,
            _ => Self::Negative,
        }
    }

    /// `-1` or `1`.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Positive => 1,
        }
    }
}

/// Maps a combination to its mask index.
///
/// # Panics
/// Debug builds assert that `direction` is horizontal.
#[must_use]
pub fn flag_index(
    light_type: LightType,
    direction: Direction,
    half: AxisHalf,
    facing: BoundaryFacing,
) -> usize {
    debug_assert!(direction.is_horizontal(), "{direction:?} has no chunk boundary");
    let direction_bits = (direction as usize).saturating_sub(2) & 3;
    light_type.index() * 16 + direction_bits * 4 + half as usize * 2 + facing as usize
}

/// The 32 deferred check masks of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborLightChecks([u16; FLAG_COUNT]);

impl NeighborLightChecks {
    /// Creates an empty set of masks.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; FLAG_COUNT])
    }

    /// Rebuilds masks from persisted values.
    #[must_use]
    pub const fn from_array(flags: [u16; FLAG_COUNT]) -> Self {
        Self(flags)
    }

    /// The mask at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> u16 {
        self.0[index]
    }

    /// Adds the bands in `mask` to the mask at `index`.
    #[inline]
    pub fn set_bits(&mut self, index: usize, mask: u16) {
        self.0[index] |= mask;
    }

    /// Clears the mask at `index`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.0[index] = 0;
    }

    /// Whether no check is pending at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|flag| *flag == 0)
    }

    /// Masks in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[u16; FLAG_COUNT] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn test_index_is_bijective() {
        let mut seen = FxHashSet::default();
        for light_type in LightType::ALL {
            for direction in Direction::HORIZONTAL {
                for half in AxisHalf::ALL {
                    for facing in [BoundaryFacing::In, BoundaryFacing::Out] {
                        let index = flag_index(light_type, direction, half, facing);
                        assert!(index < FLAG_COUNT);
                        assert!(seen.insert(index), "duplicate index {index}");
                    }
                }
            }
        }
        assert_eq!(seen.len(), FLAG_COUNT);
    }

    #[test]
    fn test_documented_layout() {
        assert_eq!(
            flag_index(LightType::Block, Direction::North, AxisHalf::Negative, BoundaryFacing::In),
            0
        );
        assert_eq!(
            flag_index(LightType::Sky, Direction::East, AxisHalf::Positive, BoundaryFacing::Out),
            31
        );
        assert_eq!(
            flag_index(LightType::Sky, Direction::West, AxisHalf::Negative, BoundaryFacing::Out),
            16 + 8 + 1
        );
    }

    #[test]
    fn test_half_of_column() {
        assert_eq!(AxisHalf::of_column(Direction::North, 7, 0), AxisHalf::Negative);
        assert_eq!(AxisHalf::of_column(Direction::North, 8, 0), AxisHalf::Positive);
        assert_eq!(AxisHalf::of_column(Direction::East, 15, 3), AxisHalf::Negative);
        assert_eq!(AxisHalf::of_column(Direction::West, 0, 12), AxisHalf::Positive);
    }

    #[test]
    fn test_masks_accumulate_until_cleared() {
        let mut checks = NeighborLightChecks::new();
        checks.set_bits(5, 0b0001);
        checks.set_bits(5, 0b1000);
        assert_eq!(checks.get(5), 0b1001);
        assert!(!checks.is_empty());
        checks.clear(5);
        assert!(checks.is_empty());
    }
}
