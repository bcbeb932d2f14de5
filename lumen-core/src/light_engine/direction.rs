//! The six face directions of a voxel.

use lumen_utils::BlockPos;

/// Six face directions light travels along.
///
/// The ordinals double as the neighbour slot order during propagation and,
/// minus two, as the direction bits of a boundary flag index.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// -Y
    Down = 0,
    /// +Y
    Up = 1,
    /// -Z
    North = 2,
    /// +Z
    South = 3,
    /// -X
    West = 4,
    /// +X
    East = 5,
}

impl Direction {
    /// All six directions.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The four directions that can cross a chunk boundary.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Returns `(dx, dy, dz)` for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// X component of the offset.
    #[must_use]
    pub const fn x_offset(self) -> i32 {
        self.offset().0
    }

    /// Z component of the offset.
    #[must_use]
    pub const fn z_offset(self) -> i32 {
        self.offset().2
    }

    /// Whether this direction lies in the XZ plane.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }

    /// The horizontal direction with the given unit offset, if any.
    #[must_use]
    pub const fn from_horizontal_offset(dx: i32, dz: i32) -> Option<Self> {
        match (dx, dz) {
            (0, -1) => Some(Self::North),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            (1, 0) => Some(Self::East),
            _ => None,
        }
    }

    /// Returns the neighbouring position in this direction.
    #[must_use]
    #[inline]
    pub const fn relative(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }
}
