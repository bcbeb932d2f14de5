// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::math::{vector2::Vector2, vector3::Vector3};

/// A chunk column position. `0.x` is the chunk X, `0.y` the chunk Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos(pub Vector2<i32>);

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

impl ChunkPos {
    /// Creates a chunk position from chunk coordinates.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    /// Returns the chunk containing the given block column.
    #[must_use]
    pub const fn from_block(block_x: i32, block_z: i32) -> Self {
        Self::new(block_x >> 4, block_z >> 4)
    }

    /// Chunk X coordinate.
    #[must_use]
    #[inline]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Chunk Z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// Returns the chunk position offset by whole chunks.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dz)
    }

    /// Lowest block X inside this chunk.
    #[must_use]
    #[inline]
    pub const fn min_block_x(self) -> i32 {
        self.0.x << 4
    }

    /// Lowest block Z inside this chunk.
    #[must_use]
    #[inline]
    pub const fn min_block_z(self) -> i32 {
        self.0.y << 4
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0.x, self.0.y)
    }
}

impl BlockPos {
    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Block X coordinate.
    #[must_use]
    #[inline]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Block Y coordinate.
    #[must_use]
    #[inline]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// Block Z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// Returns the position offset by the given amounts.
    #[must_use]
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// The chunk column containing this position.
    #[must_use]
    #[inline]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::from_block(self.0.x, self.0.z)
    }

    /// X inside the chunk (0-15).
    #[must_use]
    #[inline]
    pub const fn local_x(self) -> usize {
        (self.0.x & 15) as usize
    }

    /// Y inside the sub-chunk (0-15).
    #[must_use]
    #[inline]
    pub const fn local_y(self) -> usize {
        (self.0.y & 15) as usize
    }

    /// Z inside the chunk (0-15).
    #[must_use]
    #[inline]
    pub const fn local_z(self) -> usize {
        (self.0.z & 15) as usize
    }

    /// Index of the 16 block tall sub-chunk band containing this position.
    #[must_use]
    #[inline]
    pub const fn section_y(self) -> i32 {
        self.0.y >> 4
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.x, self.0.y, self.0.z)
    }
}
