//! Nibble storage for one light field of a 16x16x16 sub-chunk.
//!
//! Values are 4 bits (0-15), two per byte, 2048 bytes for the whole sub-chunk.
//! The byte layout is the persisted and wire layout, so arrays are copied out
//! verbatim.

/// Number of bytes backing one light field of a sub-chunk.
pub const LIGHT_ARRAY_SIZE: usize = 2048;

/// Light values of a sub-chunk, kept as a single value until two voxels differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightStorage {
    /// Every voxel holds the same level.
    Homogeneous(u8),
    /// Packed nibbles, index `y * 256 + z * 16 + x`, even indices in the low nibble.
    Heterogeneous(Box<[u8; LIGHT_ARRAY_SIZE]>),
}

#[inline]
const fn nibble_index(x: usize, y: usize, z: usize) -> usize {
    y * 256 + z * 16 + x
}

#[inline]
const fn packed(level: u8) -> u8 {
    (level & 0x0F) | ((level & 0x0F) << 4)
}

impl LightStorage {
    /// Creates storage with every voxel at `light_level`.
    #[must_use]
    pub fn new_filled(light_level: u8) -> Self {
        debug_assert!(light_level <= 15, "Light level must be 0-15");
        Self::Homogeneous(light_level.min(15))
    }

    /// Creates dark storage.
    #[must_use]
    pub fn new_empty() -> Self {
        Self::Homogeneous(0)
    }

    /// Rebuilds storage from a persisted or received array.
    ///
    /// Returns `None` when `bytes` is not exactly [`LIGHT_ARRAY_SIZE`] long.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let data: [u8; LIGHT_ARRAY_SIZE] = bytes.try_into().ok()?;
        let first = data[0];
        if first & 0x0F == first >> 4 && data.iter().all(|b| *b == first) {
            return Some(Self::Homogeneous(first & 0x0F));
        }
        Some(Self::Heterogeneous(Box::new(data)))
    }

    /// Gets the light level at local coordinates (0-15 each).
    #[must_use]
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        debug_assert!(x < 16 && y < 16 && z < 16, "Coordinates must be 0-15");

        match self {
            Self::Homogeneous(level) => *level,
            Self::Heterogeneous(data) => {
                let index = nibble_index(x, y, z);
                (data[index >> 1] >> ((index & 1) << 2)) & 0x0F
            }
        }
    }

    /// Sets the light level at local coordinates, upgrading to per-voxel storage if needed.
    ///
    /// Returns whether the stored value changed.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, light_level: u8) -> bool {
        debug_assert!(x < 16 && y < 16 && z < 16, "Coordinates must be 0-15");
        debug_assert!(light_level <= 15, "Light level must be 0-15");
        let light_level = light_level & 0x0F;

        if let Self::Homogeneous(current_level) = *self {
            if light_level == current_level {
                return false;
            }
            *self = Self::Heterogeneous(Box::new([packed(current_level); LIGHT_ARRAY_SIZE]));
        }
        let Self::Heterogeneous(data) = self else {
            return false;
        };

        let index = nibble_index(x, y, z);
        let shift = (index & 1) << 2;
        let byte = &mut data[index >> 1];
        let old = (*byte >> shift) & 0x0F;
        *byte = (*byte & !(0x0F << shift)) | (light_level << shift);
        old != light_level
    }

    /// Overwrites every voxel with `light_level`.
    pub fn fill(&mut self, light_level: u8) {
        debug_assert!(light_level <= 15, "Light level must be 0-15");
        *self = Self::Homogeneous(light_level & 0x0F);
    }

    /// Whether every voxel holds `light_level`.
    #[must_use]
    pub fn is_uniform(&self, light_level: u8) -> bool {
        match self {
            Self::Homogeneous(level) => *level == light_level,
            Self::Heterogeneous(data) => {
                let expected = packed(light_level);
                data.iter().all(|b| *b == expected)
            }
        }
    }

    /// Returns the packed nibble array for persistence or sending.
    #[must_use]
    pub fn to_packet_data(&self) -> Vec<u8> {
        match self {
            Self::Homogeneous(level) => vec![packed(*level); LIGHT_ARRAY_SIZE],
            Self::Heterogeneous(data) => data.to_vec(),
        }
    }
}

impl Default for LightStorage {
    fn default() -> Self {
        Self::new_empty()
    }
}
