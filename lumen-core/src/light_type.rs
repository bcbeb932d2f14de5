//! The two independent light fields.

/// Which light field an operation applies to.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Light emitted by blocks.
    Block = 0,
    /// Light received from the open sky.
    Sky = 1,
}

impl LightType {
    /// Both light types, block light first.
    pub const ALL: [LightType; 2] = [LightType::Block, LightType::Sky];

    /// Index into per-type arrays.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Value a voxel of this type holds when nothing else is known about it.
    #[must_use]
    pub const fn default_value(self) -> u8 {
        match self {
            Self::Block => 0,
            Self::Sky => 15,
        }
    }
}
