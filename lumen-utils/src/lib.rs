//! Shared position and math types for the lumen lighting workspace.

pub mod math;
pub mod types;

pub use types::{BlockPos, ChunkPos};
