//! # Lumen
//!
//! Block and sky light for voxel worlds made of 16x16x256 chunk columns.
//!
//! The crate keeps a light overlay next to the host's own chunk storage and
//! updates it incrementally with a bucketed flood fill. Everything it needs to
//! know about blocks comes through the [`grid::VoxelGrid`] trait; the host
//! drives it through the lifecycle hooks of [`world::LightWorld`].
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod grid;
pub mod light_engine;
pub mod light_type;
pub mod persistence;
pub mod world;

pub use chunk::{ChunkTask, LightChunk, LightChunks};
pub use config::LightingConfig;
pub use error::{ConfigError, LightDataError};
pub use grid::{MemoryGrid, VoxelGrid};
pub use light_engine::{LightEngine, TickContext};
pub use light_type::LightType;
pub use world::LightWorld;
