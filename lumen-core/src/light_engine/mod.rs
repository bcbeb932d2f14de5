//! Incremental light propagation, height-map upkeep and the deferred work at chunk edges.

mod access;
mod base;
pub mod boundary;
pub mod direction;
pub mod light_queue;
pub mod random_updates;
pub mod sky_light_engine;
mod update_queue;

pub use access::LightChunkAccess;
pub use base::LightEngine;
pub use direction::Direction;
pub use light_queue::LightQueue;
pub use random_updates::TickContext;
pub use update_queue::UpdateQueue;
