//! Light data of chunks and their sub-chunks.

pub mod boundary_flags;
pub mod height_map;
pub mod light_chunk;
pub mod light_packet;
pub mod light_storage;
pub mod sub_chunk;

pub use light_chunk::{ChunkTask, LightChunk, LightChunks};
pub use light_storage::LightStorage;
pub use sub_chunk::SubChunkLight;
