//! Light replication packets.

mod c_light_update;

pub use c_light_update::{CLightUpdate, LIGHT_SECTION_BYTES, LightUpdatePacketData};
