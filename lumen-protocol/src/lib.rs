//! Wire types used to replicate light data to observers.

pub mod codec;
pub mod packets;
pub mod serial;
