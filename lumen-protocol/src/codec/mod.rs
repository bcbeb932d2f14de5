//! Primitive encodings shared by the packets.

mod bit_set;
pub mod errors;
mod var_int;

pub use bit_set::BitSet;
pub use var_int::VarInt;
