//! Error types surfaced by configuration loading and persisted data decoding.

use std::io;

use lumen_utils::ChunkPos;
use thiserror::Error;

/// Failure to obtain a usable [`LightingConfig`](crate::config::LightingConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("config io failed: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid json5 for the expected shape.
    #[error("config could not be parsed: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Persisted or received light data that cannot be used.
///
/// Persisted fields are recovered from by ignoring them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightDataError {
    /// The field holds the wrong number of elements.
    #[error("chunk field {field} had invalid length {found} (expected {expected}), ignoring it")]
    InvalidLength {
        /// Tag name of the field.
        field: &'static str,
        /// Required element count.
        expected: usize,
        /// Element count actually stored.
        found: usize,
    },
    /// The field exists but is not of the expected tag type.
    #[error("chunk field {field} has an unexpected tag type, ignoring it")]
    WrongType {
        /// Tag name of the field.
        field: &'static str,
    },
    /// A sub-chunk entry refers to a band outside 0..16.
    #[error("sub-chunk entry for band {0} is out of range, ignoring it")]
    BandOutOfRange(i32),
    /// Light data arrived for a chunk that has no light overlay.
    #[error("no light data is kept for chunk {0}")]
    UnknownChunk(ChunkPos),
}
