use std::io;

use thiserror::Error;

/// Failure while decoding a packet.
#[derive(Error, Debug)]
pub enum ReadingError {
    /// The stream ended in the middle of a value.
    #[error("incomplete data: {0}")]
    Incomplete(String),
    /// A variable length value did not terminate in time.
    #[error("{0} is too large")]
    TooLarge(String),
    /// The data was complete but not valid for the target type.
    #[error("invalid data: {0}")]
    Invalid(String),
}

impl From<io::Error> for ReadingError {
    fn from(err: io::Error) -> Self {
        Self::Incomplete(err.to_string())
    }
}

/// Failure while encoding a packet.
#[derive(Error, Debug)]
pub enum WritingError {
    /// The underlying writer failed.
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
    /// A length could not be represented on the wire.
    #[error("{0} is too large")]
    TooLarge(String),
}
