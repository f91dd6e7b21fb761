use std::io;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can abort an encode call.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not serialize to JSON: {0}")]
    Serialization(#[from] JsonGenerationError),

    #[error("Encoded segment size {size} exceeds i32 range")]
    SizeOverflow { size: u64 },

    #[error("Output column references channel {channel} but page has {channels} channels")]
    ChannelOutOfBounds { channel: usize, channels: usize },

    #[error("Expected {expected} but block layout is {found}")]
    BlockTypeMismatch { expected: String, found: &'static str },

    #[error("Position {position} out of range for block of {position_count} positions")]
    PositionOutOfBounds {
        position: usize,
        position_count: usize,
    },
}

impl EncodeError {
    pub fn log_error(&self) {
        match self {
            EncodeError::Io(e) => {
                error!("Sink write failed: {}", e);
                debug!("Sink error details: {:?}", e);
            }
            EncodeError::Serialization(e) => {
                error!("JSON serialization failed: {}", e);
                debug!("Serialization error details: {:?}", e);
            }
            EncodeError::SizeOverflow { size } => {
                error!("Segment size overflow: {} bytes", size);
            }
            EncodeError::ChannelOutOfBounds { channel, channels } => {
                error!("Invalid source channel {} ({} available)", channel, channels);
            }
            EncodeError::BlockTypeMismatch { expected, found } => {
                error!("Block layout mismatch: {} vs {}", expected, found);
            }
            EncodeError::PositionOutOfBounds {
                position,
                position_count,
            } => {
                error!(
                    "Position {} out of range ({} positions)",
                    position, position_count
                );
            }
        }
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            EncodeError::Io(err.into())
        } else {
            EncodeError::Serialization(JsonGenerationError::Serde(err.to_string()))
        }
    }
}

impl From<EncodeError> for io::Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Io(e) => e,
            EncodeError::Serialization(_) => io::Error::new(io::ErrorKind::InvalidData, err),
            other => io::Error::other(other),
        }
    }
}

/// Structural failures raised by the JSON writer itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonGenerationError {
    #[error("cannot close {found} while inside {expected}")]
    UnbalancedEnd {
        expected: &'static str,
        found: &'static str,
    },

    #[error("object value written without a field name")]
    FieldNameExpected,

    #[error("field name written outside of an object")]
    UnexpectedFieldName,

    #[error("{0} scope(s) left open at close")]
    UnclosedScope(usize),

    #[error("{0}")]
    Serde(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Block {block} has {got} positions, expected {expected}")]
    InconsistentPositionCount {
        block: usize,
        expected: usize,
        got: usize,
    },

    #[error("Null mask has {got} entries, expected {expected}")]
    InconsistentLength { expected: usize, got: usize },

    #[error("Invalid offsets: {0}")]
    InvalidOffsets(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Invalid parameter for {name}: {param}")]
    InvalidParameter { name: String, param: String },

    #[error("Malformed type signature: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum RowSetError {
    #[error("Failed to parse row set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid column type: {0}")]
    Type(#[from] TypeParseError),

    #[error("Invalid page: {0}")]
    Page(#[from] PageError),

    #[error("Row {row} has {got} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Cannot convert {value} to {value_type}")]
    Conversion { value: String, value_type: String },
}
