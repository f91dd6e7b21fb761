use std::io::Write;

use crate::engine::encoding::DataAttributes;
use crate::engine::errors::EncodeError;
use crate::engine::page::{OutputColumn, Page};

/// Request context handed to encoder factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub query_id: String,
}

impl Session {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
        }
    }
}

/// Turns pages into a byte stream for one segment.
///
/// `encode_to` consumes all pages in a single synchronous pass and writes
/// straight into `output`. The caller keeps ownership of `output` and is
/// responsible for closing it.
pub trait QueryDataEncoder: Send + Sync {
    fn encode_to(
        &self,
        output: &mut dyn Write,
        pages: &[Page],
    ) -> Result<DataAttributes, EncodeError>;

    /// Name used for client negotiation, e.g. `json` or `json+zstd`.
    fn encoding(&self) -> &str;
}

pub trait QueryDataEncoderFactory: Send + Sync {
    fn create(&self, session: &Session, columns: Vec<OutputColumn>) -> Box<dyn QueryDataEncoder>;

    fn encoding(&self) -> &str;
}

impl<F: QueryDataEncoderFactory + ?Sized> QueryDataEncoderFactory for Box<F> {
    fn create(&self, session: &Session, columns: Vec<OutputColumn>) -> Box<dyn QueryDataEncoder> {
        (**self).create(session, columns)
    }

    fn encoding(&self) -> &str {
        (**self).encoding()
    }
}

/// Converts a byte count into the bounded size attribute.
pub fn segment_size(count: u64) -> Result<i32, EncodeError> {
    i32::try_from(count).map_err(|_| EncodeError::SizeOverflow { size: count })
}
