pub mod attributes;
pub mod column_dispatcher;
pub mod compressed;
pub mod counting_writer;
pub mod encoder;
pub mod json_encoder;
pub mod json_writer;
pub mod value_renderer;

#[cfg(test)]
mod column_dispatcher_test;

pub use attributes::{DataAttribute, DataAttributes, DataAttributesBuilder};
pub use compressed::{
    CompressedEncoderFactory, CompressedQueryDataEncoder, CompressingSink, Lz4Compression,
    SinkCompression, ZstdCompression,
};
pub use counting_writer::CountingWriter;
pub use encoder::{QueryDataEncoder, QueryDataEncoderFactory, Session, segment_size};
pub use json_encoder::{JSON_ENCODING, JsonEncoderFactory, JsonQueryDataEncoder};
pub use json_writer::JsonWriter;
