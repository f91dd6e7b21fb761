use std::io::{self, Write};
use std::sync::Arc;

use lz4_flex::frame::{BlockSize, FrameEncoder, FrameInfo};
use tracing::debug;

use crate::engine::encoding::encoder::segment_size;
use crate::engine::encoding::{
    CountingWriter, DataAttribute, DataAttributes, JsonEncoderFactory, QueryDataEncoder,
    QueryDataEncoderFactory, Session,
};
use crate::engine::errors::EncodeError;
use crate::engine::page::{OutputColumn, Page};
use crate::shared::config::EncoderConfig;

/// A writer that transforms bytes on their way to the wrapped sink and
/// must be finished to emit its trailer.
pub trait CompressingSink: Write {
    fn finish(self: Box<Self>) -> io::Result<()>;
}

impl<W: Write> CompressingSink for zstd::stream::write::Encoder<'static, W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(|_| ())
    }
}

impl<W: Write> CompressingSink for FrameEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(|_| ()).map_err(io::Error::from)
    }
}

/// Byte-level transformation applied by a decorating encoder.
pub trait SinkCompression: Send + Sync {
    /// Appended to the inner encoding name, e.g. `zstd` in `json+zstd`.
    fn suffix(&self) -> &'static str;

    fn wrap<'a>(&self, sink: &'a mut dyn Write) -> io::Result<Box<dyn CompressingSink + 'a>>;
}

#[derive(Debug, Clone, Copy)]
pub struct ZstdCompression {
    level: i32,
}

impl ZstdCompression {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl SinkCompression for ZstdCompression {
    fn suffix(&self) -> &'static str {
        "zstd"
    }

    fn wrap<'a>(&self, sink: &'a mut dyn Write) -> io::Result<Box<dyn CompressingSink + 'a>> {
        Ok(Box::new(zstd::stream::write::Encoder::new(sink, self.level)?))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Lz4Compression {
    block_size: BlockSize,
}

impl Lz4Compression {
    pub fn new(block_size: BlockSize) -> Self {
        Self { block_size }
    }
}

impl SinkCompression for Lz4Compression {
    fn suffix(&self) -> &'static str {
        "lz4"
    }

    fn wrap<'a>(&self, sink: &'a mut dyn Write) -> io::Result<Box<dyn CompressingSink + 'a>> {
        let info = FrameInfo::new().block_size(self.block_size);
        Ok(Box::new(FrameEncoder::with_frame_info(info, sink)))
    }
}

/// Encoder that owns one inner encoder and compresses everything it writes.
///
/// Bytes are counted after compression, so `SEGMENT_SIZE` is what reaches
/// the caller's sink. The inner encoder's own size is kept as
/// `UNCOMPRESSED_SIZE`.
pub struct CompressedQueryDataEncoder {
    inner: Box<dyn QueryDataEncoder>,
    compression: Arc<dyn SinkCompression>,
    encoding: String,
}

impl CompressedQueryDataEncoder {
    pub fn new(inner: Box<dyn QueryDataEncoder>, compression: Arc<dyn SinkCompression>) -> Self {
        let encoding = format!("{}+{}", inner.encoding(), compression.suffix());
        Self {
            inner,
            compression,
            encoding,
        }
    }
}

impl QueryDataEncoder for CompressedQueryDataEncoder {
    fn encode_to(
        &self,
        output: &mut dyn Write,
        pages: &[Page],
    ) -> Result<DataAttributes, EncodeError> {
        let mut counting = CountingWriter::new(output);
        let inner_attributes = {
            let mut sink = self.compression.wrap(&mut counting)?;
            let attributes = self.inner.encode_to(&mut sink, pages)?;
            sink.finish()?;
            attributes
        };

        let compressed = counting.count();
        let uncompressed = inner_attributes.segment_size().unwrap_or_default();
        debug!(
            target: "encoding::compressed",
            encoding = %self.encoding,
            uncompressed_size = uncompressed,
            compressed_size = compressed,
            ratio = format!("{:.2}%", compressed as f64 / uncompressed.max(1) as f64 * 100.0),
            "Segment compressed"
        );

        let size = segment_size(compressed).inspect_err(|err| err.log_error())?;
        Ok(inner_attributes
            .to_builder()
            .set(DataAttribute::UncompressedSize, uncompressed)
            .set(DataAttribute::SegmentSize, size)
            .build())
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }
}

/// Factory decorator producing [`CompressedQueryDataEncoder`]s around
/// whatever the inner factory creates.
pub struct CompressedEncoderFactory<F> {
    inner: F,
    compression: Arc<dyn SinkCompression>,
    encoding: String,
}

impl<F: QueryDataEncoderFactory> CompressedEncoderFactory<F> {
    pub fn new<C: SinkCompression + 'static>(inner: F, compression: C) -> Self {
        let encoding = format!("{}+{}", inner.encoding(), compression.suffix());
        Self {
            inner,
            compression: Arc::new(compression),
            encoding,
        }
    }

    pub fn zstd(inner: F, config: &EncoderConfig) -> Self {
        Self::new(inner, ZstdCompression::new(config.zstd_level))
    }

    pub fn lz4(inner: F, config: &EncoderConfig) -> Self {
        Self::new(inner, Lz4Compression::new(config.lz4_frame_block_size()))
    }
}

impl<F: QueryDataEncoderFactory> QueryDataEncoderFactory for CompressedEncoderFactory<F> {
    fn create(&self, session: &Session, columns: Vec<OutputColumn>) -> Box<dyn QueryDataEncoder> {
        Box::new(CompressedQueryDataEncoder::new(
            self.inner.create(session, columns),
            Arc::clone(&self.compression),
        ))
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl CompressedEncoderFactory<JsonEncoderFactory> {
    pub fn json_zstd(config: EncoderConfig) -> Self {
        let inner = JsonEncoderFactory::new(config.clone());
        Self::zstd(inner, &config)
    }

    pub fn json_lz4(config: EncoderConfig) -> Self {
        let inner = JsonEncoderFactory::new(config.clone());
        Self::lz4(inner, &config)
    }
}
