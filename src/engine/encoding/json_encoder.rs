use std::io::{BufWriter, Write};

use tracing::{debug, warn};

use crate::engine::encoding::column_dispatcher::write_column;
use crate::engine::encoding::encoder::segment_size;
use crate::engine::encoding::{
    CountingWriter, DataAttribute, DataAttributes, JsonWriter, QueryDataEncoder,
    QueryDataEncoderFactory, Session,
};
use crate::engine::errors::EncodeError;
use crate::engine::page::{OutputColumn, Page};
use crate::shared::config::{CONFIG, EncoderConfig};

pub const JSON_ENCODING: &str = "json";

/// Encodes pages as a JSON array of row arrays:
/// `[[c1, c2, ...], [c1, c2, ...], ...]`.
pub struct JsonQueryDataEncoder {
    session: Session,
    columns: Vec<OutputColumn>,
    output_buffer_size: usize,
}

impl JsonQueryDataEncoder {
    pub fn new(session: Session, columns: Vec<OutputColumn>, config: &EncoderConfig) -> Self {
        Self {
            session,
            columns,
            output_buffer_size: config.output_buffer_size.max(1),
        }
    }

    fn write_rows<W: Write>(
        &self,
        generator: &mut JsonWriter<W>,
        pages: &[Page],
    ) -> Result<usize, EncodeError> {
        let mut rows = 0;
        generator.write_start_array()?;
        for page in pages {
            let blocks = self
                .columns
                .iter()
                .map(|column| page.block(column.source_page_channel))
                .collect::<Result<Vec<_>, _>>()?;

            for position in 0..page.position_count() {
                generator.write_start_array()?;
                for (column, block) in self.columns.iter().zip(&blocks) {
                    write_column(generator, &column.value_type, block, position)?;
                }
                generator.write_end_array()?;
            }
            rows += page.position_count();
        }
        generator.write_end_array()?;
        Ok(rows)
    }
}

impl QueryDataEncoder for JsonQueryDataEncoder {
    fn encode_to(
        &self,
        output: &mut dyn Write,
        pages: &[Page],
    ) -> Result<DataAttributes, EncodeError> {
        debug!(
            target: "encoding::json",
            query_id = %self.session.query_id,
            columns = self.columns.len(),
            pages = pages.len(),
            "Encoding segment"
        );

        let mut generator = JsonWriter::new(BufWriter::with_capacity(
            self.output_buffer_size,
            CountingWriter::new(output),
        ));

        let rows = match self.write_rows(&mut generator, pages) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    target: "encoding::json",
                    query_id = %self.session.query_id,
                    error = %err,
                    "Segment encoding failed"
                );
                return Err(err);
            }
        };
        // push everything buffered through the counter before reading it
        generator.close()?;

        let written = generator.get_ref().get_ref().count();
        let size = segment_size(written).inspect_err(|err| err.log_error())?;

        debug!(
            target: "encoding::json",
            query_id = %self.session.query_id,
            rows,
            bytes = written,
            "Segment encoded"
        );

        Ok(DataAttributes::builder()
            .set(DataAttribute::SegmentSize, size)
            .build())
    }

    fn encoding(&self) -> &str {
        JSON_ENCODING
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonEncoderFactory {
    config: EncoderConfig,
}

impl JsonEncoderFactory {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn from_config() -> Self {
        Self::new(CONFIG.encoder.clone())
    }
}

impl QueryDataEncoderFactory for JsonEncoderFactory {
    fn create(&self, session: &Session, columns: Vec<OutputColumn>) -> Box<dyn QueryDataEncoder> {
        Box::new(JsonQueryDataEncoder::new(
            session.clone(),
            columns,
            &self.config,
        ))
    }

    fn encoding(&self) -> &str {
        JSON_ENCODING
    }
}
