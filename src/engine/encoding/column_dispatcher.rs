use std::io::Write;

use crate::engine::encoding::{JsonWriter, value_renderer};
use crate::engine::errors::EncodeError;
use crate::engine::page::Block;
use crate::engine::types::ValueType;

/// Writes the value at `position` of `block` for a column of `value_type`.
pub fn write_column<W: Write>(
    generator: &mut JsonWriter<W>,
    value_type: &ValueType,
    block: &Block,
    position: usize,
) -> Result<(), EncodeError> {
    if block.is_null(position) {
        return generator.write_null();
    }
    match value_type {
        // Text skips the decode-to-String step and copies the block bytes straight out
        ValueType::Varchar { .. } | ValueType::Char { .. } => {
            generator.write_utf8_string(&value_type.slice(block, position)?)
        }
        other => value_renderer::render(generator, &other.object_value(block, position)?),
    }
}
