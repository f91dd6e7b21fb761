use crate::engine::types::ValueType;

/// Maps one position of the output row to a page channel and its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    pub source_page_channel: usize,
    pub value_type: ValueType,
}

impl OutputColumn {
    pub fn new(name: impl Into<String>, source_page_channel: usize, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            source_page_channel,
            value_type,
        }
    }
}
