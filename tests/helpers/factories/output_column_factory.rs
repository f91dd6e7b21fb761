use crate::engine::page::OutputColumn;
use crate::engine::types::ValueType;

pub struct OutputColumnFactory {
    name: String,
    channel: usize,
    value_type: ValueType,
}

impl OutputColumnFactory {
    pub fn new() -> Self {
        Self {
            name: "col".to_string(),
            channel: 0,
            value_type: ValueType::BigInt,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn create(self) -> OutputColumn {
        OutputColumn::new(self.name, self.channel, self.value_type)
    }

    /// One column per type, reading channels in order.
    pub fn create_list(types: Vec<ValueType>) -> Vec<OutputColumn> {
        types
            .into_iter()
            .enumerate()
            .map(|(channel, value_type)| {
                OutputColumn::new(format!("c{channel}"), channel, value_type)
            })
            .collect()
    }
}
