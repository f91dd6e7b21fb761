use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata keys reported alongside an encoded segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataAttribute {
    /// Bytes delivered to the sink, after compression when decorated.
    SegmentSize,
    /// Bytes produced by the row encoder before compression.
    UncompressedSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataAttributes {
    values: BTreeMap<DataAttribute, i32>,
}

impl DataAttributes {
    pub fn builder() -> DataAttributesBuilder {
        DataAttributesBuilder::default()
    }

    pub fn to_builder(&self) -> DataAttributesBuilder {
        DataAttributesBuilder {
            values: self.values.clone(),
        }
    }

    pub fn get(&self, attribute: DataAttribute) -> Option<i32> {
        self.values.get(&attribute).copied()
    }

    pub fn segment_size(&self) -> Option<i32> {
        self.get(DataAttribute::SegmentSize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataAttribute, i32)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Default)]
pub struct DataAttributesBuilder {
    values: BTreeMap<DataAttribute, i32>,
}

impl DataAttributesBuilder {
    pub fn set(mut self, attribute: DataAttribute, value: i32) -> Self {
        self.values.insert(attribute, value);
        self
    }

    pub fn build(self) -> DataAttributes {
        DataAttributes {
            values: self.values,
        }
    }
}
