use std::ops::Range;

use chrono_tz::Tz;

use crate::engine::errors::{EncodeError, PageError};
use crate::engine::types::Value;

/// Physical layout of a block's values.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Boolean(Vec<bool>),
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Int128(Vec<i128>),
    Real(Vec<f32>),
    Double(Vec<f64>),
    /// `offsets` has one more entry than there are positions.
    VariableWidth { offsets: Vec<usize>, bytes: Vec<u8> },
    /// Picoseconds of day with an offset in minutes.
    TimeWithOffset(Vec<(i64, i16)>),
    /// Epoch milliseconds with the zone they are rendered in.
    ZonedTimestamp(Vec<(i64, Tz)>),
    Array {
        offsets: Vec<usize>,
        elements: Box<Block>,
    },
    Map {
        offsets: Vec<usize>,
        keys: Box<Block>,
        values: Box<Block>,
    },
    Object(Vec<Value>),
}

impl BlockData {
    pub fn layout_name(&self) -> &'static str {
        match self {
            BlockData::Boolean(_) => "Boolean",
            BlockData::Byte(_) => "Byte",
            BlockData::Short(_) => "Short",
            BlockData::Int(_) => "Int",
            BlockData::Long(_) => "Long",
            BlockData::Int128(_) => "Int128",
            BlockData::Real(_) => "Real",
            BlockData::Double(_) => "Double",
            BlockData::VariableWidth { .. } => "VariableWidth",
            BlockData::TimeWithOffset(_) => "TimeWithOffset",
            BlockData::ZonedTimestamp(_) => "ZonedTimestamp",
            BlockData::Array { .. } => "Array",
            BlockData::Map { .. } => "Map",
            BlockData::Object(_) => "Object",
        }
    }

    fn len(&self) -> usize {
        match self {
            BlockData::Boolean(v) => v.len(),
            BlockData::Byte(v) => v.len(),
            BlockData::Short(v) => v.len(),
            BlockData::Int(v) => v.len(),
            BlockData::Long(v) => v.len(),
            BlockData::Int128(v) => v.len(),
            BlockData::Real(v) => v.len(),
            BlockData::Double(v) => v.len(),
            BlockData::VariableWidth { offsets, .. }
            | BlockData::Array { offsets, .. }
            | BlockData::Map { offsets, .. } => offsets.len().saturating_sub(1),
            BlockData::TimeWithOffset(v) => v.len(),
            BlockData::ZonedTimestamp(v) => v.len(),
            BlockData::Object(v) => v.len(),
        }
    }
}

/// Column of values for one channel of a page. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    data: BlockData,
    nulls: Option<Vec<bool>>,
}

fn split_nulls<T: Default, I: IntoIterator<Item = Option<T>>>(
    values: I,
) -> (Vec<T>, Option<Vec<bool>>) {
    let mut data = Vec::new();
    let mut nulls = Vec::new();
    for value in values {
        nulls.push(value.is_none());
        data.push(value.unwrap_or_default());
    }
    let nulls = nulls.iter().any(|n| *n).then_some(nulls);
    (data, nulls)
}

fn validate_offsets(offsets: &[usize], child_len: usize) -> Result<(), PageError> {
    match (offsets.first(), offsets.last()) {
        (Some(0), Some(last)) if *last == child_len => {}
        _ => {
            return Err(PageError::InvalidOffsets(format!(
                "offsets must start at 0 and end at {child_len}"
            )));
        }
    }
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(PageError::InvalidOffsets("offsets must not decrease".into()));
    }
    Ok(())
}

fn offsets_from_lengths<I: IntoIterator<Item = Option<usize>>>(
    lengths: I,
) -> (Vec<usize>, Option<Vec<bool>>) {
    let mut offsets = vec![0];
    let mut nulls = Vec::new();
    let mut end = 0;
    for length in lengths {
        nulls.push(length.is_none());
        end += length.unwrap_or(0);
        offsets.push(end);
    }
    let nulls = nulls.iter().any(|n| *n).then_some(nulls);
    (offsets, nulls)
}

macro_rules! fixed_width {
    ($ctor:ident, $getter:ident, $variant:ident, $ty:ty) => {
        pub fn $ctor<I: IntoIterator<Item = Option<$ty>>>(values: I) -> Self {
            let (data, nulls) = split_nulls(values);
            Self {
                data: BlockData::$variant(data),
                nulls,
            }
        }

        pub fn $getter(&self, position: usize) -> Result<$ty, EncodeError> {
            match &self.data {
                BlockData::$variant(values) => values
                    .get(position)
                    .copied()
                    .ok_or_else(|| self.out_of_bounds(position)),
                _ => Err(self.mismatch(stringify!($variant))),
            }
        }
    };
}

impl Block {
    pub fn new(data: BlockData, nulls: Option<Vec<bool>>) -> Result<Self, PageError> {
        let expected = data.len();
        if let Some(mask) = &nulls {
            if mask.len() != expected {
                return Err(PageError::InconsistentLength {
                    expected,
                    got: mask.len(),
                });
            }
        }
        match &data {
            BlockData::VariableWidth { offsets, bytes } => validate_offsets(offsets, bytes.len())?,
            BlockData::Array { offsets, elements } => {
                validate_offsets(offsets, elements.position_count())?
            }
            BlockData::Map {
                offsets,
                keys,
                values,
            } => {
                if keys.position_count() != values.position_count() {
                    return Err(PageError::InconsistentPositionCount {
                        block: 1,
                        expected: keys.position_count(),
                        got: values.position_count(),
                    });
                }
                validate_offsets(offsets, keys.position_count())?
            }
            _ => {}
        }
        Ok(Self { data, nulls })
    }

    fixed_width!(booleans, get_boolean, Boolean, bool);
    fixed_width!(tinyints, get_byte, Byte, i8);
    fixed_width!(smallints, get_short, Short, i16);
    fixed_width!(ints, get_int, Int, i32);
    fixed_width!(longs, get_long, Long, i64);
    fixed_width!(int128s, get_int128, Int128, i128);
    fixed_width!(reals, get_real, Real, f32);
    fixed_width!(doubles, get_double, Double, f64);

    /// Variable width block from UTF-8 text or raw bytes.
    pub fn strings<S: AsRef<[u8]>, I: IntoIterator<Item = Option<S>>>(values: I) -> Self {
        let mut offsets = vec![0];
        let mut bytes = Vec::new();
        let mut nulls = Vec::new();
        for value in values {
            nulls.push(value.is_none());
            if let Some(value) = value {
                bytes.extend_from_slice(value.as_ref());
            }
            offsets.push(bytes.len());
        }
        let nulls = nulls.iter().any(|n| *n).then_some(nulls);
        Self {
            data: BlockData::VariableWidth { offsets, bytes },
            nulls,
        }
    }

    pub fn times_with_offset<I: IntoIterator<Item = Option<(i64, i16)>>>(values: I) -> Self {
        let (data, nulls) = split_nulls(values);
        Self {
            data: BlockData::TimeWithOffset(data),
            nulls,
        }
    }

    pub fn zoned_timestamps<I: IntoIterator<Item = Option<(i64, Tz)>>>(values: I) -> Self {
        let mut data = Vec::new();
        let mut nulls = Vec::new();
        for value in values {
            nulls.push(value.is_none());
            data.push(value.unwrap_or((0, Tz::UTC)));
        }
        let nulls = nulls.iter().any(|n| *n).then_some(nulls);
        Self {
            data: BlockData::ZonedTimestamp(data),
            nulls,
        }
    }

    /// Object block; `Value::Null` entries become null positions.
    pub fn objects<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let data: Vec<Value> = values.into_iter().collect();
        let nulls: Vec<bool> = data.iter().map(Value::is_null).collect();
        let nulls = nulls.iter().any(|n| *n).then_some(nulls);
        Self {
            data: BlockData::Object(data),
            nulls,
        }
    }

    /// Array block over `elements`; each entry is a row's element count or `None` for null.
    pub fn arrays<I: IntoIterator<Item = Option<usize>>>(
        elements: Block,
        lengths: I,
    ) -> Result<Self, PageError> {
        let (offsets, nulls) = offsets_from_lengths(lengths);
        Self::new(
            BlockData::Array {
                offsets,
                elements: Box::new(elements),
            },
            nulls,
        )
    }

    pub fn maps<I: IntoIterator<Item = Option<usize>>>(
        keys: Block,
        values: Block,
        lengths: I,
    ) -> Result<Self, PageError> {
        let (offsets, nulls) = offsets_from_lengths(lengths);
        Self::new(
            BlockData::Map {
                offsets,
                keys: Box::new(keys),
                values: Box::new(values),
            },
            nulls,
        )
    }

    pub fn layout_name(&self) -> &'static str {
        self.data.layout_name()
    }

    pub fn position_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_null(&self, position: usize) -> bool {
        self.nulls
            .as_ref()
            .and_then(|mask| mask.get(position).copied())
            .unwrap_or(false)
    }

    pub fn may_have_null(&self) -> bool {
        self.nulls.is_some()
    }

    /// Borrowed bytes of a variable width position.
    pub fn slice(&self, position: usize) -> Result<&[u8], EncodeError> {
        match &self.data {
            BlockData::VariableWidth { offsets, bytes } => {
                let range = Self::range(offsets, position)
                    .ok_or_else(|| self.out_of_bounds(position))?;
                Ok(&bytes[range])
            }
            _ => Err(self.mismatch("VariableWidth")),
        }
    }

    /// Unscaled decimal from either a `Long` or an `Int128` block.
    pub fn get_wide(&self, position: usize) -> Result<i128, EncodeError> {
        match &self.data {
            BlockData::Long(_) => self.get_long(position).map(i128::from),
            BlockData::Int128(_) => self.get_int128(position),
            _ => Err(self.mismatch("Int128")),
        }
    }

    pub fn get_time_with_offset(&self, position: usize) -> Result<(i64, i16), EncodeError> {
        match &self.data {
            BlockData::TimeWithOffset(values) => values
                .get(position)
                .copied()
                .ok_or_else(|| self.out_of_bounds(position)),
            _ => Err(self.mismatch("TimeWithOffset")),
        }
    }

    pub fn get_zoned_timestamp(&self, position: usize) -> Result<(i64, Tz), EncodeError> {
        match &self.data {
            BlockData::ZonedTimestamp(values) => values
                .get(position)
                .copied()
                .ok_or_else(|| self.out_of_bounds(position)),
            _ => Err(self.mismatch("ZonedTimestamp")),
        }
    }

    pub fn get_array(&self, position: usize) -> Result<(&Block, Range<usize>), EncodeError> {
        match &self.data {
            BlockData::Array { offsets, elements } => {
                let range = Self::range(offsets, position)
                    .ok_or_else(|| self.out_of_bounds(position))?;
                Ok((elements, range))
            }
            _ => Err(self.mismatch("Array")),
        }
    }

    pub fn get_map(
        &self,
        position: usize,
    ) -> Result<(&Block, &Block, Range<usize>), EncodeError> {
        match &self.data {
            BlockData::Map {
                offsets,
                keys,
                values,
            } => {
                let range = Self::range(offsets, position)
                    .ok_or_else(|| self.out_of_bounds(position))?;
                Ok((keys, values, range))
            }
            _ => Err(self.mismatch("Map")),
        }
    }

    pub fn get_object(&self, position: usize) -> Result<&Value, EncodeError> {
        match &self.data {
            BlockData::Object(values) => values
                .get(position)
                .ok_or_else(|| self.out_of_bounds(position)),
            _ => Err(self.mismatch("Object")),
        }
    }

    fn range(offsets: &[usize], position: usize) -> Option<Range<usize>> {
        let start = *offsets.get(position)?;
        let end = *offsets.get(position + 1)?;
        Some(start..end)
    }

    fn mismatch(&self, expected: &str) -> EncodeError {
        EncodeError::BlockTypeMismatch {
            expected: expected.to_string(),
            found: self.layout_name(),
        }
    }

    fn out_of_bounds(&self, position: usize) -> EncodeError {
        EncodeError::PositionOutOfBounds {
            position,
            position_count: self.position_count(),
        }
    }
}
