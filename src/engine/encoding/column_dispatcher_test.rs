use chrono_tz::Tz;

use crate::engine::encoding::JsonWriter;
use crate::engine::encoding::column_dispatcher::write_column;
use crate::engine::errors::EncodeError;
use crate::engine::page::Block;
use crate::engine::types::{Value, ValueType};

fn written(value_type: &ValueType, block: &Block, position: usize) -> String {
    let mut writer = JsonWriter::new(Vec::new());
    write_column(&mut writer, value_type, block, position).expect("write column");
    writer.close().expect("close");
    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn null_positions_render_null_for_every_type() {
    let cases: Vec<(ValueType, Block)> = vec![
        (ValueType::varchar(), Block::strings([None::<&str>])),
        (ValueType::Char { length: 4 }, Block::strings([None::<&str>])),
        (ValueType::Boolean, Block::booleans([None])),
        (ValueType::TinyInt, Block::tinyints([None])),
        (ValueType::SmallInt, Block::smallints([None])),
        (ValueType::Integer, Block::ints([None])),
        (ValueType::BigInt, Block::longs([None])),
        (ValueType::Real, Block::reals([None])),
        (ValueType::Double, Block::doubles([None])),
        (
            ValueType::Decimal {
                precision: 20,
                scale: 2,
            },
            Block::int128s([None]),
        ),
        (ValueType::Date, Block::ints([None])),
        (ValueType::Time { precision: 3 }, Block::longs([None])),
        (
            ValueType::TimeWithTimeZone { precision: 3 },
            Block::times_with_offset([None]),
        ),
        (ValueType::Timestamp { precision: 3 }, Block::longs([None])),
        (
            ValueType::TimestampWithTimeZone { precision: 3 },
            Block::zoned_timestamps([None]),
        ),
        (ValueType::IntervalYearMonth, Block::ints([None])),
        (ValueType::IntervalDayTime, Block::longs([None])),
        (ValueType::Varbinary, Block::strings([None::<&[u8]>])),
        (
            ValueType::array(ValueType::BigInt),
            Block::arrays(Block::longs([]), [None]).unwrap(),
        ),
        (
            ValueType::map(ValueType::varchar(), ValueType::BigInt),
            Block::maps(Block::strings(Vec::<Option<&str>>::new()), Block::longs([]), [None])
                .unwrap(),
        ),
        (
            ValueType::Opaque {
                name: "json".to_string(),
            },
            Block::objects([Value::Null]),
        ),
    ];

    for (value_type, block) in cases {
        assert_eq!(written(&value_type, &block, 0), "null", "type {value_type}");
    }
}

#[test]
fn varchar_bytes_are_copied_verbatim() {
    let block = Block::strings([Some("plain"), Some("q\"uote"), Some("")]);
    assert_eq!(written(&ValueType::varchar(), &block, 0), "\"plain\"");
    assert_eq!(written(&ValueType::varchar(), &block, 1), r#""q\"uote""#);
    assert_eq!(written(&ValueType::varchar(), &block, 2), "\"\"");
}

#[test]
fn char_values_are_padded_to_length() {
    let block = Block::strings([Some("ab"), Some("é"), Some("full")]);
    let char4 = ValueType::Char { length: 4 };
    assert_eq!(written(&char4, &block, 0), "\"ab  \"");
    assert_eq!(written(&char4, &block, 1), "\"é   \"");
    assert_eq!(written(&char4, &block, 2), "\"full\"");
}

#[test]
fn non_text_types_go_through_value_rendering() {
    let doubles = Block::doubles([Some(2.0), Some(f64::INFINITY)]);
    assert_eq!(written(&ValueType::Double, &doubles, 0), "2.0");
    assert_eq!(written(&ValueType::Double, &doubles, 1), "\"Infinity\"");

    let zoned = Block::zoned_timestamps([Some((0, Tz::UTC))]);
    assert_eq!(
        written(&ValueType::TimestampWithTimeZone { precision: 0 }, &zoned, 0),
        "\"1970-01-01 00:00:00 UTC\""
    );
}

#[test]
fn block_layout_mismatch_is_reported() {
    let mut writer = JsonWriter::new(Vec::new());
    let block = Block::longs([Some(1)]);
    let err = write_column(&mut writer, &ValueType::varchar(), &block, 0).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::BlockTypeMismatch {
            found: "Long",
            ..
        }
    ));
}
