use std::io::Write;

use chrono_tz::Tz;
use indoc::indoc;
use tempfile::NamedTempFile;

use crate::engine::errors::{RowSetError, TypeParseError};
use crate::engine::page::RowSetLoader;
use crate::engine::types::{Value, ValueType};

const DOCUMENT: &str = indoc! {r#"
    {
      "columns": [
        {"name": "id", "type": "bigint"},
        {"name": "name", "type": "varchar"},
        {"name": "score", "type": "double"}
      ],
      "rows": [
        [1, "a", 1.5],
        [2, null, "NaN"],
        [3, "c", "-Infinity"]
      ]
    }
"#};

#[test]
fn loads_columns_in_channel_order() {
    let row_set = RowSetLoader::new(10).load_str(DOCUMENT).unwrap();
    let names: Vec<_> = row_set.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "name", "score"]);
    assert_eq!(row_set.columns[2].source_page_channel, 2);
    assert_eq!(row_set.columns[1].value_type, ValueType::varchar());
}

#[test]
fn splits_rows_into_pages() {
    let row_set = RowSetLoader::new(2).load_str(DOCUMENT).unwrap();
    let counts: Vec<_> = row_set.pages.iter().map(|p| p.position_count()).collect();
    assert_eq!(counts, [2, 1]);

    let first = &row_set.pages[0];
    assert!(first.block(1).unwrap().is_null(1));
    assert!(first.block(2).unwrap().get_double(1).unwrap().is_nan());
    assert_eq!(
        row_set.pages[1].block(2).unwrap().get_double(0).unwrap(),
        f64::NEG_INFINITY
    );
}

#[test]
fn loads_from_reader() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();
    let reader = std::fs::File::open(file.path()).unwrap();
    let row_set = RowSetLoader::new(100).load(reader).unwrap();
    assert_eq!(row_set.pages.len(), 1);
    assert_eq!(row_set.pages[0].position_count(), 3);
}

#[test]
fn missing_rows_yield_no_pages() {
    let row_set = RowSetLoader::new(4)
        .load_str(r#"{"columns": [{"name": "x", "type": "integer"}]}"#)
        .unwrap();
    assert!(row_set.pages.is_empty());
}

#[test]
fn temporal_and_decimal_columns_are_converted() {
    let input = indoc! {r#"
        {
          "columns": [
            {"name": "d", "type": "date"},
            {"name": "t", "type": "time(6)"},
            {"name": "ts", "type": "timestamp(3)"},
            {"name": "tz", "type": "timestamp(3) with time zone"},
            {"name": "n", "type": "decimal(10,2)"},
            {"name": "b", "type": "varbinary"},
            {"name": "o", "type": "time with time zone"}
          ],
          "rows": [
            ["2024-01-01", "01:02:03.000004", "1970-01-01 00:00:01.5",
             "2024-01-01 01:00:00 Europe/Paris", "12.3", "aGkh", "10:00:00-02:30"]
          ]
        }
    "#};
    let row_set = RowSetLoader::new(8).load_str(input).unwrap();
    let page = &row_set.pages[0];

    assert_eq!(page.block(0).unwrap().get_int(0).unwrap(), 19723);
    assert_eq!(
        page.block(1).unwrap().get_long(0).unwrap(),
        3_723_000_004_000_000
    );
    assert_eq!(page.block(2).unwrap().get_long(0).unwrap(), 1_500_000);
    assert_eq!(
        page.block(3).unwrap().get_zoned_timestamp(0).unwrap(),
        (1_704_067_200_000, Tz::Europe__Paris)
    );
    assert_eq!(page.block(4).unwrap().get_wide(0).unwrap(), 1230);
    assert_eq!(page.block(5).unwrap().slice(0).unwrap(), b"hi!");
    assert_eq!(
        page.block(6).unwrap().get_time_with_offset(0).unwrap(),
        (36_000_000_000_000_000, -150)
    );
}

#[test]
fn nested_columns_flatten_into_child_blocks() {
    let input = r#"{
        "columns": [
            {"name": "a", "type": "array(bigint)"},
            {"name": "m", "type": "map(integer, varchar)"},
            {"name": "j", "type": "json"}
        ],
        "rows": [
            [[1, 2], {"2": "b", "1": "a"}, {"k": true}],
            [null, null, null]
        ]
    }"#;
    let row_set = RowSetLoader::new(8).load_str(input).unwrap();
    let page = &row_set.pages[0];

    let (elements, range) = page.block(0).unwrap().get_array(0).unwrap();
    assert_eq!(range, 0..2);
    assert_eq!(elements.get_long(1).unwrap(), 2);
    assert!(page.block(0).unwrap().is_null(1));

    let (keys, values, range) = page.block(1).unwrap().get_map(0).unwrap();
    assert_eq!(range, 0..2);
    assert_eq!(keys.get_int(0).unwrap(), 2);
    assert_eq!(values.slice(1).unwrap(), b"a");

    assert_eq!(
        page.block(2).unwrap().get_object(0).unwrap(),
        &Value::Opaque(serde_json::json!({"k": true}))
    );
    assert!(page.block(2).unwrap().is_null(1));
}

#[test]
fn row_width_mismatch_is_rejected() {
    let err = RowSetLoader::new(8)
        .load_str(r#"{"columns": [{"name": "x", "type": "bigint"}], "rows": [[1], [1, 2]]}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        RowSetError::RowWidth {
            row: 1,
            expected: 1,
            got: 2
        }
    ));
}

#[test]
fn unknown_type_is_rejected() {
    let err = RowSetLoader::new(8)
        .load_str(r#"{"columns": [{"name": "x", "type": "hyperloglog"}]}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        RowSetError::Type(TypeParseError::UnknownType(_))
    ));
}

#[test]
fn values_of_wrong_kind_are_rejected() {
    let err = RowSetLoader::new(8)
        .load_str(r#"{"columns": [{"name": "x", "type": "tinyint"}], "rows": [[1000]]}"#)
        .unwrap_err();
    match err {
        RowSetError::Conversion { value, value_type } => {
            assert_eq!(value, "1000");
            assert_eq!(value_type, "tinyint");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

fn single_value(value_type: &str, value: &str) -> Result<crate::engine::page::RowSet, RowSetError> {
    let input = format!(
        r#"{{"columns": [{{"name": "v", "type": "{value_type}"}}], "rows": [[{value}]]}}"#
    );
    RowSetLoader::new(8).load_str(&input)
}

#[test]
fn decimal_scale_beyond_28_keeps_every_digit() {
    let row_set = single_value("decimal(38,30)", r#""1.5""#).unwrap();
    let column = &row_set.columns[0];
    let block = row_set.pages[0].block(0).unwrap();

    assert_eq!(
        block.get_wide(0).unwrap(),
        1_500_000_000_000_000_000_000_000_000_000
    );
    let rendered = match column.value_type.object_value(block, 0).unwrap() {
        Value::Decimal(decimal) => decimal.to_string(),
        other => panic!("unexpected value {other:?}"),
    };
    assert_eq!(rendered, "1.500000000000000000000000000000");
}

#[test]
fn decimal_rounds_half_away_from_zero_at_scale() {
    let wide = |value: &str| {
        single_value("decimal(10,2)", value).unwrap().pages[0]
            .block(0)
            .unwrap()
            .get_wide(0)
            .unwrap()
    };
    assert_eq!(wide("1.234"), 123);
    assert_eq!(wide("1.235"), 124);
    assert_eq!(wide(r#""-1.235""#), -124);
    assert_eq!(wide("12"), 1200);
    assert_eq!(wide("1.5e2"), 15000);
}

#[test]
fn decimal_exceeding_precision_is_rejected() {
    let err = single_value("decimal(3,1)", r#""123.4""#).unwrap_err();
    assert!(matches!(err, RowSetError::Conversion { .. }));
    assert!(single_value("decimal(5,1)", r#""1.2.3""#).is_err());
}

#[test]
fn time_zone_offsets_out_of_range_are_rejected() {
    for offset in ["+600:00", "+14:30", "+05:60", "-99999:00", "+-5:00"] {
        let value = format!(r#""10:00:00{offset}""#);
        let err = single_value("time(3) with time zone", &value).unwrap_err();
        assert!(
            matches!(err, RowSetError::Conversion { .. }),
            "offset {offset}: {err:?}"
        );
    }
}

#[test]
fn time_zone_offset_limits_are_accepted() {
    for (offset, minutes) in [("+14:00", 840), ("-14:00", -840), ("+00:00", 0)] {
        let value = format!(r#""10:00:00{offset}""#);
        let row_set = single_value("time(3) with time zone", &value).unwrap();
        let (_, parsed) = row_set.pages[0]
            .block(0)
            .unwrap()
            .get_time_with_offset(0)
            .unwrap();
        assert_eq!(parsed, minutes);
    }
}
