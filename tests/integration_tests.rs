use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use typed_doc::{
    doc, from_str, to_string, Binary, Decimal, DocMap, DocumentWriter, Error, Interval, Operation,
    ScopeKind, Value, WriterOptions, MAX_NESTING,
};

fn byte_array(size: u8) -> Vec<u8> {
    (0..size).collect()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 10).unwrap()
}

fn time() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 15, 12).unwrap()
}

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 10, 15)
        .unwrap()
        .and_hms_opt(14, 20, 0)
        .unwrap()
}

fn write_all_types(writer: &mut DocumentWriter) -> typed_doc::Result<()> {
    writer
        .put("boolean", true)?
        .put("string", "santanu")?
        .put("bytefield", 16i8)?
        .put("short", 1000i16)?
        .put("integer", 32000)?
        .put("long", 123456789i64)?
        .put("float", 10.123f32)?
        .put("double", 10.12345678)?
        .put_decimal_f64("decimal1", 12345.6789)?
        .put_decimal("decimal2", 13456i64, 4)?
        .put_decimal_long("decimal3", 123456789)?
        .put_decimal_f64("decimal4", 9876.54321)?
        .put_decimal("decimal5", 32700, 5)?
        .put("binary1", byte_array(5))?
        .put_binary_window("binary2", &byte_array(20), 10, 5)?
        .put("binary3", Binary::new(byte_array(10)))?
        .put("date1", date())?
        .put("time1", time())?
        .put("timestamp1", timestamp())?
        .put("interval1", Interval::from_millis(10234567))?;

    writer
        .put_new_array("array1")?
        .add("santanu")?
        .add(10.123f32)?
        .add(127i8)?
        .add(1000i16)?
        .add(32000)?
        .add(false)?
        .add(123456789i64)?
        .add(32767)?
        .add_null()?
        .add(10.12345678)?
        .add(Decimal::from_f64(1234.567891)?)?
        .add(date())?
        .add(time())?
        .add(timestamp())?
        .add(Interval::from_millis(10234567))?
        .add(Binary::new(byte_array(15)))?
        .end_array()?;

    writer.build()?;
    Ok(())
}

#[test]
fn test_all_types() {
    let mut writer = DocumentWriter::new();
    write_all_types(&mut writer).unwrap();

    let expected = concat!(
        r#"{"boolean":true,"string":"santanu","bytefield":{"$numberByte":16},"#,
        r#""short":{"$numberShort":1000},"integer":{"$numberInt":32000},"long":123456789,"#,
        r#""float":{"$numberFloat":10.123},"double":10.12345678,"#,
        r#""decimal1":{"$decimal":"12345.6789"},"decimal2":{"$decimal":"1.3456"},"#,
        r#""decimal3":{"$decimal":"123456789"},"decimal4":{"$decimal":"9876.54321"},"#,
        r#""decimal5":{"$decimal":"0.32700"},"#,
        r#""binary1":{"$binary":"AAECAwQ="},"binary2":{"$binary":"CgsMDQ4="},"#,
        r#""binary3":{"$binary":"AAECAwQFBgcICQ=="},"#,
        r#""date1":{"$dateDay":"2010-01-10"},"time1":{"$time":"19:15:12"},"#,
        r#""timestamp1":{"$date":"2010-10-15T14:20:00"},"interval1":{"$interval":10234567},"#,
        r#""array1":["santanu",{"$numberFloat":10.123},{"$numberByte":127},"#,
        r#"{"$numberShort":1000},{"$numberInt":32000},false,123456789,{"$numberInt":32767},"#,
        r#"null,10.12345678,{"$decimal":"1234.567891"},{"$dateDay":"2010-01-10"},"#,
        r#"{"$time":"19:15:12"},{"$date":"2010-10-15T14:20:00"},{"$interval":10234567},"#,
        r#"{"$binary":"AAECAwQFBgcICQoLDA0O"}]}"#
    );
    assert_eq!(writer.as_utf8_string().unwrap(), expected);
}

#[test]
fn test_all_types_read_back() {
    let mut writer = DocumentWriter::new();
    write_all_types(&mut writer).unwrap();

    let text = writer.as_utf8_string().unwrap();
    let read = from_str(&text).unwrap();
    assert_eq!(&read, writer.document().unwrap());

    // Fields keep insertion order through the round trip
    let keys: Vec<_> = read.as_map().unwrap().keys().cloned().collect();
    assert_eq!(keys.first().map(String::as_str), Some("boolean"));
    assert_eq!(keys.last().map(String::as_str), Some("array1"));
}

#[test]
fn test_compact_output_is_valid_json() {
    let mut writer = DocumentWriter::new();
    write_all_types(&mut writer).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&writer.serialize().unwrap()).unwrap();
    assert_eq!(json["string"], "santanu");
    assert_eq!(json["long"], 123456789);
    assert_eq!(json["integer"]["$numberInt"], 32000);
    assert_eq!(json["array1"].as_array().map(Vec::len), Some(16));
}

#[test]
fn test_pretty_output_is_valid_json() {
    let mut writer = DocumentWriter::with_options(WriterOptions::pretty());
    write_all_types(&mut writer).unwrap();

    let text = writer.as_utf8_string().unwrap();
    assert!(text.starts_with("{\n  \"boolean\": true,\n"));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["decimal5"]["$decimal"], "0.32700");
    assert_eq!(&from_str(&text).unwrap(), writer.document().unwrap());
}

#[test]
fn test_decimal_range() {
    let mut writer = DocumentWriter::new();
    writer
        .put_decimal("d1", i32::MAX, 7)
        .unwrap()
        .put_decimal("d2", i32::MIN, 7)
        .unwrap()
        .put_decimal("d3", i64::MAX, 9)
        .unwrap()
        .put_decimal("d4", i64::MIN, 9)
        .unwrap()
        .put_decimal("d5", i32::MAX, 15)
        .unwrap()
        .put_decimal("d6", i32::MIN, 15)
        .unwrap()
        .put_decimal("d7", i64::MAX, 25)
        .unwrap()
        .put_decimal("d8", i64::MIN, 25)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        writer.as_utf8_string().unwrap(),
        concat!(
            r#"{"d1":{"$decimal":"214.7483647"},"d2":{"$decimal":"-214.7483648"},"#,
            r#""d3":{"$decimal":"9223372036.854775807"},"d4":{"$decimal":"-9223372036.854775808"},"#,
            r#""d5":{"$decimal":"0.000002147483647"},"d6":{"$decimal":"-0.000002147483648"},"#,
            r#""d7":{"$decimal":"0.0000009223372036854775807"},"#,
            r#""d8":{"$decimal":"-0.0000009223372036854775808"}}"#
        )
    );
}

#[test]
fn test_array_scenario() {
    let mut writer = DocumentWriter::new();
    writer
        .put("boolean", true)
        .unwrap()
        .put("string", "x")
        .unwrap()
        .put_new_array("arr")
        .unwrap()
        .add(1)
        .unwrap()
        .add(2)
        .unwrap()
        .end_array()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        writer.into_document().unwrap(),
        doc!({ "boolean": true, "string": "x", "arr": [1, 2] })
    );
}

#[test]
fn test_wrong_array_insertion() {
    let mut writer = DocumentWriter::new();
    writer.put("string", "santanu").unwrap();

    assert_eq!(
        writer.end_map().unwrap_err(),
        Error::illegal_context(Operation::EndMap, ScopeKind::TopLevelMap)
    );
    for value in [12345i64, 23456, 5555] {
        assert!(matches!(
            writer.add(value),
            Err(Error::IllegalContext { operation: Operation::Add, .. })
        ));
    }

    writer.build().unwrap();
    assert_eq!(writer.as_utf8_string().unwrap(), r#"{"string":"santanu"}"#);
}

#[test]
fn test_wrong_map_insertion() {
    let mut writer = DocumentWriter::new();
    writer.put_new_array("array").unwrap().add(1000i16).unwrap();

    assert_eq!(
        writer.put("string", "value").unwrap_err(),
        Error::illegal_context(Operation::Put, ScopeKind::Array)
    );
    assert!(writer.put_new_map("m").is_err());
    assert!(writer.end_map().is_err());
    assert_eq!(writer.current_scope(), ScopeKind::Array);
}

#[test]
fn test_deep_nesting() {
    let mut writer = DocumentWriter::new();
    writer
        .put_new_map("a")
        .unwrap()
        .put_new_array("b")
        .unwrap()
        .start_array()
        .unwrap()
        .start_map()
        .unwrap()
        .put("leaf", "x")
        .unwrap();
    assert_eq!(writer.depth(), 4);
    assert_eq!(writer.build().unwrap_err(), Error::UnterminatedScope { open: 4 });

    writer
        .end_map()
        .unwrap()
        .end_array()
        .unwrap()
        .end_array()
        .unwrap()
        .end_map()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        writer.as_utf8_string().unwrap(),
        r#"{"a":{"b":[[{"leaf":"x"}]]}}"#
    );
}

#[test]
fn test_empty_document_and_containers() {
    let mut writer = DocumentWriter::new();
    writer.build().unwrap();
    assert_eq!(writer.as_utf8_string().unwrap(), "{}");

    let mut writer = DocumentWriter::new();
    writer
        .put_new_map("m")
        .unwrap()
        .end_map()
        .unwrap()
        .put_new_array("a")
        .unwrap()
        .start_map()
        .unwrap()
        .end_map()
        .unwrap()
        .end_array()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(writer.as_utf8_string().unwrap(), r#"{"m":{},"a":[{}]}"#);
}

#[test]
fn test_reput_keeps_position() {
    let mut writer = DocumentWriter::new();
    writer
        .put("first", 1i64)
        .unwrap()
        .put("second", 2i64)
        .unwrap()
        .put("first", "replaced")
        .unwrap()
        .put_new_map("second")
        .unwrap()
        .put("x", true)
        .unwrap()
        .end_map()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        writer.as_utf8_string().unwrap(),
        r#"{"first":"replaced","second":{"x":true}}"#
    );
}

#[test]
fn test_binary_window_equals_copied_buffer() {
    let buffer = byte_array(20);

    let mut windowed = DocumentWriter::new();
    windowed
        .put_binary_window("b", &buffer, 10, 5)
        .unwrap()
        .put_new_array("list")
        .unwrap()
        .add_binary_window(&buffer, 0, 3)
        .unwrap()
        .end_array()
        .unwrap()
        .build()
        .unwrap();

    let mut copied = DocumentWriter::new();
    copied
        .put("b", buffer[10..15].to_vec())
        .unwrap()
        .put_new_array("list")
        .unwrap()
        .add(&buffer[..3])
        .unwrap()
        .end_array()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(windowed.serialize().unwrap(), copied.serialize().unwrap());
}

#[test]
fn test_binary_window_out_of_range() {
    let mut writer = DocumentWriter::new();
    assert_eq!(
        writer.put_binary_window("b", &[1, 2, 3], 2, 5).unwrap_err(),
        Error::InvalidWindow {
            offset: 2,
            len: 5,
            buffer_len: 3
        }
    );
    assert!(writer.put_binary_window("b", &[1, 2, 3], usize::MAX, 2).is_err());
    writer.build().unwrap();
    assert_eq!(writer.as_utf8_string().unwrap(), "{}");
}

#[test]
fn test_lifecycle_errors() {
    let mut writer = DocumentWriter::new();
    writer.put("a", 1).unwrap();
    assert_eq!(writer.as_utf8_string().unwrap_err(), Error::NotSealed);

    writer.build().unwrap();
    let before = writer.serialize().unwrap();
    writer.build().unwrap();
    assert_eq!(
        writer.put("b", 2).unwrap_err(),
        Error::illegal_context(Operation::Put, ScopeKind::Sealed)
    );
    assert_eq!(writer.serialize().unwrap(), before);
}

#[test]
fn test_fractional_time_values() {
    let time = NaiveTime::from_hms_milli_opt(8, 0, 1, 5).unwrap();
    let stamp = date().and_time(time);
    let value = doc!({ "t": time, "ts": stamp });

    let text = to_string(&value);
    assert_eq!(
        text,
        r#"{"t":{"$time":"08:00:01.005"},"ts":{"$date":"2010-01-10T08:00:01.005"}}"#
    );
    assert_eq!(from_str(&text).unwrap(), value);
}

#[test]
fn test_interval_days() {
    let interval = Interval::from_days(3).unwrap();
    let value = Value::from(interval);
    assert_eq!(to_string(&value), r#"{"$interval":259200000}"#);
    assert_eq!(from_str(&to_string(&value)).unwrap(), value);
}

#[test]
fn test_tag_lookalike_with_wrong_payload_stays_map() {
    let mut writer = DocumentWriter::new();
    writer
        .put_new_map("m")
        .unwrap()
        .put("$numberInt", "not a number")
        .unwrap()
        .end_map()
        .unwrap()
        .build()
        .unwrap();

    let text = writer.as_utf8_string().unwrap();
    assert_eq!(&from_str(&text).unwrap(), writer.document().unwrap());
}

#[test]
fn test_tag_named_fields_read_back_as_maps() {
    let mut writer = DocumentWriter::new();
    writer
        .put_new_map("m")
        .unwrap()
        .put("$numberLong", 5i64)
        .unwrap()
        .end_map()
        .unwrap()
        .put_new_map("n")
        .unwrap()
        .put("$date", "2010-10-15T14:20:00")
        .unwrap()
        .end_map()
        .unwrap()
        .put_new_array("list")
        .unwrap()
        .start_map()
        .unwrap()
        .put("$binary", Binary::new(vec![1, 2]))
        .unwrap()
        .end_map()
        .unwrap()
        .start_map()
        .unwrap()
        .put("$field", doc!(["x", 1]))
        .unwrap()
        .end_map()
        .unwrap()
        .end_array()
        .unwrap()
        .build()
        .unwrap();

    let text = writer.as_utf8_string().unwrap();
    assert_eq!(
        text,
        concat!(
            r#"{"m":{"$numberLong":5},"n":{"$field":["$date","2010-10-15T14:20:00"]},"#,
            r#""list":[{"$field":["$binary",{"$binary":"AQI="}]},"#,
            r#"{"$field":["$field",["x",{"$numberInt":1}]]}]}"#
        )
    );
    assert_eq!(&from_str(&text).unwrap(), writer.document().unwrap());
}

#[test]
fn test_deepest_document_reads_back() {
    let mut writer = DocumentWriter::new();
    for _ in 0..MAX_NESTING {
        writer.put_new_map("$field").unwrap();
    }
    writer.put("$numberInt", 3).unwrap();
    assert_eq!(
        writer.put_new_map("deeper").unwrap_err(),
        Error::NestingTooDeep { limit: MAX_NESTING }
    );
    assert_eq!(
        writer.put("deeper", DocMap::new()).unwrap_err(),
        Error::NestingTooDeep { limit: MAX_NESTING }
    );
    for _ in 0..MAX_NESTING {
        writer.end_map().unwrap();
    }
    writer.build().unwrap();

    let text = writer.as_utf8_string().unwrap();
    assert_eq!(&from_str(&text).unwrap(), writer.document().unwrap());
}

#[test]
fn test_untyped_numbers_are_plain_json() {
    let mut writer = DocumentWriter::with_options(WriterOptions::new().with_typed_numbers(false));
    writer
        .put("i", 5)
        .unwrap()
        .put("f", 0.5f32)
        .unwrap()
        .build()
        .unwrap();

    let text = writer.as_utf8_string().unwrap();
    assert_eq!(text, r#"{"i":5,"f":0.5}"#);
    assert_eq!(from_str(&text).unwrap(), doc!({ "i": 5i64, "f": 0.5 }));
}
