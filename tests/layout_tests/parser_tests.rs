//! Layout Tests
//!
//! Tests for layout parsing and layout-driven readers/writers.

use std::io::{Cursor, Write};
use std::sync::Arc;

use formcodec::charset::{DoubleByteCharset, TableDoubleByteCharset};
use formcodec::convert::{ReplacementTable, ValueConverter};
use formcodec::value::{Decimal, Record, Value};
use formcodec::{CodecConfig, CodecError, ConverterRegistry, FileType, LayoutDefinition};
use tempfile::NamedTempFile;

const FORM_LAYOUT: &str = r#"
# member registration form
file-type:     "FormUrlEncoded"
text-encoding: "UTF-8"

[data]
1  name       X
2  ?nickname  X
3  tags       [1..3] X
4  ?notes     [*] X
5  count      X  number
6  amount     X  signed_number
7  status     X  "active"
8  level      X  5
9  kana       X  replacement("zenkaku")   # half-width to full-width
"#;

const FIXED_LAYOUT: &str = r#"
file-type:     "Fixed"
record-length: 20

[fixed]
1   kanji  ESN(12)
13  kana   EN(8)
"#;

fn registry() -> ConverterRegistry {
    ConverterRegistry::builder()
        .replacement_table(ReplacementTable::new("zenkaku").with('ｱ', 'ア'))
        .double_byte_charset(test_charset())
        .build()
}

fn test_charset() -> Arc<dyn DoubleByteCharset> {
    Arc::new(
        TableDoubleByteCharset::new("TEST-EBCDIC")
            .with_double('あ', [0x44, 0x81])
            .with_double('い', [0x44, 0x83])
            .with_double('\u{3000}', [0x40, 0x40]),
    )
}

fn parse(text: &str) -> formcodec::Result<LayoutDefinition> {
    LayoutDefinition::parse(text, &registry(), &CodecConfig::default())
}

fn layout_error(text: &str) -> String {
    match parse(text) {
        Err(CodecError::Layout(msg)) => msg,
        other => panic!("Expected layout error, got {:?}", other.map(|l| l.record().name().to_string())),
    }
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_form_layout() {
    let layout = parse(FORM_LAYOUT).unwrap();

    assert_eq!(layout.file_type(), FileType::FormUrlEncoded);
    assert_eq!(layout.text_encoding(), "UTF-8");
    assert_eq!(layout.directive("file-type"), Some("FormUrlEncoded"));

    let record = layout.record();
    assert_eq!(record.name(), "data");
    assert_eq!(record.len(), 9);

    let name = record.field("name").unwrap();
    assert_eq!(name.position(), 1);
    assert!(name.is_required());
    assert!(!name.is_array());

    assert!(!record.field("nickname").unwrap().is_required());

    let tags = record.field("tags").unwrap();
    assert!(tags.is_array());
    assert!(tags.is_required());
    assert_eq!(tags.min_array_size(), 1);
    assert_eq!(tags.max_array_size(), 3);

    let notes = record.field("notes").unwrap();
    assert!(notes.is_array());
    assert!(!notes.is_required());
    assert_eq!(notes.max_array_size(), usize::MAX);

    assert_eq!(record.field("count").unwrap().converters()[0].name(), "number");
    assert_eq!(record.field("status").unwrap().converters()[0].name(), "_LITERAL_");
    assert_eq!(record.field("kana").unwrap().converters()[0].name(), "replacement");
}

#[test]
fn test_zero_min_bounds_make_field_optional() {
    let layout = parse(
        r#"
        file-type: "FormUrlEncoded"
        [data]
        1 key1 [0..1] X "defval"
        2 key2 [2] X
        3 key3 [1..*] X
        "#,
    )
    .unwrap();
    let record = layout.record();

    assert!(!record.field("key1").unwrap().is_required());
    assert_eq!(record.field("key2").unwrap().min_array_size(), 2);
    assert_eq!(record.field("key2").unwrap().max_array_size(), 2);
    assert_eq!(record.field("key3").unwrap().max_array_size(), usize::MAX);
}

#[test]
fn test_text_encoding_defaults_from_config() {
    let layout = parse("file-type: \"FormUrlEncoded\"\n[data]\n1 key1 X\n").unwrap();
    assert_eq!(layout.text_encoding(), "UTF-8");
    assert_eq!(layout.charset().unwrap().name(), "UTF-8");
}

#[test]
fn test_missing_file_type() {
    let msg = layout_error("text-encoding: \"UTF-8\"\n[data]\n1 key1 X\n");
    assert!(msg.contains("file-type"));
}

#[test]
fn test_unsupported_file_type() {
    let msg = layout_error("file-type: \"Variable\"\n[data]\n1 key1 X\n");
    assert!(msg.contains("Variable"));
}

#[test]
fn test_unsupported_text_encoding() {
    let result = parse("file-type: \"FormUrlEncoded\"\ntext-encoding: \"Shift_JIS\"\n[data]\n1 key1 X\n");
    assert!(matches!(result, Err(CodecError::Config(_))));
}

#[test]
fn test_no_record_section() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n");
    assert!(msg.contains("no record section"));
}

#[test]
fn test_multiple_record_sections() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n[a]\n1 key1 X\n[b]\n1 key2 X\n");
    assert!(msg.starts_with("line 4:"));
}

#[test]
fn test_unknown_data_type_reports_line() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n[data]\n1 key1 X\n2 key2 ZZ\n");
    assert!(msg.starts_with("line 4:"), "{}", msg);
    assert!(msg.contains("ZZ"));
}

#[test]
fn test_unknown_converter() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n[data]\n1 key1 X frobnicate\n");
    assert!(msg.contains("frobnicate"));
}

#[test]
fn test_duplicate_field_name() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n[data]\n1 key1 X\n2 key1 X\n");
    assert!(msg.contains("duplicate"));
}

#[test]
fn test_malformed_lines() {
    let cases = [
        "file-type: \"FormUrlEncoded\"\n[data]\nkey1 X\n",
        "file-type: \"FormUrlEncoded\"\n[data]\n1 key1\n",
        "file-type: \"FormUrlEncoded\"\n[data]\n1 key1 [3..1] X\n",
        "file-type: \"FormUrlEncoded\"\n[data]\n1 key1 [a] X\n",
        "file-type: \"FormUrlEncoded\"\n[data]\n1 key1 X \"open\n",
        "file-type \"FormUrlEncoded\"\n[data]\n1 key1 X\n",
    ];
    for text in cases {
        assert!(matches!(parse(text), Err(CodecError::Layout(_))), "accepted {:?}", text);
    }
}

#[test]
fn test_byte_type_rejected_in_form_layout() {
    let msg = layout_error("file-type: \"FormUrlEncoded\"\n[data]\n1 kanji ESN(12)\n");
    assert!(msg.contains("kanji"));
}

// =============================================================================
// Fixed Layout Tests
// =============================================================================

#[test]
fn test_parse_fixed_layout() {
    let layout = parse(FIXED_LAYOUT).unwrap();

    assert_eq!(layout.file_type(), FileType::Fixed);
    assert_eq!(layout.directive("record-length"), Some("20"));

    let kanji = layout.record().field("kanji").unwrap();
    assert_eq!(kanji.declared_size(), Some(12));
    let kana = layout.record().field("kana").unwrap();
    assert_eq!(kana.declared_size(), Some(8));

    let slot = kana.encode_slot(Value::from("あい")).unwrap();
    assert_eq!(slot, vec![0x44, 0x81, 0x44, 0x83, 0x40, 0x40, 0x40, 0x40]);
    assert_eq!(kana.decode_slot(&slot).unwrap(), Value::from("あい"));
}

#[test]
fn test_fixed_layout_record_length_exceeded() {
    let text = FIXED_LAYOUT.replace("record-length: 20", "record-length: 19");
    let msg = layout_error(&text);
    assert!(msg.contains("kana"));
}

#[test]
fn test_fixed_layout_odd_double_byte_width() {
    let msg = layout_error("file-type: \"Fixed\"\n[fixed]\n1 kanji ESN(11)\n");
    assert!(msg.contains("kanji"));
}

#[test]
fn test_fixed_layout_has_no_keyed_reader() {
    let layout = parse(FIXED_LAYOUT).unwrap();

    assert!(matches!(layout.charset(), Err(CodecError::Config(_))));
    assert!(matches!(
        layout.reader(Cursor::new(Vec::new()), &CodecConfig::default()),
        Err(CodecError::Config(_))
    ));
}

// =============================================================================
// Layout-Driven Reading/Writing
// =============================================================================

#[test]
fn test_layout_writer_applies_converters() {
    let layout = parse(FORM_LAYOUT).unwrap();
    let record = Record::new()
        .with("name", "Taro")
        .with_array("tags", ["a", "b"])
        .with("count", "10")
        .with("amount", "-1")
        .with("kana", "x");

    let mut writer = layout.writer(Vec::new()).unwrap();
    writer.write_record(&record).unwrap();
    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    assert_eq!(
        output,
        "name=Taro&tags=a&tags=b&count=10&amount=-1&status=active&level=5&kana=x"
    );
}

#[test]
fn test_layout_reader_applies_converters() {
    let layout = parse(FORM_LAYOUT).unwrap();
    let input = "name=Taro&tags=a&count=010&amount=-1&status=active&level=5&kana=%EF%BD%B1\n";

    let mut reader = layout
        .reader(Cursor::new(input.as_bytes().to_vec()), &CodecConfig::default())
        .unwrap();
    let record = reader.read_record().unwrap().unwrap();

    assert_eq!(record.scalar("name"), Some(&Value::from("Taro")));
    assert_eq!(record.scalar("nickname"), Some(&Value::Null));
    assert_eq!(record.array("tags"), Some(&[Some("a".to_string())][..]));
    assert_eq!(record.array("notes"), Some(&[None][..]));
    assert_eq!(
        record.scalar("count"),
        Some(&Value::Number(Decimal::parse("10", false).unwrap()))
    );
    assert_eq!(record.scalar("kana"), Some(&Value::from("ア")));
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_record_json_roundtrip_through_layout() {
    let layout = parse(FORM_LAYOUT).unwrap();
    let json = r#"{"name": "Taro", "tags": ["a", "b"], "count": "3", "amount": "2", "kana": "y", "nickname": null}"#;

    let record: Record = serde_json::from_str(json).unwrap();
    let mut writer = layout.writer(Vec::new()).unwrap();
    writer.write_record(&record).unwrap();
    let bytes = writer.into_inner().unwrap();

    let mut reader = layout.reader(Cursor::new(bytes), &CodecConfig::default()).unwrap();
    let decoded = reader.read_record().unwrap().unwrap();
    let value = serde_json::to_value(&decoded).unwrap();

    assert_eq!(value["name"], "Taro");
    assert_eq!(value["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(value["count"], "3");
    assert_eq!(value["status"], "active");
    assert_eq!(value["nickname"], serde_json::Value::Null);
}

#[test]
fn test_layout_from_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FORM_LAYOUT.as_bytes()).unwrap();
    file.flush().unwrap();

    let layout = LayoutDefinition::from_path(file.path(), &registry(), &CodecConfig::default()).unwrap();
    assert_eq!(layout.record().len(), 9);
}

#[test]
fn test_layout_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let result = LayoutDefinition::from_path(
        &dir.path().join("missing.fmt"),
        &registry(),
        &CodecConfig::default(),
    );

    assert!(matches!(result, Err(CodecError::Io(_))));
}
