//! Shift-Coded Field Tests
//!
//! Tests for double-byte slots delimited by shift-out / shift-in markers.

use std::sync::Arc;

use formcodec::charset::{DoubleByteCharset, TableDoubleByteCharset, SHIFT_IN, SHIFT_OUT};
use formcodec::convert::{ConverterRegistry, DataType};
use formcodec::dbcs::ShiftCodeField;
use formcodec::schema::FieldDefinition;
use formcodec::value::Value;
use formcodec::CodecError;

const PAD: char = '\u{3000}';

fn test_charset() -> Arc<dyn DoubleByteCharset> {
    Arc::new(
        TableDoubleByteCharset::new("TEST-EBCDIC")
            .with_single('a', 0x81)
            .with_single(' ', 0x40)
            .with_double('あ', [0x44, 0x81])
            .with_double('い', [0x44, 0x83])
            .with_double('う', [0x44, 0x85])
            .with_double('え', [0x44, 0x87])
            .with_double('お', [0x44, 0x89])
            .with_double(PAD, [0x40, 0x40]),
    )
}

fn field(size: usize) -> ShiftCodeField {
    ShiftCodeField::new("name", size, test_charset(), PAD).unwrap()
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_padding_unit_excludes_shift_codes() {
    assert_eq!(field(12).padding_unit(), &[0x40, 0x40]);
    assert_eq!(field(12).declared_size(), 12);
}

#[test]
fn test_size_too_small() {
    let result = ShiftCodeField::new("name", 1, test_charset(), PAD);
    assert!(matches!(result, Err(CodecError::Layout(_))));
}

#[test]
fn test_size_not_divisible_by_padding_unit() {
    let result = ShiftCodeField::new("name", 11, test_charset(), PAD);
    assert!(matches!(result, Err(CodecError::Layout(_))));
}

#[test]
fn test_single_byte_padding_char_rejected() {
    let result = ShiftCodeField::new("name", 12, test_charset(), ' ');
    assert!(matches!(result, Err(CodecError::Layout(_))));
}

#[test]
fn test_unmappable_padding_char_rejected() {
    let result = ShiftCodeField::new("name", 12, test_charset(), '*');
    assert!(matches!(result, Err(CodecError::Layout(_))));
}

#[test]
fn test_minimal_slot() {
    let field = field(2);

    assert_eq!(field.encode(None).unwrap(), vec![SHIFT_OUT, SHIFT_IN]);
    assert_eq!(field.decode(&[SHIFT_OUT, SHIFT_IN]).unwrap(), "");
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_pads_before_shift_in() {
    let encoded = field(12).encode(Some("あいう")).unwrap();

    assert_eq!(
        encoded,
        vec![0x0E, 0x44, 0x81, 0x44, 0x83, 0x44, 0x85, 0x40, 0x40, 0x40, 0x40, 0x0F]
    );
}

#[test]
fn test_encode_is_deterministic() {
    let field = field(12);
    let first = field.encode(Some("あいう")).unwrap();
    let second = field.encode(Some("あいう")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 12);
}

#[test]
fn test_encode_exact_fit() {
    let encoded = field(12).encode(Some("あいうえお")).unwrap();

    assert_eq!(encoded.len(), 12);
    assert_eq!(encoded[0], SHIFT_OUT);
    assert_eq!(encoded[11], SHIFT_IN);
    assert_eq!(&encoded[9..11], &[0x44, 0x89]);
}

#[test]
fn test_encode_null_and_empty_are_all_padding() {
    let field = field(12);
    let expected = vec![0x0E, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x0F];

    assert_eq!(field.encode(None).unwrap(), expected);
    assert_eq!(field.encode(Some("")).unwrap(), expected);
}

#[test]
fn test_encode_without_leading_shift_out() {
    match field(12).encode(Some("aあ")) {
        Err(e @ CodecError::MissingShiftOutCode(_)) => {
            assert!(e.to_string().starts_with("cannot find shift out code"));
        }
        other => panic!("Expected MissingShiftOutCode, got {:?}", other),
    }
}

#[test]
fn test_encode_with_second_shift_out() {
    match field(12).encode(Some("あaい")) {
        Err(e @ CodecError::TooManyShiftOutCode(_)) => {
            assert!(e.to_string().starts_with("too many shift out code"));
        }
        other => panic!("Expected TooManyShiftOutCode, got {:?}", other),
    }
}

#[test]
fn test_encode_without_trailing_shift_in() {
    let result = field(12).encode(Some("あa"));
    assert!(matches!(result, Err(CodecError::FieldFormat { field, .. }) if field == "name"));
}

#[test]
fn test_encode_too_large() {
    match field(10).encode(Some("あいうえお")) {
        Err(CodecError::FieldTooLarge { field, declared, actual }) => {
            assert_eq!(field, "name");
            assert_eq!(declared, 10);
            assert_eq!(actual, 12);
        }
        other => panic!("Expected FieldTooLarge, got {:?}", other),
    }
}

#[test]
fn test_encode_unmappable_character() {
    let result = field(12).encode(Some("漢"));
    assert!(matches!(result, Err(CodecError::FieldFormat { .. })));
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_trims_padding() {
    let slot = [0x0E, 0x44, 0x81, 0x44, 0x83, 0x44, 0x85, 0x40, 0x40, 0x40, 0x40, 0x0F];
    assert_eq!(field(12).decode(&slot).unwrap(), "あいう");
}

#[test]
fn test_decode_keeps_inner_padding_chars() {
    let slot = [0x0E, 0x44, 0x81, 0x40, 0x40, 0x44, 0x83, 0x40, 0x40, 0x40, 0x40, 0x0F];
    assert_eq!(field(12).decode(&slot).unwrap(), "あ\u{3000}い");
}

#[test]
fn test_decode_trims_trailing_padding_chars_of_value() {
    let field = field(12);
    let encoded = field.encode(Some("あ\u{3000}")).unwrap();

    assert_eq!(
        encoded,
        vec![0x0E, 0x44, 0x81, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x0F]
    );
    // indistinguishable from padding once written
    assert_eq!(encoded, field.encode(Some("あ")).unwrap());
    assert_eq!(field.decode(&encoded).unwrap(), "あ");
}

#[test]
fn test_decode_wrong_slot_length() {
    match field(12).decode(&[0x0E, 0x44, 0x81, 0x0F]) {
        Err(CodecError::SlotLength { expected, actual, .. }) => {
            assert_eq!(expected, 12);
            assert_eq!(actual, 4);
        }
        other => panic!("Expected SlotLength, got {:?}", other),
    }
}

#[test]
fn test_decode_undefined_code() {
    let slot = [0x0E, 0x99, 0x99, 0x0F];
    let result = field(4).decode(&slot);
    assert!(matches!(result, Err(CodecError::FieldFormat { .. })));
}

#[test]
fn test_encode_decode_inverse() {
    let field = field(12);
    for text in ["", "あ", "あいう", "おえういあ"] {
        let encoded = field.encode(Some(text)).unwrap();
        assert_eq!(field.decode(&encoded).unwrap(), text);
    }
}

// =============================================================================
// Field Pipeline Tests
// =============================================================================

#[test]
fn test_registry_resolves_esn() {
    let registry = ConverterRegistry::builder()
        .double_byte_charset(test_charset())
        .build();
    let data_type = registry.data_type("esn", Some(12), "name", PAD).unwrap();

    assert!(matches!(data_type, DataType::DoubleByte(_)));
    assert_eq!(data_type.declared_size(), Some(12));
}

#[test]
fn test_registry_esn_requires_charset_and_size() {
    let registry = ConverterRegistry::default();
    assert!(matches!(
        registry.data_type("ESN", Some(12), "name", PAD),
        Err(CodecError::Config(_))
    ));

    let registry = ConverterRegistry::builder()
        .double_byte_charset(test_charset())
        .build();
    assert!(matches!(
        registry.data_type("ESN", None, "name", PAD),
        Err(CodecError::Layout(_))
    ));
}

#[test]
fn test_field_slot_pipeline() {
    let definition = FieldDefinition::builder("name")
        .data_type(DataType::DoubleByte(field(8)))
        .build()
        .unwrap();

    let slot = definition.encode_slot(Value::from("あい")).unwrap();
    assert_eq!(slot, vec![0x0E, 0x44, 0x81, 0x44, 0x83, 0x40, 0x40, 0x0F]);
    assert_eq!(definition.decode_slot(&slot).unwrap(), Value::from("あい"));
    assert_eq!(definition.declared_size(), Some(8));
}

#[test]
fn test_field_text_pipeline_rejects_byte_type() {
    let definition = FieldDefinition::builder("name")
        .data_type(DataType::DoubleByte(field(8)))
        .build()
        .unwrap();

    assert!(matches!(
        definition.encode_text(Value::from("あ")),
        Err(CodecError::Layout(_))
    ));
    assert!(matches!(definition.decode_text(Some("x")), Err(CodecError::Layout(_))));
}
