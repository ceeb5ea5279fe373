use std::collections::HashMap;
use std::num::NonZeroU32;

use expect_test::expect;
use serde::Deserialize;

use super::*;
use crate::lexer::{Position, TokenKind};
use crate::parser::parse;

fn decode<T: for<'de> Deserialize<'de>>(source: &str) -> Result<T, DecodeError> {
    let root = parse(source).unwrap();
    from_list(&root)
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Outer {
    int_a: i32,
    struct_a: Inner,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Inner {
    int_b: i32,
    int_c: i32,
    arr_a: Vec<i32>,
}

#[test]
fn decode_nested_record() {
    let value: Outer = decode("(a (IntA 1) (StructA (IntB 2) (IntC 3)))").unwrap();
    assert_eq!(
        value,
        Outer {
            int_a: 1,
            struct_a: Inner {
                int_b: 2,
                int_c: 3,
                arr_a: vec![],
            },
        }
    );
}

#[test]
fn decode_nested_record_with_sequence() {
    let value: Outer =
        decode("(a (IntA 1) (StructA (IntB 2) (IntC 3) (ArrA 1 2 3 4 5 6)))").unwrap();
    assert_eq!(value.struct_a.arr_a, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn decode_sequence_preserves_order() {
    #[derive(Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Arrays {
        arr_a: Vec<i64>,
    }

    let value: Arrays = decode("(a (ArrA 3 1 2))").unwrap();
    assert_eq!(value.arr_a, vec![3, 1, 2]);
}

#[test]
fn decode_integers_in_their_scanned_base() {
    #[derive(Deserialize)]
    struct Numbers {
        hex: u32,
        bin: i64,
        oct: u8,
        dec: i16,
        neg_hex: i32,
        wide: u128,
    }

    let value: Numbers = decode(
        "(n (hex 0x1F) (bin 0b101) (oct 0o17) (dec 42) (neg_hex -0xff) \
         (wide 0xFFFFFFFFFFFFFFFFFFFF))",
    )
    .unwrap();
    assert_eq!(value.hex, 31);
    assert_eq!(value.bin, 5);
    assert_eq!(value.oct, 15);
    assert_eq!(value.dec, 42);
    assert_eq!(value.neg_hex, -255);
    assert_eq!(value.wide, 0xFFFF_FFFF_FFFF_FFFF_FFFF);
}

#[test]
fn absent_fields_take_zero_values() {
    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Everything {
        int: i32,
        unsigned: u64,
        ratio: f64,
        flag: bool,
        letter: char,
        text: String,
        list: Vec<bool>,
        pair: (i32, String),
        maybe: Option<i32>,
        table: HashMap<String, i32>,
        nested: Outer,
    }

    let value: Everything = decode("(empty)").unwrap();
    assert_eq!(value, Everything::default());
}

#[test]
fn decode_string_escapes() {
    #[derive(Deserialize)]
    struct Text {
        text: String,
    }

    let value: Text = decode(r#"(a (text "a\nb\tc"))"#).unwrap();
    assert_eq!(value.text, "a\nb\tc");
    assert_eq!(value.text.len(), 5);
}

#[test]
fn decode_borrows_strings_from_the_tree() {
    #[derive(Deserialize)]
    struct Named<'a> {
        name: &'a str,
    }

    let root = parse(r#"(user (name "ada"))"#).unwrap();
    let value: Named = from_list(&root).unwrap();
    assert_eq!(value.name, "ada");
}

#[test]
fn string_targets_take_literal_text_verbatim() {
    #[derive(Deserialize)]
    struct Text {
        text: String,
    }

    let value: Text = decode("(a (text 0x1F))").unwrap();
    assert_eq!(value.text, "1F");
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(dead_code)]
struct IntOnly {
    int_a: i32,
}

#[test]
fn string_literal_into_int_is_numeric_format_error() {
    let err = decode::<IntOnly>(r#"(a (IntA "x"))"#).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::NumericFormat { ref text, target: "i32", .. } if text == "x"
    ));
    expect![[r#"invalid i32 literal 'x'"#]].assert_eq(&err.to_string());
}

#[test]
fn scalar_from_list_needs_exactly_one_element() {
    for (source, found) in [
        ("(a (IntA))", 0),
        ("(a (IntA 1 2))", 2),
        ("(a (IntA 1 2 3))", 3),
    ] {
        let err = decode::<IntOnly>(source).unwrap_err();
        assert!(
            matches!(
                err,
                DecodeError::ListLengthMismatch { expected: 1, found: f, .. } if f == found
            ),
            "{source}: {err:?}"
        );
    }
}

#[test]
fn out_of_range_integers() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Small {
        byte: u8,
        signed: i8,
    }

    let err = decode::<Small>("(a (byte 300))").unwrap_err();
    assert!(matches!(err, DecodeError::NumericRange { target: "u8", .. }));

    let err = decode::<Small>("(a (byte -1))").unwrap_err();
    assert!(matches!(err, DecodeError::NumericRange { target: "u8", .. }));

    let err = decode::<Small>("(a (signed 0xFF))").unwrap_err();
    assert!(matches!(err, DecodeError::NumericRange { target: "i8", .. }));

    let value = decode::<Small>("(a (signed -128) (byte 0b11111111))").unwrap();
    assert_eq!((value.byte, value.signed), (255, -128));
}

#[test]
fn decode_floats() {
    #[derive(Debug, Deserialize)]
    struct Floats {
        ratio: f64,
        whole: f32,
        tiny: f64,
    }

    let value: Floats = decode("(a (ratio 1.5) (whole 3) (tiny -2.5e-3))").unwrap();
    assert_eq!(value.ratio, 1.5);
    assert_eq!(value.whole, 3.0);
    assert_eq!(value.tiny, -0.0025);

    let err = decode::<Floats>("(a (ratio 0x10))").unwrap_err();
    assert!(matches!(err, DecodeError::NumericFormat { target: "f64", .. }));
}

#[test]
fn numeric_text_must_be_plain_digits() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Numbers {
        int: i32,
        count: u32,
        ratio: f64,
    }

    let err = decode::<Numbers>(r#"(a (int "+5"))"#).unwrap_err();
    assert!(matches!(err, DecodeError::NumericFormat { target: "i32", .. }));

    let err = decode::<Numbers>(r#"(a (count "+5"))"#).unwrap_err();
    assert!(matches!(err, DecodeError::NumericFormat { target: "u32", .. }));

    for text in ["inf", "NaN", "infinity", "+1.5", "1.", ".5", "1e", "1.5x"] {
        let source = format!(r#"(a (ratio "{text}"))"#);
        let err = decode::<Numbers>(&source).unwrap_err();
        assert!(
            matches!(err, DecodeError::NumericFormat { target: "f64", .. }),
            "{text}: {err:?}"
        );
    }

    let value = decode::<Numbers>(r#"(a (int "-5") (ratio "2.5E+2"))"#).unwrap();
    assert_eq!((value.int, value.ratio), (-5, 250.0));
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Flags {
    on: bool,
    off: bool,
}

#[test]
fn decode_booleans() {
    let value: Flags = decode(r#"(a (on true) (off "false"))"#).unwrap();
    assert!(value.on);
    assert!(!value.off);

    let err = decode::<Flags>("(a (on yes))").unwrap_err();
    expect![[r#"type mismatch, want bool but have identifier"#]].assert_eq(&err.to_string());

    let err = decode::<Flags>("(a (on 1))").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeMismatch {
            want: "bool",
            have: NodeKind::Literal(TokenKind::Int(_)),
            ..
        }
    ));
}

#[test]
fn identifier_is_not_a_numeric_literal() {
    let err = decode::<IntOnly>("(a (IntA one))").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeMismatch {
            want: "i32",
            have: NodeKind::Identifier,
            ..
        }
    ));
}

#[test]
fn records_and_sequences_need_lists() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Items {
        items: Vec<Inner>,
        matrix: Vec<Vec<i32>>,
    }

    let err = decode::<Items>("(a (items 1 2))").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeMismatch { want: "record", .. }
    ));

    let err = decode::<Items>("(a (matrix (row 1 2) 3))").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TypeMismatch { want: "sequence", .. }
    ));

    let value = decode::<Items>("(a (matrix (row 1 2) (row 3 4)))").unwrap();
    assert_eq!(value.matrix, vec![vec![1, 2], vec![3, 4]]);
}

#[test]
fn decode_sequence_of_records() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Server {
        host: String,
        port: u16,
    }

    #[derive(Deserialize)]
    struct Cluster {
        servers: Vec<Server>,
    }

    let value: Cluster = decode(
        r#"(cluster
             (servers
               (server (host "a") (port 8080))
               (server (host "b"))))"#,
    )
    .unwrap();
    assert_eq!(
        value.servers,
        vec![
            Server {
                host: "a".to_string(),
                port: 8080
            },
            Server {
                host: "b".to_string(),
                port: 0
            },
        ]
    );
}

#[test]
fn unsupported_types_fail() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    enum Mode {
        Fast,
        Slow,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct WithEnum {
        mode: Mode,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct WithMap {
        table: HashMap<String, i32>,
    }

    let err = decode::<WithEnum>("(a (mode Fast))").unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedType { ref name, .. } if name == "Mode"));

    let err = decode::<WithMap>("(a (table (k 1)))").unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedType { ref name, .. } if name == "map"));

    let err = decode::<WithEnum>("(a)").unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedType { ref name, .. } if name == "Mode"));
}

#[derive(Debug, Deserialize)]
struct Single {
    x: i32,
}

#[test]
fn absent_fields_ignore_serde_defaults() {
    fn default_port() -> u16 {
        8080
    }

    #[derive(Debug, Deserialize)]
    struct Listener {
        #[serde(default = "default_port")]
        port: u16,
    }

    let value: Listener = decode("(listener)").unwrap();
    assert_eq!(value.port, 0);
}

#[test]
fn last_duplicate_field_wins_by_default() {
    let value: Single = decode("(a (x 1) (x 2))").unwrap();
    assert_eq!(value.x, 2);
}

#[test]
fn duplicate_fields_can_be_rejected() {
    let root = parse("(a (x 1) (x 2))").unwrap();
    let options = DecodeOptions::new().reject_duplicate_fields();
    let err = from_list_with::<Single>(&root, &options).unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateField { ref name, .. } if name == "x"));
    assert_eq!(err.span().map(|span| span.from), Some(Position::new(10, 0, 10)));
}

#[test]
fn non_list_elements_are_not_fields() {
    let value: Single = decode(r#"(a stray "loose" 5 (x 7))"#).unwrap();
    assert_eq!(value.x, 7);
}

#[test]
fn decode_options_and_newtypes() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Port(u16);

    #[derive(Debug, Deserialize)]
    struct Limits {
        limit: Option<u32>,
        cap: Option<u32>,
        port: Port,
    }

    let value: Limits = decode("(a (limit 5) (port 443))").unwrap();
    assert_eq!(value.limit, Some(5));
    assert_eq!(value.cap, None);
    assert_eq!(value.port, Port(443));
}

#[test]
fn decode_chars_and_tuples() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Mixed {
        sep: char,
        pair: (i32, String),
    }

    let value: Mixed = decode(r#"(a (sep ',') (pair 1 "x"))"#).unwrap();
    assert_eq!(value.sep, ',');
    assert_eq!(value.pair, (1, "x".to_string()));

    let err = decode::<Mixed>(r#"(a (sep "ab"))"#).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { want: "char", .. }));

    let err = decode::<Mixed>("(a (pair 1))").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::ListLengthMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn decode_from_inner_node() {
    let root = parse("(a (weights 1 2 3) 9)").unwrap();
    let weights: Vec<u8> = from_node(&root.elements[0]).unwrap();
    assert_eq!(weights, vec![1, 2, 3]);

    let bare: u8 = from_node(&root.elements[1]).unwrap();
    assert_eq!(bare, 9);
}

#[test]
fn visitor_errors_carry_the_node_span() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Workers {
        count: NonZeroU32,
    }

    let err = decode::<Workers>("(a (count 0))").unwrap_err();
    assert!(matches!(err, DecodeError::Custom { .. }));
    assert_eq!(err.span().map(|span| span.range()), Some(10..11));
}

#[test]
fn first_failing_field_aborts_the_record() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Two {
        x: i32,
        y: i32,
    }

    let err = decode::<Two>(r#"(a (y "bad") (x "worse"))"#).unwrap_err();
    assert!(matches!(err, DecodeError::NumericFormat { ref text, .. } if text == "worse"));
}

#[test]
fn decoding_is_repeatable() {
    let root = parse("(a (IntA 1) (StructA (IntB 2) (ArrA 4 5)))").unwrap();
    let first: Outer = from_list(&root).unwrap();
    let second: Outer = from_list(&root).unwrap();
    assert_eq!(first, second);
}
