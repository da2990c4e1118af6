// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::pattern_type_mismatch,
    clippy::float_cmp
)] // loading tests panic/unwrap to assert specific shapes

use crate::object::PropertyKey;
use crate::schema::*;
use crate::value::Value;

use num_bigint::BigInt;
use serde_json::json;

#[test]
fn test_load_string() {
    let matcher = Matcher::from_serde_json_value(json!({
        "type": "string",
        "minLength": 1,
        "maxLength": 8,
        "pattern": "^[a-z]+$"
    }))
    .unwrap();

    match matcher.kind() {
        Kind::String(m) => {
            assert_eq!(m.min_length, Some(1));
            assert_eq!(m.max_length, Some(8));
            assert_eq!(m.pattern.as_ref().map(Pattern::as_str), Some("^[a-z]+$"));
        }
        k => panic!("Expected Kind::String, got {k:?}"),
    }
    assert!(matcher.special().is_none());
    assert!(matcher.is_match(&Value::from("scout")));
    assert!(!matcher.is_match(&Value::from("Scout")));
}

#[test]
fn test_load_number() {
    let matcher = Matcher::from_json_str(
        r#"{ "type": "number", "min": 0, "max": 10.5, "maxPrecision": 2, "maxDecimal": 0.5 }"#,
    )
    .unwrap();

    match matcher.kind() {
        Kind::Number(m) => {
            assert_eq!(m.min, Some(0.0));
            assert_eq!(m.max, Some(10.5));
            assert_eq!(m.max_precision, Some(2));
            assert_eq!(m.max_decimal, Some(0.5));
        }
        k => panic!("Expected Kind::Number, got {k:?}"),
    }
}

#[test]
fn test_load_bigint_bounds() {
    let matcher = Matcher::from_serde_json_value(json!({
        "type": "bigint",
        "min": -5,
        "max": "123456789012345678901234567890"
    }))
    .unwrap();

    match matcher.kind() {
        Kind::BigInt(m) => {
            assert_eq!(m.min, Some(BigInt::from(-5)));
            assert_eq!(
                m.max,
                Some("123456789012345678901234567890".parse::<BigInt>().unwrap())
            );
        }
        k => panic!("Expected Kind::BigInt, got {k:?}"),
    }

    let unbounded = Matcher::from_json_str(r#"{ "type": "bigint" }"#).unwrap();
    match unbounded.kind() {
        Kind::BigInt(m) => assert!(m.min.is_none() && m.max.is_none()),
        k => panic!("Expected Kind::BigInt, got {k:?}"),
    }

    assert!(Matcher::from_json_str(r#"{ "type": "bigint", "min": 1.5 }"#).is_err());
    assert!(Matcher::from_json_str(r#"{ "type": "bigint", "min": "ten" }"#).is_err());
}

#[test]
fn test_load_unit_kinds() {
    let boolean = Matcher::from_json_str(r#"{ "type": "boolean" }"#).unwrap();
    assert!(matches!(boolean.kind(), Kind::Boolean(_)));

    let undefined = Matcher::from_json_str(r#"{ "type": "undefined" }"#).unwrap();
    assert!(matches!(undefined.kind(), Kind::Undefined(_)));
    assert!(undefined.is_match(&Value::Undefined));
    assert!(!undefined.is_match(&Value::Null));
}

#[test]
fn test_load_enum_and_value() {
    let matcher = Matcher::from_serde_json_value(json!({
        "type": "enum",
        "values": ["red", 1, true, null]
    }))
    .unwrap();

    match matcher.kind() {
        Kind::Enum(m) => {
            assert_eq!(m.values.len(), 4);
            assert!(matches!(&m.values[0], Literal::String(s) if &**s == "red"));
            assert!(matches!(m.values[1], Literal::Number(n) if n == 1.0));
            assert!(matches!(m.values[2], Literal::Bool(true)));
            assert!(matches!(m.values[3], Literal::Null));
        }
        k => panic!("Expected Kind::Enum, got {k:?}"),
    }
    assert!(matcher.is_match(&Value::Null));
    assert!(!matcher.is_match(&Value::Undefined));

    let matcher = Matcher::from_json_str(r#"{ "type": "value", "value": "on" }"#).unwrap();
    assert!(matcher.is_match(&Value::from("on")));
    assert!(!matcher.is_match(&Value::from("off")));
}

#[test]
fn test_load_object() {
    let matcher = Matcher::from_serde_json_value(json!({
        "type": "object",
        "nullable": true,
        "properties": {
            "id": { "type": "number" },
            "name": { "type": "string" }
        },
        "optionalProperties": {
            "tags": { "type": "array", "items": { "type": "string" } }
        },
        "patternProperties": [
            ["^x-", { "type": "boolean" }]
        ],
        "extraProperties": { "type": "number" }
    }))
    .unwrap();

    match matcher.kind() {
        Kind::Object(m) => {
            assert!(m.nullable);
            let keys: Vec<String> = m.properties.keys().map(|k| k.to_string()).collect();
            assert_eq!(keys, vec!["id", "name"]);
            assert!(m
                .optional_properties
                .contains_key(&PropertyKey::from("tags")));
            assert_eq!(m.pattern_properties.len(), 1);
            assert_eq!(m.pattern_properties[0].0.to_string(), "/^x-/");
            assert!(matches!(
                m.extra_properties.as_ref().map(Matcher::kind),
                Some(Kind::Number(_))
            ));
        }
        k => panic!("Expected Kind::Object, got {k:?}"),
    }

    let minimal = Matcher::from_json_str(r#"{ "type": "object" }"#).unwrap();
    match minimal.kind() {
        Kind::Object(m) => {
            assert!(!m.nullable);
            assert!(m.properties.is_empty());
            assert!(m.optional_properties.is_empty());
            assert!(m.pattern_properties.is_empty());
            assert!(m.extra_properties.is_none());
        }
        k => panic!("Expected Kind::Object, got {k:?}"),
    }
}

#[test]
fn test_load_nested_union_and_array() {
    let matcher = Matcher::from_serde_json_value(json!({
        "type": "array",
        "minLength": 1,
        "items": {
            "type": "union",
            "options": [
                { "type": "string" },
                { "type": "number", "min": 0 }
            ]
        }
    }))
    .unwrap();

    match matcher.kind() {
        Kind::Array(m) => {
            assert_eq!(m.min_length, Some(1));
            assert_eq!(m.max_length, None);
            match m.items.kind() {
                Kind::Union(u) => assert_eq!(u.options.len(), 2),
                k => panic!("Expected Kind::Union, got {k:?}"),
            }
        }
        k => panic!("Expected Kind::Array, got {k:?}"),
    }

    let value = Value::from(vec![Value::from("a"), Value::from(3)]);
    assert!(matcher.is_match(&value));
    let value = Value::from(vec![Value::from(-3)]);
    assert!(!matcher.is_match(&value));
}

#[test]
fn test_load_symbol_and_function() {
    let matcher = Matcher::from_json_str(
        r#"{ "type": "symbol", "description": { "type": "string", "minLength": 1 } }"#,
    )
    .unwrap();
    assert!(matches!(
        matcher.kind(),
        Kind::Symbol(SymbolMatcher {
            description: Some(_)
        })
    ));

    let matcher =
        Matcher::from_json_str(r#"{ "type": "function", "name": { "type": "string" } }"#).unwrap();
    assert!(matches!(
        matcher.kind(),
        Kind::Function(FunctionMatcher { name: Some(_) })
    ));
}

#[test]
fn test_unknown_type_is_rejected() {
    let err = Matcher::from_json_str(r#"{ "type": "integer" }"#).unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));
    assert!(err.to_string().starts_with("Failed to parse schema"));

    // Class matchers carry code and cannot be loaded.
    assert!(Matcher::from_json_str(r#"{ "type": "class" }"#).is_err());
    assert!(Matcher::from_json_str(r#"{ "minLength": 1 }"#).is_err());
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = Matcher::from_serde_json_value(json!({
        "type": "string",
        "minLen": 1
    }))
    .unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));

    let err = Matcher::from_serde_json_value(json!({
        "type": "object",
        "properties": { "id": { "type": "number", "minimum": 0 } }
    }))
    .unwrap_err();
    assert!(err.to_string().contains("minimum"));

    let err = Matcher::from_json_str(r#"{ "type": "boolean", "minLength": 3 }"#).unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));
    assert!(err.to_string().contains("minLength"));

    let err = Matcher::from_json_str(r#"{ "type": "undefined", "nullable": true }"#).unwrap_err();
    assert!(err.to_string().contains("nullable"));
}

#[test]
fn test_invalid_pattern() {
    let err = Pattern::new("(unclosed").unwrap_err();
    match &err {
        SchemaError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
        e => panic!("Expected SchemaError::InvalidPattern, got {e:?}"),
    }
    assert!(err.to_string().starts_with("Invalid regex pattern '(unclosed'"));

    let err =
        Matcher::from_json_str(r#"{ "type": "string", "pattern": "(unclosed" }"#).unwrap_err();
    assert!(err.to_string().contains("Invalid regex pattern"));
}

#[cfg(feature = "yaml")]
#[test]
fn test_load_yaml() {
    let matcher = Matcher::from_yaml_str(
        r#"
type: object
properties:
  number:
    type: number
    min: 1
optionalProperties:
  name:
    type: string
"#,
    )
    .unwrap();

    let team = Value::from_json_str(r#"{ "number": 254, "name": "Cheesy Poofs" }"#).unwrap();
    assert!(matcher.is_match(&team));
    let team = Value::from_json_str(r#"{ "number": 0 }"#).unwrap();
    assert!(!matcher.is_match(&team));

    let err = Matcher::from_yaml_str("type: nope").unwrap_err();
    assert!(matches!(err, SchemaError::Yaml(_)));
}
