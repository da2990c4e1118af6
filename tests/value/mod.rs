// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use num_bigint::BigInt;
use shapecheck::*;

use std::sync::Arc;

#[test]
fn serialize_number() -> Result<()> {
    // Check that integer values are serialized without fractional part
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.0))?, "1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.0))?, "-1");

    // Ensure that fractional parts are also serialized.
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.1))?, "1.1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.1))?, "-1.1");

    // Non-finite numbers have no json form.
    assert_eq!(serde_json::to_string(&Value::from(f64::NAN))?, "null");
    Ok(())
}

#[test]
fn serialize_string() -> Result<()> {
    assert_eq!(
        Value::String("Hello, World\n".into()).to_json_str()?,
        "\"Hello, World\\n\""
    );
    Ok(())
}

#[test]
fn serialize_runtime_values() -> Result<()> {
    let tag = Symbol::new("tag");
    let object = Object::new()
        .with("id", 1)
        .with("missing", Value::Undefined)
        .with("callback", Function::new("run"))
        .with("big", BigInt::from(12))
        .with(&tag, "hidden");

    assert_eq!(
        serde_json::to_string(&Value::from(object))?,
        r#"{"id":1,"big":"12"}"#
    );
    Ok(())
}

#[test]
fn constructors() -> Result<()> {
    assert_eq!(Value::new_object(), Value::from_json_str("{}")?);
    assert_eq!(Value::new_array(), Value::from_json_str("[]")?);
    assert_eq!(Value::Null, Value::from_json_str("null")?);
    Ok(())
}

#[test]
fn json_round_trip_keeps_member_order() -> Result<()> {
    let json = r#"{"z":1,"a":[true,null,"x"],"m":{"k":2.5}}"#;
    let value = Value::from_json_str(json)?;
    assert_eq!(serde_json::to_string(&value)?, json);
    Ok(())
}

#[cfg(feature = "yaml")]
#[test]
fn from_yaml() -> Result<()> {
    let value = Value::from_yaml_str("name: scout\nteams: [254, 1678]\n")?;
    assert_eq!(value, Value::from_json_str(r#"{"name":"scout","teams":[254,1678]}"#)?);
    Ok(())
}

#[test]
fn string_as_index() -> Result<()> {
    let obj = Value::from_json_str(r#"{ "a" : 5, "b" : 6 }"#)?;
    assert_eq!(&obj["a"], &Value::from(5.0));
    assert_eq!(&obj["c"], &Value::Undefined);
    assert_eq!(&Value::Null["a"], &Value::Undefined);
    Ok(())
}

#[test]
fn usize_as_index() -> Result<()> {
    assert_eq!(&Value::from_json_str("[1, 2, 3]")?[0], &Value::from(1.0));
    assert_eq!(&Value::from_json_str("[1, 2, 3]")?[5], &Value::Undefined);
    Ok(())
}

#[test]
fn prototype_lookup() -> Result<()> {
    let base = Arc::new(Object::new().with("inherited", true));
    let value = Value::from(Object::with_prototype(base).with("own", 1));

    assert_eq!(&value["inherited"], &Value::from(true));
    let object = value.as_object()?;
    assert!(object.has(&PropertyKey::from("inherited")));
    assert!(!object.has_own(&PropertyKey::from("inherited")));
    assert_eq!(object.own_keys().count(), 1);
    Ok(())
}

#[test]
fn own_keys_list_strings_before_symbols() -> Result<()> {
    let tag = Symbol::new("tag");
    let object = Object::new().with(&tag, 1).with("b", 2).with("a", 3);
    let keys: Vec<String> = object.own_keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["b", "a", "Symbol(tag)"]);
    Ok(())
}

#[test]
fn strict_identity() -> Result<()> {
    let a = Value::from_json_str("[1]")?;
    let b = a.clone();
    let c = Value::from_json_str("[1]")?;

    assert!(a.strictly_equals(&b));
    assert!(!a.strictly_equals(&c));
    assert_eq!(a, c);

    assert!(!Value::from(f64::NAN).strictly_equals(&Value::from(f64::NAN)));
    assert!(Value::from(0.0).strictly_equals(&Value::from(-0.0)));
    assert!(!Value::from(1).strictly_equals(&Value::from("1")));
    assert!(!Symbol::new("s").eq(&Symbol::new("s")));
    Ok(())
}

#[test]
fn type_of() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::new_array().type_of(), "object");
    assert_eq!(Value::from(BigInt::from(1)).type_of(), "bigint");
    assert_eq!(Value::from(Symbol::anonymous()).type_of(), "symbol");
    assert_eq!(Value::from(Function::new("f")).type_of(), "function");
}

#[test]
fn function_bodies() -> Result<()> {
    let double = Function::with_body("double", |args: &[Value]| match args.first() {
        Some(Value::Number(n)) => Value::from(n * 2.0),
        _ => Value::Undefined,
    });
    assert_eq!(double.call(&[Value::from(4)])?, Value::from(8));
    assert!(Function::new("opaque").call(&[]).is_err());
    Ok(())
}

#[test]
fn display_and_inspect() {
    let value = Value::from_json_str(r#"{"a":[1,"x"]}"#).unwrap_or(Value::Undefined);
    assert_eq!(value.to_string(), "[object Object]");
    assert_eq!(render::inspect(&value), "{ a: [ 1, 'x' ] }");
    assert_eq!(Value::from(vec![Value::from(1), Value::Null]).to_string(), "1,");
    assert_eq!(render::inspect(&Value::from(BigInt::from(3))), "3n");
}

#[test]
fn api() -> Result<()> {
    assert!(Value::from_json_str("{}")?.as_object()?.is_empty());
    let mut v = Value::new_object();
    v.as_object_mut()?.insert("a", 3.145);
    assert_eq!(v["a"], Value::from(3.145));
    assert_eq!(v.as_object()?.len(), 1);

    // Check invalid api calls.
    assert!(Value::Undefined.as_object().is_err());
    assert!(Value::Undefined.as_object_mut().is_err());
    assert!(Value::String("anc".into()).as_array().is_err());
    assert!(Value::String("anc".into()).as_array_mut().is_err());
    assert!(Value::new_object().as_number().is_err());
    assert!(Value::from(5.6).as_bool().is_err());
    assert!(Value::from(5.6).as_symbol().is_err());
    assert!(Value::Null.as_function().is_err());
    Ok(())
}
