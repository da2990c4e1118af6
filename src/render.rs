// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::float_cmp)]

//! Textual renderings of values used in diagnostics.
//!
//! Two forms are produced:
//! - [`template`]: the text a value becomes when interpolated into a message
//!   (`"abc"` renders as `abc`, objects as `[object Object]`).
//! - [`inspect`]: a debugging rendering that keeps literals distinguishable
//!   (`"abc"` renders as `'abc'`, bigints carry an `n` suffix).

use crate::object::PropertyKey;
use crate::utils::path::is_identifier;
use crate::value::Value;

/// Formats a number the way `Number.prototype.toString` does.
pub fn number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n == 0.0 {
        return "0".into();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }

    // Exponential form: 1e+21, 1.5e-7.
    let s = format!("{n:e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => s,
    }
}

pub fn template(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".into(),
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number(*n),
        Value::BigInt(b) => b.to_string(),
        Value::String(s) => s.to_string(),
        Value::Symbol(s) => s.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Undefined | Value::Null => String::new(),
                _ => template(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".into(),
        Value::Function(f) => format!("function {}() {{ [native code] }}", f.name()),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn inspect_key(key: &PropertyKey) -> String {
    match key {
        PropertyKey::String(s) if is_identifier(s) => s.to_string(),
        PropertyKey::String(s) => quote(s),
        PropertyKey::Symbol(s) => format!("[{s}]"),
    }
}

pub fn inspect(value: &Value) -> String {
    match value {
        Value::Number(n) if *n == 0.0 && n.is_sign_negative() => "-0".into(),
        Value::BigInt(b) => format!("{b}n"),
        Value::String(s) => quote(s),
        Value::Array(items) => list(items.iter()),
        Value::Object(o) => {
            let members: Vec<String> = o
                .own_entries()
                .map(|(k, v)| format!("{}: {}", inspect_key(k), inspect(v)))
                .collect();
            let body = if members.is_empty() {
                "{}".to_string()
            } else {
                format!("{{ {} }}", members.join(", "))
            };
            match o.class() {
                Some(class) => format!("{} {body}", class.name()),
                None => body,
            }
        }
        Value::Function(f) if f.name().is_empty() => "[Function (anonymous)]".into(),
        Value::Function(f) => format!("[Function: {}]", f.name()),
        _ => template(value),
    }
}

/// Inspect-style rendering of a sequence: `[ 'a', 1 ]`, or `[]` when empty.
pub fn list<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    let items: Vec<String> = items.map(inspect).collect();
    if items.is_empty() {
        "[]".into()
    } else {
        format!("[ {} ]", items.join(", "))
    }
}
