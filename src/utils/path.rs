// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::expect_used)] // identifier pattern is a static resource

//! Location labels for nested sub-values.

use crate::object::{PropertyKey, Symbol};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").expect("identifier pattern should compile");
}

/// Component appended to a path label.
#[derive(Debug, Clone, Copy)]
pub enum PathKey<'a> {
    /// Named member (e.g., .field or ["some field"])
    Name(&'a str),
    /// Sequence position (e.g., [3])
    Index(usize),
    /// Symbol-keyed member (e.g., [Symbol(tag)])
    Symbol(&'a Symbol),
}

impl<'a> From<&'a PropertyKey> for PathKey<'a> {
    fn from(key: &'a PropertyKey) -> Self {
        match key {
            PropertyKey::String(s) => PathKey::Name(s),
            PropertyKey::Symbol(s) => PathKey::Symbol(s),
        }
    }
}

/// True for names that can follow a `.` without quoting.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Extends `base` with `key`.
pub fn child_path(base: &str, key: PathKey<'_>) -> String {
    match key {
        PathKey::Name(name) if is_identifier(name) => format!("{base}.{name}"),
        PathKey::Name(name) => {
            let quoted = serde_json::to_string(name).unwrap_or_else(|_| format!("{name:?}"));
            format!("{base}[{quoted}]")
        }
        PathKey::Index(index) => format!("{base}[{index}]"),
        PathKey::Symbol(symbol) => format!("{base}[{symbol}]"),
    }
}
