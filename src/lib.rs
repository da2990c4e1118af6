// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod object;
pub mod render;
pub mod schema;
pub mod sink;
pub mod utils;
mod value;

pub use object::{Class, Function, Object, PropertyKey, Symbol};
pub use schema::validate::Validator;
pub use schema::{
    ArrayMatcher, BigIntMatcher, BooleanMatcher, EnumMatcher, FunctionMatcher, InstanceTest,
    Kind, Literal, Matcher, NumberMatcher, ObjectMatcher, Pattern, SchemaError, Special,
    StringMatcher, SymbolMatcher, UndefinedMatcher, UnionMatcher, ValueMatcher,
};
#[cfg(feature = "tracing")]
pub use sink::TracingSink;
pub use sink::{Silent, Sink};
pub use utils::limits::{
    fallback_validation_limits, set_fallback_validation_limits, ValidationLimits,
};
pub use value::Value;

/// Checks `value` against `matcher` with a [`Validator`] built from the current fallback
/// limits.
///
/// Returns whether the value conforms. When both `label` and `sink` are given, a rejected
/// value leaves a path-qualified explanation in the sink, e.g.
/// `config.teams[2].number (0) must be greater than or equal to 1`.
pub fn validate(
    value: &Value,
    matcher: &Matcher,
    label: Option<&str>,
    sink: Option<&mut dyn Sink>,
) -> bool {
    Validator::new().validate(value, matcher, label, sink)
}
