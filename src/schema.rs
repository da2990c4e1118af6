// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Matcher schemas.
//!
//! A [`Matcher`] describes the shape a dynamic [`Value`] must have. It is a closed set of
//! variants ([`Kind`]) plus an optional [`Special`] predicate that runs after the variant's
//! own checks succeed.
//!
//! Matchers are usually written in code:
//!
//! ```rust
//! use shapecheck::schema::{Matcher, NumberMatcher, ObjectMatcher};
//!
//! let team = Matcher::from(
//!     ObjectMatcher::default()
//!         .property("number", NumberMatcher { min: Some(1.0), ..Default::default() })
//!         .optional_property("name", Matcher::string()),
//! );
//! ```
//!
//! The serializable subset can also be loaded from documents. The `type` field selects the
//! variant, the remaining fields are camelCase and unknown fields are rejected:
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "number": { "type": "number", "min": 1 }
//!   },
//!   "optionalProperties": {
//!     "name": { "type": "string", "maxLength": 64 }
//!   },
//!   "extraProperties": { "type": "boolean" }
//! }
//! ```
//!
//! `class` matchers and special predicates hold code and exist only in the builder API.
//!
//! Matchers are immutable once built and share their internals, so cloning is cheap and a
//! single matcher can be used from many threads at once.

use crate::object::{Class, PropertyKey, Symbol};
use crate::value::Value;

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

pub mod error;
pub mod validate;

pub use error::SchemaError;

/// A compiled regular expression used by string and object matchers.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|source| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern(regex)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        Pattern::new(&pattern).map_err(de::Error::custom)
    }
}

/// A primitive that enum and value matchers compare against by strict identity.
#[derive(Debug, Clone, Default)]
pub enum Literal {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(Arc<str>),
    Symbol(Symbol),
}

impl Literal {
    /// Strict identity with `value`. No coercion: `1` does not match `"1"` or `1n`,
    /// NaN matches nothing, symbols match only themselves.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Undefined, Value::Undefined) | (Literal::Null, Value::Null) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a == b,
            (Literal::BigInt(a), Value::BigInt(b)) => a == b.as_ref(),
            (Literal::String(a), Value::String(b)) => a == b,
            (Literal::Symbol(a), Value::Symbol(b)) => a == b,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::BigInt(n) => Value::from(n.clone()),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Symbol(s) => Value::Symbol(s.clone()),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(f64::from(n))
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.into())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s.into())
    }
}

impl From<BigInt> for Literal {
    fn from(n: BigInt) -> Self {
        Literal::BigInt(n)
    }
}

impl From<Symbol> for Literal {
    fn from(s: Symbol) -> Self {
        Literal::Symbol(s)
    }
}

impl From<&Symbol> for Literal {
    fn from(s: &Symbol) -> Self {
        Literal::Symbol(s.clone())
    }
}

struct LiteralVisitor;

impl<'de> Visitor<'de> for LiteralVisitor {
    type Value = Literal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a boolean, a number or a string")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Number(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Literal::String(v.into()))
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LiteralVisitor)
    }
}

// Bigint bounds may be written as integers or, beyond 2^53, as strings of digits.
fn deserialize_bigint_bound<'de, D>(deserializer: D) -> Result<Option<BigInt>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoundVisitor;

    impl<'de> Visitor<'de> for BoundVisitor {
        type Value = Option<BigInt>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string of decimal digits")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(BoundVisitor)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(BigInt::from(v)))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(BigInt::from(v)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.fract() != 0.0 {
                return Err(E::custom(format!("bigint bound {v} is not an integer")));
            }
            BigInt::from_f64(v)
                .map(Some)
                .ok_or_else(|| E::custom(format!("bigint bound {v} is not finite")))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse::<BigInt>().map(Some).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(BoundVisitor)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringMatcher {
    /// Minimum length in UTF-16 code units.
    pub min_length: Option<usize>,
    /// Maximum length in UTF-16 code units.
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// Refinements run in field order: `min`, `max`, `max_precision`, then `max_decimal`.
/// A value failing several is reported against the first of them only, so a value that
/// is both too precise and over the decimal threshold reads "must be only precise to
/// integer multiples of ...".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberMatcher {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Value must be an exact multiple of 10^-max_precision.
    pub max_precision: Option<i32>,
    /// Bounds `value % 1`, the fractional remainder, not the number of decimal digits.
    pub max_decimal: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BigIntMatcher {
    #[serde(default, deserialize_with = "deserialize_bigint_bound")]
    pub min: Option<BigInt>,
    #[serde(default, deserialize_with = "deserialize_bigint_bound")]
    pub max: Option<BigInt>,
}

// Braced so that unknown fields are still rejected under the `type` tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BooleanMatcher {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UndefinedMatcher {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SymbolMatcher {
    /// Applied to the symbol's description, or to `undefined` when it has none.
    pub description: Option<Matcher>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectMatcher {
    /// Accept `null` in place of an object.
    #[serde(default)]
    pub nullable: bool,
    /// Members that must be reachable, directly or through the prototype chain.
    #[serde(default)]
    pub properties: IndexMap<PropertyKey, Matcher>,
    /// Members validated only when reachable.
    #[serde(default)]
    pub optional_properties: IndexMap<PropertyKey, Matcher>,
    /// Matchers for own string keys not named above, selected by key pattern.
    #[serde(default)]
    pub pattern_properties: Vec<(Pattern, Matcher)>,
    /// Matcher for own keys not named above and not selected by any key pattern.
    pub extra_properties: Option<Matcher>,
}

impl ObjectMatcher {
    pub fn allow_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn property(mut self, key: impl Into<PropertyKey>, matcher: impl Into<Matcher>) -> Self {
        self.properties.insert(key.into(), matcher.into());
        self
    }

    pub fn optional_property(
        mut self,
        key: impl Into<PropertyKey>,
        matcher: impl Into<Matcher>,
    ) -> Self {
        self.optional_properties.insert(key.into(), matcher.into());
        self
    }

    pub fn pattern_property(mut self, pattern: Pattern, matcher: impl Into<Matcher>) -> Self {
        self.pattern_properties.push((pattern, matcher.into()));
        self
    }

    pub fn extra(mut self, matcher: impl Into<Matcher>) -> Self {
        self.extra_properties = Some(matcher.into());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FunctionMatcher {
    /// Applied to the function's name.
    pub name: Option<Matcher>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnumMatcher {
    pub values: Vec<Literal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueMatcher {
    pub value: Literal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UnionMatcher {
    /// Tried in order; the first alternative that accepts the value wins.
    pub options: Vec<Matcher>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArrayMatcher {
    pub items: Matcher,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ArrayMatcher {
    pub fn new(items: impl Into<Matcher>) -> Self {
        ArrayMatcher {
            items: items.into(),
            min_length: None,
            max_length: None,
        }
    }
}

type InstancePredicate = dyn Fn(&Value) -> bool + Send + Sync;

/// How a class matcher decides membership.
#[derive(Clone)]
pub enum InstanceTest {
    /// The value is an object whose runtime class is the class or one of its descendants.
    Nominal(Class),
    /// The value satisfies a custom predicate.
    Structural {
        name: Arc<str>,
        test: Arc<InstancePredicate>,
    },
}

impl InstanceTest {
    pub fn name(&self) -> &str {
        match self {
            InstanceTest::Nominal(class) => class.name(),
            InstanceTest::Structural { name, .. } => name,
        }
    }

    pub fn test(&self, value: &Value) -> bool {
        match self {
            InstanceTest::Nominal(class) => match value {
                Value::Object(object) => object.is_instance_of(class),
                _ => false,
            },
            InstanceTest::Structural { test, .. } => test(value),
        }
    }
}

impl fmt::Debug for InstanceTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceTest::Nominal(class) => f.debug_tuple("Nominal").field(class).finish(),
            InstanceTest::Structural { name, .. } => {
                f.debug_struct("Structural").field("name", name).finish()
            }
        }
    }
}

type SpecialPredicate = dyn Fn(&Value, Option<&str>) -> bool + Send + Sync;

/// A final check layered on top of a matcher. It receives the value and its path label.
#[derive(Clone)]
pub struct Special {
    description: Arc<str>,
    check: Arc<SpecialPredicate>,
}

impl Special {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn check(&self, value: &Value, path: Option<&str>) -> bool {
        (self.check)(value, path)
    }
}

impl fmt::Debug for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Special")
            .field("description", &self.description)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
// Use `type` when deserializing to discriminate between the variants.
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kind {
    String(StringMatcher),
    Number(NumberMatcher),
    BigInt(BigIntMatcher),
    Boolean(BooleanMatcher),
    Symbol(SymbolMatcher),
    Undefined(UndefinedMatcher),
    Object(ObjectMatcher),
    Function(FunctionMatcher),
    Enum(EnumMatcher),
    Value(ValueMatcher),
    #[serde(skip)]
    Class(InstanceTest),
    Union(UnionMatcher),
    Array(ArrayMatcher),
}

/// A schema node: a [`Kind`] plus an optional [`Special`] predicate.
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: Arc<Kind>,
    special: Option<Special>,
}

impl Matcher {
    pub fn new(kind: Kind) -> Self {
        Matcher {
            kind: Arc::new(kind),
            special: None,
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn special(&self) -> Option<&Special> {
        self.special.as_ref()
    }

    /// Attaches a predicate that runs after the matcher's own checks pass. A `false`
    /// result rejects the value with "must satisfy <description>".
    pub fn with_special<F>(mut self, description: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.special = Some(Special {
            description: description.into(),
            check: Arc::new(check),
        });
        self
    }

    pub fn string() -> Self {
        StringMatcher::default().into()
    }

    pub fn number() -> Self {
        NumberMatcher::default().into()
    }

    pub fn bigint() -> Self {
        BigIntMatcher::default().into()
    }

    pub fn boolean() -> Self {
        BooleanMatcher::default().into()
    }

    pub fn symbol() -> Self {
        SymbolMatcher::default().into()
    }

    pub fn undefined() -> Self {
        UndefinedMatcher::default().into()
    }

    pub fn object() -> Self {
        ObjectMatcher::default().into()
    }

    pub fn function() -> Self {
        FunctionMatcher::default().into()
    }

    pub fn one_of<I, L>(values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        EnumMatcher {
            values: values.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        ValueMatcher {
            value: value.into(),
        }
        .into()
    }

    pub fn instance_of(class: &Class) -> Self {
        InstanceTest::Nominal(class.clone()).into()
    }

    pub fn satisfies<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        InstanceTest::Structural {
            name: name.into(),
            test: Arc::new(test),
        }
        .into()
    }

    pub fn union(options: impl IntoIterator<Item = Matcher>) -> Self {
        UnionMatcher {
            options: options.into_iter().collect(),
        }
        .into()
    }

    pub fn array(items: impl Into<Matcher>) -> Self {
        ArrayMatcher::new(items).into()
    }

    /// Loads a matcher from a JSON document.
    pub fn from_serde_json_value(schema: serde_json::Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(schema)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(s)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validates without collecting diagnostics.
    pub fn is_match(&self, value: &Value) -> bool {
        validate::Validator::new().validate(value, self, None, None)
    }

    /// Validates `value`, labelling it `label` in diagnostics.
    ///
    /// Returns the diagnostic trail when the value is rejected.
    ///
    /// # Example
    /// ```rust
    /// use shapecheck::schema::{Matcher, StringMatcher};
    /// use shapecheck::Value;
    ///
    /// let name = Matcher::from(StringMatcher { min_length: Some(1), ..Default::default() });
    /// assert!(name.check(&Value::from("scout"), "name").is_ok());
    /// assert_eq!(
    ///     name.check(&Value::from(""), "name").unwrap_err(),
    ///     vec!["name () must be 1 characters or longer".to_string()],
    /// );
    /// ```
    pub fn check(&self, value: &Value, label: &str) -> Result<(), Vec<String>> {
        let mut lines = vec![];
        if validate::Validator::new().validate(value, self, Some(label), Some(&mut lines)) {
            Ok(())
        } else {
            Err(lines)
        }
    }
}

impl From<Kind> for Matcher {
    fn from(kind: Kind) -> Self {
        Matcher::new(kind)
    }
}

macro_rules! matcher_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Matcher {
                fn from(m: $t) -> Self {
                    Matcher::new(Kind::$variant(m))
                }
            }
        )*
    };
}

matcher_from!(
    StringMatcher => String,
    NumberMatcher => Number,
    BigIntMatcher => BigInt,
    BooleanMatcher => Boolean,
    SymbolMatcher => Symbol,
    UndefinedMatcher => Undefined,
    ObjectMatcher => Object,
    FunctionMatcher => Function,
    EnumMatcher => Enum,
    ValueMatcher => Value,
    InstanceTest => Class,
    UnionMatcher => Union,
    ArrayMatcher => Array,
);

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Kind::deserialize(deserializer).map(Matcher::new)
    }
}

#[cfg(test)]
mod tests {
    mod composite;
    mod loading;
    mod primitives;
}
