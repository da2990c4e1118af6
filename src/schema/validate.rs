// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

use crate::object::{Object, PropertyKey};
use crate::render;
use crate::schema::{
    ArrayMatcher, BigIntMatcher, EnumMatcher, FunctionMatcher, InstanceTest, Kind, Literal,
    Matcher, NumberMatcher, ObjectMatcher, StringMatcher, SymbolMatcher, UnionMatcher,
    ValueMatcher,
};
use crate::sink::{Silent, Sink};
use crate::utils::limits::{fallback_validation_limits, ValidationLimits};
use crate::utils::path::{child_path, PathKey};
use crate::value::Value;

use core::fmt;
use std::borrow::Cow;

/// Validator for checking if a Value conforms to a Matcher.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator using the process-wide fallback limits, or the defaults when
    /// none are installed.
    pub fn new() -> Self {
        Self {
            limits: fallback_validation_limits().unwrap_or_default(),
        }
    }

    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validates a Value against a Matcher.
    ///
    /// # Arguments
    /// * `value` - The Value to validate
    /// * `matcher` - The Matcher to validate against
    /// * `label` - Name of the value in diagnostics. Messages are only emitted when a
    ///   non-empty label is given.
    /// * `sink` - Receives the diagnostic trail of a rejected value
    ///
    /// # Returns
    /// * `true` if the value conforms to the matcher
    /// * `false` otherwise; the sink has then received at least one message when a label
    ///   was given
    ///
    /// # Example
    /// ```rust
    /// use shapecheck::schema::{validate::Validator, Matcher};
    /// use shapecheck::Value;
    ///
    /// let mut lines: Vec<String> = vec![];
    /// let ok = Validator::new().validate(&Value::from(3), &Matcher::string(), Some("name"), Some(&mut lines));
    /// assert!(!ok);
    /// assert_eq!(lines, vec!["name (3) must be a string".to_string()]);
    /// ```
    pub fn validate(
        &self,
        value: &Value,
        matcher: &Matcher,
        label: Option<&str>,
        sink: Option<&mut dyn Sink>,
    ) -> bool {
        let mut silent = Silent;
        let emit = label.is_some_and(|l| !l.is_empty()) && sink.is_some();
        let sink: &mut dyn Sink = match sink {
            Some(sink) if emit => sink,
            _ => &mut silent,
        };

        let mut walk = Walk {
            sink,
            limits: self.limits,
            depth: 0,
            emit,
        };
        let accepted = walk.check(matcher, value, label);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "shapecheck",
            label = label.unwrap_or_default(),
            accepted,
            "validated value"
        );

        accepted
    }
}

/// State of a single top-level validation.
struct Walk<'s> {
    sink: &'s mut dyn Sink,
    limits: ValidationLimits,
    depth: usize,
    emit: bool,
}

impl Walk<'_> {
    /// Reports `<path> (<value>) must <constraint>` and fails the node.
    fn reject(&mut self, path: Option<&str>, value: &Value, constraint: fmt::Arguments) -> bool {
        if self.emit {
            let line = format!(
                "{} ({}) must {}",
                path.unwrap_or_default(),
                render::template(value),
                constraint
            );
            self.sink.message(&line);
        }
        false
    }

    /// Runs a nested check whose messages are collected instead of emitted.
    fn capture(
        &mut self,
        matcher: &Matcher,
        value: &Value,
        path: Option<&str>,
    ) -> (bool, Vec<String>) {
        if !self.emit {
            return (self.check(matcher, value, path), vec![]);
        }

        let mut lines: Vec<String> = vec![];
        let mut nested = Walk {
            sink: &mut lines,
            limits: self.limits,
            depth: self.depth,
            emit: true,
        };
        let ok = nested.check(matcher, value, path);
        (ok, lines)
    }

    fn check(&mut self, matcher: &Matcher, value: &Value, path: Option<&str>) -> bool {
        if self.limits.check_depth(self.depth).is_err() {
            let limit = self.limits.max_depth;
            return self.reject(
                path,
                value,
                format_args!("be nested at most {limit} levels deep"),
            );
        }

        self.depth += 1;
        let ok = self.check_kind(matcher.kind(), value, path);
        self.depth -= 1;
        if !ok {
            return false;
        }

        match matcher.special() {
            Some(special) if !special.check(value, path) => {
                let description = special.description();
                self.reject(path, value, format_args!("satisfy {description}"))
            }
            _ => true,
        }
    }

    fn check_kind(&mut self, kind: &Kind, value: &Value, path: Option<&str>) -> bool {
        match kind {
            Kind::String(m) => self.check_string(m, value, path),
            Kind::Number(m) => self.check_number(m, value, path),
            Kind::BigInt(m) => self.check_bigint(m, value, path),
            Kind::Boolean(_) => match value {
                Value::Bool(_) => true,
                _ => self.reject(path, value, format_args!("be a boolean")),
            },
            Kind::Symbol(m) => self.check_symbol(m, value, path),
            Kind::Undefined(_) => match value {
                Value::Undefined => true,
                _ => self.reject(path, value, format_args!("be undefined")),
            },
            Kind::Object(m) => self.check_object(m, value, path),
            Kind::Function(m) => self.check_function(m, value, path),
            Kind::Enum(m) => self.check_enum(m, value, path),
            Kind::Value(m) => self.check_value(m, value, path),
            Kind::Class(test) => self.check_class(test, value, path),
            Kind::Union(m) => self.check_union(m, value, path),
            Kind::Array(m) => self.check_array(m, value, path),
        }
    }

    fn check_string(&mut self, m: &StringMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::String(s) = value else {
            return self.reject(path, value, format_args!("be a string"));
        };

        let length = s.encode_utf16().count();
        if let Some(min) = m.min_length {
            if length < min {
                return self.reject(path, value, format_args!("be {min} characters or longer"));
            }
        }
        if let Some(max) = m.max_length {
            if length > max {
                return self.reject(path, value, format_args!("be {max} characters or shorter"));
            }
        }
        if let Some(pattern) = &m.pattern {
            if !pattern.is_match(s) {
                return self.reject(path, value, format_args!("match {pattern}"));
            }
        }
        true
    }

    fn check_number(&mut self, m: &NumberMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::Number(n) = value else {
            return self.reject(path, value, format_args!("be a number"));
        };
        let n = *n;

        if let Some(min) = m.min {
            if n < min {
                let min = render::number(min);
                return self.reject(
                    path,
                    value,
                    format_args!("be greater than or equal to {min}"),
                );
            }
        }
        if let Some(max) = m.max {
            if n > max {
                let max = render::number(max);
                return self.reject(path, value, format_args!("be less than or equal to {max}"));
            }
        }
        if let Some(precision) = m.max_precision {
            let step = 10f64.powf(-f64::from(precision));
            if n % step != 0.0 {
                let step = render::number(step);
                return self.reject(
                    path,
                    value,
                    format_args!("be only precise to integer multiples of {step}"),
                );
            }
        }
        if let Some(threshold) = m.max_decimal {
            if n % 1.0 > threshold {
                let threshold = render::number(threshold);
                return self.reject(
                    path,
                    value,
                    format_args!("have a decimal portion (x modulo 1) less than {threshold}"),
                );
            }
        }
        true
    }

    fn check_bigint(&mut self, m: &BigIntMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::BigInt(n) = value else {
            return self.reject(path, value, format_args!("be a bigint"));
        };

        if let Some(min) = &m.min {
            if **n < *min {
                return self.reject(
                    path,
                    value,
                    format_args!("be greater than or equal to {min}"),
                );
            }
        }
        if let Some(max) = &m.max {
            if **n > *max {
                return self.reject(path, value, format_args!("be less than or equal to {max}"));
            }
        }
        true
    }

    fn check_symbol(&mut self, m: &SymbolMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::Symbol(symbol) = value else {
            return self.reject(path, value, format_args!("be a symbol"));
        };

        match &m.description {
            Some(matcher) => {
                let description = symbol.description().map_or(Value::Undefined, Value::from);
                let child = path.map(|p| child_path(p, PathKey::Name("description")));
                self.check(matcher, &description, child.as_deref())
            }
            None => true,
        }
    }

    fn check_function(&mut self, m: &FunctionMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::Function(function) = value else {
            return self.reject(path, value, format_args!("be a function"));
        };

        match &m.name {
            Some(matcher) => {
                let name = Value::from(function.name());
                let child = path.map(|p| child_path(p, PathKey::Name("name")));
                self.check(matcher, &name, child.as_deref())
            }
            None => true,
        }
    }

    fn check_object(&mut self, m: &ObjectMatcher, value: &Value, path: Option<&str>) -> bool {
        let members = match value {
            Value::Object(object) => Members::Object(object),
            Value::Array(items) => Members::Array(items.as_slice()),
            Value::Null if m.nullable => return true,
            Value::Null => return self.reject(path, value, format_args!("not be null")),
            _ => return self.reject(path, value, format_args!("be an object")),
        };

        // Required members, looked up through the prototype chain.
        for (key, matcher) in &m.properties {
            let Some(member) = members.get(key) else {
                return self.reject(path, value, format_args!("have property '{key}'"));
            };
            let child = member_path(path, key);
            if !self.check(matcher, &member, child.as_deref()) {
                return false;
            }
        }

        for (key, matcher) in &m.optional_properties {
            let Some(member) = members.get(key) else {
                continue;
            };
            let child = member_path(path, key);
            let (ok, lines) = self.capture(matcher, &member, child.as_deref());
            if !ok {
                if self.emit {
                    let line = format!(
                        "{} must either not be present or match this:\n{}",
                        child.as_deref().unwrap_or_default(),
                        indent(&lines.join("\n"), "> ")
                    );
                    self.sink.message(&line);
                }
                return false;
            }
        }

        self.check_remaining_members(m, members, path)
    }

    /// Own members not named by the matcher go through the key patterns, then the
    /// catch-all matcher.
    fn check_remaining_members(
        &mut self,
        m: &ObjectMatcher,
        members: Members<'_>,
        path: Option<&str>,
    ) -> bool {
        if m.pattern_properties.is_empty() && m.extra_properties.is_none() {
            return true;
        }

        for (key, member) in members.own_entries() {
            let key = &*key;
            if m.properties.contains_key(key) || m.optional_properties.contains_key(key) {
                continue;
            }

            let child = member_path(path, key);
            let mut selected = false;
            if let PropertyKey::String(name) = key {
                for (pattern, matcher) in &m.pattern_properties {
                    if !pattern.is_match(name) {
                        continue;
                    }
                    selected = true;
                    if !self.check(matcher, &member, child.as_deref()) {
                        return false;
                    }
                }
            }
            if selected {
                continue;
            }

            if let Some(matcher) = &m.extra_properties {
                if !self.check(matcher, &member, child.as_deref()) {
                    return false;
                }
            }
        }
        true
    }

    fn check_enum(&mut self, m: &EnumMatcher, value: &Value, path: Option<&str>) -> bool {
        if m.values.iter().any(|literal| literal.matches(value)) {
            return true;
        }
        let values: Vec<Value> = m.values.iter().map(Literal::to_value).collect();
        let values = render::list(values.iter());
        self.reject(
            path,
            value,
            format_args!("be strictly equal to one of the following values:\n{values}"),
        )
    }

    fn check_value(&mut self, m: &ValueMatcher, value: &Value, path: Option<&str>) -> bool {
        if m.value.matches(value) {
            return true;
        }
        let expected = render::inspect(&m.value.to_value());
        self.reject(path, value, format_args!("be strictly equal to {expected}"))
    }

    fn check_class(&mut self, test: &InstanceTest, value: &Value, path: Option<&str>) -> bool {
        if test.test(value) {
            return true;
        }
        let name = test.name();
        self.reject(path, value, format_args!("be an instance of {name}"))
    }

    fn check_union(&mut self, m: &UnionMatcher, value: &Value, path: Option<&str>) -> bool {
        let mut traces = Vec::with_capacity(m.options.len());
        for option in &m.options {
            let (ok, lines) = self.capture(option, value, path);
            if ok {
                return true;
            }
            traces.push(lines);
        }

        if self.emit {
            let branches: Vec<String> = traces
                .iter()
                .map(|lines| indent(&lines.join("\n"), "> "))
                .collect();
            let line = format!(
                "{} must match one of these:\n{}",
                path.unwrap_or_default(),
                branches.join("\n---\n")
            );
            self.sink.message(&line);
        }
        false
    }

    fn check_array(&mut self, m: &ArrayMatcher, value: &Value, path: Option<&str>) -> bool {
        let Value::Array(items) = value else {
            return self.reject(path, value, format_args!("be an array"));
        };

        if let Some(min) = m.min_length {
            if items.len() < min {
                return self.reject(path, value, format_args!("have at least {min} elements"));
            }
        }
        if let Some(max) = m.max_length {
            if items.len() > max {
                return self.reject(path, value, format_args!("have at most {max} elements"));
            }
        }

        for (index, item) in items.iter().enumerate() {
            let child = path.map(|p| child_path(p, PathKey::Index(index)));
            if !self.check(&m.items, item, child.as_deref()) {
                return false;
            }
        }
        true
    }
}

/// Members seen by an object matcher. An array exposes its indices and `length`.
#[derive(Clone, Copy)]
enum Members<'v> {
    Object(&'v Object),
    Array(&'v [Value]),
}

type Entry<'v> = (Cow<'v, PropertyKey>, Cow<'v, Value>);

impl<'v> Members<'v> {
    fn get(self, key: &PropertyKey) -> Option<Cow<'v, Value>> {
        match self {
            Members::Object(object) => object.get(key).map(Cow::Borrowed),
            Members::Array(items) => match key.as_str()? {
                "length" => Some(Cow::Owned(Value::from(items.len()))),
                name => array_index(name)
                    .and_then(|index| items.get(index))
                    .map(Cow::Borrowed),
            },
        }
    }

    /// Own members in enumeration order.
    fn own_entries(self) -> Box<dyn Iterator<Item = Entry<'v>> + 'v> {
        match self {
            Members::Object(object) => Box::new(
                object
                    .own_entries()
                    .map(|(key, member)| (Cow::Borrowed(key), Cow::Borrowed(member))),
            ),
            Members::Array(items) => {
                let length = (
                    Cow::Owned(PropertyKey::from("length")),
                    Cow::Owned(Value::from(items.len())),
                );
                Box::new(
                    items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| {
                            (
                                Cow::Owned(PropertyKey::from(index.to_string())),
                                Cow::Borrowed(item),
                            )
                        })
                        .chain(core::iter::once(length)),
                )
            }
        }
    }
}

/// Parses a canonical array index: decimal digits without leading zeros.
fn array_index(name: &str) -> Option<usize> {
    let index = name.parse::<usize>().ok()?;
    (index.to_string() == name).then_some(index)
}

fn member_path(path: Option<&str>, key: &PropertyKey) -> Option<String> {
    path.map(|p| child_path(p, PathKey::from(key)))
}

/// Prefixes every line of `text` with `prefix`.
fn indent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
