// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reference-identity building blocks of [`Value`]: symbols, classes, objects and functions.

use crate::value::Value;

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// An opaque token whose identity is the allocation, not the description.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

struct SymbolData {
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Symbol(Arc::new(SymbolData {
            description: Some(description.into()),
        }))
    }

    pub fn anonymous() -> Self {
        Symbol(Arc::new(SymbolData { description: None }))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Key of an object entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(Arc<str>),
    Symbol(Symbol),
}

impl PropertyKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => f.write_str(s),
            PropertyKey::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.into())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s.into())
    }
}

impl From<Arc<str>> for PropertyKey {
    fn from(s: Arc<str>) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        PropertyKey::Symbol(s)
    }
}

impl From<&Symbol> for PropertyKey {
    fn from(s: &Symbol) -> Self {
        PropertyKey::Symbol(s.clone())
    }
}

// Documents can only name string keys.
impl<'de> Deserialize<'de> for PropertyKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        Ok(PropertyKey::from(key))
    }
}

/// Runtime class identity. Two classes are the same class only if they are the same allocation.
#[derive(Clone)]
pub struct Class(Arc<ClassData>);

struct ClassData {
    name: Arc<str>,
    parent: Option<Class>,
}

impl Class {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Class(Arc::new(ClassData {
            name: name.into(),
            parent: None,
        }))
    }

    /// Creates a class deriving from `parent`.
    pub fn extending(name: impl Into<Arc<str>>, parent: &Class) -> Self {
        Class(Arc::new(ClassData {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// True if `self` is `other` or one of its descendants.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name())
    }
}

/// Keyed record with optional ancestry.
///
/// Lookups through [`Object::get`] and [`Object::has`] fall back to the prototype chain;
/// enumeration through [`Object::own_entries`] only visits entries stored on the object itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: IndexMap<PropertyKey, Value>,
    prototype: Option<Arc<Object>>,
    class: Option<Class>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object that inherits the members of `prototype`.
    pub fn with_prototype(prototype: Arc<Object>) -> Self {
        Object {
            prototype: Some(prototype),
            ..Self::default()
        }
    }

    /// Creates an empty object whose runtime class is `class`.
    pub fn instance_of(class: &Class) -> Self {
        Object {
            class: Some(class.clone()),
            ..Self::default()
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &PropertyKey) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn prototype(&self) -> Option<&Arc<Object>> {
        self.prototype.as_ref()
    }

    /// Runtime class of the object, inherited from the prototype chain when not set directly.
    pub fn class(&self) -> Option<&Class> {
        match &self.class {
            Some(class) => Some(class),
            None => self.prototype.as_ref().and_then(|p| p.class()),
        }
    }

    pub fn set_class(&mut self, class: Option<Class>) {
        self.class = class;
    }

    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class().is_some_and(|c| c.is_subclass_of(class))
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Looks `key` up on the object, then along its prototype chain.
    pub fn get(&self, key: &PropertyKey) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(v) = object.entries.get(key) {
                return Some(v);
            }
            current = object.prototype.as_deref();
        }
        None
    }

    pub fn has(&self, key: &PropertyKey) -> bool {
        self.get(key).is_some()
    }

    /// Own keys: string keys in insertion order, then symbol keys in insertion order.
    pub fn own_keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.own_entries().map(|(k, _)| k)
    }

    pub fn own_entries(&self) -> impl Iterator<Item = (&PropertyKey, &Value)> {
        let strings = self
            .entries
            .iter()
            .filter(|(k, _)| matches!(k, PropertyKey::String(_)));
        let symbols = self
            .entries
            .iter()
            .filter(|(k, _)| matches!(k, PropertyKey::Symbol(_)));
        strings.chain(symbols)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<PropertyKey>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (k, v) in iter {
            object.insert(k, v);
        }
        object
    }
}

type Body = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named callable.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Option<Arc<Body>>,
}

impl Function {
    /// A callable known only by name; calling it is an error.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Function {
            name: name.into(),
            body: None,
        }
    }

    pub fn with_body<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Function {
            name: name.into(),
            body: Some(Arc::new(body)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match &self.body {
            Some(body) => Ok(body(args)),
            None => bail!("function `{}` has no body", self.name),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
