use crate::{
    error::{AccessError, Error, Result},
    number::Number,
    registry::Registry,
    writer,
};
use bigdecimal::BigDecimal;
use indexmap::{map, IndexMap};
use num_bigint::BigInt;
use std::{
    any::Any,
    fmt::{self, Display},
    slice,
    str::FromStr,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(bool) => Some(*bool),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(str) => Some(str),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

/// `{}` writes compact json, `{:#}` writes it pretty.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writer::write_pretty(f, self)
        } else {
            writer::write_compact(f, self)
        }
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(crate::parse(s)?)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, BigInt, BigDecimal);

/// Non-finite floats have no json form and become `Null`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::try_from(value).map_or(Self::Null, Self::Number)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Number::try_from(value).map_or(Self::Null, Self::Number)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An ordered, dense sequence of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(Vec<Value>);

impl Array {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Value, AccessError> {
        self.0.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Value, AccessError> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .ok_or_else(|| AccessError::NotFound(format!("index {} (length {})", index, len)))
    }

    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        self.0.push(value.into());
        self
    }

    /// Serializes `value` through `registry` and appends the result.
    pub fn add_any<T: Any>(&mut self, value: &T, registry: &Registry) -> Result<&mut Self> {
        let value = registry.serialize(value)?;
        Ok(self.add(value))
    }

    /// Serializes `value` through `registry` and inserts the result at `index`.
    pub fn insert_any<T: Any>(
        &mut self,
        index: usize,
        value: &T,
        registry: &Registry,
    ) -> Result<&mut Self> {
        let value = registry.serialize(value)?;
        self.insert(index, value)?;
        Ok(self)
    }

    /// Inserts at `index`, shifting later elements; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), AccessError> {
        if index > self.0.len() {
            return Err(self.out_of_range(index));
        }

        self.0.insert(index, value.into());
        Ok(())
    }

    /// Replaces the element at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value, AccessError> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value.into()))
    }

    /// Serializes `value` through `registry` and replaces the element at `index` with it.
    pub fn set_any<T: Any>(&mut self, index: usize, value: &T, registry: &Registry) -> Result<Value> {
        let value = registry.serialize(value)?;
        Ok(self.set(index, value)?)
    }

    pub fn remove(&mut self, index: usize) -> Result<Value, AccessError> {
        if index >= self.0.len() {
            return Err(self.out_of_range(index));
        }

        Ok(self.0.remove(index))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Value> {
        self.0.iter_mut()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    fn out_of_range(&self, index: usize) -> AccessError {
        AccessError::NotFound(format!("index {} (length {})", index, self.0.len()))
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Value> for Array {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// String keys mapped to values in insertion order.
///
/// Overwriting a key keeps its original position; removing one keeps the order of the rest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(IndexMap<String, Value>);

impl Object {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<&Value, AccessError> {
        self.0.get(key).ok_or_else(|| missing(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, AccessError> {
        self.0.get_mut(key).ok_or_else(|| missing(key))
    }

    /// The value under `key`, or `default` when there is none.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.0.get(key).unwrap_or(default)
    }

    /// Stores `value` under `key` and returns the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Serializes `value` through `registry` and stores the result under `key`.
    pub fn put_any<T: Any>(
        &mut self,
        key: impl Into<String>,
        value: &T,
        registry: &Registry,
    ) -> Result<&mut Self> {
        let value = registry.serialize(value)?;
        self.put(key, value);
        Ok(self)
    }

    pub fn remove(&mut self, key: &str) -> Result<Value, AccessError> {
        self.0.shift_remove(key).ok_or_else(|| missing(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn contains_value(&self, value: &Value) -> bool {
        self.0.values().any(|v| v == value)
    }

    pub fn keys(&self) -> map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> map::IterMut<'_, String, Value> {
        self.0.iter_mut()
    }
}

fn missing(key: &str) -> AccessError {
    AccessError::NotFound(format!("key '{}'", key))
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
