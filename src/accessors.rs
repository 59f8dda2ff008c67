//! Variant-checked getters on [`Array`] and [`Object`].
//!
//! Every kind comes in three shapes: `get_<kind>` fails with an [`AccessError`],
//! `get_<kind>_or` falls back to a given default and `get_<kind>_safe` falls back to a
//! zero-like value. Booleans are never coerced from other variants.

use crate::{
    error::{AccessError, Result},
    number::Number,
    registry::Registry,
    value::{Array, Object, Value},
};
use std::{any::Any, sync::OnceLock};

static EMPTY_ARRAY: Array = Array::new();
static EMPTY_OBJECT: OnceLock<Object> = OnceLock::new();

macro_rules! numeric_accessors {
    ($key:ty; $($get:ident, $get_or:ident, $get_safe:ident => $ty:ty, $narrow:ident;)*) => {
        $(
            pub fn $get(&self, key: $key) -> Result<$ty, AccessError> {
                self.get_number(key).map(Number::$narrow)
            }

            pub fn $get_or(&self, key: $key, default: $ty) -> $ty {
                self.$get(key).unwrap_or(default)
            }

            pub fn $get_safe(&self, key: $key) -> $ty {
                self.$get_or(key, <$ty>::default())
            }
        )*
    };
}

macro_rules! typed_accessors {
    ($container:ty, $key:ty) => {
        impl $container {
            /// Whether the entry holds `Null`; a missing entry is a `NotFound` error.
            pub fn is_null(&self, key: $key) -> Result<bool, AccessError> {
                self.get(key).map(Value::is_null)
            }

            pub fn get_number(&self, key: $key) -> Result<&Number, AccessError> {
                let value = self.get(key)?;
                value.as_number().ok_or_else(|| value.mismatch("number"))
            }

            numeric_accessors! {
                $key;
                get_byte, get_byte_or, get_byte_safe => i8, to_i8;
                get_short, get_short_or, get_short_safe => i16, to_i16;
                get_int, get_int_or, get_int_safe => i32, to_i32;
                get_long, get_long_or, get_long_safe => i64, to_i64;
                get_float, get_float_or, get_float_safe => f32, to_f32;
                get_double, get_double_or, get_double_safe => f64, to_f64;
            }

            pub fn get_string(&self, key: $key) -> Result<&str, AccessError> {
                let value = self.get(key)?;
                value.as_str().ok_or_else(|| value.mismatch("string"))
            }

            pub fn get_string_or<'a>(&'a self, key: $key, default: &'a str) -> &'a str {
                self.get_string(key).unwrap_or(default)
            }

            pub fn get_string_safe(&self, key: $key) -> &str {
                self.get_string_or(key, "")
            }

            pub fn get_boolean(&self, key: $key) -> Result<bool, AccessError> {
                let value = self.get(key)?;
                value.as_bool().ok_or_else(|| value.mismatch("boolean"))
            }

            pub fn get_boolean_or(&self, key: $key, default: bool) -> bool {
                self.get_boolean(key).unwrap_or(default)
            }

            pub fn get_boolean_safe(&self, key: $key) -> bool {
                self.get_boolean_or(key, false)
            }

            pub fn get_array(&self, key: $key) -> Result<&Array, AccessError> {
                let value = self.get(key)?;
                value.as_array().ok_or_else(|| value.mismatch("array"))
            }

            pub fn get_array_or<'a>(&'a self, key: $key, default: &'a Array) -> &'a Array {
                self.get_array(key).unwrap_or(default)
            }

            pub fn get_array_safe(&self, key: $key) -> &Array {
                self.get_array_or(key, &EMPTY_ARRAY)
            }

            pub fn get_object(&self, key: $key) -> Result<&Object, AccessError> {
                let value = self.get(key)?;
                value.as_object().ok_or_else(|| value.mismatch("object"))
            }

            pub fn get_object_or<'a>(&'a self, key: $key, default: &'a Object) -> &'a Object {
                self.get_object(key).unwrap_or(default)
            }

            pub fn get_object_safe(&self, key: $key) -> &Object {
                self.get_object_or(key, EMPTY_OBJECT.get_or_init(Object::new))
            }

            /// Converts the entry to `T` through `registry`. A `Null` entry gives `None`.
            pub fn get_any<T: Any>(&self, key: $key, registry: &Registry) -> Result<Option<T>> {
                registry.deserialize(self.get(key)?)
            }

            /// Like `get_any`, falling back to `default` when the entry is missing, `Null`
            /// or of the wrong variant. Conversion failures still propagate.
            pub fn get_any_or<T: Any>(
                &self,
                key: $key,
                registry: &Registry,
                default: T,
            ) -> Result<T> {
                match self.get_any(key, registry) {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => Ok(default),
                    Err(e) if e.is_access() => Ok(default),
                    Err(e) => Err(e),
                }
            }
        }
    };
}

typed_accessors!(Array, usize);
typed_accessors!(Object, &str);
