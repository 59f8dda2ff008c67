//! Type-directed conversions between native values and [`Value`] trees.
//!
//! A [`Registry`] holds two ordered rule lists, one per direction. Lookups walk them in
//! registration order and apply the first rule declared for the runtime type, so built-ins
//! always win over later registrations for the same type. Registration needs `&mut`, lookups
//! need `&`: finish registering before sharing the registry (for instance behind an `Arc`).
//!
//! ```rust
//! use json_tree::{Registry, Value};
//!
//! struct Celsius(f64);
//!
//! let mut registry = Registry::new();
//! registry.register_serializer(|c: &Celsius, _| Ok(Value::from(c.0)));
//!
//! assert_eq!(registry.serialize(&Celsius(21.5)).unwrap().to_string(), "21.5");
//! ```

use crate::{
    error::{Error, Result},
    number::Number,
    value::{Array, Object, Value},
};
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::{
    any::{type_name, Any, TypeId},
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
};

type SerializeFn = Box<dyn Fn(&dyn Any, &Registry) -> Result<Value> + Send + Sync>;
type DeserializeFn = Box<dyn Fn(&Value, &Registry) -> Result<Box<dyn Any>> + Send + Sync>;

struct Rule<F> {
    type_id: TypeId,
    type_name: &'static str,
    convert: F,
}

/// Enums without an explicit rule convert through their symbolic names.
pub trait EnumSymbols: Clone + 'static {
    fn symbol(&self) -> &'static str;

    fn variants() -> &'static [Self];
}

struct EnumRule {
    type_id: TypeId,
    type_name: &'static str,
    symbol: fn(&dyn Any) -> Option<&'static str>,
    parse: fn(&str) -> Option<Box<dyn Any>>,
}

fn enum_symbol<E: EnumSymbols>(value: &dyn Any) -> Option<&'static str> {
    value.downcast_ref::<E>().map(E::symbol)
}

fn enum_parse<E: EnumSymbols>(symbol: &str) -> Option<Box<dyn Any>> {
    E::variants()
        .iter()
        .find(|variant| variant.symbol() == symbol)
        .map(|variant| Box::new(variant.clone()) as Box<dyn Any>)
}

pub struct Registry {
    serializers: Vec<Rule<SerializeFn>>,
    deserializers: Vec<Rule<DeserializeFn>>,
    enums: Vec<EnumRule>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("serializers", &rule_names(&self.serializers))
            .field("deserializers", &rule_names(&self.deserializers))
            .field(
                "enums",
                &self.enums.iter().map(|e| e.type_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn rule_names<F>(rules: &[Rule<F>]) -> Vec<&'static str> {
    rules.iter().map(|rule| rule.type_name).collect()
}

fn number<'a>(value: &'a Value) -> Result<&'a Number> {
    value
        .as_number()
        .ok_or_else(|| value.mismatch("number").into())
}

macro_rules! register_integers {
    ($registry:ident, $($ty:ty),*) => {
        $(
            $registry.register_serializer(|value: &$ty, _| Ok(Value::from(*value)));
            $registry.register_deserializer(|value, _| Ok(number(value)?.to_i64() as $ty));
        )*
    };
}

macro_rules! register_collections {
    ($registry:ident, $($ty:ty),*) => {
        $(
            $registry.register_sequence::<$ty>();
            $registry.register_map::<$ty>();
        )*
    };
}

macro_rules! register_collection_serializers {
    ($registry:ident, $($ty:ty),*) => {
        $(
            $registry.register_sequence_serializers::<$ty>();
            $registry.register_map_serializers::<$ty>();
        )*
    };
}

impl Registry {
    /// A registry without any rule.
    pub fn empty() -> Self {
        Self {
            serializers: Vec::new(),
            deserializers: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// A registry seeded with the built-in rules.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        self.register_serializer(|value: &Value, _| Ok(value.clone()));
        self.register_deserializer(|value, _| Ok(value.clone()));
        self.register_serializer(|value: &Number, _| Ok(Value::Number(value.clone())));
        self.register_deserializer(|value, _| Ok(number(value)?.clone()));
        self.register_serializer(|value: &Array, _| Ok(Value::Array(value.clone())));
        self.register_deserializer(|value, _| match value {
            Value::Array(array) => Ok(array.clone()),
            other => Err(other.mismatch("array").into()),
        });
        self.register_serializer(|value: &Object, _| Ok(Value::Object(value.clone())));
        self.register_deserializer(|value, _| match value {
            Value::Object(obj) => Ok(obj.clone()),
            other => Err(other.mismatch("object").into()),
        });

        let registry = self;
        register_integers!(registry, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

        registry.register_serializer(|value: &f32, _| Ok(Value::Number(Number::try_from(*value)?)));
        registry.register_deserializer(|value, _| Ok(number(value)?.to_f32()));
        registry.register_serializer(|value: &f64, _| Ok(Value::Number(Number::try_from(*value)?)));
        registry.register_deserializer(|value, _| Ok(number(value)?.to_f64()));
        registry.register_serializer(|value: &BigInt, _| Ok(Value::from(value.clone())));
        registry.register_deserializer(|value, _| Ok(number(value)?.to_big_int()));
        registry.register_serializer(|value: &BigDecimal, _| Ok(Value::from(value.clone())));
        registry.register_deserializer(|value, _| Ok(number(value)?.to_big_decimal()));

        registry.register_serializer(|value: &bool, _| Ok(Value::Bool(*value)));
        registry.register_deserializer(|value, _| match value {
            Value::Bool(bool) => Ok(*bool),
            other => Err(other.mismatch("boolean").into()),
        });

        registry.register_serializer(|value: &String, _| Ok(Value::String(value.clone())));
        registry.register_deserializer(|value, _| match value {
            Value::String(str) => Ok(str.clone()),
            other => Err(other.mismatch("string").into()),
        });
        registry.register_serializer(|value: &&'static str, _| Ok(Value::from(*value)));
        registry.register_serializer(|value: &char, _| Ok(Value::String(value.to_string())));

        // Heterogeneous containers hold boxed values; a boxed rule unwraps one level
        registry.register_serializer(|value: &Box<dyn Any>, registry| {
            registry.serialize_dyn(&**value)
        });
        registry.register_deserializer(|value, _| Ok(Box::new(value.clone()) as Box<dyn Any>));

        register_collections!(
            registry,
            Value,
            Box<dyn Any>,
            Number,
            Array,
            Object,
            i8,
            i16,
            i32,
            i64,
            isize,
            u8,
            u16,
            u32,
            u64,
            usize,
            f32,
            f64,
            BigInt,
            BigDecimal,
            bool,
            String
        );
        register_collection_serializers!(registry, &'static str, char);
    }

    /// Appends a rule converting `T` into a [`Value`].
    pub fn register_serializer<T, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        F: Fn(&T, &Registry) -> Result<Value> + Send + Sync + 'static,
    {
        tracing::debug!(
            type_name = type_name::<T>(),
            index = self.serializers.len(),
            "registered serializer"
        );

        self.serializers.push(Rule {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            convert: Box::new(move |value: &dyn Any, registry: &Registry| {
                match value.downcast_ref::<T>() {
                    Some(value) => convert(value, registry),
                    None => Err(Error::UnsupportedType(type_name::<T>().to_owned())),
                }
            }),
        });

        self
    }

    /// Appends a rule converting a [`Value`] into `T`.
    pub fn register_deserializer<T, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        F: Fn(&Value, &Registry) -> Result<T> + Send + Sync + 'static,
    {
        tracing::debug!(
            type_name = type_name::<T>(),
            index = self.deserializers.len(),
            "registered deserializer"
        );

        self.deserializers.push(Rule {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            convert: Box::new(move |value: &Value, registry: &Registry| {
                convert(value, registry).map(|native| Box::new(native) as Box<dyn Any>)
            }),
        });

        self
    }

    /// Registers `Vec<T>` and `VecDeque<T>` in both directions, converting each element
    /// through this registry.
    pub fn register_sequence<T: Any>(&mut self) -> &mut Self {
        self.register_sequence_serializers::<T>();
        self.register_deserializer(|value, registry| deserialize_all::<T, Vec<T>>(value, registry));
        self.register_deserializer(|value, registry| {
            deserialize_all::<T, VecDeque<T>>(value, registry)
        });

        self
    }

    /// Registers string-keyed `HashMap`, `BTreeMap` and `IndexMap` of `T` in both directions.
    pub fn register_map<T: Any>(&mut self) -> &mut Self {
        self.register_map_serializers::<T>();
        self.register_deserializer(|value, registry| {
            deserialize_entries::<T, HashMap<String, T>>(value, registry)
        });
        self.register_deserializer(|value, registry| {
            deserialize_entries::<T, BTreeMap<String, T>>(value, registry)
        });
        self.register_deserializer(|value, registry| {
            deserialize_entries::<T, IndexMap<String, T>>(value, registry)
        });

        self
    }

    fn register_sequence_serializers<T: Any>(&mut self) -> &mut Self {
        self.register_serializer(|values: &Vec<T>, registry| serialize_all(values, registry));
        self.register_serializer(|values: &VecDeque<T>, registry| serialize_all(values, registry))
    }

    fn register_map_serializers<T: Any>(&mut self) -> &mut Self {
        self.register_serializer(|entries: &HashMap<String, T>, registry| {
            serialize_entries(entries, registry)
        });
        self.register_serializer(|entries: &BTreeMap<String, T>, registry| {
            serialize_entries(entries, registry)
        });
        self.register_serializer(|entries: &IndexMap<String, T>, registry| {
            serialize_entries(entries, registry)
        })
    }

    /// Lets `E` fall back to its symbolic names when no explicit rule matches it.
    pub fn register_enum<E: EnumSymbols>(&mut self) -> &mut Self {
        tracing::debug!(type_name = type_name::<E>(), "registered enum");

        self.enums.push(EnumRule {
            type_id: TypeId::of::<E>(),
            type_name: type_name::<E>(),
            symbol: enum_symbol::<E>,
            parse: enum_parse::<E>,
        });

        self
    }

    /// Converts `value` through the first rule declared for `T`, then through its enum names.
    pub fn serialize<T: Any>(&self, value: &T) -> Result<Value> {
        self.serialize_as(value, type_name::<T>())
    }

    /// Like [`Registry::serialize`] for a value only known at runtime.
    pub fn serialize_dyn(&self, value: &dyn Any) -> Result<Value> {
        self.serialize_as(value, "dyn Any")
    }

    fn serialize_as(&self, value: &dyn Any, type_name: &str) -> Result<Value> {
        let type_id = value.type_id();

        if let Some(rule) = self.serializers.iter().find(|r| r.type_id == type_id) {
            return (rule.convert)(value, self);
        }

        if let Some((rule, symbol)) = self
            .enums
            .iter()
            .find_map(|rule| (rule.symbol)(value).map(|symbol| (rule, symbol)))
        {
            tracing::trace!(type_name = rule.type_name, symbol, "serialized enum by name");
            return Ok(Value::String(symbol.to_owned()));
        }

        tracing::trace!(type_name, ?type_id, "no serializer matched");
        Err(Error::UnsupportedType(format!("{} ({:?})", type_name, type_id)))
    }

    /// `None` serializes to `Null`.
    pub fn serialize_option(&self, value: Option<&dyn Any>) -> Result<Value> {
        match value {
            Some(value) => self.serialize_dyn(value),
            None => Ok(Value::Null),
        }
    }

    /// `Null` deserializes to `None`, anything else through the first rule declared for `T`.
    pub fn deserialize<T: Any>(&self, value: &Value) -> Result<Option<T>> {
        match value {
            Value::Null => Ok(None),
            value => self.deserialize_required(value).map(Some),
        }
    }

    /// Like [`Registry::deserialize`], but `Null` goes through the rules as well.
    pub fn deserialize_required<T: Any>(&self, value: &Value) -> Result<T> {
        let type_id = TypeId::of::<T>();

        if let Some(rule) = self.deserializers.iter().find(|r| r.type_id == type_id) {
            let native = (rule.convert)(value, self)?;
            return native
                .downcast::<T>()
                .map(|native| *native)
                .map_err(|_| Error::UnsupportedType(type_name::<T>().to_owned()));
        }

        if let Some(rule) = self.enums.iter().find(|r| r.type_id == type_id) {
            let symbol = value
                .as_str()
                .ok_or_else(|| Error::from(value.mismatch("string")))?;

            return (rule.parse)(symbol)
                .and_then(|native| native.downcast::<T>().ok())
                .map(|native| *native)
                .ok_or_else(|| {
                    tracing::trace!(type_name = rule.type_name, symbol, "no enum variant matched");
                    Error::UnsupportedType(format!("{} has no variant '{}'", rule.type_name, symbol))
                });
        }

        tracing::trace!(type_name = type_name::<T>(), "no deserializer matched");
        Err(Error::UnsupportedType(type_name::<T>().to_owned()))
    }
}

fn serialize_all<'a, T, I>(values: I, registry: &Registry) -> Result<Value>
where
    T: Any,
    I: IntoIterator<Item = &'a T>,
{
    values
        .into_iter()
        .map(|value| registry.serialize(value))
        .collect::<Result<Array>>()
        .map(Value::Array)
}

fn deserialize_all<T, C>(value: &Value, registry: &Registry) -> Result<C>
where
    T: Any,
    C: FromIterator<T>,
{
    match value {
        Value::Array(array) => array
            .iter()
            .map(|element| registry.deserialize_required::<T>(element))
            .collect(),
        other => Err(other.mismatch("array").into()),
    }
}

fn serialize_entries<'a, T, I>(entries: I, registry: &Registry) -> Result<Value>
where
    T: Any,
    I: IntoIterator<Item = (&'a String, &'a T)>,
{
    entries
        .into_iter()
        .map(|(key, value)| -> Result<(String, Value)> {
            Ok((key.clone(), registry.serialize(value)?))
        })
        .collect::<Result<Object>>()
        .map(Value::Object)
}

fn deserialize_entries<T, C>(value: &Value, registry: &Registry) -> Result<C>
where
    T: Any,
    C: FromIterator<(String, T)>,
{
    match value {
        Value::Object(obj) => obj
            .iter()
            .map(|(key, value)| -> Result<(String, T)> {
                Ok((key.clone(), registry.deserialize_required::<T>(value)?))
            })
            .collect(),
        other => Err(other.mismatch("object").into()),
    }
}
