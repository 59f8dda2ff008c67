use bigdecimal::BigDecimal;
use json_tree::{parse, AccessError, Array, EnumSymbols, Error, Number, Object, Registry, Value};
use num_bigint::BigInt;
use std::{
    any::Any,
    collections::{BTreeMap, HashMap, VecDeque},
};

#[derive(Debug, Clone, PartialEq)]
enum Color {
    Red,
    Green,
}

impl EnumSymbols for Color {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
        }
    }

    fn variants() -> &'static [Self] {
        &[Self::Red, Self::Green]
    }
}

#[derive(Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

struct Unknown;

fn point_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_serializer(|p: &Point, _| {
            let mut obj = Object::new();
            obj.put("x", p.x);
            obj.put("y", p.y);
            Ok(obj.into())
        })
        .register_deserializer(|value, _| {
            let obj = value
                .as_object()
                .ok_or_else(|| Error::InvalidArgument("not a point".into()))?;
            Ok(Point {
                x: obj.get_long("x")?,
                y: obj.get_long("y")?,
            })
        })
        .register_sequence::<Point>();

    registry
}

#[test]
fn serializes_builtins() {
    let registry = Registry::new();

    assert_eq!(registry.serialize(&5i32).unwrap(), Value::from(5));
    assert_eq!(registry.serialize(&u64::MAX).unwrap(), Value::from(u64::MAX));
    assert_eq!(registry.serialize(&0.5f64).unwrap().to_string(), "0.5");
    assert_eq!(registry.serialize(&true).unwrap(), Value::Bool(true));
    assert_eq!(registry.serialize(&"hi").unwrap(), Value::from("hi"));
    assert_eq!(registry.serialize(&'c').unwrap(), Value::from("c"));
    assert_eq!(
        registry.serialize(&String::from("owned")).unwrap(),
        Value::from("owned")
    );
    assert_eq!(registry.serialize(&Value::Null).unwrap(), Value::Null);
    assert_eq!(registry.serialize_option(None).unwrap(), Value::Null);
}

#[test]
fn non_finite_floats_are_invalid() {
    let err = Registry::new().serialize(&f64::NAN).unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn serializes_collections() {
    let registry = Registry::new();

    let value = registry.serialize(&vec![1i32, 2, 3]).unwrap();
    assert_eq!(value.to_string(), "[1,2,3]");

    let value = registry.serialize(&VecDeque::from(vec![true])).unwrap();
    assert_eq!(value.to_string(), "[true]");

    let mut map = BTreeMap::new();
    map.insert("b".to_owned(), 2i64);
    map.insert("a".to_owned(), 1i64);
    assert_eq!(registry.serialize(&map).unwrap().to_string(), r#"{"a":1,"b":2}"#);

    let mixed: Vec<Box<dyn Any>> = vec![
        Box::new(1i32),
        Box::new(String::from("x")),
        Box::new(Value::Null),
    ];
    assert_eq!(registry.serialize(&mixed).unwrap().to_string(), r#"[1,"x",null]"#);
}

macro_rules! assert_collections_of {
    ($registry:ident, $($ty:ty => $element:expr),*) => {
        $(
            let list: Vec<$ty> = vec![$element, $element];
            let value = $registry.serialize(&list).unwrap();
            assert_eq!(value.as_array().map(Array::len), Some(2), "{}", stringify!($ty));
            assert_eq!($registry.deserialize::<Vec<$ty>>(&value).unwrap(), Some(list));

            let deque: VecDeque<$ty> = VecDeque::from(vec![$element]);
            let value = $registry.serialize(&deque).unwrap();
            assert_eq!($registry.deserialize::<VecDeque<$ty>>(&value).unwrap(), Some(deque));

            let mut map: HashMap<String, $ty> = HashMap::new();
            map.insert("k".to_owned(), $element);
            let value = $registry.serialize(&map).unwrap();
            assert_eq!(value.as_object().map(Object::len), Some(1), "{}", stringify!($ty));
            assert_eq!($registry.deserialize::<HashMap<String, $ty>>(&value).unwrap(), Some(map));
        )*
    };
}

#[test]
fn collections_of_every_builtin() {
    let registry = Registry::new();

    assert_collections_of!(
        registry,
        i8 => -3,
        i16 => 300,
        i32 => 7,
        i64 => -9,
        isize => 11,
        u8 => 200,
        u16 => 60_000,
        u32 => 4_000_000,
        u64 => u64::MAX,
        usize => 42,
        f32 => 1.5,
        f64 => -0.25,
        bool => true,
        String => String::from("s"),
        BigInt => BigInt::from(10).pow(30),
        BigDecimal => "1.25".parse::<BigDecimal>().unwrap(),
        Number => "2.5".parse::<Number>().unwrap(),
        Value => Value::from("v"),
        Array => Array::from(vec![Value::Null]),
        Object => Object::from_iter([("a", 1)])
    );
}

#[test]
fn text_collections_serialize_only() {
    let registry = Registry::new();

    assert_eq!(registry.serialize(&vec!['a', 'b']).unwrap().to_string(), r#"["a","b"]"#);
    assert_eq!(registry.serialize(&vec!["x"]).unwrap().to_string(), r#"["x"]"#);

    let mut map = BTreeMap::new();
    map.insert("k".to_owned(), "v");
    assert_eq!(registry.serialize(&map).unwrap().to_string(), r#"{"k":"v"}"#);

    let err = registry.deserialize::<Vec<char>>(&parse(r#"["a"]"#).unwrap()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn deserializes_builtins() {
    let registry = Registry::new();

    assert_eq!(registry.deserialize::<i32>(&Value::from(7)).unwrap(), Some(7));
    assert_eq!(registry.deserialize::<u8>(&Value::from(300)).unwrap(), Some(44));
    assert_eq!(registry.deserialize::<f64>(&parse("1.5").unwrap()).unwrap(), Some(1.5));
    assert_eq!(
        registry.deserialize::<String>(&Value::from("s")).unwrap(),
        Some("s".to_owned())
    );
    assert_eq!(
        registry.deserialize::<Array>(&parse("[1]").unwrap()).unwrap(),
        Some(Array::from(vec![Value::from(1)]))
    );
}

#[test]
fn null_deserializes_to_none() {
    let registry = Registry::new();

    assert_eq!(registry.deserialize::<i32>(&Value::Null).unwrap(), None);
    assert_eq!(registry.deserialize::<String>(&Value::Null).unwrap(), None);
}

#[test]
fn wrong_variant_is_a_type_mismatch() {
    let err = Registry::new()
        .deserialize::<bool>(&Value::from("true"))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Access(AccessError::TypeMismatch {
            expected: "boolean",
            found: "string"
        })
    ));
}

#[test]
fn deserializes_collections() {
    let registry = Registry::new();

    let list = registry
        .deserialize::<Vec<i64>>(&parse("[1, 2, 3]").unwrap())
        .unwrap();
    assert_eq!(list, Some(vec![1, 2, 3]));

    let map = registry
        .deserialize::<HashMap<String, String>>(&parse(r#"{"a": "x", "b": "y"}"#).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["b"], "y");

    // Elements go through the rules even when they are null
    let values = registry
        .deserialize::<Vec<Value>>(&parse("[null, 1]").unwrap())
        .unwrap();
    assert_eq!(values, Some(vec![Value::Null, Value::from(1)]));

    let err = registry
        .deserialize::<Vec<i64>>(&parse("[1, null]").unwrap())
        .unwrap_err();
    assert!(err.is_access());
}

#[test]
fn custom_rules_after_builtins() {
    let registry = point_registry();

    let value = registry.serialize(&Point { x: 1, y: -2 }).unwrap();
    assert_eq!(value.to_string(), r#"{"x":1,"y":-2}"#);

    let point = registry.deserialize::<Point>(&value).unwrap();
    assert_eq!(point, Some(Point { x: 1, y: -2 }));

    let points = registry
        .deserialize::<Vec<Point>>(&parse(r#"[{"x": 0, "y": 0}, {"x": 3, "y": 4}]"#).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(points[1], Point { x: 3, y: 4 });
}

#[test]
fn builtins_win_over_later_rules() {
    let mut registry = Registry::new();
    registry.register_serializer(|_: &i32, _| Ok(Value::from("shadowed")));

    assert_eq!(registry.serialize(&1i32).unwrap(), Value::from(1));
}

#[test]
fn unsupported_types() {
    let registry = Registry::new();

    let err = registry.serialize(&Unknown).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(ref name) if name.contains("Unknown")));

    let err = registry.serialize(&vec![Unknown]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(ref name) if name.contains("Vec<")));

    let boxed: Box<dyn Any> = Box::new(Unknown);
    let err = registry.serialize(&boxed).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(ref name) if name.contains("dyn Any")));

    let err = registry.deserialize::<Point>(&Value::from(1)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(ref name) if name.contains("Point")));

    let err = Registry::empty().serialize(&1i32).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn enums_fall_back_to_symbols() {
    let mut registry = Registry::new();
    registry.register_enum::<Color>();

    assert_eq!(registry.serialize(&Color::Green).unwrap(), Value::from("GREEN"));
    assert_eq!(
        registry.deserialize::<Color>(&Value::from("RED")).unwrap(),
        Some(Color::Red)
    );

    let err = registry.deserialize::<Color>(&Value::from("red")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));

    let err = registry.deserialize::<Color>(&Value::from(1)).unwrap_err();
    assert!(err.is_access());
}

#[test]
fn explicit_rules_win_over_enum_symbols() {
    let mut registry = Registry::new();
    registry
        .register_enum::<Color>()
        .register_serializer(|c: &Color, _| Ok(Value::from(c.symbol().to_lowercase())));

    assert_eq!(registry.serialize(&Color::Red).unwrap(), Value::from("red"));
}

#[test]
fn unregistered_enums_are_unsupported() {
    let err = Registry::new().serialize(&Color::Red).unwrap_err();

    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn containers_convert_through_the_registry() {
    let registry = point_registry();

    let mut array = Array::new();
    array.add_any(&Point { x: 1, y: 1 }, &registry).unwrap();
    array.add_any(&Some(1), &registry).unwrap_err();

    let mut obj = Object::new();
    obj.put_any("origin", &Point { x: 0, y: 0 }, &registry).unwrap();

    assert_eq!(Value::from(array).to_string(), r#"[{"x":1,"y":1}]"#);
    assert_eq!(obj.get_any::<Point>("origin", &registry).unwrap(), Some(Point { x: 0, y: 0 }));
}

#[test]
fn registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Registry>();
    assert_send_sync::<Value>();
}
