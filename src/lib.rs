#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::needless_doctest_main)]
//! This crate is an in-memory json tree: a parser turning text into a [`Value`], a writer turning it back into text, and a [`Registry`] converting between trees and your own types. Numbers are kept as arbitrary-precision decimals, so nothing is lost between reading and writing a document.
//!
//! ## Why use it ?
//!
//! The tree is loosely typed, which is handy when the shape of a document is only known at runtime. The typed accessors on [`Array`] and [`Object`] let you read it back with a default in case a value is missing or of the wrong kind, and parse errors tell you the exact line and column of the problem.
//!
//! ## How to use it ?
//!
//! ### Parsing
//!
//! ```rust
//! use json_tree::parse;
//!
//! fn main() {
//!     let parsed = parse(r#"{"hello": "world", "count": 12345678901234567890}"#).unwrap();
//!
//!     let obj = parsed.as_object().unwrap();
//!
//!     assert_eq!(obj.get_string("hello").unwrap(), "world");
//!     assert_eq!(obj.get_int_safe("missing"), 0);
//!     println!("Parsed: {:#}", parsed);
//! }
//! ```
//!
//! ### Building and writing
//!
//! ```rust
//! use json_tree::{to_string, Array, Object};
//!
//! fn main() {
//!     let mut tags = Array::new();
//!     tags.add("a").add(None::<i32>);
//!
//!     let mut obj = Object::new();
//!     obj.put("tags", tags);
//!     obj.put("ratio", 0.5);
//!
//!     assert_eq!(to_string(&obj.into()).unwrap(), r#"{"tags":["a",null],"ratio":0.5}"#);
//! }
//! ```
//!
//! ### Converting your own types
//!
//! ```rust
//! use json_tree::{Registry, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Meters(i64);
//!
//! fn main() {
//!     let mut registry = Registry::new();
//!     registry
//!         .register_serializer(|m: &Meters, _| Ok(Value::from(m.0)))
//!         .register_deserializer(|value, _| Ok(Meters(value.as_number().map_or(0, |n| n.to_i64()))));
//!
//!     let value = registry.serialize(&Meters(42)).unwrap();
//!
//!     assert_eq!(registry.deserialize::<Meters>(&value).unwrap(), Some(Meters(42)));
//! }
//! ```
//!
//! ### With serde
//!
//! [`Value`] implements [Serialize](https://docs.rs/serde/latest/serde/ser/trait.Serialize.html) and [Deserialize](https://docs.rs/serde/latest/serde/de/trait.Deserialize.html), so a tree can go through any serde data format:
//!
//! ```rust
//! use serde::Deserialize;
//! use json_tree::parse;
//!
//! #[derive(Deserialize)]
//! struct Test {
//!     pub hello: String,
//! }
//!
//! fn main() {
//!     let parsed = parse(r#"{"hello": "world"}"#).unwrap();
//!
//!     let test: Test = serde_json::from_value(serde_json::to_value(parsed).unwrap()).unwrap();
//!
//!     println!("Test hello: {}", test.hello);
//! }
//! ```

extern crate bytecount;
extern crate memchr;
extern crate nom;
extern crate serde;

mod accessors;
mod input;
mod parser;
mod ser;

pub mod error;
pub mod number;
pub mod registry;
pub mod value;
pub mod writer;

pub use error::{AccessError, Error, Kind, ParseError, Position, Result};
pub use number::Number;
pub use parser::{from_reader, parse, Parser, MAX_DEPTH};
pub use registry::{EnumSymbols, Registry};
pub use value::{Array, Object, Value};
pub use writer::{to_string, to_string_pretty, to_writer, to_writer_pretty, Compact, Pretty};
