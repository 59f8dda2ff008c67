use crate::{
    error::{Error, Result},
    value::Value,
};
use std::{
    fmt::{self, Write},
    io,
};

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

const INDENT: &str = "    ";

/// The whitespace policy shared by the recursive writer.
pub trait Formatter {
    /// Written before every element of a non-empty array or object, and before its closing
    /// bracket. `depth` is the nesting level the next token sits at.
    fn line<W: Write + ?Sized>(&self, out: &mut W, depth: usize) -> fmt::Result;

    fn key_separator(&self) -> &'static str;
}

/// No inserted whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compact;

impl Formatter for Compact {
    fn line<W: Write + ?Sized>(&self, _out: &mut W, _depth: usize) -> fmt::Result {
        Ok(())
    }

    fn key_separator(&self) -> &'static str {
        ":"
    }
}

/// One element per line, four spaces per nesting level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pretty;

impl Formatter for Pretty {
    fn line<W: Write + ?Sized>(&self, out: &mut W, depth: usize) -> fmt::Result {
        out.write_str(LINE_SEPARATOR)?;
        for _ in 0..depth {
            out.write_str(INDENT)?;
        }

        Ok(())
    }

    fn key_separator(&self) -> &'static str {
        ": "
    }
}

pub struct Serializer<W, F> {
    out: W,
    formatter: F,
}

impl<W: Write> Serializer<W, Compact> {
    pub fn compact(out: W) -> Self {
        Self::with_formatter(out, Compact)
    }
}

impl<W: Write> Serializer<W, Pretty> {
    pub fn pretty(out: W) -> Self {
        Self::with_formatter(out, Pretty)
    }
}

impl<W: Write, F: Formatter> Serializer<W, F> {
    pub fn with_formatter(out: W, formatter: F) -> Self {
        Self { out, formatter }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn serialize(&mut self, value: &Value) -> fmt::Result {
        self.write_value(value, 0)
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> fmt::Result {
        match value {
            Value::Null => self.out.write_str("null"),
            Value::Bool(true) => self.out.write_str("true"),
            Value::Bool(false) => self.out.write_str("false"),
            Value::Number(num) => write!(self.out, "{}", num),
            Value::String(str) => write_escaped(&mut self.out, str),
            Value::Array(array) if array.is_empty() => self.out.write_str("[]"),
            Value::Array(array) => {
                self.out.write_char('[')?;

                for (i, element) in array.iter().enumerate() {
                    if i > 0 {
                        self.out.write_char(',')?;
                    }
                    self.formatter.line(&mut self.out, depth + 1)?;
                    self.write_value(element, depth + 1)?;
                }

                self.formatter.line(&mut self.out, depth)?;
                self.out.write_char(']')
            }
            Value::Object(obj) if obj.is_empty() => self.out.write_str("{}"),
            Value::Object(obj) => {
                self.out.write_char('{')?;

                for (i, (key, element)) in obj.iter().enumerate() {
                    if i > 0 {
                        self.out.write_char(',')?;
                    }
                    self.formatter.line(&mut self.out, depth + 1)?;
                    write_escaped(&mut self.out, key)?;
                    self.out.write_str(self.formatter.key_separator())?;
                    self.write_value(element, depth + 1)?;
                }

                self.formatter.line(&mut self.out, depth)?;
                self.out.write_char('}')
            }
        }
    }
}

fn write_escaped<W: Write>(out: &mut W, str: &str) -> fmt::Result {
    out.write_char('"')?;

    let mut start = 0;
    for (i, c) in str.char_indices() {
        let escape = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\u{08}' => "\\b",
            '\u{0C}' => "\\f",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };

        out.write_str(&str[start..i])?;
        if escape.is_empty() {
            write!(out, "\\u{:04x}", c as u32)?;
        } else {
            out.write_str(escape)?;
        }
        start = i + c.len_utf8();
    }

    out.write_str(&str[start..])?;
    out.write_char('"')
}

pub(crate) fn write_compact<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    Serializer::compact(out).serialize(value)
}

pub(crate) fn write_pretty<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    Serializer::pretty(out).serialize(value)
}

fn generation_error(_: fmt::Error) -> Error {
    Error::Generation("formatter reported an error".into())
}

pub fn to_string(value: &Value) -> Result<String> {
    let mut out = String::new();
    write_compact(&mut out, value).map_err(generation_error)?;
    Ok(out)
}

pub fn to_string_pretty(value: &Value) -> Result<String> {
    let mut out = String::new();
    write_pretty(&mut out, value).map_err(generation_error)?;
    Ok(out)
}

pub fn to_writer<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    write_io(writer, value, Compact)
}

pub fn to_writer_pretty<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    write_io(writer, value, Pretty)
}

fn write_io<W: io::Write, F: Formatter>(writer: W, value: &Value, formatter: F) -> Result<()> {
    let mut adapter = IoAdapter {
        inner: writer,
        error: None,
    };

    let written = Serializer::with_formatter(&mut adapter, formatter).serialize(value);

    match (written, adapter.error) {
        (_, Some(e)) => Err(Error::Generation(format!("I/O error while generating json: {}", e))),
        (Err(e), None) => Err(generation_error(e)),
        (Ok(()), None) => adapter
            .inner
            .flush()
            .map_err(|e| Error::Generation(format!("I/O error while generating json: {}", e))),
    }
}

// fmt::Error carries nothing, so the underlying io::Error is kept aside.
struct IoAdapter<W> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> Write for IoAdapter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}
