use crate::error::{Error, Kind, ParseError};
use crate::input::Input;
use crate::number::Number;
use crate::value::{Array, Object, Value};
use bigdecimal::BigDecimal;
use nom::{
    bytes::complete::{tag, take, take_while},
    character::complete::{anychar, char, one_of},
    multi::fold_many0,
    Err, IResult,
};
use std::io::Read;
use std::str::FromStr;

pub type Span<'a> = Input<'a>;

pub type Result<'a, R> = IResult<Span<'a>, R, ParseError>;
pub type ParseResult = std::result::Result<Value, ParseError>;

fn failure<'a, R>(at: Span<'a>, kind: Kind) -> Result<'a, R> {
    Err(Err::Failure(ParseError::new(at.location(), kind)))
}

fn whitespace(i: Span) -> Result<Span> {
    take_while(|c: char| c.is_whitespace())(i)
}

fn is_number_char(c: char) -> bool {
    matches!(c, '0'..='9' | '.' | 'e' | 'E' | '+' | '-')
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn literal(word: &'static str, value: Value) -> impl FnMut(Span) -> Result<Value> {
    move |i: Span| match tag::<_, _, ParseError>(word)(i) {
        Ok((i, _)) => Ok((i, value.clone())),
        Err(_) => {
            let matching = word
                .chars()
                .zip(i.fragment().chars())
                .take_while(|(expected, found)| expected == found)
                .count();
            let (at, _) = take::<_, _, ParseError>(matching)(i)?;

            failure(at, Kind::ExpectedLiteral(word))
        }
    }
}

fn number(i: Span) -> Result<Number> {
    let (rest, text) = take_while::<_, _, ParseError>(is_number_char)(i)?;

    // "12\n34" is one number broken over two lines, not two numbers
    let (after, breaks) = take_while::<_, _, ParseError>(is_line_break)(rest)?;
    if !breaks.is_empty() && after.peek().is_some_and(is_number_char) {
        return failure(rest, Kind::LineBreakInNumber);
    }

    match BigDecimal::from_str(text.fragment()) {
        Ok(value) => Ok((rest, Number::new(value))),
        Err(e) => failure(
            i,
            Kind::InvalidNumber {
                literal: text.fragment().to_owned(),
                reason: e.to_string(),
            },
        ),
    }
}

fn hex_unit(i: Span) -> Result<u16> {
    let (rest, digits) = match take::<_, _, ParseError>(4usize)(i) {
        Ok(v) => v,
        Err(_) => return failure(i, Kind::InvalidHex(i.fragment().to_owned())),
    };

    let hex = digits.fragment();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return failure(i, Kind::InvalidHex(hex.to_owned()));
    }

    match u16::from_str_radix(hex, 16) {
        Ok(unit) => Ok((rest, unit)),
        Err(_) => failure(i, Kind::InvalidHex(hex.to_owned())),
    }
}

fn unicode_escape(i: Span) -> Result<char> {
    let (rest, unit) = hex_unit(i)?;

    match unit {
        0xD800..=0xDBFF => {
            // See https://en.wikipedia.org/wiki/UTF-16#Code_points_from_U+010000_to_U+10FFFF
            let low = tag::<_, _, ParseError>("\\u")(rest).and_then(|(rest, _)| hex_unit(rest));

            match low {
                Ok((rest, low @ 0xDC00..=0xDFFF)) => {
                    let high_ten = (unit as u32) - 0xD800;
                    let low_ten = (low as u32) - 0xDC00;
                    match std::char::from_u32((high_ten << 10) + low_ten + 0x10000) {
                        Some(c) => Ok((rest, c)),
                        None => failure(i, Kind::LoneSurrogate(unit)),
                    }
                }
                _ => failure(i, Kind::LoneSurrogate(unit)),
            }
        }
        0xDC00..=0xDFFF => failure(i, Kind::LoneSurrogate(unit)),
        unit => match std::char::from_u32(unit as u32) {
            Some(c) => Ok((rest, c)),
            None => failure(i, Kind::LoneSurrogate(unit)),
        },
    }
}

/// One logical character of a string body. Stops with a recoverable error on the closing quote.
fn string_char(i: Span) -> Result<char> {
    let (rest, c) = anychar::<_, ParseError>(i)?;

    match c {
        '"' => Err(Err::Error(ParseError::new(i.location(), Kind::ExpectedQuote))),
        c if is_line_break(c) => failure(i, Kind::LineBreakInString),
        '\\' => {
            let (after, escaped) = match anychar::<_, ParseError>(rest) {
                Ok(v) => v,
                Err(_) => return failure(rest, Kind::UnterminatedString),
            };

            match escaped {
                '"' | '\\' | '/' => Ok((after, escaped)),
                'b' => Ok((after, '\x08')),
                'f' => Ok((after, '\x0C')),
                'n' => Ok((after, '\n')),
                'r' => Ok((after, '\r')),
                't' => Ok((after, '\t')),
                'u' => unicode_escape(after),
                other => failure(rest, Kind::InvalidEscape(other)),
            }
        }
        c => Ok((rest, c)),
    }
}

/// A string body, `i` being just past the opening quote.
fn string(i: Span) -> Result<String> {
    let (rest, value) = fold_many0(string_char, String::new, |mut string, c| {
        string.push(c);
        string
    })(i)?;

    match char::<_, ParseError>('"')(rest) {
        Ok((rest, _)) => Ok((rest, value)),
        Err(_) => failure(rest, Kind::UnterminatedString),
    }
}

/// How many arrays and objects may be open at once.
pub const MAX_DEPTH: usize = 128;

/// An array body, `i` being just past `[`.
fn array(i: Span, depth: usize) -> Result<Array> {
    let mut array = Array::new();

    let (mut i, _) = whitespace(i)?;
    if let Ok((rest, _)) = char::<_, ParseError>(']')(i) {
        return Ok((rest, array));
    }

    loop {
        let (rest, value) = json_value(i, depth)?;
        array.add(value);

        let (rest, _) = whitespace(rest)?;
        match one_of::<_, _, ParseError>(",]")(rest) {
            Ok((rest, ',')) => (i, _) = whitespace(rest)?,
            Ok((rest, _)) => return Ok((rest, array)),
            Err(_) => return failure(rest, Kind::ExpectedCommaOrBracket),
        }
    }
}

/// An object body, `i` being just past `{`.
fn object(i: Span, depth: usize) -> Result<Object> {
    let mut object = Object::new();

    let (mut i, _) = whitespace(i)?;
    if let Ok((rest, _)) = char::<_, ParseError>('}')(i) {
        return Ok((rest, object));
    }

    loop {
        let (rest, key) = match char::<_, ParseError>('"')(i) {
            Ok((rest, _)) => string(rest)?,
            Err(_) => return failure(i, Kind::ExpectedQuote),
        };

        let (rest, _) = whitespace(rest)?;
        let (rest, _) = match char::<_, ParseError>(':')(rest) {
            Ok(v) => v,
            Err(_) => return failure(rest, Kind::ExpectedColon),
        };

        let (rest, _) = whitespace(rest)?;
        let (rest, value) = json_value(rest, depth)?;
        object.put(key, value);

        let (rest, _) = whitespace(rest)?;
        match one_of::<_, _, ParseError>(",}")(rest) {
            Ok((rest, ',')) => (i, _) = whitespace(rest)?,
            Ok((rest, _)) => return Ok((rest, object)),
            Err(_) => return failure(rest, Kind::ExpectedCommaOrBrace),
        }
    }
}

/// A single value starting exactly at `i`, inside `depth` open containers.
fn json_value(i: Span, depth: usize) -> Result<Value> {
    let first_char = match i.peek() {
        Some(c) => c,
        None => return failure(i, Kind::UnexpectedEnd),
    };

    match first_char {
        '{' | '[' if depth >= MAX_DEPTH => failure(i, Kind::RecursionLimitExceeded),
        '{' => {
            let (rest, _) = anychar::<_, ParseError>(i)?;
            let (rest, obj) = object(rest, depth + 1)?;
            Ok((rest, Value::Object(obj)))
        }
        '[' => {
            let (rest, _) = anychar::<_, ParseError>(i)?;
            let (rest, array) = array(rest, depth + 1)?;
            Ok((rest, Value::Array(array)))
        }
        '"' => {
            let (rest, _) = anychar::<_, ParseError>(i)?;
            let (rest, str) = string(rest)?;
            Ok((rest, Value::String(str)))
        }
        '-' | '0'..='9' => {
            let (rest, num) = number(i)?;
            Ok((rest, Value::Number(num)))
        }
        't' => literal("true", Value::Bool(true))(i),
        'f' => literal("false", Value::Bool(false))(i),
        'n' => literal("null", Value::Null)(i),
        c => failure(i, Kind::ValueNotAllowed(c)),
    }
}

fn unwrap_nom_error<T>(value: Result<T>) -> std::result::Result<(Span, T), ParseError> {
    match value {
        Ok(v) => Ok(v),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(e),
        // Every combinator in use is a `complete` one
        Err(Err::Incomplete(_)) => Err(ParseError::new(Default::default(), Kind::UnexpectedEnd)),
    }
}

/// A single-use parser over a fully buffered document.
pub struct Parser<'a> {
    input: Span<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            input: Span::new(source),
        }
    }

    /// Parses exactly one value surrounded by optional whitespace.
    ///
    /// A document holding nothing but whitespace parses to `Null`.
    pub fn parse(self) -> ParseResult {
        let (i, _) = unwrap_nom_error(whitespace(self.input))?;
        if i.is_empty() {
            return Ok(Value::Null);
        }

        let (i, value) = unwrap_nom_error(json_value(i, 0))?;

        let (i, _) = unwrap_nom_error(whitespace(i))?;
        if !i.is_empty() {
            return Err(ParseError::new(i.location(), Kind::CharsAfterRoot));
        }

        Ok(value)
    }
}

pub fn parse(s: &str) -> ParseResult {
    Parser::new(s).parse().map_err(|e| {
        tracing::debug!(line = e.line(), col = e.col(), kind = %e.kind, "failed to parse json");
        e
    })
}

/// Buffers the whole reader, then parses it.
pub fn from_reader<R: Read>(mut reader: R) -> std::result::Result<Value, Error> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;

    Ok(parse(&source)?)
}
