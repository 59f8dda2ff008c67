use crate::parser::Span;
use nom::error::{ErrorKind, FromExternalError, ParseError as NomParseError};
use std::fmt::{self, Display};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A 1-based line and column, the column being counted in characters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Kind {
    ValueNotAllowed(char),
    CharsAfterRoot,
    UnexpectedEnd,
    ExpectedLiteral(&'static str),
    ExpectedCommaOrBracket,
    ExpectedCommaOrBrace,
    ExpectedQuote,
    ExpectedColon,
    LineBreakInString,
    LineBreakInNumber,
    UnterminatedString,
    InvalidEscape(char),
    InvalidHex(String),
    LoneSurrogate(u16),
    InvalidNumber { literal: String, reason: String },
    RecursionLimitExceeded,
    NomError(ErrorKind),
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueNotAllowed(c) => write!(f, "value '{}' not allowed", c.escape_debug()),
            Self::CharsAfterRoot => write!(f, "value not allowed after the root value"),
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::ExpectedLiteral(literal) => write!(f, "value should be '{}'", literal),
            Self::ExpectedCommaOrBracket => write!(f, "there should be a ',' or a ']'"),
            Self::ExpectedCommaOrBrace => write!(f, "there should be either a ',' or a '}}'"),
            Self::ExpectedQuote => write!(f, "there should be a '\"'"),
            Self::ExpectedColon => write!(f, "there should be a ':'"),
            Self::LineBreakInString => write!(f, "there shouldn't be a new line inside a string"),
            Self::LineBreakInNumber => write!(f, "there shouldn't be a new line inside a number"),
            Self::UnterminatedString => write!(f, "string is missing its closing '\"'"),
            Self::InvalidEscape(c) => write!(f, "illegal escape character: '{}'", c.escape_debug()),
            Self::InvalidHex(hex) => write!(f, "'{}' is not a 4 digit hex number", hex),
            Self::LoneSurrogate(unit) => write!(f, "unpaired surrogate \\u{:04x}", unit),
            Self::InvalidNumber { literal, reason } => {
                write!(f, "invalid number '{}': {}", literal, reason)
            }
            Self::RecursionLimitExceeded => write!(f, "too many nested arrays and objects"),
            Self::NomError(kind) => write!(f, "{}", kind.description()),
        }
    }
}

/// Malformed input text, located at the offending character.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("{kind} at {position}")]
pub struct ParseError {
    pub position: Position,
    pub kind: Kind,
}

impl ParseError {
    pub fn new(position: Position, kind: Kind) -> Self {
        Self { position, kind }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn col(&self) -> usize {
        self.position.col
    }
}

impl<'a> NomParseError<Span<'a>> for ParseError {
    fn from_error_kind(input: Span<'a>, kind: ErrorKind) -> Self {
        let kind = if input.is_empty() {
            Kind::UnexpectedEnd
        } else {
            Kind::NomError(kind)
        };

        Self::new(input.location(), kind)
    }

    fn append(_input: Span<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, T> FromExternalError<Span<'a>, T> for ParseError {
    fn from_external_error(input: Span<'a>, kind: ErrorKind, _e: T) -> Self {
        Self::new(input.location(), Kind::NomError(kind))
    }
}

/// Variant-checked lookups on arrays and objects.
///
/// Kept apart from [`Error`] so that default-value accessors can only ever absorb these two
/// failures.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AccessError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0} not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to generate json: {0}")]
    Generation(String),
    #[error("type {0} is not supported")]
    UnsupportedType(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to read json: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the failures a default-value accessor may substitute.
    pub fn is_access(&self) -> bool {
        matches!(self, Self::Access(_))
    }
}
