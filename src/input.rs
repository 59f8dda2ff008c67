use crate::error::Position;
use bytecount::num_chars;
use memchr::{memchr_iter, memrchr};
use nom::{
    AsBytes, Compare, CompareResult, Err, InputIter, InputLength, InputTake, InputTakeAtPosition,
    Needed, Offset, Slice,
};
use std::{
    ops::{Range, RangeFrom, RangeTo},
    str::{CharIndices, Chars},
};

/// A `&str` that knows the line and column of its first character.
///
/// Every slice recomputes the position from the consumed prefix, so parsers built on it can
/// report where they failed without keeping a separate line table.
#[derive(Clone, Debug, Copy)]
pub struct Input<'a> {
    data: &'a str,
    line: usize,
    col: usize,
}

impl<'a> Input<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            data,
            line: 1,
            col: 1,
        }
    }

    pub fn location(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }

    pub fn fragment(&self) -> &'a str {
        self.data
    }

    pub fn peek(&self) -> Option<char> {
        self.data.chars().next()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn advance_to(&self, next_data: &'a str) -> Self {
        let offset = self.data.offset(next_data);

        if offset == 0 {
            return Self {
                data: next_data,
                ..*self
            };
        }

        let consumed = &self.data.as_bytes()[..offset];
        let lines = memchr_iter(b'\n', consumed).count();

        match memrchr(b'\n', consumed) {
            // Columns restart at 1 after a line feed
            Some(last) => Self {
                data: next_data,
                line: self.line + lines,
                col: num_chars(&consumed[last + 1..]) + 1,
            },
            None => Self {
                data: next_data,
                line: self.line,
                col: self.col + num_chars(consumed),
            },
        }
    }
}

impl<'a> AsBytes for Input<'a> {
    fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

impl<'a, 'b> Compare<&'b str> for Input<'a> {
    fn compare(&self, t: &'b str) -> CompareResult {
        self.data.compare(t)
    }

    fn compare_no_case(&self, t: &'b str) -> CompareResult {
        self.data.compare_no_case(t)
    }
}

impl<'a> InputIter for Input<'a> {
    type Item = char;
    type Iter = CharIndices<'a>;
    type IterElem = Chars<'a>;

    fn iter_indices(&self) -> Self::Iter {
        self.data.char_indices()
    }

    fn iter_elements(&self) -> Self::IterElem {
        self.data.chars()
    }

    fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(Self::Item) -> bool,
    {
        self.data.position(predicate)
    }

    fn slice_index(&self, count: usize) -> Result<usize, Needed> {
        self.data.slice_index(count)
    }
}

impl<'a> InputLength for Input<'a> {
    fn input_len(&self) -> usize {
        self.data.len()
    }
}

impl<'a> InputTake for Input<'a> {
    fn take(&self, count: usize) -> Self {
        self.slice(..count)
    }

    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.slice(count..), self.slice(..count))
    }
}

impl<'a> InputTakeAtPosition for Input<'a> {
    type Item = char;

    fn split_at_position<P, E: nom::error::ParseError<Self>>(
        &self,
        predicate: P,
    ) -> nom::IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.find(predicate) {
            Some(n) => Ok(self.take_split(n)),
            None => Err(Err::Incomplete(Needed::new(1))),
        }
    }

    fn split_at_position1<P, E: nom::error::ParseError<Self>>(
        &self,
        predicate: P,
        e: nom::error::ErrorKind,
    ) -> nom::IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.find(predicate) {
            Some(0) => Err(Err::Error(E::from_error_kind(*self, e))),
            Some(n) => Ok(self.take_split(n)),
            None => Err(Err::Incomplete(Needed::new(1))),
        }
    }

    fn split_at_position_complete<P, E: nom::error::ParseError<Self>>(
        &self,
        predicate: P,
    ) -> nom::IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.find(predicate) {
            Some(n) => Ok(self.take_split(n)),
            None => Ok(self.take_split(self.input_len())),
        }
    }

    fn split_at_position1_complete<P, E: nom::error::ParseError<Self>>(
        &self,
        predicate: P,
        e: nom::error::ErrorKind,
    ) -> nom::IResult<Self, Self, E>
    where
        P: Fn(Self::Item) -> bool,
    {
        match self.data.find(predicate) {
            Some(0) => Err(Err::Error(E::from_error_kind(*self, e))),
            Some(n) => Ok(self.take_split(n)),
            None if self.data.is_empty() => Err(Err::Error(E::from_error_kind(*self, e))),
            None => Ok(self.take_split(self.input_len())),
        }
    }
}

impl<'a> Offset for Input<'a> {
    fn offset(&self, second: &Self) -> usize {
        self.data.offset(second.data)
    }
}

impl<'a> Slice<Range<usize>> for Input<'a> {
    fn slice(&self, range: Range<usize>) -> Self {
        self.advance_to(&self.data[range])
    }
}

impl<'a> Slice<RangeTo<usize>> for Input<'a> {
    fn slice(&self, range: RangeTo<usize>) -> Self {
        self.advance_to(&self.data[range])
    }
}

impl<'a> Slice<RangeFrom<usize>> for Input<'a> {
    fn slice(&self, range: RangeFrom<usize>) -> Self {
        self.advance_to(&self.data[range])
    }
}
