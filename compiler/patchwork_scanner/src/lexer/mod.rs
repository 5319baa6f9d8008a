//! Host character cursor.
//!
//! The host parsing engine owns the input and lends the scanner a cursor for
//! one token at a time. The scanner never sees byte offsets: it peeks the
//! current character, consumes characters, and marks where the token ends.
//!
//! # Token boundaries
//!
//! - Characters consumed with `advance(true)` are insignificant whitespace;
//!   they are only legal before the first significant character and move the
//!   token start forward.
//! - `mark_end()` fixes the token end at the current position. Characters
//!   consumed after the last mark are lookahead: the host rescans them as
//!   part of the next token.
//! - If no mark was made the token ends at the current position.
//! - If the scanner declines, the host discards every advance of the attempt.
//!
//! [`StrLexer`] implements these rules over a `&str` for the reference driver
//! and for tests.

use std::fmt;
use std::ops::Range;

/// Character cursor supplied by the host for a single scan attempt.
pub trait Lexer {
    /// Current character, or `'\0'` at end of input.
    ///
    /// Interior NUL characters also return `'\0'`; use [`eof()`](Self::eof)
    /// to tell them apart.
    fn lookahead(&self) -> char;

    /// Consume the current character.
    ///
    /// `skip` marks it as insignificant whitespace that belongs to no token.
    /// Advancing at end of input does nothing.
    fn advance(&mut self, skip: bool);

    /// End the token at the current position.
    fn mark_end(&mut self);

    /// Returns `true` once every character has been consumed.
    fn eof(&self) -> bool;
}

/// Half-open byte range `start..end` in the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// The span as a `usize` range for slicing.
    #[inline]
    pub fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// [`Lexer`] over a string slice with host token-boundary semantics.
///
/// One scan attempt runs from [`origin()`](Self::origin) until the driver
/// calls [`accept()`](Self::accept) or [`reject()`](Self::reject).
#[derive(Clone, Debug)]
pub struct StrLexer<'a> {
    source: &'a str,
    /// Position where the current attempt began.
    origin: u32,
    /// Token start: `origin` moved past skipped whitespace.
    start: u32,
    /// Current read position.
    pos: u32,
    /// Last `mark_end()` position of the current attempt.
    marked_end: Option<u32>,
}

impl<'a> StrLexer<'a> {
    /// Create a lexer positioned at the start of `source`.
    ///
    /// Sources longer than `u32::MAX` bytes are truncated to that length.
    pub fn new(source: &'a str) -> Self {
        Self::at(source, 0)
    }

    /// Create a lexer positioned at byte `offset`.
    ///
    /// The offset is clamped to the source length and moved back to the
    /// nearest character boundary.
    pub fn at(source: &'a str, offset: u32) -> Self {
        let mut lexer = Self {
            source,
            origin: 0,
            start: 0,
            pos: 0,
            marked_end: None,
        };
        let mut offset = (offset as usize).min(lexer.source_len() as usize);
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "offset <= source_len which fits in u32"
        )]
        lexer.begin(offset as u32);
        lexer
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Position where the current attempt began.
    #[inline]
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Whitespace skipped so far in the current attempt.
    pub fn skipped(&self) -> Span {
        Span::new(self.origin, self.start)
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span.as_range()]
    }

    /// Finish the attempt with a token and start the next attempt at its end.
    ///
    /// Returns the token span, which excludes skipped whitespace and any
    /// lookahead consumed after the last `mark_end()`.
    pub fn accept(&mut self) -> Span {
        let end = self.marked_end.unwrap_or(self.pos).max(self.start);
        let span = Span::new(self.start, end);
        self.begin(end);
        span
    }

    /// Abandon the attempt, rewinding to its origin.
    pub fn reject(&mut self) {
        self.begin(self.origin);
    }

    /// Consume `len` bytes as host-grammar text and start the next attempt
    /// after them. Returns the consumed span.
    ///
    /// `len` is clamped to the remaining input and to a character boundary.
    pub fn consume_host(&mut self, len: u32) -> Span {
        let start = self.origin;
        let mut end = (start as usize + len as usize).min(self.source_len() as usize);
        while !self.source.is_char_boundary(end) {
            end += 1;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "end <= source_len which fits in u32"
        )]
        let end = end as u32;
        self.begin(end);
        Span::new(start, end)
    }

    /// Unscanned input from the attempt origin.
    pub fn rest(&self) -> &'a str {
        &self.source[self.origin as usize..self.source_len() as usize]
    }

    fn begin(&mut self, at: u32) {
        self.origin = at;
        self.start = at;
        self.pos = at;
        self.marked_end = None;
    }

    fn source_len(&self) -> u32 {
        u32::try_from(self.source.len()).unwrap_or(u32::MAX)
    }
}

impl Lexer for StrLexer<'_> {
    #[inline]
    fn lookahead(&self) -> char {
        self.source[self.pos as usize..self.source_len() as usize]
            .chars()
            .next()
            .unwrap_or('\0')
    }

    fn advance(&mut self, skip: bool) {
        if self.eof() {
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "len_utf8 is at most 4"
        )]
        let width = self.lookahead().len_utf8() as u32;
        self.pos += width;
        if skip {
            self.start = self.pos;
        }
    }

    #[inline]
    fn mark_end(&mut self) {
        self.marked_end = Some(self.pos);
    }

    #[inline]
    fn eof(&self) -> bool {
        self.pos >= self.source_len()
    }
}
